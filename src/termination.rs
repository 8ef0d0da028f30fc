//! Termination operators deciding when the optimization loop stops.

use executor::TerminationExecutor;
use rayon::prelude::*;

use crate::{
  execution::strategy::*,
  operator::{
    tag::TerminationOperatorTag,
    ParBatch,
    ParBatchOperator,
    ParEach,
    ParEachOperator,
  },
  score::Scores,
};

/// An operator that inspects one solution and its scores at a time. The
/// loop stops as soon as any solution satisfies it, so it expresses goals
/// like "some individual finally survives the whole simulated run".
///
/// Convert it into a parallelized operator with `par_each()` or
/// `par_batch()` to check solutions in parallel.
///
/// # Examples
/// ```ignore
/// // stop once any solution scores below 1 on every objective
/// let t = |_: &f64, scores: &[f64; 3]| scores.iter().all(|s| *s < 1.0);
/// let t = t.par_batch();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Termination<S, const N: usize> {
  /// If returns `true`, the algorithm is terminated.
  fn terminate(&self, solution: &S, scores: &Scores<N>) -> bool;
}

impl<S, const N: usize, F> Termination<S, N> for F
where
  F: Fn(&S, &Scores<N>) -> bool,
{
  fn terminate(&self, solution: &S, scores: &Scores<N>) -> bool {
    self(solution, scores)
  }
}

impl<S, const N: usize, T> ParEach<TerminationOperatorTag, S, N, 0> for T
where
  S: Sync,
  T: Termination<S, N> + Sync,
{
}

impl<S, const N: usize, T> ParBatch<TerminationOperatorTag, S, N> for T
where
  S: Sync,
  T: Termination<S, N> + Sync,
{
}

/// An operator that judges the whole generation at once, which also lets it
/// keep state between generations: counters, best-score-so-far trackers and
/// the like. Note that it receives `&mut self`.
///
/// # Examples
/// ```
/// // stop once the whole population fits the target region
/// let t = |_: &[f64], scores: &[[f64; 3]]| {
///   scores.iter().flatten().all(|s| *s < 1.0)
/// };
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Terminator<S, const N: usize> {
  /// If returns `true`, the algorithm is terminated.
  fn terminate(&mut self, solutions: &[S], scores: &[Scores<N>]) -> bool;
}

impl<S, const N: usize, F> Terminator<S, N> for F
where
  F: FnMut(&[S], &[Scores<N>]) -> bool,
{
  fn terminate(&mut self, solutions: &[S], scores: &[Scores<N>]) -> bool {
    self(solutions, scores)
  }
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  use crate::score::Scores;

  /// An internal termination executor.
  pub trait TerminationExecutor<S, const N: usize, ExecutionStrategy> {
    /// Executes termination evaluation optionally parallelizing operator's
    /// application.
    fn execute_termination(
      &mut self,
      solutions: &[S],
      scores: &[Scores<N>],
    ) -> bool;
  }
}

impl<S, const N: usize, T> TerminationExecutor<S, N, CustomExecutionStrategy>
  for T
where
  T: Terminator<S, N>,
{
  fn execute_termination(
    &mut self,
    solutions: &[S],
    scores: &[Scores<N>],
  ) -> bool {
    self.terminate(solutions, scores)
  }
}

impl<S, const N: usize, T>
  TerminationExecutor<S, N, SequentialExecutionStrategy> for T
where
  T: Termination<S, N>,
{
  fn execute_termination(
    &mut self,
    solutions: &[S],
    scores: &[Scores<N>],
  ) -> bool {
    solutions
      .iter()
      .zip(scores)
      .any(|(sol, sc)| self.terminate(sol, sc))
  }
}

impl<S, const N: usize, T>
  TerminationExecutor<S, N, ParallelEachExecutionStrategy>
  for ParEachOperator<TerminationOperatorTag, S, T>
where
  S: Sync,
  T: Termination<S, N> + Sync,
{
  fn execute_termination(
    &mut self,
    solutions: &[S],
    scores: &[Scores<N>],
  ) -> bool {
    solutions
      .par_iter()
      .zip(scores)
      .any(|(sol, sc)| self.operator().terminate(sol, sc))
  }
}

impl<S, const N: usize, T>
  TerminationExecutor<S, N, ParallelBatchExecutionStrategy>
  for ParBatchOperator<TerminationOperatorTag, S, T>
where
  S: Sync,
  T: Termination<S, N> + Sync,
{
  fn execute_termination(
    &mut self,
    solutions: &[S],
    scores: &[Scores<N>],
  ) -> bool {
    let chunk_size = (solutions.len() / rayon::current_num_threads()).max(1);
    solutions
      .chunks(chunk_size)
      .zip(scores.chunks(chunk_size))
      .par_bridge()
      .any(|chunk| {
        chunk
          .0
          .iter()
          .zip(chunk.1)
          .any(|(sol, sc)| self.operator().terminate(sol, sc))
      })
  }
}

/// A `Terminator` that terminates the algorithm as soon as a certain number
/// of generations have passed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GenerationTerminator(pub usize);

impl<S, const N: usize> Terminator<S, N> for GenerationTerminator {
  fn terminate(&mut self, _: &[S], _: &[Scores<N>]) -> bool {
    match self.0 {
      0 => true,
      _ => {
        self.0 -= 1;
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  type Solution = f64;

  fn takes_terminator<
    ES,
    const N: usize,
    T: TerminationExecutor<Solution, N, ES>,
  >(
    t: &mut T,
  ) {
    t.execute_termination(&[], &[]);
  }

  #[test]
  fn test_termination_from_closure() {
    let mut termination = |solution: &Solution, scores: &Scores<3>| {
      *solution > 0.0 && scores.iter().sum::<f64>() == 0.0
    };
    takes_terminator(&mut termination);
    takes_terminator(&mut termination.par_each());
    takes_terminator(&mut termination.par_batch());
  }

  #[test]
  fn test_termination_fires_on_any_matching_solution() {
    let mut termination =
      |_: &Solution, scores: &Scores<2>| scores.iter().all(|s| *s <= 0.0);
    let solutions = [1.0, 2.0];
    let reached = [[1.0, 1.0], [0.0, -1.0]];
    assert!(termination.execute_termination(&solutions, &reached));
    let unreached = [[1.0, 1.0], [0.5, -1.0]];
    assert!(!termination.execute_termination(&solutions, &unreached));
  }

  #[test]
  fn test_terminator_from_closure() {
    let mut terminator =
      |fs: &[f64], _: &[[f64; 3]]| fs.iter().all(|f| *f < 1.0);
    takes_terminator(&mut terminator);
  }

  #[test]
  fn test_stateful_terminator_counts_stalls() {
    // stops after the best score sum fails to improve twice in a row
    let mut best = f64::INFINITY;
    let mut stalls = 0;
    let mut terminator = move |_: &[Solution], scores: &[Scores<2>]| {
      let round_best = scores
        .iter()
        .map(|sc| sc.iter().sum::<f64>())
        .fold(f64::INFINITY, f64::min);
      if round_best < best {
        best = round_best;
        stalls = 0;
      } else {
        stalls += 1;
      }
      stalls >= 2
    };
    assert!(!terminator.execute_termination(&[0.0], &[[2.0, 2.0]]));
    assert!(!terminator.execute_termination(&[0.0], &[[1.0, 1.0]]));
    assert!(!terminator.execute_termination(&[0.0], &[[1.0, 1.0]]));
    assert!(terminator.execute_termination(&[0.0], &[[1.0, 1.0]]));
  }

  #[test]
  fn test_custom_termination() {
    #[derive(Clone, Copy)]
    struct TargetReached {}
    impl<S> Termination<S, 3> for TargetReached {
      fn terminate(&self, _: &S, _: &Scores<3>) -> bool {
        true
      }
    }

    let mut termination = TargetReached {};
    takes_terminator(&mut termination);
    takes_terminator(&mut termination.par_each());
    takes_terminator(&mut termination.par_batch());
  }

  #[test]
  fn test_generation_terminator_counts_down() {
    let mut terminator = GenerationTerminator(2);
    let population = [0.0];
    let scores = [[0.0]];
    assert!(!terminator.terminate(&population, &scores));
    assert!(!terminator.terminate(&population, &scores));
    assert!(terminator.terminate(&population, &scores));
  }
}
