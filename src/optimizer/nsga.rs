//! Implementations of genetic algorithms of the NSGA family.

use std::{cmp::Ordering, marker::PhantomData};

use typed_builder::TypedBuilder;

use crate::{
  evaluation::{executor::EvaluationExecutor, EvaluationError},
  mutation::executor::MutationExecutor,
  optimizer::genetic_algorithm::GeneticOptimizer,
  recombination::executor::RecombinationExecutor,
  score::{ParetoDominance, Scores},
  selection::executor::SelectionExecutor,
  termination::executor::TerminationExecutor,
};

/// An [NSGA-II] optimizer: a fast elitist multi-objective genetic algorithm
/// based on non-dominated sorting. When a generation overflows the initial
/// population size, whole Pareto fronts are kept while they fit, and the
/// front that no longer fits competes by crowding distance, preserving the
/// spread of solutions along the front.
///
/// [NSGA-II]: https://sci2s.ugr.es/sites/default/files/files/Teaching/OtherPostGraduateCourses/Metaheuristicas/Deb_NSGAII.pdf
#[derive(TypedBuilder)]
pub struct Nsga2<
  Solution,
  Eva: EvaluationExecutor<Solution, OBJECTIVE_NUM, EvaExecStrat>,
  Sel: SelectionExecutor<Solution, OBJECTIVE_NUM, SelExecStrat>,
  Rec: RecombinationExecutor<Solution, PARENT_NUM, OFFSPRING_NUM, RecExecStrat>,
  Mut: MutationExecutor<Solution, MutExecStrat>,
  Ter: TerminationExecutor<Solution, OBJECTIVE_NUM, TerExecStrat>,
  EvaExecStrat,
  SelExecStrat,
  RecExecStrat,
  MutExecStrat,
  TerExecStrat,
  const OBJECTIVE_NUM: usize,
  const PARENT_NUM: usize,
  const OFFSPRING_NUM: usize,
> {
  #[builder(setter(
    transform = |population: Vec<Solution>| {
      assert!(!population.is_empty(), "initial population is empty");
      population
    },
    doc = "
The initial population setter. The initial population size is the size every
following generation is truncated back to.

# Panics

Panics if population is empty.",
  ))]
  population: Vec<Solution>,
  evaluator: Eva,
  selector: Sel,
  recombinator: Rec,
  mutator: Mut,
  terminator: Ter,
  #[builder(setter(skip), default = 0)]
  population_size: usize,
  #[builder(setter(skip), default)]
  _eva_es: PhantomData<EvaExecStrat>,
  #[builder(setter(skip), default)]
  _sel_es: PhantomData<SelExecStrat>,
  #[builder(setter(skip), default)]
  _rec_es: PhantomData<RecExecStrat>,
  #[builder(setter(skip), default)]
  _mut_es: PhantomData<MutExecStrat>,
  #[builder(setter(skip), default)]
  _ter_es: PhantomData<TerExecStrat>,
}

impl<
    Solution,
    Eva: EvaluationExecutor<Solution, OBJECTIVE_NUM, EvaExecStrat>,
    Sel: SelectionExecutor<Solution, OBJECTIVE_NUM, SelExecStrat>,
    Rec: RecombinationExecutor<Solution, PARENT_NUM, OFFSPRING_NUM, RecExecStrat>,
    Mut: MutationExecutor<Solution, MutExecStrat>,
    Ter: TerminationExecutor<Solution, OBJECTIVE_NUM, TerExecStrat>,
    EvaExecStrat,
    SelExecStrat,
    RecExecStrat,
    MutExecStrat,
    TerExecStrat,
    const OBJECTIVE_NUM: usize,
    const PARENT_NUM: usize,
    const OFFSPRING_NUM: usize,
  > GeneticOptimizer<Solution, OBJECTIVE_NUM>
  for Nsga2<
    Solution,
    Eva,
    Sel,
    Rec,
    Mut,
    Ter,
    EvaExecStrat,
    SelExecStrat,
    RecExecStrat,
    MutExecStrat,
    TerExecStrat,
    OBJECTIVE_NUM,
    PARENT_NUM,
    OFFSPRING_NUM,
  >
{
  fn take_initial_population(&mut self) -> Vec<Solution> {
    self.population_size = self.population.len();
    std::mem::take(&mut self.population)
  }

  fn evaluate(
    &self,
    population: &[Solution],
  ) -> Result<Vec<Scores<OBJECTIVE_NUM>>, EvaluationError> {
    self.evaluator.execute_evaluation(population)
  }

  fn select<'a>(
    &mut self,
    population: &'a [Solution],
    scores: &[Scores<OBJECTIVE_NUM>],
  ) -> Vec<&'a Solution> {
    self.selector.execute_selection(population, scores)
  }

  fn create(&self, parents: Vec<&Solution>) -> Vec<Solution> {
    self.recombinator.execute_recombination(parents)
  }

  fn mutate(&self, population: &mut [Solution]) {
    self.mutator.execute_mutations(population)
  }

  fn truncate(
    &mut self,
    population: Vec<Solution>,
    scores: Vec<Scores<OBJECTIVE_NUM>>,
  ) -> (Vec<Solution>, Vec<Scores<OBJECTIVE_NUM>>) {
    let target = self.population_size;
    if population.len() <= target {
      return (population, scores);
    }

    let solution_cnt = population.len();
    // for each solution, the solutions it dominates and the number of
    // solutions dominating it
    let mut dominance_lists: Vec<Vec<usize>> = vec![Vec::new(); solution_cnt];
    let mut dominance_counters: Vec<u32> = vec![0; solution_cnt];
    let mut front: Vec<usize> = Vec::new();

    for p_idx in 0..solution_cnt {
      for q_idx in (p_idx + 1)..solution_cnt {
        match scores[p_idx].dominance(&scores[q_idx]) {
          Ordering::Less => {
            dominance_lists[p_idx].push(q_idx);
            dominance_counters[q_idx] += 1;
          }
          Ordering::Greater => {
            dominance_lists[q_idx].push(p_idx);
            dominance_counters[p_idx] += 1;
          }
          Ordering::Equal => {}
        }
      }
      if dominance_counters[p_idx] == 0 {
        front.push(p_idx);
      }
    }
    debug_assert!(
      !front.is_empty(),
      "first front must have at least 1 solution"
    );

    // keep peeling whole fronts off while they fit into the next generation
    let mut kept: Vec<usize> = Vec::with_capacity(target);
    while kept.len() + front.len() < target {
      let mut next_front = Vec::new();
      for &p_idx in &front {
        for &q_idx in &dominance_lists[p_idx] {
          dominance_counters[q_idx] -= 1;
          if dominance_counters[q_idx] == 0 {
            next_front.push(q_idx);
          }
        }
      }
      kept.append(&mut front);
      front = next_front;
      debug_assert!(!front.is_empty(), "fronts must cover the population");
    }

    // the split front competes by crowding distance
    let crowding = crowding_distances(&front, &scores);
    front.sort_by(|&a_idx, &b_idx| {
      crowding[b_idx].total_cmp(&crowding[a_idx])
    });
    front.truncate(target - kept.len());
    kept.append(&mut front);

    let mut some_solutions: Vec<_> =
      population.into_iter().map(Some).collect();
    let mut some_scores: Vec<_> = scores.into_iter().map(Some).collect();
    kept
      .into_iter()
      .map(|idx| {
        (
          some_solutions[idx].take().expect("solution is kept once"),
          some_scores[idx].take().expect("scores are kept once"),
        )
      })
      .unzip()
  }

  fn terminate(
    &mut self,
    population: &[Solution],
    scores: &[Scores<OBJECTIVE_NUM>],
  ) -> bool {
    self.terminator.execute_termination(population, scores)
  }
}

/// Returns crowding distances indexed like `scores`; entries outside the
/// front stay zero. Extreme solutions of each objective get an infinite
/// distance so they always survive the split.
fn crowding_distances<const N: usize>(
  front: &[usize],
  scores: &[Scores<N>],
) -> Vec<f64> {
  let mut distances = vec![0.0; scores.len()];
  if front.len() <= 2 {
    front.iter().for_each(|&idx| distances[idx] = f64::INFINITY);
    return distances;
  }
  let mut ordered = front.to_vec();
  for obj_idx in 0..N {
    ordered.sort_by(|&a_idx, &b_idx| {
      scores[a_idx][obj_idx].total_cmp(&scores[b_idx][obj_idx])
    });
    let first = ordered[0];
    let last = ordered[ordered.len() - 1];
    distances[first] = f64::INFINITY;
    distances[last] = f64::INFINITY;
    let span = scores[last][obj_idx] - scores[first][obj_idx];
    if span == 0.0 {
      continue;
    }
    for window in ordered.windows(3) {
      let (prev, mid, next) = (window[0], window[1], window[2]);
      distances[mid] +=
        (scores[next][obj_idx] - scores[prev][obj_idx]) / span;
    }
  }
  distances
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    optimizer::Optimizer,
    selection::AllSelector,
    termination::GenerationTerminator,
  };

  #[test]
  fn test_nsga2_returns_initial_population_untouched() {
    let population = vec![3.0, 1.0, 2.0];
    let optimizer = Nsga2::builder()
      .population(population.clone())
      .evaluator(|x: &f64| [*x, -x])
      .selector(AllSelector())
      .recombinator(|a: &f64, b: &f64| (a + b) / 2.0)
      .mutator(|_: &mut f64| {})
      .terminator(GenerationTerminator(0))
      .build();
    let solutions = optimizer.optimize().unwrap();
    assert_eq!(solutions, population);
  }

  #[test]
  fn test_nsga2_converges_on_schaffer_n1() {
    // objectives f1(x) = x^2 and f2(x) = (x - 2)^2, pareto set is [0, 2]
    let population: Vec<f64> =
      (0..10).map(|i| f64::from(i) * 2.0 - 10.0).collect();
    let optimizer = Nsga2::builder()
      .population(population)
      .evaluator(|x: &f64| [x * x, (x - 2.0) * (x - 2.0)])
      .selector(AllSelector())
      .recombinator(|a: &f64, b: &f64| (a + b) / 2.0)
      .mutator(|_: &mut f64| {})
      .terminator(GenerationTerminator(50))
      .build();
    let solutions = optimizer.optimize().unwrap();
    assert_eq!(solutions.len(), 10);
    assert!(
      solutions.iter().all(|x| (0.0..=2.0).contains(x)),
      "population should concentrate on the pareto set, got {solutions:?}"
    );
  }

  #[test]
  #[should_panic(expected = "initial population is empty")]
  fn test_nsga2_panics_on_empty_population() {
    let _ = Nsga2::builder()
      .population(Vec::<f64>::new())
      .evaluator(|x: &f64| [*x])
      .selector(AllSelector())
      .recombinator(|a: &f64, _: &f64| *a)
      .mutator(|_: &mut f64| {})
      .terminator(GenerationTerminator(1))
      .build();
  }

  #[test]
  fn test_crowding_prefers_extremes_and_spread() {
    // a single front of four solutions on the line f2 = 1 - f1
    let scores: Vec<[f64; 2]> = vec![
      [0.0, 1.0],
      [0.1, 0.9],
      [0.5, 0.5],
      [1.0, 0.0],
    ];
    let front: Vec<usize> = vec![0, 1, 2, 3];
    let crowding = crowding_distances(&front, &scores);
    assert_eq!(crowding[0], f64::INFINITY);
    assert_eq!(crowding[3], f64::INFINITY);
    // the middle solution is less crowded than the one near the extreme
    assert!(crowding[2] > crowding[1]);
  }
}
