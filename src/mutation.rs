//! Mutation operators applied to freshly bred genotypes.

use executor::MutationExecutor;
use rayon::prelude::*;

use crate::{
  execution::strategy::*,
  operator::{
    tag::MutationOperatorTag,
    ParBatch,
    ParBatchOperator,
    ParEach,
    ParEachOperator,
  },
};

/// An operator that mutates a single genotype in place. Mutation runs after
/// recombination and before evaluation, so whatever it leaves behind is
/// exactly what gets hatched and scored.
///
/// Convert it into a parallelized operator with `par_each()` or
/// `par_batch()` to spread mutation of a large population across threads.
///
/// # Examples
/// ```
/// # use sigoa::operator::*;
/// // dampen every gene of a genotype
/// let m = |genes: &mut Vec<f64>| genes.iter_mut().for_each(|g| *g *= 0.9);
/// let m = m.par_each();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Mutation<S> {
  /// Mutates given genotype.
  fn mutate(&self, genotype: &mut S);
}

impl<S, F> Mutation<S> for F
where
  F: Fn(&mut S),
{
  fn mutate(&self, genotype: &mut S) {
    self(genotype)
  }
}

impl<S, M> ParEach<MutationOperatorTag, S, 0, 0> for M
where
  S: Sync + Send,
  M: Mutation<S> + Sync,
{
}

impl<S, M> ParBatch<MutationOperatorTag, S, 0> for M
where
  S: Sync + Send,
  M: Mutation<S> + Sync,
{
}

/// An operator that mutates a whole generation of genotypes at once. Useful
/// when mutations are not independent, for example when only a fixed share
/// of the population may be touched.
///
/// # Examples
/// ```
/// // nudge only the first half of the offsprings
/// let m = |offsprings: &mut [f64]| {
///   let half = offsprings.len() / 2;
///   offsprings[..half].iter_mut().for_each(|g| *g += 1.0);
/// };
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Mutator<S> {
  /// Mutates given genotypes.
  fn mutate(&self, genotypes: &mut [S]);
}

impl<S, F> Mutator<S> for F
where
  F: Fn(&mut [S]),
{
  fn mutate(&self, genotypes: &mut [S]) {
    self(genotypes)
  }
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  /// An internal mutation executor.
  pub trait MutationExecutor<S, ExecutionStrategy> {
    /// Executes mutations optionally parallelizing operator's application.
    fn execute_mutations(&self, solutions: &mut [S]);
  }
}

impl<S, M> MutationExecutor<S, CustomExecutionStrategy> for M
where
  M: Mutator<S>,
{
  fn execute_mutations(&self, solutions: &mut [S]) {
    self.mutate(solutions)
  }
}

impl<S, M> MutationExecutor<S, SequentialExecutionStrategy> for M
where
  M: Mutation<S>,
{
  fn execute_mutations(&self, solutions: &mut [S]) {
    solutions.iter_mut().for_each(|s| self.mutate(s));
  }
}

impl<S, M> MutationExecutor<S, ParallelEachExecutionStrategy>
  for ParEachOperator<MutationOperatorTag, S, M>
where
  S: Sync + Send,
  M: Mutation<S> + Sync,
{
  fn execute_mutations(&self, solutions: &mut [S]) {
    solutions
      .par_iter_mut()
      .for_each(|s| self.operator().mutate(s));
  }
}

impl<S, M> MutationExecutor<S, ParallelBatchExecutionStrategy>
  for ParBatchOperator<MutationOperatorTag, S, M>
where
  S: Sync + Send,
  M: Mutation<S> + Sync,
{
  fn execute_mutations(&self, solutions: &mut [S]) {
    let chunk_size = (solutions.len() / rayon::current_num_threads()).max(1);
    solutions.par_chunks_mut(chunk_size).for_each(|chunk| {
      chunk.iter_mut().for_each(|s| self.operator().mutate(s))
    });
  }
}
