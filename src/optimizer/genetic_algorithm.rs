//! The genetic algorithm template every optimizer of this crate runs on.

use tracing::debug;

use super::Optimizer;
use crate::{evaluation::EvaluationError, score::Scores};

/// Decomposes a genetic algorithm into the steps of its loop. Implementors
/// get the canonical loop from the blanket [`Optimizer`] implementation and
/// only differ in how they perform each step, most notably in how they
/// `truncate` a grown population back to its intended size.
pub trait GeneticOptimizer<Solution, const OBJECTIVE_NUM: usize> {
  /// Moves the initial population out of the optimizer.
  fn take_initial_population(&mut self) -> Vec<Solution>;

  /// Evaluates each solution in the population, returning a vector of
  /// objective scores per solution.
  fn evaluate(
    &self,
    population: &[Solution],
  ) -> Result<Vec<Scores<OBJECTIVE_NUM>>, EvaluationError>;

  /// Selects solutions which are suitable for becoming parents of the next
  /// generation of solutions.
  fn select<'a>(
    &mut self,
    population: &'a [Solution],
    scores: &[Scores<OBJECTIVE_NUM>],
  ) -> Vec<&'a Solution>;

  /// Creates the next generation of solutions from selected parents.
  fn create(&self, parents: Vec<&Solution>) -> Vec<Solution>;

  /// Mutates created solutions.
  fn mutate(&self, population: &mut [Solution]);

  /// Truncates excessive solutions from the grown population. The truncation
  /// operator is specific for each optimizer implementation.
  fn truncate(
    &mut self,
    population: Vec<Solution>,
    scores: Vec<Scores<OBJECTIVE_NUM>>,
  ) -> (Vec<Solution>, Vec<Scores<OBJECTIVE_NUM>>);

  /// Decides whether the algorithm should stop.
  fn terminate(
    &mut self,
    population: &[Solution],
    scores: &[Scores<OBJECTIVE_NUM>],
  ) -> bool;
}

impl<Solution, const OBJECTIVE_NUM: usize, G> Optimizer<Solution, OBJECTIVE_NUM>
  for G
where
  G: GeneticOptimizer<Solution, OBJECTIVE_NUM>,
{
  fn optimize(mut self) -> Result<Vec<Solution>, EvaluationError> {
    let mut population = self.take_initial_population();
    let mut scores = self.evaluate(&population)?;
    let mut generation = 0usize;

    while !self.terminate(&population, &scores) {
      generation += 1;
      let parents = self.select(&population, &scores);
      let mut offsprings = self.create(parents);
      self.mutate(&mut offsprings);
      let mut offspring_scores = self.evaluate(&offsprings)?;

      population.append(&mut offsprings);
      scores.append(&mut offspring_scores);

      (population, scores) = self.truncate(population, scores);
      debug!(
        generation,
        population = population.len(),
        "generation complete"
      );
    }

    Ok(population)
  }
}
