//! Objective functions scoring phenotypes, with or without a simulation.

use std::{any::Any, num::NonZeroU64};

use crate::{
  score::Score,
  simulation::{Simulation, SimulationId},
};

/// Scratch state one objective accumulates into over one simulation run.
///
/// Records are pooled by the [`Evaluator`]: the same record is handed to the
/// same objective again and again, for one individual after another.
/// [`reset`] zeroes the counters between runs but deliberately keeps the
/// [`store`] slot alive, so whatever an objective allocated in there once is
/// reused instead of reallocated.
///
/// [`Evaluator`]: crate::evaluation::Evaluator
/// [`reset`]: ObjectiveRecord::reset
/// [`store`]: ObjectiveRecord::store
#[derive(Default)]
pub struct ObjectiveRecord {
  /// Running accumulator, zeroed before each run.
  pub accumulator: f64,
  /// Number of inspections performed during the current run.
  pub inspections: u64,
  /// Objective-specific state. Survives [`reset`], so the objective must
  /// clear its own leftovers in [`Objective::begin`].
  ///
  /// [`reset`]: ObjectiveRecord::reset
  pub store: Option<Box<dyn Any + Send>>,
}

impl ObjectiveRecord {
  /// Prepares the record for the next run, keeping `store` allocations.
  pub fn reset(&mut self) {
    self.accumulator = 0.0;
    self.inspections = 0;
  }
}

/// An objective function that scores a phenotype of type `P`. The lower the
/// returned score, the better the phenotype.
///
/// A *static* objective computes its score from the phenotype alone and only
/// needs [`evaluate`]. An objective that judges runtime behavior instead
/// declares the simulator it requires with [`simulation`], how many steps
/// that simulator must run with [`required_steps`], and optionally at which
/// step interval it wants to [`inspect`] the running simulation. The
/// [`Evaluator`] groups objectives by required simulator, so all objectives
/// watching the same simulator share a single run per trial.
///
/// Closures of type `Fn(&P) -> Score` implement this trait as static
/// objectives:
/// ```
/// # use sigoa::objective::Objective;
/// let cost = |p: &f64| p * p;
/// # fn assert_objective<P>(_: &impl Objective<P>) {}
/// # assert_objective::<f64>(&cost);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
///
/// [`evaluate`]: Objective::evaluate
/// [`simulation`]: Objective::simulation
/// [`required_steps`]: Objective::required_steps
/// [`inspect`]: Objective::inspect
/// [`Evaluator`]: crate::evaluation::Evaluator
pub trait Objective<P>: Send + Sync {
  /// Simulator this objective inspects during evaluation, if any.
  fn simulation(&self) -> Option<SimulationId> {
    None
  }

  /// Number of steps the required simulator must run for this objective.
  /// The run of a simulator lasts for the maximum of the required steps of
  /// all objectives sharing it, clamped by the evaluator's step limit.
  fn required_steps(&self) -> u64 {
    0
  }

  /// Steps between two consecutive inspections of the running simulation.
  /// `None` means the objective only judges the final state.
  fn inspection_interval(&self) -> Option<NonZeroU64> {
    None
  }

  /// Called once before the first step of a run.
  fn begin(&self, phenotype: &P, record: &mut ObjectiveRecord) {
    let _ = (phenotype, record);
  }

  /// Called at each scheduled inspection point, and never past
  /// [`required_steps`] nor after the simulation reached a terminal state.
  ///
  /// [`required_steps`]: Objective::required_steps
  fn inspect(&self, simulation: &dyn Simulation<P>, record: &mut ObjectiveRecord) {
    let _ = (simulation, record);
  }

  /// Called once after the run, yielding one sampled objective value. For
  /// static objectives `simulation` is `None`.
  fn evaluate(
    &self,
    phenotype: &P,
    simulation: Option<&dyn Simulation<P>>,
    record: &mut ObjectiveRecord,
  ) -> Score;
}

impl<P, F> Objective<P> for F
where
  F: Fn(&P) -> Score + Send + Sync,
{
  fn evaluate(
    &self,
    phenotype: &P,
    _: Option<&dyn Simulation<P>>,
    _: &mut ObjectiveRecord,
  ) -> Score {
    self(phenotype)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_objective_from_closure() {
    let objective = |p: &f64| p + 1.0;
    let mut record = ObjectiveRecord::default();
    assert_eq!(objective.evaluate(&1.0, None, &mut record), 2.0);
    assert_eq!(objective.simulation(), None);
    assert_eq!(objective.required_steps(), 0);
    assert_eq!(objective.inspection_interval(), None);
  }

  #[test]
  fn test_record_reset_keeps_store() {
    let mut record = ObjectiveRecord {
      accumulator: 4.0,
      inspections: 2,
      store: Some(Box::new(vec![1.0f64; 8])),
    };
    record.reset();
    assert_eq!(record.accumulator, 0.0);
    assert_eq!(record.inspections, 0);
    assert!(record.store.is_some());
  }
}
