//! Evaluation operators and the simulation-scheduling evaluator.
//!
//! Two ways to score a population exist in this crate. Closures and other
//! [`Evaluation`] operators score each solution directly, just like any
//! other operator. The [`Evaluator`], in turn, is a whole-population
//! operator that hatches genotypes into phenotypes, runs the simulations the
//! objectives require, and aggregates repeated trials into a single score
//! array per solution.

use std::sync::Mutex;

use executor::EvaluationExecutor;
use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;
use typed_builder::TypedBuilder;

use crate::{
  embryogeny::Embryogeny,
  execution::strategy::*,
  objective::{Objective, ObjectiveRecord},
  operator::{
    tag::EvaluationOperatorTag,
    ParBatch,
    ParBatchOperator,
    ParEach,
    ParEachOperator,
  },
  score::{Score, Scores},
  simulation::{SimulationError, SimulationId, SimulationPool},
};

/// The error type of population evaluation.
#[derive(Debug, Error)]
pub enum EvaluationError {
  /// A required simulation could not be acquired or run.
  #[error(transparent)]
  Simulation(#[from] SimulationError),
}

/// An operator that scores a single solution, evaluating an array of its
/// objective scores. The smaller a score, the better.
///
/// This crate's purpose is *multi-objective* optimization, that's why
/// evaluations must return an *array* of values. If you want to return a
/// single value, wrap it in an array nonetheless.
///
/// Can be applied in parallel to each solution or to batches of solutions
/// by converting it into a parallelized operator with `par_each()` or
/// `par_batch()` methods.
///
/// # Examples
/// ```
/// # use sigoa::operator::*;
/// let e = |f: &f64| [f * 2.0]; // only one objective
/// let e = |f: &f64| [f + 1.0, f + 2.0, f + 3.0]; // 3 objectives
/// // or use an array of closures that return a single score
/// let e = [
///   |f: &f64| f + 1.0,
///   |f: &f64| f * f + 2.0,
///   |f: &f64| f * f * f + 3.0,
/// ];
/// e.par_batch();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Evaluation<S, const N: usize> {
  /// Returns an array of objective scores for given solution.
  /// The smaller a score, the better.
  fn evaluate(&self, solution: &S) -> Scores<N>;
}

impl<S, const N: usize, F> Evaluation<S, N> for [F; N]
where
  F: Fn(&S) -> Score,
{
  fn evaluate(&self, solution: &S) -> Scores<N> {
    self.each_ref().map(|f| f(solution))
  }
}

impl<S, const N: usize, F> Evaluation<S, N> for F
where
  F: Fn(&S) -> Scores<N>,
{
  fn evaluate(&self, solution: &S) -> Scores<N> {
    self(solution)
  }
}

impl<S, const N: usize, E> ParEach<EvaluationOperatorTag, S, N, 0> for E
where
  S: Sync,
  E: Evaluation<S, N> + Sync,
{
}

impl<S, const N: usize, E> ParBatch<EvaluationOperatorTag, S, N> for E
where
  S: Sync,
  E: Evaluation<S, N> + Sync,
{
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  use super::EvaluationError;
  use crate::score::Scores;

  /// An internal evaluation executor.
  pub trait EvaluationExecutor<S, const N: usize, ExecutionStrategy> {
    /// Executes evaluations optionally parallelizing operator's application.
    fn execute_evaluation(
      &self,
      solutions: &[S],
    ) -> Result<Vec<Scores<N>>, EvaluationError>;
  }
}

impl<S, const N: usize, E> EvaluationExecutor<S, N, SequentialExecutionStrategy>
  for E
where
  E: Evaluation<S, N>,
{
  fn execute_evaluation(
    &self,
    solutions: &[S],
  ) -> Result<Vec<Scores<N>>, EvaluationError> {
    Ok(solutions.iter().map(|s| self.evaluate(s)).collect())
  }
}

impl<S, const N: usize, E>
  EvaluationExecutor<S, N, ParallelEachExecutionStrategy>
  for ParEachOperator<EvaluationOperatorTag, S, E>
where
  S: Sync,
  E: Evaluation<S, N> + Sync,
{
  fn execute_evaluation(
    &self,
    solutions: &[S],
  ) -> Result<Vec<Scores<N>>, EvaluationError> {
    Ok(
      solutions
        .par_iter()
        .map(|s| self.operator().evaluate(s))
        .collect(),
    )
  }
}

impl<S, const N: usize, E>
  EvaluationExecutor<S, N, ParallelBatchExecutionStrategy>
  for ParBatchOperator<EvaluationOperatorTag, S, E>
where
  S: Sync,
  E: Evaluation<S, N> + Sync,
{
  fn execute_evaluation(
    &self,
    solutions: &[S],
  ) -> Result<Vec<Scores<N>>, EvaluationError> {
    let chunk_size = (solutions.len() / rayon::current_num_threads()).max(1);
    Ok(
      solutions
        .par_chunks(chunk_size)
        .flat_map_iter(|chunk| {
          chunk.iter().map(|s| self.operator().evaluate(s))
        })
        .collect(),
    )
  }
}

/// Scores populations by running each solution's phenotype through the
/// simulations its objectives require.
///
/// For each solution the evaluator hatches the genotype with its
/// [`Embryogeny`], then repeats the following `trials` times: objectives
/// that require no simulation are evaluated directly; objectives sharing a
/// required simulator are run together against a single pooled simulation
/// instance, which is stepped along the merged inspection schedule of the
/// group. Each trial yields one sample per objective, and the samples are
/// folded into the final score by hysteresis-weighted averaging (see
/// [`hysteresis`]).
///
/// Per-individual scratch state (sample vectors and [`ObjectiveRecord`]s) is
/// pooled inside the evaluator, and simulation instances are pooled in the
/// [`SimulationPool`], so steady-state evaluation allocates next to nothing.
///
/// The evaluator is a whole-population operator: populations are evaluated
/// in parallel with [rayon], one worker per solution, all workers drawing
/// simulations from the shared pool.
///
/// # Examples
/// ```no_run
/// # use sigoa::{embryogeny::Direct, evaluation::Evaluator, objective::Objective,
/// #   simulation::SimulationPool};
/// # let objectives: [Box<dyn Objective<f64>>; 2] = [
/// #   Box::new(|p: &f64| *p),
/// #   Box::new(|p: &f64| -p),
/// # ];
/// let evaluator = Evaluator::builder()
///   .embryogeny(Direct)
///   .objectives(objectives)
///   .pool(SimulationPool::new())
///   .trials(5)
///   .hysteresis(0.3)
///   .build();
/// let scores = evaluator.evaluate(&[1.0, 2.0, 3.0]).unwrap();
/// ```
///
/// [`hysteresis`]: Evaluator::builder
#[derive(TypedBuilder)]
pub struct Evaluator<P, E, const N: usize> {
  /// Genotype-to-phenotype mapping applied before objectives run.
  embryogeny: E,
  /// The objectives, one per score array entry.
  objectives: [Box<dyn Objective<P>>; N],
  /// Pool the required simulations are drawn from.
  #[builder(default = SimulationPool::new())]
  pool: SimulationPool<P>,
  #[builder(
    default = 1,
    setter(
      transform = |trials: usize| {
        assert!(trials >= 1, "evaluator needs at least one trial");
        trials
      },
      doc = "
Number of times each solution is evaluated. Each trial yields one sample per
objective; the samples are aggregated into the final score.

# Panics

Panics if `trials` is zero.",
    )
  )]
  trials: usize,
  #[builder(
    default = 0.5,
    setter(
      transform = |hysteresis: f64| {
        assert!(
          (0.0..1.0).contains(&hysteresis),
          "hysteresis must lie in [0, 1)"
        );
        hysteresis
      },
      doc = "
Weight of the aggregation fold. Samples of one objective are sorted and then
folded from the worst sample toward the best as
`acc = hysteresis * acc + (1 - hysteresis) * sample`: `0.0` keeps only the
best sample ever observed, values close to `1.0` barely move away from the
worst one. Defaults to `0.5`.

# Panics

Panics if `hysteresis` does not lie in `[0, 1)`.",
    )
  )]
  hysteresis: f64,
  /// Hard cap on the steps any single simulation run may take, regardless
  /// of what objectives require.
  #[builder(default = u64::MAX)]
  step_limit: u64,
  #[builder(setter(skip), default = Mutex::new(vec![]))]
  states: Mutex<Vec<EvaluationState<N>>>,
}

/// Pooled per-individual scratch: one sample vector and one objective record
/// per objective.
struct EvaluationState<const N: usize> {
  samples: [Vec<Score>; N],
  records: [ObjectiveRecord; N],
}

impl<const N: usize> EvaluationState<N> {
  fn new() -> Self {
    Self {
      samples: std::array::from_fn(|_| Vec::new()),
      records: std::array::from_fn(|_| ObjectiveRecord::default()),
    }
  }

  /// Empties the samples and resets the records, keeping all allocations.
  fn clear(&mut self) {
    self.samples.iter_mut().for_each(Vec::clear);
    self.records.iter_mut().for_each(ObjectiveRecord::reset);
  }
}

/// Objective indices partitioned by required simulator.
struct ObjectiveGroups {
  direct: Vec<usize>,
  simulated: Vec<(SimulationId, Vec<usize>)>,
}

/// A pending inspection slot of one objective within a simulation run.
struct Inspection {
  objective: usize,
  interval: u64,
  at: u64,
  until: u64,
}

impl<P, E, const N: usize> Evaluator<P, E, N> {
  /// Evaluates a population, one score array per solution, running solutions
  /// in parallel.
  pub fn evaluate<S>(
    &self,
    solutions: &[S],
  ) -> Result<Vec<Scores<N>>, EvaluationError>
  where
    S: Sync,
    E: Embryogeny<S, P>,
  {
    let groups = self.group_objectives();
    debug!(
      solutions = solutions.len(),
      trials = self.trials,
      simulators = groups.simulated.len(),
      "evaluating population"
    );
    solutions
      .par_iter()
      .map(|solution| self.evaluate_solution(solution, &groups))
      .collect()
  }

  /// The simulation pool this evaluator draws from.
  pub fn pool(&self) -> &SimulationPool<P> {
    &self.pool
  }

  /// Partitions objective indices into the directly evaluated group and one
  /// group per required simulator.
  fn group_objectives(&self) -> ObjectiveGroups {
    let mut direct = Vec::new();
    let mut simulated: Vec<(SimulationId, Vec<usize>)> = Vec::new();
    for (idx, objective) in self.objectives.iter().enumerate() {
      match objective.simulation() {
        None => direct.push(idx),
        Some(id) => match simulated.iter_mut().find(|(gid, _)| *gid == id) {
          Some((_, members)) => members.push(idx),
          None => simulated.push((id, vec![idx])),
        },
      }
    }
    ObjectiveGroups { direct, simulated }
  }

  fn evaluate_solution<S>(
    &self,
    solution: &S,
    groups: &ObjectiveGroups,
  ) -> Result<Scores<N>, EvaluationError>
  where
    E: Embryogeny<S, P>,
  {
    let phenotype = self.embryogeny.hatch(solution);
    let mut state = self.acquire_state();
    let outcome = self.run_trials(&phenotype, groups, &mut state);
    let scores = outcome.map(|()| {
      std::array::from_fn(|idx| {
        aggregate(&mut state.samples[idx], self.hysteresis)
      })
    });
    self.release_state(state);
    scores
  }

  fn run_trials(
    &self,
    phenotype: &P,
    groups: &ObjectiveGroups,
    state: &mut EvaluationState<N>,
  ) -> Result<(), EvaluationError> {
    for _ in 0..self.trials {
      for &idx in &groups.direct {
        let record = &mut state.records[idx];
        record.reset();
        let objective = &self.objectives[idx];
        objective.begin(phenotype, record);
        let sample = objective.evaluate(phenotype, None, record);
        state.samples[idx].push(sample);
      }
      for (id, members) in &groups.simulated {
        self.run_group(phenotype, *id, members, state)?;
      }
    }
    Ok(())
  }

  /// Runs one pooled simulation for all objectives of a group, stepping it
  /// along the merged inspection schedule, and samples each objective at the
  /// end of the run.
  fn run_group(
    &self,
    phenotype: &P,
    id: SimulationId,
    members: &[usize],
    state: &mut EvaluationState<N>,
  ) -> Result<(), EvaluationError> {
    let mut simulation = self.pool.acquire(id)?;

    for &idx in members {
      let record = &mut state.records[idx];
      record.reset();
      self.objectives[idx].begin(phenotype, record);
    }
    simulation.begin_run(phenotype)?;

    let run_length = members
      .iter()
      .map(|&idx| self.objectives[idx].required_steps())
      .max()
      .unwrap_or(0)
      .min(self.step_limit);

    // inspection points of an objective never exceed its own required steps
    let mut pending: Vec<Inspection> = members
      .iter()
      .filter_map(|&idx| {
        let objective = &self.objectives[idx];
        objective.inspection_interval().map(|interval| Inspection {
          objective: idx,
          interval: interval.get(),
          at: interval.get(),
          until: objective.required_steps().min(run_length),
        })
      })
      .filter(|inspection| inspection.at <= inspection.until)
      .collect();

    let mut now = 0;
    let mut alive = true;
    while let Some(target) = pending.iter().map(|i| i.at).min() {
      alive = simulation.step(target - now)?;
      now = simulation.steps_taken();
      if !alive && now < target {
        // terminal state reached between inspection points
        break;
      }
      for inspection in pending.iter_mut().filter(|i| i.at == target) {
        let record = &mut state.records[inspection.objective];
        self.objectives[inspection.objective]
          .inspect(&**simulation, record);
        record.inspections += 1;
        inspection.at += inspection.interval;
      }
      pending.retain(|i| i.at <= i.until);
      if !alive {
        break;
      }
    }
    if alive && now < run_length {
      simulation.step(run_length - now)?;
    }

    for &idx in members {
      let sample = self.objectives[idx].evaluate(
        phenotype,
        Some(&**simulation),
        &mut state.records[idx],
      );
      state.samples[idx].push(sample);
    }
    simulation.end_run();
    Ok(())
  }

  fn acquire_state(&self) -> EvaluationState<N> {
    self
      .states
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .pop()
      .unwrap_or_else(EvaluationState::new)
  }

  fn release_state(&self, mut state: EvaluationState<N>) {
    state.clear();
    self
      .states
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .push(state);
  }
}

impl<S, P, E, const N: usize>
  EvaluationExecutor<S, N, CustomExecutionStrategy> for Evaluator<P, E, N>
where
  S: Sync,
  E: Embryogeny<S, P>,
{
  fn execute_evaluation(
    &self,
    solutions: &[S],
  ) -> Result<Vec<Scores<N>>, EvaluationError> {
    self.evaluate(solutions)
  }
}

/// Sorts the samples of one objective and folds them from the worst sample
/// toward the best. Empties the sample vector for the next evaluation.
fn aggregate(samples: &mut Vec<Score>, hysteresis: f64) -> Score {
  samples.sort_unstable_by(Score::total_cmp);
  let mut folded = samples.iter().rev();
  let mut acc = *folded.next().expect("each trial yields one sample");
  for sample in folded {
    acc = hysteresis * acc + (1.0 - hysteresis) * sample;
  }
  samples.clear();
  acc
}

#[cfg(test)]
mod tests {
  use std::{any::Any, num::NonZeroU64};

  use super::*;
  use crate::{
    embryogeny::Direct,
    simulation::{Simulation, SimulationPool},
  };

  type Solution = f64;

  fn takes_evaluator<
    ES,
    const N: usize,
    E: EvaluationExecutor<Solution, N, ES>,
  >(
    e: &E,
  ) {
    e.execute_evaluation(&[1.0, 2.0, 3.0]).unwrap();
  }

  #[test]
  fn test_evaluation_from_closure() {
    let evaluation = |v: &Solution| [v * 1.0, v * 2.0, v * 3.0];
    takes_evaluator(&evaluation);
    takes_evaluator(&evaluation.par_each());
    takes_evaluator(&evaluation.par_batch());
  }

  #[test]
  fn test_evaluation_from_closure_array() {
    let f1 = |v: &Solution| v * 1.0;
    let f2 = |v: &Solution| v * 2.0;
    let f3 = |v: &Solution| v * 3.0;
    let evaluation = [f1, f2, f3];
    takes_evaluator(&evaluation);
    takes_evaluator(&evaluation.par_each());
    takes_evaluator(&evaluation.par_batch());
  }

  #[test]
  fn test_custom_evaluation() {
    struct CustomEvaluation {}
    impl<S> Evaluation<S, 1> for CustomEvaluation {
      fn evaluate(&self, _: &S) -> Scores<1> {
        [0.0]
      }
    }

    let evaluation = CustomEvaluation {};
    takes_evaluator(&evaluation);
  }

  #[test]
  fn test_aggregate_zero_hysteresis_keeps_best() {
    let mut samples = vec![3.0, 1.0, 2.0];
    assert_eq!(aggregate(&mut samples, 0.0), 1.0);
    assert!(samples.is_empty());
  }

  #[test]
  fn test_aggregate_single_sample() {
    assert_eq!(aggregate(&mut vec![7.0], 0.9), 7.0);
  }

  #[test]
  fn test_aggregate_is_order_independent() {
    let mut a = vec![5.0, 1.0, 3.0];
    let mut b = vec![3.0, 5.0, 1.0];
    assert_eq!(aggregate(&mut a, 0.5), aggregate(&mut b, 0.5));
  }

  #[test]
  fn test_aggregate_leans_toward_worst_with_high_hysteresis() {
    let mut reluctant = vec![1.0, 10.0];
    let mut eager = vec![1.0, 10.0];
    assert!(aggregate(&mut reluctant, 0.9) > aggregate(&mut eager, 0.1));
  }

  #[test]
  fn test_static_only_evaluator() {
    let objectives: [Box<dyn Objective<Solution>>; 2] =
      [Box::new(|p: &Solution| *p), Box::new(|p: &Solution| 10.0 - p)];
    let evaluator = Evaluator::builder()
      .embryogeny(Direct)
      .objectives(objectives)
      .trials(3)
      .build();
    let scores = evaluator.evaluate(&[1.0, 4.0]).unwrap();
    assert_eq!(scores, vec![[1.0, 9.0], [4.0, 6.0]]);
  }

  const TANK: SimulationId = SimulationId::new("tank");

  /// A tank drained at a fixed rate of 1 unit per step, refilled to the
  /// phenotype's level at the start of a run. Terminal once empty.
  struct Tank {
    level: f64,
    steps: u64,
  }

  impl Simulation<f64> for Tank {
    fn begin_run(&mut self, phenotype: &f64) -> Result<(), SimulationError> {
      self.level = *phenotype;
      self.steps = 0;
      Ok(())
    }

    fn step(&mut self, steps: u64) -> Result<bool, SimulationError> {
      let possible = steps.min(self.level.ceil() as u64);
      self.steps += possible;
      self.level -= possible as f64;
      Ok(self.level > 0.0)
    }

    fn steps_taken(&self) -> u64 {
      self.steps
    }

    fn as_any(&self) -> &dyn Any {
      self
    }
  }

  fn tank_pool() -> SimulationPool<f64> {
    SimulationPool::new().with((TANK, || {
      Box::new(Tank {
        level: 0.0,
        steps: 0,
      }) as Box<dyn Simulation<f64>>
    }))
  }

  /// Sums the tank level over inspections every 10 steps of a 100 step run.
  struct AverageLevel;

  impl Objective<f64> for AverageLevel {
    fn simulation(&self) -> Option<SimulationId> {
      Some(TANK)
    }

    fn required_steps(&self) -> u64 {
      100
    }

    fn inspection_interval(&self) -> Option<NonZeroU64> {
      NonZeroU64::new(10)
    }

    fn inspect(&self, simulation: &dyn Simulation<f64>, record: &mut ObjectiveRecord) {
      let tank = simulation
        .as_any()
        .downcast_ref::<Tank>()
        .expect("objective runs in a tank simulation");
      record.accumulator += tank.level;
    }

    fn evaluate(
      &self,
      _: &f64,
      _: Option<&dyn Simulation<f64>>,
      record: &mut ObjectiveRecord,
    ) -> Score {
      match record.inspections {
        0 => 0.0,
        n => record.accumulator / n as f64,
      }
    }
  }

  /// Sums the tank level every 20 steps, but only over its own 50 step
  /// horizon, shorter than what other tank objectives may require.
  struct EarlyLevels;

  impl Objective<f64> for EarlyLevels {
    fn simulation(&self) -> Option<SimulationId> {
      Some(TANK)
    }

    fn required_steps(&self) -> u64 {
      50
    }

    fn inspection_interval(&self) -> Option<NonZeroU64> {
      NonZeroU64::new(20)
    }

    fn inspect(&self, simulation: &dyn Simulation<f64>, record: &mut ObjectiveRecord) {
      let tank = simulation
        .as_any()
        .downcast_ref::<Tank>()
        .expect("objective runs in a tank simulation");
      record.accumulator += tank.level;
    }

    fn evaluate(
      &self,
      _: &f64,
      _: Option<&dyn Simulation<f64>>,
      record: &mut ObjectiveRecord,
    ) -> Score {
      record.accumulator
    }
  }

  /// How many of the required 100 steps the tank survived, negated so that
  /// longer survival scores better.
  struct Longevity;

  impl Objective<f64> for Longevity {
    fn simulation(&self) -> Option<SimulationId> {
      Some(TANK)
    }

    fn required_steps(&self) -> u64 {
      100
    }

    fn evaluate(
      &self,
      _: &f64,
      simulation: Option<&dyn Simulation<f64>>,
      _: &mut ObjectiveRecord,
    ) -> Score {
      let simulation = simulation.expect("objective requires a simulation");
      -(simulation.steps_taken() as f64)
    }
  }

  fn tank_evaluator() -> Evaluator<f64, Direct, 2> {
    let objectives: [Box<dyn Objective<f64>>; 2] =
      [Box::new(AverageLevel), Box::new(Longevity)];
    Evaluator::builder()
      .embryogeny(Direct)
      .objectives(objectives)
      .pool(tank_pool())
      .build()
  }

  #[test]
  fn test_simulated_objectives_share_one_run() {
    let evaluator = tank_evaluator();
    // a full tank survives all 100 steps; level at inspection k*10 is
    // 1000 - 10k, averaged over k = 1..=10 this is 945
    let scores = evaluator.evaluate(&[1000.0]).unwrap();
    assert_eq!(scores, vec![[945.0, -100.0]]);
  }

  #[test]
  fn test_terminal_state_cuts_inspections_short() {
    let evaluator = tank_evaluator();
    // a tank of 35 dies between the 3rd and 4th inspection: levels 25 and
    // 15 and 5 are seen, no inspection happens after the terminal state
    let scores = evaluator.evaluate(&[35.0]).unwrap();
    assert_eq!(scores, vec![[15.0, -35.0]]);
  }

  #[test]
  fn test_inspections_stop_at_each_objectives_own_horizon() {
    let objectives: [Box<dyn Objective<f64>>; 2] =
      [Box::new(EarlyLevels), Box::new(Longevity)];
    let evaluator = Evaluator::builder()
      .embryogeny(Direct)
      .objectives(objectives)
      .pool(tank_pool())
      .build();
    // the shared run lasts for Longevity's 100 steps, but EarlyLevels is
    // inspected only at steps 20 and 40 of its own 50 step horizon, seeing
    // levels 980 and 960
    let scores = evaluator.evaluate(&[1000.0]).unwrap();
    assert_eq!(scores, vec![[1940.0, -100.0]]);
  }

  #[test]
  fn test_simulations_are_pooled_across_population() {
    let evaluator = tank_evaluator();
    evaluator.evaluate(&[10.0, 20.0, 30.0, 40.0]).unwrap();
    assert!(evaluator.pool.idle_count(TANK) >= 1);
    let before = evaluator.pool.idle_count(TANK);
    evaluator.evaluate(&[10.0]).unwrap();
    assert_eq!(evaluator.pool.idle_count(TANK), before);
  }

  #[test]
  fn test_unknown_simulator_fails_evaluation() {
    let objectives: [Box<dyn Objective<f64>>; 2] =
      [Box::new(AverageLevel), Box::new(Longevity)];
    let evaluator = Evaluator::builder()
      .embryogeny(Direct)
      .objectives(objectives)
      .pool(SimulationPool::new())
      .build();
    assert!(matches!(
      evaluator.evaluate(&[1.0]),
      Err(EvaluationError::Simulation(
        SimulationError::UnknownSimulator(id)
      )) if id == TANK
    ));
  }

  #[test]
  fn test_step_limit_clamps_run_length() {
    let objectives: [Box<dyn Objective<f64>>; 2] =
      [Box::new(AverageLevel), Box::new(Longevity)];
    let evaluator = Evaluator::builder()
      .embryogeny(Direct)
      .objectives(objectives)
      .pool(tank_pool())
      .step_limit(50)
      .build();
    let scores = evaluator.evaluate(&[1000.0]).unwrap();
    // only 5 inspections fit into the clamped run
    assert_eq!(scores, vec![[970.0, -50.0]]);
  }

  #[test]
  fn test_trials_with_deterministic_simulation_agree() {
    let objectives: [Box<dyn Objective<f64>>; 2] =
      [Box::new(AverageLevel), Box::new(Longevity)];
    let evaluator = Evaluator::builder()
      .embryogeny(Direct)
      .objectives(objectives)
      .pool(tank_pool())
      .trials(7)
      .hysteresis(0.8)
      .build();
    let scores = evaluator.evaluate(&[1000.0]).unwrap();
    assert_eq!(scores, vec![[945.0, -100.0]]);
  }
}
