//! End-to-end run of NSGA-II over a simulation-driven evaluator.

use std::any::Any;

use sigoa::{
  evaluation::Evaluator,
  objective::{Objective, ObjectiveRecord},
  optimizer::{nsga::Nsga2, Optimizer},
  score::Score,
  selection::AllSelector,
  simulation::{Simulation, SimulationError, SimulationId, SimulationPool},
  termination::GenerationTerminator,
};

const BENCH: SimulationId = SimulationId::new("battery-bench");
const REQUIRED_STEPS: u64 = 200;

/// A battery drained by one unit per step, terminal once empty.
struct Bench {
  charge: f64,
  steps: u64,
}

impl Simulation<f64> for Bench {
  fn begin_run(&mut self, capacity: &f64) -> Result<(), SimulationError> {
    self.charge = *capacity;
    self.steps = 0;
    Ok(())
  }

  fn step(&mut self, steps: u64) -> Result<bool, SimulationError> {
    let possible = steps.min(self.charge.ceil() as u64);
    self.steps += possible;
    self.charge -= possible as f64;
    Ok(self.charge > 0.0)
  }

  fn steps_taken(&self) -> u64 {
    self.steps
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// Steps survived on the bench, negated so that lasting longer is better.
struct Runtime;

impl Objective<f64> for Runtime {
  fn simulation(&self) -> Option<SimulationId> {
    Some(BENCH)
  }

  fn required_steps(&self) -> u64 {
    REQUIRED_STEPS
  }

  fn evaluate(
    &self,
    _: &f64,
    simulation: Option<&dyn Simulation<f64>>,
    _: &mut ObjectiveRecord,
  ) -> Score {
    let bench = simulation.expect("runtime is measured on the bench");
    -(bench.steps_taken() as f64)
  }
}

fn bench_evaluator() -> Evaluator<f64, impl Fn(&f64) -> f64 + Send + Sync, 2> {
  let pool = SimulationPool::new().with((BENCH, || {
    Box::new(Bench {
      charge: 0.0,
      steps: 0,
    }) as Box<dyn Simulation<f64>>
  }));
  // genes are unconstrained, capacities are not
  let hatch = |genes: &f64| genes.abs().clamp(1.0, 300.0);
  let objectives: [Box<dyn Objective<f64>>; 2] =
    [Box::new(|capacity: &f64| *capacity), Box::new(Runtime)];
  Evaluator::builder()
    .embryogeny(hatch)
    .objectives(objectives)
    .pool(pool)
    .build()
}

#[test]
fn evaluator_scores_population_deterministically() {
  let evaluator = bench_evaluator();
  let scores = evaluator.evaluate(&[50.0, 250.0]).unwrap();
  // a 50 unit battery dies after 50 steps, a 250 unit one outlives the run
  assert_eq!(scores, vec![[50.0, -50.0], [250.0, -200.0]]);
}

#[test]
fn nsga2_runs_on_top_of_a_simulated_evaluator() {
  let population: Vec<f64> = (1..=6).map(|i| f64::from(i) * 40.0).collect();
  let optimizer = Nsga2::builder()
    .population(population)
    .evaluator(bench_evaluator())
    .selector(AllSelector())
    .recombinator(|a: &f64, b: &f64| (a + b) / 2.0)
    .mutator(|_: &mut f64| {})
    .terminator(GenerationTerminator(5))
    .build();

  let solutions = optimizer.optimize().unwrap();

  assert_eq!(solutions.len(), 6);
  // averaging recombination keeps genes inside the initial range
  assert!(solutions.iter().all(|g| (40.0..=240.0).contains(g)));
  // anything past the required run length is pure cost and gets dominated
  let evaluator = bench_evaluator();
  let scores = evaluator.evaluate(&solutions).unwrap();
  assert!(scores
    .iter()
    .all(|[cost, runtime]| *cost <= 240.0 && *runtime >= -(REQUIRED_STEPS as f64)));
}

#[test]
fn simulations_survive_across_generations() {
  let evaluator = bench_evaluator();
  evaluator.evaluate(&[10.0, 20.0]).unwrap();
  let idle = evaluator.pool().idle_count(BENCH);
  assert!(idle >= 1);
  evaluator.evaluate(&[30.0]).unwrap();
  assert_eq!(evaluator.pool().idle_count(BENCH), idle);
}
