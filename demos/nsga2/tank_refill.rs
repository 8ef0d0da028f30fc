//! Sizing a water tank and its refill policy with NSGA-II.
//!
//! The genotype is a pair of raw genes hatched into a tank specification.
//! A simulated reservoir serves noisy daily demand from the tank: dropping
//! below the refill threshold triggers a paid refill, running dry ends the
//! run early. NSGA-II trades the capital cost of the tank against refill
//! bills and the average headroom kept over a year of service.

use std::any::Any;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use sigoa::{
  evaluation::Evaluator,
  objective::{Objective, ObjectiveRecord},
  optimizer::{nsga::Nsga2, Optimizer},
  score::Score,
  selection::BestSelector,
  simulation::{Simulation, SimulationError, SimulationId, SimulationPool},
  termination::GenerationTerminator,
};

const RESERVOIR: SimulationId = SimulationId::new("reservoir");
const DAYS: u64 = 365;

// raw genes: capacity and refill threshold before clamping
type Genes = (f64, f64);

#[derive(Clone)]
struct TankSpec {
  capacity: f64,
  threshold: f64,
}

/// A year of daily demand served from a tank. Falling below the refill
/// threshold refills the tank, running dry is a terminal state.
struct Reservoir {
  rng: StdRng,
  demand: Normal<f64>,
  capacity: f64,
  threshold: f64,
  level: f64,
  refills: u64,
  days: u64,
}

impl Simulation<TankSpec> for Reservoir {
  fn begin_run(&mut self, spec: &TankSpec) -> Result<(), SimulationError> {
    self.capacity = spec.capacity;
    self.threshold = spec.threshold;
    self.level = spec.capacity;
    self.refills = 0;
    self.days = 0;
    Ok(())
  }

  fn step(&mut self, steps: u64) -> Result<bool, SimulationError> {
    for _ in 0..steps {
      self.days += 1;
      self.level -= self.demand.sample(&mut self.rng).max(0.0);
      if self.level <= 0.0 {
        self.level = 0.0;
        return Ok(false);
      }
      if self.level < self.threshold * self.capacity {
        self.level = self.capacity;
        self.refills += 1;
      }
    }
    Ok(true)
  }

  fn steps_taken(&self) -> u64 {
    self.days
  }

  fn as_any(&self) -> &dyn Any {
    self
  }
}

/// Counts the refills paid for over the run.
struct RefillBills;

impl Objective<TankSpec> for RefillBills {
  fn simulation(&self) -> Option<SimulationId> {
    Some(RESERVOIR)
  }

  fn required_steps(&self) -> u64 {
    DAYS
  }

  fn evaluate(
    &self,
    _: &TankSpec,
    simulation: Option<&dyn Simulation<TankSpec>>,
    _: &mut ObjectiveRecord,
  ) -> Score {
    let reservoir = simulation
      .and_then(|s| s.as_any().downcast_ref::<Reservoir>())
      .expect("refill bills are counted by the reservoir");
    reservoir.refills as f64
  }
}

/// Average fill fraction, inspected weekly and negated so that a fuller tank
/// scores better. A tank that runs dry stops being inspected early.
struct Headroom;

impl Objective<TankSpec> for Headroom {
  fn simulation(&self) -> Option<SimulationId> {
    Some(RESERVOIR)
  }

  fn required_steps(&self) -> u64 {
    DAYS
  }

  fn inspection_interval(&self) -> Option<std::num::NonZeroU64> {
    std::num::NonZeroU64::new(7)
  }

  fn inspect(
    &self,
    simulation: &dyn Simulation<TankSpec>,
    record: &mut ObjectiveRecord,
  ) {
    let reservoir = simulation
      .as_any()
      .downcast_ref::<Reservoir>()
      .expect("headroom is measured in the reservoir");
    record.accumulator += reservoir.level / reservoir.capacity;
  }

  fn evaluate(
    &self,
    _: &TankSpec,
    _: Option<&dyn Simulation<TankSpec>>,
    record: &mut ObjectiveRecord,
  ) -> Score {
    match record.inspections {
      0 => 0.0,
      n => -(record.accumulator / n as f64),
    }
  }
}

fn main() {
  // initial genes spread over plausible tanks
  let population: Vec<Genes> = (0..50)
    .map(|i| (40.0 + f64::from(i) * 8.0, 0.05 + f64::from(i) * 0.015))
    .collect();

  // genes are unconstrained, the phenotype is not
  let hatch = |&(capacity, threshold): &Genes| TankSpec {
    capacity: capacity.abs().clamp(20.0, 500.0),
    threshold: threshold.clamp(0.05, 0.9),
  };

  let pool = SimulationPool::new().with((RESERVOIR, || {
    Box::new(Reservoir {
      rng: StdRng::from_entropy(),
      demand: Normal::new(5.0, 1.5).expect("valid demand distribution"),
      capacity: 0.0,
      threshold: 0.0,
      level: 0.0,
      refills: 0,
      days: 0,
    }) as Box<dyn Simulation<TankSpec>>
  }));

  // a static cost objective next to two objectives sharing the reservoir run
  let objectives: [Box<dyn Objective<TankSpec>>; 3] = [
    Box::new(|spec: &TankSpec| spec.capacity * 0.1),
    Box::new(RefillBills),
    Box::new(Headroom),
  ];

  // demand is noisy, so each tank is tried 5 times and the samples are
  // folded pessimistically
  let evaluator = Evaluator::builder()
    .embryogeny(hatch)
    .objectives(objectives)
    .pool(pool)
    .trials(5)
    .hysteresis(0.7)
    .build();

  // blend capacities and thresholds of each pair of parents
  let r = || rand::thread_rng().gen_range(0.0..1.0);
  let recombinator = |a: &Genes, b: &Genes| {
    let w = r();
    (a.0 * w + b.0 * (1.0 - w), a.1 * w + b.1 * (1.0 - w))
  };

  // nudge genes with normal noise
  let noise = Normal::new(0.0, 4.0).expect("valid noise distribution");
  let mutator = |g: &mut Genes| {
    g.0 += noise.sample(&mut rand::thread_rng());
    g.1 += noise.sample(&mut rand::thread_rng()) * 0.01;
  };

  let optimizer = Nsga2::builder()
    .population(population)
    .evaluator(evaluator)
    .selector(BestSelector(20))
    .recombinator(recombinator)
    .mutator(mutator)
    .terminator(GenerationTerminator(40))
    .build();

  let solutions = optimizer.optimize().expect("reservoir is registered");

  println!("capacity | threshold");
  for genes in solutions.iter().take(10) {
    let spec = hatch(genes);
    println!("{:8.1} | {:.3}", spec.capacity, spec.threshold);
  }
  println!("   ...   |  ...");
}
