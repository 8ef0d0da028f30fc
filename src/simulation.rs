//! Steppable simulation abstractions and instance pooling.
//!
//! Objectives that cannot score a phenotype from its mere description demand
//! a *simulation*: a resettable black box the phenotype is installed into
//! and which is then advanced step by step, while objectives inspect its
//! state at the step intervals they asked for. Simulations are usually
//! expensive to construct, so the [`Evaluator`] never creates them directly.
//! Instead it acquires instances from a [`SimulationPool`] which recycles
//! them between individuals and generations.
//!
//! [`Evaluator`]: crate::evaluation::Evaluator

use std::{
  any::Any,
  collections::HashMap,
  fmt,
  ops::{Deref, DerefMut},
  sync::Mutex,
};

use thiserror::Error;
use tracing::trace;

/// Identifier of a simulator kind. Objectives name the simulator they
/// require with this id, and pools hand out instances by it.
///
/// # Examples
/// ```
/// # use sigoa::simulation::SimulationId;
/// const NETWORK: SimulationId = SimulationId::new("network");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct SimulationId(&'static str);

impl SimulationId {
  /// Creates an id from a simulator kind name.
  pub const fn new(name: &'static str) -> Self {
    Self(name)
  }

  /// Returns the simulator kind name.
  pub const fn name(&self) -> &'static str {
    self.0
  }
}

impl fmt::Display for SimulationId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.0)
  }
}

/// The error type of simulation runs and pool lookups.
#[derive(Debug, Error)]
pub enum SimulationError {
  /// No provider was registered for the requested simulator kind.
  #[error("no provider registered for simulator `{0}`")]
  UnknownSimulator(SimulationId),
  /// The simulator rejected the phenotype it was asked to run.
  #[error("simulator `{id}` rejected a run: {reason}")]
  RunRejected {
    /// Kind of the rejecting simulator.
    id: SimulationId,
    /// Human readable rejection cause.
    reason: String,
  },
  /// The simulator failed while being stepped.
  #[error("simulator `{id}` failed at step {step}: {reason}")]
  StepFailed {
    /// Kind of the failing simulator.
    id: SimulationId,
    /// Step count at which the failure occurred.
    step: u64,
    /// Human readable failure cause.
    reason: String,
  },
}

/// A steppable simulation a phenotype of type `P` can be run in.
///
/// A single instance is reused for many runs: [`begin_run`] must restore the
/// initial state before installing the next phenotype. One run never
/// outlives the `begin_run`/[`end_run`] bracket the [`Evaluator`] puts
/// around it.
///
/// [`begin_run`]: Simulation::begin_run
/// [`end_run`]: Simulation::end_run
/// [`Evaluator`]: crate::evaluation::Evaluator
pub trait Simulation<P>: Send {
  /// Resets the simulation and installs given phenotype for the next run.
  fn begin_run(&mut self, phenotype: &P) -> Result<(), SimulationError>;

  /// Advances the simulation by `steps` time steps. Returns `false` once the
  /// simulation has reached a terminal state, in which case fewer than
  /// `steps` steps may have been executed and no further stepping occurs in
  /// this run.
  fn step(&mut self, steps: u64) -> Result<bool, SimulationError>;

  /// Number of steps executed since the last [`begin_run`].
  ///
  /// [`begin_run`]: Simulation::begin_run
  fn steps_taken(&self) -> u64;

  /// Finishes the current run. Called exactly once per run, after the last
  /// objective inspected the simulation.
  fn end_run(&mut self) {}

  /// Returns `self` as [`Any`], so objectives can downcast a pooled
  /// simulation to the concrete simulator type they inspect.
  fn as_any(&self) -> &dyn Any;
}

/// Creates instances of one simulator kind for a [`SimulationPool`].
///
/// This trait is implemented for a tuple of an id and a closure creating
/// boxed instances, allowing for a concise registration:
/// ```ignore
/// let pool = SimulationPool::new().with((NETWORK, || Box::new(Network::default()) as _));
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait SimulationProvider<P>: Send + Sync {
  /// Returns the kind of simulators this provider creates.
  fn id(&self) -> SimulationId;

  /// Creates a fresh simulation instance.
  fn provide(&self) -> Box<dyn Simulation<P>>;
}

impl<P, F> SimulationProvider<P> for (SimulationId, F)
where
  F: Fn() -> Box<dyn Simulation<P>> + Send + Sync,
{
  fn id(&self) -> SimulationId {
    self.0
  }

  fn provide(&self) -> Box<dyn Simulation<P>> {
    (self.1)()
  }
}

/// A registry of simulation providers that pools created instances.
///
/// Instances are created lazily on [`acquire`] when no idle instance of the
/// requested kind exists, and are returned to the idle list when the
/// [`PooledSimulation`] guard is dropped. The pool never shrinks. It is
/// `Sync` as long as simulations only claim `Send`, so evaluation workers
/// share one pool across threads.
///
/// [`acquire`]: SimulationPool::acquire
pub struct SimulationPool<P> {
  providers: HashMap<SimulationId, Box<dyn SimulationProvider<P>>>,
  idle: Mutex<HashMap<SimulationId, Vec<Box<dyn Simulation<P>>>>>,
}

impl<P> SimulationPool<P> {
  /// Creates an empty pool.
  pub fn new() -> Self {
    Self {
      providers: HashMap::new(),
      idle: Mutex::new(HashMap::new()),
    }
  }

  /// Registers a provider, consuming and returning the pool so registrations
  /// can be chained.
  ///
  /// # Panics
  ///
  /// Panics if a provider with the same id was already registered.
  pub fn with<R>(mut self, provider: R) -> Self
  where
    R: SimulationProvider<P> + 'static,
  {
    let id = provider.id();
    if self.providers.insert(id, Box::new(provider)).is_some() {
      panic!("provider for simulator `{id}` registered twice");
    }
    self
  }

  /// Acquires a simulation of given kind, reusing an idle instance if one is
  /// available. The instance returns to the pool when the guard is dropped.
  pub fn acquire(
    &self,
    id: SimulationId,
  ) -> Result<PooledSimulation<'_, P>, SimulationError> {
    let provider = self
      .providers
      .get(&id)
      .ok_or(SimulationError::UnknownSimulator(id))?;
    let recycled = self
      .idle
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .get_mut(&id)
      .and_then(Vec::pop);
    let simulation = match recycled {
      Some(simulation) => simulation,
      None => {
        trace!(simulator = %id, "pool creates a new simulation instance");
        provider.provide()
      }
    };
    Ok(PooledSimulation {
      pool: self,
      id,
      simulation: Some(simulation),
    })
  }

  /// Number of idle instances of given kind currently held by the pool.
  pub fn idle_count(&self, id: SimulationId) -> usize {
    self
      .idle
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .get(&id)
      .map_or(0, Vec::len)
  }

  fn release(&self, id: SimulationId, simulation: Box<dyn Simulation<P>>) {
    self
      .idle
      .lock()
      .unwrap_or_else(|poison| poison.into_inner())
      .entry(id)
      .or_default()
      .push(simulation);
  }
}

impl<P> Default for SimulationPool<P> {
  fn default() -> Self {
    Self::new()
  }
}

/// An RAII guard around a pooled simulation instance. Dereferences to the
/// boxed [`Simulation`] and returns the instance to its pool on drop.
pub struct PooledSimulation<'a, P> {
  pool: &'a SimulationPool<P>,
  id: SimulationId,
  simulation: Option<Box<dyn Simulation<P>>>,
}

impl<P> PooledSimulation<'_, P> {
  /// Kind of the held simulation.
  pub fn id(&self) -> SimulationId {
    self.id
  }
}

impl<P> Deref for PooledSimulation<'_, P> {
  type Target = Box<dyn Simulation<P>>;

  fn deref(&self) -> &Self::Target {
    self.simulation.as_ref().expect("simulation is held until drop")
  }
}

impl<P> DerefMut for PooledSimulation<'_, P> {
  fn deref_mut(&mut self) -> &mut Self::Target {
    self.simulation.as_mut().expect("simulation is held until drop")
  }
}

impl<P> Drop for PooledSimulation<'_, P> {
  fn drop(&mut self) {
    if let Some(simulation) = self.simulation.take() {
      self.pool.release(self.id, simulation);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const WALKER: SimulationId = SimulationId::new("walker");

  /// A phenotype-controlled counter that terminates at a fixed step count.
  struct Walker {
    position: u64,
    horizon: u64,
  }

  impl Simulation<u64> for Walker {
    fn begin_run(&mut self, phenotype: &u64) -> Result<(), SimulationError> {
      self.position = 0;
      self.horizon = *phenotype;
      Ok(())
    }

    fn step(&mut self, steps: u64) -> Result<bool, SimulationError> {
      self.position = (self.position + steps).min(self.horizon);
      Ok(self.position < self.horizon)
    }

    fn steps_taken(&self) -> u64 {
      self.position
    }

    fn as_any(&self) -> &dyn Any {
      self
    }
  }

  fn walker_pool() -> SimulationPool<u64> {
    SimulationPool::new().with((WALKER, || {
      Box::new(Walker {
        position: 0,
        horizon: 0,
      }) as Box<dyn Simulation<u64>>
    }))
  }

  #[test]
  fn test_acquire_unknown_simulator() {
    let pool = walker_pool();
    let unknown = SimulationId::new("flyer");
    assert!(matches!(
      pool.acquire(unknown),
      Err(SimulationError::UnknownSimulator(id)) if id == unknown
    ));
  }

  #[test]
  fn test_pool_recycles_instances() {
    let pool = walker_pool();
    assert_eq!(pool.idle_count(WALKER), 0);
    {
      let mut sim = pool.acquire(WALKER).unwrap();
      sim.begin_run(&10).unwrap();
      assert!(sim.step(4).unwrap());
      assert_eq!(sim.steps_taken(), 4);
    }
    assert_eq!(pool.idle_count(WALKER), 1);
    {
      let _first = pool.acquire(WALKER).unwrap();
      let _second = pool.acquire(WALKER).unwrap();
      assert_eq!(pool.idle_count(WALKER), 0);
    }
    assert_eq!(pool.idle_count(WALKER), 2);
  }

  #[test]
  fn test_terminal_state_reported() {
    let pool = walker_pool();
    let mut sim = pool.acquire(WALKER).unwrap();
    sim.begin_run(&3).unwrap();
    assert!(!sim.step(5).unwrap());
    assert_eq!(sim.steps_taken(), 3);
  }

  #[test]
  fn test_downcast_through_as_any() {
    let pool = walker_pool();
    let mut sim = pool.acquire(WALKER).unwrap();
    sim.begin_run(&7).unwrap();
    sim.step(2).unwrap();
    let walker = sim
      .as_any()
      .downcast_ref::<Walker>()
      .expect("pooled simulation is a walker");
    assert_eq!(walker.position, 2);
  }
}
