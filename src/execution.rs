//! Execution strategies that executors are resolved against.

/// This private module prevents exposing strategy markers to a user.
pub(crate) mod strategy {
  /// Sequential execution strategy marker, i.e. no parallelization involved.
  pub enum SequentialExecutionStrategy {}

  /// Parallel execution strategy marker, parallelizes operator application
  /// for **each** solution.
  pub enum ParallelEachExecutionStrategy {}

  /// Parallel execution strategy marker, parallelizes operator application
  /// for a **batch** of solutions. The crate tries to split the work equally
  /// for each available thread.
  pub enum ParallelBatchExecutionStrategy {}

  /// Custom execution strategy marker. Operators executed with this strategy
  /// handle whole populations themselves and decide on their own whether to
  /// parallelize or not.
  pub enum CustomExecutionStrategy {}
}
