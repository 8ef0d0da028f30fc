//! Recombination operators breeding offsprings from selected parents.

use executor::RecombinationExecutor;
use itertools::Itertools;
use rayon::prelude::*;

use crate::{
  execution::strategy::*,
  operator::{tag::RecombinationOperatorTag, ParEach, ParEachOperator},
};

/// An operator that breeds offsprings from every combination (in the
/// [mathematical sense](https://en.wikipedia.org/wiki/Combination)) of `P`
/// parents drawn from the selected ones. Each combination yields `O`
/// offsprings; all offsprings are flattened into one vector that is handed
/// to mutation.
///
/// With selected parents `[a, b, c]` and a `Recombination` of type
/// `Fn(&S, &S) -> S`, three offsprings are bred: one from `(a, b)`, one
/// from `(a, c)` and one from `(b, c)`.
///
/// Convert it into a parallelized operator with `par_each()` to breed each
/// combination in parallel.
///
/// # Examples
/// Any closure taking 1 to 4 parent references and returning 1 to 4
/// offsprings is a `Recombination`.
/// ```
/// # use sigoa::operator::*;
/// // single-parent budding with inverted genes
/// let r = |parent: &Vec<f64>| parent.iter().map(|g| -g).collect::<Vec<_>>();
/// // uniform blend of a pair of parents
/// let r = |a: &f64, b: &f64| (a + b) / 2.0;
/// // gene exchange between a pair of two-gene genotypes
/// let r = |a: &(f64, f64), b: &(f64, f64)| ((a.0, b.1), (b.0, a.1));
/// let r = r.par_each();
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Recombination<S, const P: usize, const O: usize> {
  /// Breeds `O` offsprings from references to a combination of `P` selected
  /// parents.
  fn recombine(&self, parents: [&S; P]) -> [S; O];
}

macro_rules! recombination_fn_impl {
  (
    ($($parent_ty:ident),+),
    ($first_parent:ident $(, $more_parents:ident)*),
    $parent_cnt:expr,
    ($($offspring_ty:ident),+),
    ($first_offspring:ident $(, $more_offsprings:ident)*),
    $offspring_cnt:expr
  ) => {
    #[allow(unused_parens)]
    impl<S, F> Recombination<S, $parent_cnt, $offspring_cnt> for F
    where
      F: Fn($(&$parent_ty),+) -> ($($offspring_ty),+),
    {
      fn recombine(&self, parents: [&S; $parent_cnt]) -> [S; $offspring_cnt] {
        let ($first_parent, $($more_parents,)*) = parents.into();
        let ($first_offspring $(, $more_offsprings)*) =
          self($first_parent $(, $more_parents)*);
        [$first_offspring $(, $more_offsprings)*]
      }
    }
  };
}

recombination_fn_impl! {(S), (a), 1, (S), (m), 1}
recombination_fn_impl! {(S), (a), 1, (S, S), (m, n), 2}
recombination_fn_impl! {(S), (a), 1, (S, S, S), (m, n, o), 3}
recombination_fn_impl! {(S), (a), 1, (S, S, S, S), (m, n, o, p), 4}
recombination_fn_impl! {(S, S), (a, b), 2, (S), (m), 1}
recombination_fn_impl! {(S, S), (a, b), 2, (S, S), (m, n), 2}
recombination_fn_impl! {(S, S), (a, b), 2, (S, S, S), (m, n, o), 3}
recombination_fn_impl! {(S, S), (a, b), 2, (S, S, S, S), (m, n, o, p), 4}
recombination_fn_impl! {(S, S, S), (a, b, c), 3, (S), (m), 1}
recombination_fn_impl! {(S, S, S), (a, b, c), 3, (S, S), (m, n), 2}
recombination_fn_impl! {(S, S, S), (a, b, c), 3, (S, S, S), (m, n, o), 3}
recombination_fn_impl! {(S, S, S), (a, b, c), 3, (S, S, S, S), (m, n, o, p), 4}
recombination_fn_impl! {(S, S, S, S), (a, b, c, d), 4, (S), (m), 1}
recombination_fn_impl! {(S, S, S, S), (a, b, c, d), 4, (S, S), (m, n), 2}
recombination_fn_impl! {(S, S, S, S), (a, b, c, d), 4, (S, S, S), (m, n, o), 3}
recombination_fn_impl! {(S, S, S, S), (a, b, c, d), 4, (S, S, S, S), (m, n, o, p), 4}

impl<S, R, const P: usize, const O: usize>
  ParEach<RecombinationOperatorTag, S, P, O> for R
where
  S: Sync + Send,
  R: Recombination<S, P, O> + Sync,
{
}

/// An operator that receives all selected parents at once and decides for
/// itself how to pair them up and how many offsprings to breed. The bred
/// offsprings are handed to mutation.
///
/// # Examples
/// ```
/// // breed one offspring per adjacent pair of parents
/// let r = |parents: Vec<&f64>| {
///   parents
///     .windows(2)
///     .map(|pair| (pair[0] + pair[1]) / 2.0)
///     .collect::<Vec<f64>>()
/// };
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Recombinator<S> {
  /// Breeds a vector of offsprings from given parents.
  fn recombine(&self, parents: Vec<&S>) -> Vec<S>;
}

impl<S, F> Recombinator<S> for F
where
  F: Fn(Vec<&S>) -> Vec<S>,
{
  fn recombine(&self, parents: Vec<&S>) -> Vec<S> {
    self(parents)
  }
}

/// This private module prevents exposing the `Executor` to a user.
pub(crate) mod executor {
  /// An internal recombination executor.
  pub trait RecombinationExecutor<
    S,
    const P: usize,
    const O: usize,
    ExecutionStrategy,
  >
  {
    /// Executes recombinations optionally parallelizing operator's
    /// application.
    fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S>;
  }
}

impl<S, R>
  RecombinationExecutor<
    S,
    { usize::MAX },
    { usize::MAX },
    CustomExecutionStrategy,
  > for R
where
  R: Recombinator<S>,
{
  fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S> {
    self.recombine(parents)
  }
}

impl<S, const P: usize, const O: usize, R>
  RecombinationExecutor<S, P, O, SequentialExecutionStrategy> for R
where
  R: Recombination<S, P, O>,
{
  fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S> {
    parents
      .iter()
      .copied()
      .combinations(P)
      .flat_map(|c| {
        self.recombine(c.try_into().unwrap_or_else(|c: Vec<&S>| {
          panic!(
            "combination size must be equal to {} but it is {}",
            P,
            c.len()
          )
        }))
      })
      .collect()
  }
}

impl<S, const P: usize, const O: usize, R>
  RecombinationExecutor<S, P, O, ParallelEachExecutionStrategy>
  for ParEachOperator<RecombinationOperatorTag, S, R>
where
  S: Sync + Send,
  R: Recombination<S, P, O> + Sync,
{
  fn execute_recombination(&self, parents: Vec<&S>) -> Vec<S> {
    parents
      .iter()
      .copied()
      .combinations(P)
      .par_bridge()
      .flat_map_iter(|c| {
        self
          .operator()
          .recombine(c.try_into().unwrap_or_else(|c: Vec<&S>| {
            panic!(
              "combination size must be equal to {} but it is {}",
              P,
              c.len()
            )
          }))
      })
      .collect()
  }
}
