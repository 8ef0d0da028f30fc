//! Type aliases for a more convenient representation of objective scores used
//! throughout the library.

use std::cmp::Ordering;

/// An alias for an objective score.
///
/// Every objective in this framework is **minimized**: the smaller a score,
/// the better the solution performs on that objective. If one of your
/// criteria is naturally maximized, negate it.
pub type Score = f64;

/// An alias for an array of `N` values of `Score` type.
pub type Scores<const N: usize> = [Score; N];

/// Describes pareto dominance for arrays of `Score`s under minimization.
pub(crate) trait ParetoDominance {
  /// Returns `Less` if `self` dominates `other`, `Greater` if `other`
  /// dominates `self`, otherwise `Equal`. `self` dominates `other` if no
  /// `self` value is greater than the respective `other` value and at least
  /// one is smaller. Incomparable score arrays, including arrays with NaN
  /// values, are `Equal`.
  fn dominance(&self, other: &Self) -> Ordering;
}

impl ParetoDominance for [Score] {
  fn dominance(&self, other: &Self) -> Ordering {
    let mut ord = Ordering::Equal;
    for (a, b) in self.iter().zip(other) {
      let next_ord = match a.partial_cmp(b) {
        Some(o) => o,
        None => return Ordering::Equal,
      };
      match (ord, next_ord) {
        (Ordering::Equal, _) => ord = next_ord,
        (Ordering::Greater, Ordering::Less)
        | (Ordering::Less, Ordering::Greater) => return Ordering::Equal,
        _ => {}
      }
    }
    ord
  }
}

#[cfg(test)]
mod tests {
  use std::cmp::Ordering;

  use super::*;

  #[test]
  fn test_pareto_dominance() {
    assert_eq!([1.0, 2.0, 3.0].dominance(&[1.0, 2.0, 3.0]), Ordering::Equal);
    assert_eq!([1.0, 2.0, 3.0].dominance(&[3.0, 2.0, 1.0]), Ordering::Equal);
    assert_eq!(
      [-1.0, 2.0, -3.0].dominance(&[-1.0, 2.0, -3.0]),
      Ordering::Equal
    );

    assert_eq!([0.0, 2.0, 3.0].dominance(&[1.0, 2.0, 3.0]), Ordering::Less);
    assert_eq!([1.0, 2.0, 3.0].dominance(&[1.0, 2.0, 4.0]), Ordering::Less);
    assert_eq!(
      [-5.0, -5.0, -5.0].dominance(&[0.0, 0.0, 0.0]),
      Ordering::Less
    );

    assert_eq!(
      [1.0, 2.0, 3.0].dominance(&[0.0, 2.0, 3.0]),
      Ordering::Greater
    );
    assert_eq!(
      [2.0, 3.0, 4.0].dominance(&[1.0, 2.0, 3.0]),
      Ordering::Greater
    );

    assert_eq!(
      [1.0, f64::NAN, 3.0].dominance(&[1.0, 2.0, 3.0]),
      Ordering::Equal
    );
    assert_eq!([1.0; 0].dominance(&[0.0; 0]), Ordering::Equal);
  }
}
