//! Genotype-to-phenotype mapping.

/// Maps the genotypes the optimizer breeds to the phenotypes that objectives
/// and simulations consume. For many problems the two coincide, in which
/// case [`Direct`] does the job.
///
/// This trait is implemented for closures of type `Fn(&G) -> P`:
/// ```
/// # use sigoa::embryogeny::Embryogeny;
/// // a bit string hatched into the number it encodes
/// let hatch = |bits: &Vec<bool>| {
///   bits.iter().fold(0u64, |n, b| (n << 1) | u64::from(*b))
/// };
/// # fn assert_embryogeny<G, P>(_: &impl Embryogeny<G, P>) {}
/// # assert_embryogeny::<Vec<bool>, u64>(&hatch);
/// ```
///
/// **Note that you always can implement this trait instead of using closures.**
pub trait Embryogeny<G, P>: Send + Sync {
  /// Hatches a genotype into the phenotype it encodes.
  fn hatch(&self, genotype: &G) -> P;
}

impl<G, P, F> Embryogeny<G, P> for F
where
  F: Fn(&G) -> P + Send + Sync,
{
  fn hatch(&self, genotype: &G) -> P {
    self(genotype)
  }
}

/// The identity mapping for problems whose genotype *is* the phenotype.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Direct;

impl<G> Embryogeny<G, G> for Direct
where
  G: Clone + Send + Sync,
{
  fn hatch(&self, genotype: &G) -> G {
    genotype.clone()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_embryogeny_from_closure() {
    let hatch = |g: &u32| f64::from(*g) / 2.0;
    assert_eq!(hatch.hatch(&3), 1.5);
  }

  #[test]
  fn test_direct_embryogeny() {
    let genotype = vec![1, 2, 3];
    assert_eq!(Direct.hatch(&genotype), genotype);
  }
}
