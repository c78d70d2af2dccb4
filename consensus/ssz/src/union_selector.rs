use crate::*;

/// Provides the one-byte "selector" from the SSZ union specification:
///
/// https://github.com/ethereum/consensus-specs/blob/v1.1.0-beta.3/ssz/simple-serialize.md#union
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnionSelector(u8);

impl From<UnionSelector> for u8 {
    fn from(union_selector: UnionSelector) -> u8 {
        union_selector.0
    }
}

impl PartialEq<u8> for UnionSelector {
    fn eq(&self, other: &u8) -> bool {
        self.0 == *other
    }
}

impl UnionSelector {
    /// Instantiate `self`, returning an error if `selector > MAX_UNION_SELECTOR`.
    pub fn new(selector: u8) -> Result<Self, Error> {
        Some(selector)
            .filter(|_| selector <= MAX_UNION_SELECTOR)
            .map(Self)
            .ok_or_else(|| ErrorKind::UnionSelectorInvalid(selector).into())
    }

    /// Returns `Ok(self)` if the selector addresses one of `num_variants` variants.
    pub fn check_variant_count(self, num_variants: usize) -> Result<Self, Error> {
        if (self.0 as usize) < num_variants {
            Ok(self)
        } else {
            Err(ErrorKind::UnionSelectorInvalid(self.0).into())
        }
    }
}
