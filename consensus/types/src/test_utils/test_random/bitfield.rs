use super::*;
use ssz::Bitlist;

impl TestRandom for Bitlist {
    /// Up to 64 bits. Callers with a smaller maximum must build their own.
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        let len = (rng.next_u32() % 65) as usize;
        let bits: Vec<bool> = (0..len).map(|_| bool::random_for_test(rng)).collect();
        Bitlist::from_bools(&bits)
    }
}
