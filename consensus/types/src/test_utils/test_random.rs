use crate::Hash256;
use rand::RngCore;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

mod bitfield;

pub fn test_random_instance<T: TestRandom>() -> T {
    let mut rng = XorShiftRng::from_seed([0x42; 16]);
    T::random_for_test(&mut rng)
}

pub trait TestRandom {
    fn random_for_test(rng: &mut impl RngCore) -> Self;
}

impl TestRandom for bool {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        (rng.next_u32() % 2) == 1
    }
}

impl TestRandom for u64 {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        rng.next_u64()
    }
}

impl TestRandom for u32 {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        rng.next_u32()
    }
}

impl TestRandom for u8 {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        rng.next_u32().to_be_bytes()[0]
    }
}

impl TestRandom for usize {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        rng.next_u32() as usize
    }
}

impl TestRandom for Hash256 {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        let mut key_bytes = vec![0; 32];
        rng.fill_bytes(&mut key_bytes);
        Hash256::from_slice(&key_bytes[..])
    }
}

impl<const N: usize> TestRandom for [u8; N] {
    fn random_for_test(rng: &mut impl RngCore) -> Self {
        let mut bytes = [0; N];
        rng.fill_bytes(&mut bytes);
        bytes
    }
}

/// Between zero and `min(4, max_len) - 1` items, so nested lists stay small.
pub fn random_list<T: TestRandom>(rng: &mut impl RngCore, max_len: usize) -> Vec<T> {
    let mut output = vec![];

    if max_len != 0 {
        for _ in 0..(usize::random_for_test(rng) % std::cmp::min(4, max_len)) {
            output.push(T::random_for_test(rng));
        }
    }

    output
}

pub fn random_vector<T: TestRandom>(rng: &mut impl RngCore, len: usize) -> Vec<T> {
    (0..len).map(|_| T::random_for_test(rng)).collect()
}
