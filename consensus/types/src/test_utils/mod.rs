pub use rand::{RngCore, SeedableRng};
pub use rand_xorshift::XorShiftRng;

pub use test_random::{random_list, random_vector, test_random_instance, TestRandom};

mod test_random;
