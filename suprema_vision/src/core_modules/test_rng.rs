//! Fixed-output random source for the rules that draw from an `Rng`.

/// Always yields the same word, so `random::<f64>()` is pinned: `ConstRng(0)` gives
/// 0.0 and `ConstRng(u64::MAX)` gives the largest value below 1.0.
pub struct ConstRng(pub u64);

impl rand::RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        self.0 as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(self.0 as u8);
    }
}
