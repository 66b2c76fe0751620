//! Seeded stream for catalog generation.
//!
//! Mulberry32 seeded from the first 32 bits of MD5(seed). The stream is
//! sequential: every `pick` and `shuffle` consumes values in call order,
//! so any change in draw order changes every later record.

use md5::{Digest, Md5};

#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(state: u32) -> Self {
        Self { state }
    }

    /// Seed from a version tag such as `boss-actions-v2`.
    pub fn from_seed_str(seed: &str) -> Self {
        let digest = Md5::digest(seed.as_bytes());
        Self::new(u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]))
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let t = self.state;
        let mut x = (t ^ (t >> 15)).wrapping_mul(t | 1);
        x ^= x.wrapping_add((x ^ (x >> 7)).wrapping_mul(x | 61));
        x ^ (x >> 14)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Uniform index below `len`; `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize {
        ((self.next_f64() * len as f64).floor() as usize).min(len - 1)
    }

    /// One element, or `None` for an empty slice (consumes nothing).
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Fisher-Yates from the back.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}
