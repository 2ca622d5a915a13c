//! Deterministic, string-seeded random stream plus the sampling helpers every
//! generator draws through.
//!
//! The seed string is folded into a 32-bit state with FNV-1a over its UTF-16
//! code units, then driven by a mulberry32 step. The helpers consume the
//! stream only through [`unit`], so any `RngCore` works in tests, but only
//! [`SeededRng`] reproduces a session from its seed.

use rand::{RngCore, SeedableRng};

const FNV_OFFSET: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;
const MULBERRY_INCREMENT: u32 = 0x6D2B_79F5;

/// Fold a seed string into a 32-bit state, order-dependent.
pub fn hash_seed(seed: &str) -> u32 {
    let mut hash = FNV_OFFSET;
    for unit in seed.encode_utf16() {
        hash ^= unit as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// mulberry32 stream seeded from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn from_seed_str(seed: &str) -> Self {
        Self::from_state(hash_seed(seed))
    }

    // A zero state would collapse the stream.
    fn from_state(state: u32) -> Self {
        SeededRng { state: if state == 0 { 1 } else { state } }
    }
}

impl RngCore for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(MULBERRY_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.next_u32() as u64;
        let lo = self.next_u32() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_u32().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeededRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::from_state(u32::from_le_bytes(seed))
    }
}

/// A float in `[0, 1)` built from one 32-bit draw.
pub fn unit<R: RngCore + ?Sized>(rng: &mut R) -> f64 {
    rng.next_u32() as f64 / 4_294_967_296.0
}

/// Uniform integer in the inclusive range spanned by `a` and `b`
/// (argument order does not matter).
pub fn random_int<R: RngCore + ?Sized>(rng: &mut R, a: i32, b: i32) -> i32 {
    let (lower, upper) = if a <= b { (a as i64, b as i64) } else { (b as i64, a as i64) };
    let span = (upper - lower + 1) as f64;
    let offset = (unit(rng) * span).floor() as i64;
    // unit() < 1.0, but guard the cast against rounding at the top of huge spans.
    (lower + offset).min(upper) as i32
}

/// Uniform element, or `None` for an empty slice.
pub fn pick_one<'a, T, R: RngCore + ?Sized>(rng: &mut R, values: &'a [T]) -> Option<&'a T> {
    if values.is_empty() {
        return None;
    }
    let index = random_int(rng, 0, values.len() as i32 - 1) as usize;
    values.get(index)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub fn new(value: T, weight: f64) -> Self {
        Weighted { value, weight }
    }
}

/// Walk cumulative weights and return the first option whose cumulative
/// weight reaches `unit() * total`. Floating-point leftovers land on the last
/// option.
pub fn pick_weighted<'a, T, R: RngCore + ?Sized>(
    rng: &mut R,
    options: &'a [Weighted<T>],
) -> Option<&'a T> {
    if options.is_empty() {
        return None;
    }
    let total: f64 = options.iter().map(|o| o.weight).sum();
    let threshold = unit(rng) * total;

    let mut cumulative = 0.0;
    for option in options {
        cumulative += option.weight;
        if threshold <= cumulative {
            return Some(&option.value);
        }
    }
    options.last().map(|o| &o.value)
}

/// Fisher-Yates over a copy of `values`.
pub fn shuffle<T: Clone, R: RngCore + ?Sized>(rng: &mut R, values: &[T]) -> Vec<T> {
    let mut out = values.to_vec();
    for i in (1..out.len()).rev() {
        let j = random_int(rng, 0, i as i32) as usize;
        out.swap(i, j);
    }
    out
}
