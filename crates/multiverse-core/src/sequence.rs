//! Deterministic pseudo-random stream.
//!
//! A minimal-standard Lehmer generator: `state <- state * 16807 mod (2^31 - 1)`.
//! Two sequences built from the same seed and driven through the same calls
//! produce identical values on every platform. Every universe ever shown
//! depends on this, so the recurrence and the float mapping are fixed.
//!
//! All state arithmetic is done in `u64`. The largest intermediate product
//! is `(2^31 - 2) * 16807`, well under 2^46.

use rand::RngCore;
use rand::rand_core::impls;

/// Prime modulus, `2^31 - 1`.
pub const MODULUS: u64 = 2_147_483_647;

/// Multiplier of the recurrence.
pub const MULTIPLIER: u64 = 16_807;

/// `MODULUS - 1` as a float divisor. The state after an advance lies in
/// `[1, MODULUS - 1]`, so `(state - 1) / DIVISOR` lies in `[0, 1)`.
const DIVISOR: f64 = 2_147_483_646.0;

/// Seeded Lehmer sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededSequence {
    /// Current state, always in `[1, MODULUS - 1]`.
    state: u64,
}

impl SeededSequence {
    /// Build a sequence from an integer seed.
    ///
    /// The seed is reduced modulo [`MODULUS`]. A residue of 0 is the
    /// recurrence's fixed point and is remapped to 1, so seeds `0` and `1`
    /// (and every multiple of the modulus) yield the same stream.
    pub const fn new(seed: u64) -> Self {
        let reduced = seed.wrapping_rem(MODULUS);
        let state = if reduced == 0 { 1 } else { reduced };
        Self { state }
    }

    /// Current internal state.
    pub const fn state(&self) -> u64 {
        self.state
    }

    /// Advance the recurrence and return the new raw state.
    fn advance(&mut self) -> u64 {
        // state < 2^31 and MULTIPLIER < 2^15, so the product cannot overflow.
        self.state = self.state.wrapping_mul(MULTIPLIER).wrapping_rem(MODULUS);
        self.state
    }

    /// Next float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        let raw = self.advance().saturating_sub(1);
        // raw < 2^31, exactly representable.
        #[allow(clippy::cast_precision_loss)]
        let numerator = raw as f64;
        numerator / DIVISOR
    }

    /// Next integer in `[min, max]` inclusive, as
    /// `floor(next_f64() * (max - min + 1)) + min`.
    ///
    /// Always consumes exactly one draw. An empty range (`max < min`)
    /// returns `min`.
    pub fn next_int(&mut self, min: i64, max: i64) -> i64 {
        let value = self.next_f64();
        let span = max.saturating_sub(min).saturating_add(1);
        if span <= 0 {
            return min;
        }
        #[allow(clippy::cast_precision_loss)]
        let scaled = (value * span as f64).floor();
        // scaled is in [0, span), which fits i64.
        #[allow(clippy::cast_possible_truncation)]
        let offset = scaled as i64;
        min.saturating_add(offset)
    }

    /// Uniform index in `[0, len)`, equivalent to `next_int(0, len - 1)`.
    ///
    /// Always consumes exactly one draw. Returns `None` for `len == 0`.
    pub fn next_index(&mut self, len: usize) -> Option<usize> {
        let value = self.next_f64();
        if len == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let scaled = (value * len as f64).floor();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = scaled as usize;
        // Guard the upper edge even though value < 1 keeps index < len.
        Some(index.min(len.saturating_sub(1)))
    }

    /// Uniform choice from `items`. Consumes one draw even when `items`
    /// is empty, in which case `None` is returned.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        self.next_index(items.len()).and_then(|i| items.get(i))
    }
}

impl RngCore for SeededSequence {
    /// The raw 31-bit state after one advance.
    fn next_u32(&mut self) -> u32 {
        u32::try_from(self.advance()).unwrap_or(u32::MAX)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}
