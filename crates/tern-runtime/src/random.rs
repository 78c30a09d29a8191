//! Bounded random integers for `random(from, to)`.
//!
//! One generator serves the whole process. It is created on first use,
//! seeded from `TERN_SEED` when configured and from OS entropy otherwise.
//!
//! The reduction is a plain modulo over a 64-bit draw, so ranges that do not
//! divide 2^64 are very slightly biased towards their low end. Not suitable
//! for cryptography.

use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config;
use crate::error::{RuntimeError, RuntimeResult};
use crate::fail_fast::OrFailFast;

static GENERATOR: Mutex<Option<ChaCha8Rng>> = Mutex::new(None);

fn generator() -> MutexGuard<'static, Option<ChaCha8Rng>> {
    GENERATOR.lock().unwrap_or_else(PoisonError::into_inner)
}

fn new_generator() -> ChaCha8Rng {
    match config::current().seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Restart the generator from `seed`.
pub fn seed(seed: u64) {
    *generator() = Some(ChaCha8Rng::seed_from_u64(seed));
}

/// Draw a value in `[from, to)` from `rng`.
///
/// Two 32-bit draws are combined into one 64-bit value, reduced modulo the
/// width of the range and offset by `from`.
pub fn random_in<R: RngCore + ?Sized>(rng: &mut R, from: i64, to: i64) -> RuntimeResult<i64> {
    if from >= to {
        return Err(RuntimeError::EmptyRandomRange { from, to });
    }
    // `to - from` is positive and below 2^64, so it fits once reinterpreted.
    let width = to.wrapping_sub(from) as u64;
    let high = u64::from(rng.next_u32());
    let low = u64::from(rng.next_u32());
    let draw = (high << 32) | low;
    Ok(from.wrapping_add((draw % width) as i64))
}

pub fn try_random(from: i64, to: i64) -> RuntimeResult<i64> {
    let mut slot = generator();
    let rng = slot.get_or_insert_with(new_generator);
    random_in(rng, from, to)
}

/// Random integer in `[from, to)`; fails fast unless `from < to`.
pub fn random(from: i64, to: i64) -> i64 {
    try_random(from, to).or_fail_fast()
}
