//! Fresh seed strings for the "randomize" affordance.
//!
//! This is the only non-deterministic code in plotgen. It never feeds the
//! render path directly: it produces a seed *string*, which then goes
//! through the same deterministic [`Mulberry32`](crate::prng::Mulberry32)
//! construction as a hand-typed seed.

use rand::Rng;

/// Characters a generated seed is drawn from.
pub const SEED_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Length of seeds the randomize affordance produces.
pub const DEFAULT_SEED_LEN: usize = 8;

/// Draws a fresh `len`-character seed from the thread-local, OS-seeded
/// generator.
pub fn random_seed(len: usize) -> String {
    random_seed_with(&mut rand::rng(), len)
}

/// Draws a seed of `len` characters from `rng`.
pub fn random_seed_with<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| {
            let idx = rng.next_u32() as usize % SEED_ALPHABET.len();
            SEED_ALPHABET[idx] as char
        })
        .collect()
}
