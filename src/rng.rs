//! Per-pixel random number generation.

pub use rand::{Rng, SeedableRng};

/// The [xoshiro](https://prng.di.unimi.it/) generators are a good fit for
/// path tracing: best-in-class statistical quality for the cost of a few
/// xor/shift/rotate ops, and a state small enough to live in one pixel's
/// work item. Each pixel owns its own generator, seeded from the pixel's
/// linear index, so results never depend on thread count or launch order.
pub type PixelRng = rand_xoshiro::Xoshiro128Plus;

/// Marsaglia's default xor32 state. An all-zero xorshift register is a fixed
/// point of the generator, so a zero seed is remapped to this instead.
pub const DEFAULT_SEED: u64 = 2463534242;

/// Weyl-sequence increment used to spread pixel indices across seed space.
const PIXEL_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

pub fn seeded(seed: u64) -> PixelRng {
    let seed = if seed == 0 { DEFAULT_SEED } else { seed };
    PixelRng::seed_from_u64(seed)
}

/// Derives the private generator for one pixel's work item from the render
/// seed and the pixel's linear index.
pub fn for_pixel(seed: u64, pixel_index: u64) -> PixelRng {
    seeded(seed.wrapping_add(pixel_index.wrapping_add(1).wrapping_mul(PIXEL_STRIDE)))
}
