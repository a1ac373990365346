//! Xorshift32 - deterministic, allocation-free randomness for gameplay knobs
//! (cue volume, scatter layout). Not suitable for anything security related.

/// Advance the state and return the next raw value.
#[inline]
pub fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    // A zero state would stay zero forever.
    if x == 0 {
        x = 0x9E37_79B9;
    }
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform float in [0, 1).
#[inline]
pub fn next_unit(state: &mut u32) -> f32 {
    // Top 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
    (xorshift32(state) >> 8) as f32 / (1u32 << 24) as f32
}

/// Uniform float in [min, max).
#[inline]
pub fn next_range(state: &mut u32, min: f32, max: f32) -> f32 {
    min + next_unit(state) * (max - min)
}
