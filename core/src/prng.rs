/// Mulberry32: deterministic 32-bit PRNG.
/// Pure function: returns (value_in_0_1, next_state).
pub fn prng_next(state: u32) -> (f64, u32) {
    let mut t = state.wrapping_add(0x6d2b79f5);
    let next_state = t;
    t = (t ^ (t >> 15)).wrapping_mul(t | 1);
    t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
    let value = (t ^ (t >> 14)) as f64 / 4294967296.0;
    (value, next_state)
}

/// Draw one uniform roll in [0, 1) and advance `state` in place.
pub fn roll(state: &mut u32) -> f64 {
    let (value, next) = prng_next(*state);
    *state = next;
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = 12345;
        let mut b = 12345;
        for _ in 0..16 {
            assert_eq!(roll(&mut a), roll(&mut b));
        }
        assert_eq!(a, b);
    }

    #[test]
    fn rolls_stay_in_unit_interval() {
        let mut state = 42u32;
        for _ in 0..1000 {
            let value = roll(&mut state);
            assert!((0.0..1.0).contains(&value), "value out of range: {}", value);
        }
    }

    #[test]
    fn known_values() {
        let (v, s) = prng_next(0);
        assert_eq!(v, 0.26642920868471265);
        assert_eq!(s, 1831565813);

        let (v, s) = prng_next(42);
        assert_eq!(v, 0.6011037519201636);
        assert_eq!(s, 1831565855);
        let (v, _) = prng_next(s);
        assert_eq!(v, 0.44829055899754167);
    }
}
