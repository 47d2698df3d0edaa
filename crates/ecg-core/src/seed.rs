//! String hashing and seed derivation for the schedule PRNG.

/// 31-multiplier string hash over UTF-16 code units with wrapping `i32`
/// arithmetic, returned as an absolute value.
pub fn hash_key(key: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in key.encode_utf16() {
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(unit as i32);
    }
    h.unsigned_abs()
}

/// Produces a fresh seed for every explicit rhythm or rate change.
#[derive(Clone, Debug)]
pub struct SeedSequence {
    base: u64,
    counter: u64,
}

impl SeedSequence {
    pub fn new(base: u64) -> Self {
        Self { base, counter: 0 }
    }

    pub fn next_for(&mut self, rhythm: &str, heart_rate_bpm: f64) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        let key = format!("{rhythm}|{}", heart_rate_bpm.round() as i64);
        let mixed = self
            .base
            .wrapping_add(hash_key(&key) as u64)
            .wrapping_add(self.counter);
        mixed ^ self.counter.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    pub fn counter(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_known_values() {
        assert_eq!(hash_key(""), 0);
        assert_eq!(hash_key("a"), 97);
        assert_eq!(hash_key("ab"), 97 * 31 + 98);
    }

    #[test]
    fn seeds_change_with_every_request() {
        let mut seq = SeedSequence::new(7);
        let a = seq.next_for("sinus", 75.0);
        let b = seq.next_for("sinus", 75.0);
        assert_ne!(a, b);
        assert_eq!(seq.counter(), 2);
    }
}
