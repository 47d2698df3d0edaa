//! Per-lead wave components at one instant, and the memo cache for them.

use fnv::FnvHashMap;

use crate::lead::LeadId;
use crate::waveform::QrsParts;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LeadSample {
    pub p: f64,
    pub qrs: QrsParts,
    pub t: f64,
    pub st: f64,
    pub baseline: f64,
}

/// Bounded memo of samples keyed by lead and time (rounded to a
/// microsecond). Cleared wholesale when it outgrows its limit.
#[derive(Debug)]
pub struct SampleCache {
    map: FnvHashMap<(LeadId, i64), LeadSample>,
    limit: usize,
}

impl SampleCache {
    pub fn new(limit: usize) -> Self {
        Self {
            map: FnvHashMap::default(),
            limit,
        }
    }

    pub fn get_or_insert_with(&mut self, lead: LeadId, time_ms: f64, f: impl FnOnce() -> LeadSample) -> LeadSample {
        let key = (lead, (time_ms * 1000.0).round() as i64);
        if let Some(hit) = self.map.get(&key) {
            return *hit;
        }
        let sample = f();
        if self.map.len() > self.limit {
            self.map.clear();
        }
        self.map.insert(key, sample);
        sample
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_is_bounded() {
        let mut cache = SampleCache::new(10);
        for i in 0..100 {
            cache.get_or_insert_with(LeadId::II, i as f64, LeadSample::default);
            assert!(cache.len() <= 11);
        }
    }

    #[test]
    fn cache_returns_memoized_value() {
        let mut cache = SampleCache::new(10);
        let first = cache.get_or_insert_with(LeadId::I, 5.0, || LeadSample { p: 1.0, ..Default::default() });
        let second = cache.get_or_insert_with(LeadId::I, 5.0, || LeadSample { p: 2.0, ..Default::default() });
        assert_eq!(first, second);
    }
}
