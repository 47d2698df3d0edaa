use crate::constants::*;
use crate::lead::LeadId;

/// Which leads a simulator draws.
#[derive(Clone, Debug, PartialEq)]
pub enum LeadSet {
    /// One strip for a single lead.
    Single(LeadId),
    /// The standard 3x4 grid.
    TwelveLead,
}

impl LeadSet {
    pub fn leads(&self) -> Vec<LeadId> {
        match self {
            LeadSet::Single(l) => vec![*l],
            LeadSet::TwelveLead => LeadId::ALL.to_vec(),
        }
    }
}

/// Engine configuration, fixed for the lifetime of a simulator except for
/// the paper speed.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub paper_speed_mm_s: f64,
    pub pixels_per_mm: f64,
    pub display_seconds: f64,
    pub st_elevation_mv: f64,
    pub looping: bool,
    pub sample_cache_limit: usize,
    pub seed_base: u64,
    pub lead_set: LeadSet,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            paper_speed_mm_s: DEFAULT_PAPER_SPEED_MM_S,
            pixels_per_mm: PIXELS_PER_MM_TWELVE_LEAD,
            display_seconds: 10.0,
            st_elevation_mv: DEFAULT_ST_ELEVATION_MV,
            looping: true,
            sample_cache_limit: SAMPLE_CACHE_LIMIT,
            seed_base: 0x5EED_EC61,
            lead_set: LeadSet::TwelveLead,
        }
    }
}

impl EngineConfig {
    /// Single lead II rhythm strip at 3 px/mm.
    pub fn single_lead() -> Self {
        Self {
            pixels_per_mm: PIXELS_PER_MM_SINGLE_LEAD,
            display_seconds: 8.0,
            lead_set: LeadSet::Single(LeadId::II),
            ..Self::default()
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.display_seconds * 1000.0
    }
}

/// Paper runs at 25 or 50 mm/s; anything else reads as 25.
pub fn normalize_paper_speed(mm_s: f64) -> f64 {
    if mm_s == FAST_PAPER_SPEED_MM_S {
        FAST_PAPER_SPEED_MM_S
    } else {
        DEFAULT_PAPER_SPEED_MM_S
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_lead_preset_keeps_the_default_timing() {
        let single = EngineConfig::single_lead();
        assert_eq!(single.lead_set, LeadSet::Single(LeadId::II));
        assert_eq!(single.pixels_per_mm, PIXELS_PER_MM_SINGLE_LEAD);
        assert_eq!(single.window_ms(), 8000.0);
        assert_eq!(single.seed_base, EngineConfig::default().seed_base);
    }

    #[test]
    fn unknown_paper_speeds_read_as_25() {
        assert_eq!(normalize_paper_speed(50.0), 50.0);
        assert_eq!(normalize_paper_speed(33.0), 25.0);
        assert_eq!(normalize_paper_speed(f64::NAN), 25.0);
    }
}
