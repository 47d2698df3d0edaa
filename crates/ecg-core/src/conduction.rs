//! Settings mirrored to the 3D conduction view.

/// Heart rate and conduction phase offset consumed by an external viewer.
/// Non-finite updates are ignored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConductionLink {
    bpm: f64,
    phase_offset: f64,
}

impl ConductionLink {
    pub fn new(bpm: f64) -> Self {
        Self {
            bpm,
            phase_offset: 0.0,
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn phase_offset(&self) -> f64 {
        self.phase_offset
    }

    pub fn set_heart_rate(&mut self, bpm: f64) -> bool {
        if !bpm.is_finite() {
            return false;
        }
        self.bpm = bpm;
        true
    }

    pub fn set_phase_offset(&mut self, offset: f64) -> bool {
        if !offset.is_finite() {
            return false;
        }
        self.phase_offset = offset;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_updates_are_ignored() {
        let mut link = ConductionLink::new(75.0);
        assert!(!link.set_heart_rate(f64::NAN));
        assert!(!link.set_phase_offset(f64::INFINITY));
        assert_eq!(link.bpm(), 75.0);
        assert_eq!(link.phase_offset(), 0.0);
        assert!(link.set_phase_offset(0.25));
        assert_eq!(link.phase_offset(), 0.25);
    }
}
