//! Injury-current model for ST-elevation infarcts.

use std::f64::consts::PI;

use crate::lead::LeadId;
use crate::waveform::smoothstep;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Territory {
    Inferior,
    Anterior,
    Lateral,
}

impl Territory {
    /// ST deflection weight for `lead`: positive leads face the injury,
    /// negative leads show reciprocal depression, zero leads are untouched.
    pub fn lead_weight(self, lead: LeadId) -> f64 {
        use LeadId::*;
        match (self, lead) {
            (Territory::Inferior, II) => 1.0,
            (Territory::Inferior, III) => 1.1,
            (Territory::Inferior, AVF) => 1.0,
            (Territory::Inferior, I | AVL) => -0.6,

            (Territory::Anterior, V1) => 0.7,
            (Territory::Anterior, V2 | V3) => 1.0,
            (Territory::Anterior, V4) => 0.8,

            (Territory::Lateral, I | AVL) => 1.0,
            (Territory::Lateral, V5 | V6) => 0.9,

            (Territory::Anterior | Territory::Lateral, II | AVF) => -0.5,
            (Territory::Anterior | Territory::Lateral, III) => -0.6,
            _ => 0.0,
        }
    }

    pub fn elevated_leads(self) -> impl Iterator<Item = LeadId> {
        LeadId::ALL.into_iter().filter(move |l| self.lead_weight(*l) > 0.0)
    }
}

/// Dome shape over the ST segment, `u` in `[0, 1]` from J point to T end:
/// a quick J-point rise, a slight bulge, then a smooth decay.
pub fn st_shape(u: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    let rise = smoothstep(0.0, 0.08, u);
    let decay = 1.0 - smoothstep(0.55, 1.0, u);
    let bulge = 1.0 + 0.18 * (PI * ((u - 0.25) / 0.75).clamp(0.0, 1.0)).sin();
    rise * decay * bulge
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inferior_elevates_inferior_leads() {
        let leads: Vec<_> = Territory::Inferior.elevated_leads().collect();
        assert_eq!(leads, vec![LeadId::II, LeadId::III, LeadId::AVF]);
        assert!(Territory::Inferior.lead_weight(LeadId::AVL) < 0.0);
        assert_eq!(Territory::Inferior.lead_weight(LeadId::V3), 0.0);
    }

    #[test]
    fn shape_starts_and_ends_at_zero() {
        assert_eq!(st_shape(0.0), 0.0);
        assert!(st_shape(1.0).abs() < 1e-12);
        assert!(st_shape(0.4) > 1.0);
    }
}
