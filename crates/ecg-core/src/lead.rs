//! The twelve standard leads and how each one views the cardiac vector.

use std::fmt;
use std::str::FromStr;

use crate::axis::{wrap_degrees, AxisState};
use crate::constants::{LIMB_PT_MIN_SCALE, LIMB_QRS_MIN_SCALE};
use crate::error::EngineError;
use crate::sample::LeadSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeadId {
    I,
    II,
    III,
    AVR,
    AVL,
    AVF,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
}

impl LeadId {
    pub const ALL: [LeadId; 12] = [
        LeadId::I,
        LeadId::II,
        LeadId::III,
        LeadId::AVR,
        LeadId::AVL,
        LeadId::AVF,
        LeadId::V1,
        LeadId::V2,
        LeadId::V3,
        LeadId::V4,
        LeadId::V5,
        LeadId::V6,
    ];

    /// Display label, e.g. `aVR`.
    pub fn label(self) -> &'static str {
        match self {
            LeadId::I => "I",
            LeadId::II => "II",
            LeadId::III => "III",
            LeadId::AVR => "aVR",
            LeadId::AVL => "aVL",
            LeadId::AVF => "aVF",
            LeadId::V1 => "V1",
            LeadId::V2 => "V2",
            LeadId::V3 => "V3",
            LeadId::V4 => "V4",
            LeadId::V5 => "V5",
            LeadId::V6 => "V6",
        }
    }

    /// Upper-case key used for hashing, e.g. `AVR`.
    pub fn key(self) -> &'static str {
        match self {
            LeadId::AVR => "AVR",
            LeadId::AVL => "AVL",
            LeadId::AVF => "AVF",
            other => other.label(),
        }
    }

    pub fn is_limb(self) -> bool {
        self.limb_angle_deg().is_some()
    }

    /// Hexaxial angle of a limb lead.
    pub fn limb_angle_deg(self) -> Option<f64> {
        match self {
            LeadId::I => Some(0.0),
            LeadId::II => Some(60.0),
            LeadId::III => Some(120.0),
            LeadId::AVR => Some(-150.0),
            LeadId::AVL => Some(-30.0),
            LeadId::AVF => Some(90.0),
            _ => None,
        }
    }

    /// Position 0..=5 across the chest for V1..V6.
    pub fn precordial_index(self) -> Option<usize> {
        match self {
            LeadId::V1 => Some(0),
            LeadId::V2 => Some(1),
            LeadId::V3 => Some(2),
            LeadId::V4 => Some(3),
            LeadId::V5 => Some(4),
            LeadId::V6 => Some(5),
            _ => None,
        }
    }
}

impl FromStr for LeadId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_uppercase();
        LeadId::ALL
            .into_iter()
            .find(|l| l.key() == key)
            .ok_or_else(|| EngineError::UnknownLead(s.to_string()))
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveComponent {
    P,
    Qrs,
    T,
}

/// Push `g` away from zero to at least `min_abs`, keeping its sign. An
/// exact zero becomes positive.
#[inline]
pub fn safe_non_zero(g: f64, min_abs: f64) -> f64 {
    if !g.is_finite() {
        return min_abs;
    }
    if g.abs() < min_abs {
        if g < 0.0 {
            -min_abs
        } else {
            min_abs
        }
    } else {
        g
    }
}

/// Projection factor of a wave component onto a limb lead, or `None` for
/// chest leads.
pub fn component_scale(lead: LeadId, component: WaveComponent, axis: &AxisState) -> Option<f64> {
    let angle = lead.limb_angle_deg()?;
    let (component_axis, min_scale) = match component {
        WaveComponent::P => (axis.p_axis(), LIMB_PT_MIN_SCALE),
        WaveComponent::Qrs => (axis.qrs_axis(), LIMB_QRS_MIN_SCALE),
        WaveComponent::T => (axis.t_axis(), LIMB_PT_MIN_SCALE),
    };
    let diff = wrap_degrees(component_axis - angle);
    Some(safe_non_zero(diff.to_radians().cos(), min_scale))
}

fn limb_gain(lead: LeadId) -> (f64, f64) {
    match lead {
        LeadId::I | LeadId::III => (0.95, 1.0),
        LeadId::II | LeadId::AVL => (1.05, 1.0),
        LeadId::AVR => (1.0, -1.0),
        _ => (1.0, 1.0),
    }
}

const PRECORDIAL_BASE_GAIN: [f64; 6] = [0.9, 0.95, 1.0, 1.05, 1.1, 1.05];
const PRECORDIAL_FINAL_TRIM: [f64; 6] = [0.95, 1.0, 0.9, 1.0, 1.05, 1.0];

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Voltage seen by `lead` for one set of wave components.
pub fn project(sample: &LeadSample, lead: LeadId, axis: &AxisState) -> f64 {
    if let Some(idx) = lead.precordial_index() {
        return project_precordial(sample, idx);
    }
    let scale = |c| component_scale(lead, c, axis).unwrap_or(0.0);
    let projected = sample.p * scale(WaveComponent::P)
        + sample.qrs.sum() * scale(WaveComponent::Qrs)
        + sample.t * scale(WaveComponent::T);
    let (gain, polarity) = limb_gain(lead);
    (projected + sample.st + sample.baseline) * gain * polarity
}

// R grows and S shrinks from V1 to V6.
fn project_precordial(sample: &LeadSample, idx: usize) -> f64 {
    let frac = idx as f64 / 5.0;
    let gain = PRECORDIAL_BASE_GAIN[idx];
    let r_weight = ((idx as f64 - 1.0) / 4.0).clamp(0.0, 1.0);
    let s_weight = 1.0 - r_weight;
    let q = sample.qrs.q * 0.15;
    let r = sample.qrs.r * (0.35 + 0.95 * r_weight);
    let s = sample.qrs.s * (0.35 + 1.0 * s_weight);
    let qrs = q + r + s;
    let pt = sample.p * lerp(0.9, 1.05, frac) + sample.t * lerp(0.65, 1.2, frac);
    let value = (qrs + pt + sample.st + sample.baseline) * gain;
    value * PRECORDIAL_FINAL_TRIM[idx]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::QrsParts;

    #[test]
    fn parse_accepts_any_case_and_rejects_unknown() {
        assert_eq!("avr".parse::<LeadId>(), Ok(LeadId::AVR));
        assert_eq!(" v6 ".parse::<LeadId>(), Ok(LeadId::V6));
        assert_eq!("V7".parse::<LeadId>(), Err(EngineError::UnknownLead("V7".into())));
    }

    #[test]
    fn safe_non_zero_keeps_sign() {
        assert_eq!(safe_non_zero(0.0, 0.1), 0.1);
        assert_eq!(safe_non_zero(-0.01, 0.1), -0.1);
        assert_eq!(safe_non_zero(0.5, 0.1), 0.5);
        assert_eq!(safe_non_zero(f64::NAN, 0.1), 0.1);
    }

    #[test]
    fn avr_net_polarity_is_inverted() {
        let sample = LeadSample {
            qrs: QrsParts { q: 0.0, r: 40.0, s: 0.0 },
            ..LeadSample::default()
        };
        let axis = AxisState::default();
        let scale = component_scale(LeadId::AVR, WaveComponent::Qrs, &axis).unwrap_or(0.0);
        assert!(scale < 0.0, "aVR faces away from a normal axis");
        let expected = -(40.0 * scale);
        assert!((project(&sample, LeadId::AVR, &axis) - expected).abs() < 1e-9);
        assert!(project(&sample, LeadId::II, &axis) > 0.0);
    }

    #[test]
    fn r_wave_grows_across_the_chest() {
        let sample = LeadSample {
            qrs: QrsParts { q: 0.0, r: 40.0, s: 0.0 },
            ..LeadSample::default()
        };
        let axis = AxisState::default();
        let v1 = project(&sample, LeadId::V1, &axis);
        let v5 = project(&sample, LeadId::V5, &axis);
        assert!(v5 > 2.0 * v1, "V1 {v1} V5 {v5}");
    }
}
