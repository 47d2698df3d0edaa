//! Rhythm identifiers and the static preset table.

use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;
use crate::stemi::Territory;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RhythmId {
    Sinus,
    AtrialFibrillation,
    StemiInferior,
    StemiAnterior,
    StemiLateral,
    FirstDegreeBlock,
    MobitzI,
    MobitzII,
    CompleteHeartBlock,
    MonomorphicVt,
    PolymorphicVt,
}

impl RhythmId {
    /// Table order; also the keyboard shortcut order.
    pub const ALL: [RhythmId; 11] = [
        RhythmId::Sinus,
        RhythmId::AtrialFibrillation,
        RhythmId::StemiInferior,
        RhythmId::StemiAnterior,
        RhythmId::StemiLateral,
        RhythmId::FirstDegreeBlock,
        RhythmId::MobitzI,
        RhythmId::MobitzII,
        RhythmId::CompleteHeartBlock,
        RhythmId::MonomorphicVt,
        RhythmId::PolymorphicVt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RhythmId::Sinus => "sinus",
            RhythmId::AtrialFibrillation => "afib",
            RhythmId::StemiInferior => "stemi_inferior",
            RhythmId::StemiAnterior => "stemi_anterior",
            RhythmId::StemiLateral => "stemi_lateral",
            RhythmId::FirstDegreeBlock => "avb1",
            RhythmId::MobitzI => "avb2_mobitz1",
            RhythmId::MobitzII => "avb2_mobitz2",
            RhythmId::CompleteHeartBlock => "avb3",
            RhythmId::MonomorphicVt => "mvtach",
            RhythmId::PolymorphicVt => "pvtach",
        }
    }

    /// Parse an id, falling back to sinus rhythm for anything unknown.
    pub fn parse_or_sinus(raw: &str) -> Self {
        match raw.parse() {
            Ok(id) => id,
            Err(e) => {
                log::warn!("[ecg] {e}; falling back to sinus");
                RhythmId::Sinus
            }
        }
    }

    pub fn preset(self) -> &'static RhythmPreset {
        &PRESETS[self.index()]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn territory(self) -> Option<Territory> {
        match self {
            RhythmId::StemiInferior => Some(Territory::Inferior),
            RhythmId::StemiAnterior => Some(Territory::Anterior),
            RhythmId::StemiLateral => Some(Territory::Lateral),
            _ => None,
        }
    }

    /// Whether a PR interval is meaningful for this rhythm.
    pub fn shows_pr(self) -> bool {
        !matches!(
            self,
            RhythmId::AtrialFibrillation
                | RhythmId::CompleteHeartBlock
                | RhythmId::MonomorphicVt
                | RhythmId::PolymorphicVt
        )
    }
}

impl FromStr for RhythmId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let id = match key.as_str() {
            "sinus" | "nsr" => RhythmId::Sinus,
            "afib" | "atrial_fibrillation" => RhythmId::AtrialFibrillation,
            "stemi_inferior" => RhythmId::StemiInferior,
            "stemi_anterior" => RhythmId::StemiAnterior,
            "stemi_lateral" => RhythmId::StemiLateral,
            "avb1" => RhythmId::FirstDegreeBlock,
            "avb2_mobitz1" => RhythmId::MobitzI,
            "avb2_mobitz2" => RhythmId::MobitzII,
            "avb3" => RhythmId::CompleteHeartBlock,
            "mvtach" | "vtach" => RhythmId::MonomorphicVt,
            "pvtach" => RhythmId::PolymorphicVt,
            _ => return Err(EngineError::UnknownRhythm(s.to_string())),
        };
        Ok(id)
    }
}

impl fmt::Display for RhythmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartRateClamp {
    pub min: f64,
    pub max: f64,
}

impl HeartRateClamp {
    pub fn clamp(&self, bpm: f64) -> f64 {
        bpm.clamp(self.min, self.max)
    }
}

/// Base intervals of a preset, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intervals {
    pub pr_ms: f64,
    pub qrs_ms: f64,
    pub qt_ms: f64,
    pub p_duration_ms: f64,
    pub t_duration_ms: f64,
}

/// Which intervals the guardrail holds constant across conducted beats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalExpectation {
    pub constant_rr: bool,
    pub constant_pr: bool,
    pub constant_qrs: bool,
    pub tolerance_ms: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RhythmPreset {
    pub id: RhythmId,
    pub label: &'static str,
    pub default_hr: f64,
    pub hr_clamp: HeartRateClamp,
    pub intervals: Intervals,
    pub expectation: Option<IntervalExpectation>,
}

impl RhythmPreset {
    /// Clamp a requested heart rate into this preset's range.
    pub fn clamp_heart_rate(&self, bpm: f64) -> Result<f64, EngineError> {
        if !bpm.is_finite() {
            return Err(EngineError::InvalidHeartRate(bpm));
        }
        Ok(self.hr_clamp.clamp(bpm))
    }
}

const fn intervals(pr_ms: f64, qrs_ms: f64, qt_ms: f64, p_duration_ms: f64) -> Intervals {
    Intervals {
        pr_ms,
        qrs_ms,
        qt_ms,
        p_duration_ms,
        t_duration_ms: 180.0,
    }
}

const fn expect(
    constant_rr: bool,
    constant_pr: bool,
    constant_qrs: bool,
    tolerance_ms: f64,
) -> Option<IntervalExpectation> {
    Some(IntervalExpectation {
        constant_rr,
        constant_pr,
        constant_qrs,
        tolerance_ms,
    })
}

const fn clamp(min: f64, max: f64) -> HeartRateClamp {
    HeartRateClamp { min, max }
}

pub static PRESETS: [RhythmPreset; 11] = [
    RhythmPreset {
        id: RhythmId::Sinus,
        label: "Sinus Rhythm",
        default_hr: 75.0,
        hr_clamp: clamp(40.0, 180.0),
        intervals: intervals(160.0, 90.0, 400.0, 90.0),
        expectation: expect(true, true, true, 5.0),
    },
    RhythmPreset {
        id: RhythmId::AtrialFibrillation,
        label: "Atrial Fibrillation",
        default_hr: 110.0,
        hr_clamp: clamp(90.0, 160.0),
        intervals: intervals(0.0, 90.0, 380.0, 0.0),
        expectation: None,
    },
    RhythmPreset {
        id: RhythmId::StemiInferior,
        label: "Inferior STEMI (II, III, aVF)",
        default_hr: 80.0,
        hr_clamp: clamp(40.0, 140.0),
        intervals: intervals(160.0, 90.0, 400.0, 90.0),
        expectation: expect(true, true, true, 6.0),
    },
    RhythmPreset {
        id: RhythmId::StemiAnterior,
        label: "Anterior STEMI (V1\u{2013}V4)",
        default_hr: 80.0,
        hr_clamp: clamp(40.0, 140.0),
        intervals: intervals(160.0, 90.0, 400.0, 90.0),
        expectation: expect(true, true, true, 6.0),
    },
    RhythmPreset {
        id: RhythmId::StemiLateral,
        label: "Lateral STEMI (I, V5\u{2013}V6)",
        default_hr: 80.0,
        hr_clamp: clamp(40.0, 140.0),
        intervals: intervals(160.0, 90.0, 400.0, 90.0),
        expectation: expect(true, true, true, 6.0),
    },
    RhythmPreset {
        id: RhythmId::FirstDegreeBlock,
        label: "1\u{b0} AV Block",
        default_hr: 70.0,
        hr_clamp: clamp(40.0, 140.0),
        intervals: intervals(260.0, 90.0, 410.0, 90.0),
        expectation: expect(true, true, true, 7.0),
    },
    RhythmPreset {
        id: RhythmId::MobitzI,
        label: "2\u{b0} AV Block (Mobitz I)",
        default_hr: 65.0,
        hr_clamp: clamp(40.0, 140.0),
        intervals: intervals(200.0, 90.0, 410.0, 90.0),
        expectation: None,
    },
    RhythmPreset {
        id: RhythmId::MobitzII,
        label: "2\u{b0} AV Block (Mobitz II)",
        default_hr: 60.0,
        hr_clamp: clamp(35.0, 120.0),
        intervals: intervals(190.0, 110.0, 420.0, 90.0),
        expectation: None,
    },
    RhythmPreset {
        id: RhythmId::CompleteHeartBlock,
        label: "3\u{b0} AV Block",
        default_hr: 35.0,
        hr_clamp: clamp(30.0, 50.0),
        intervals: intervals(0.0, 160.0, 420.0, 90.0),
        expectation: expect(true, false, true, 10.0),
    },
    RhythmPreset {
        id: RhythmId::MonomorphicVt,
        label: "Monomorphic Ventricular Tachycardia",
        default_hr: 210.0,
        hr_clamp: clamp(170.0, 240.0),
        intervals: intervals(0.0, 190.0, 460.0, 90.0),
        expectation: expect(true, false, true, 5.0),
    },
    RhythmPreset {
        id: RhythmId::PolymorphicVt,
        label: "Polymorphic Ventricular Tachycardia",
        default_hr: 210.0,
        hr_clamp: clamp(170.0, 240.0),
        intervals: intervals(0.0, 190.0, 460.0, 90.0),
        expectation: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_order_matches_enum_discriminants() {
        for (i, id) in RhythmId::ALL.iter().enumerate() {
            assert_eq!(PRESETS[i].id, *id, "preset {i} out of order");
        }
    }

    #[test]
    fn parse_is_case_insensitive_with_fallback() {
        assert_eq!(" AVB3 ".parse::<RhythmId>(), Ok(RhythmId::CompleteHeartBlock));
        assert!(matches!("vfib".parse::<RhythmId>(), Err(EngineError::UnknownRhythm(_))));
        assert_eq!(RhythmId::parse_or_sinus("vfib"), RhythmId::Sinus);
        assert_eq!(RhythmId::parse_or_sinus("vtach"), RhythmId::MonomorphicVt);
    }

    #[test]
    fn heart_rate_clamps_and_rejects_nan() {
        let p = RhythmId::CompleteHeartBlock.preset();
        assert_eq!(p.clamp_heart_rate(10.0), Ok(30.0));
        assert_eq!(p.clamp_heart_rate(90.0), Ok(50.0));
        assert!(p.clamp_heart_rate(f64::NAN).is_err());
    }
}
