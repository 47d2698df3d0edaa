// Lead projection, axis handling and the STEMI injury current.

use ecg_core::lead::{component_scale, WaveComponent};
use ecg_core::model::VoltageModel;
use ecg_core::waveform::Amplitudes;
use ecg_core::{build_schedule, AxisMode, AxisState, EngineError, LeadId, RhythmId};

fn axis_at(deg: f64) -> AxisState {
    let mut axis = AxisState::default();
    axis.set_degrees(deg);
    axis
}

#[test]
fn lead_ii_qrs_scale_follows_the_axis() {
    let at_60 = component_scale(LeadId::II, WaveComponent::Qrs, &axis_at(60.0));
    assert_eq!(at_60, Some(1.0), "axis parallel to lead II");
    let at_150 = component_scale(LeadId::II, WaveComponent::Qrs, &axis_at(150.0));
    assert_eq!(at_150, Some(0.08), "perpendicular axis keeps the minimum scale");
}

#[test]
fn limb_scales_never_collapse_to_zero() {
    for deg in (-180..=180).step_by(5) {
        let axis = axis_at(deg as f64);
        for lead in LeadId::ALL.into_iter().filter(|l| l.is_limb()) {
            for (component, min) in [
                (WaveComponent::P, 0.12),
                (WaveComponent::Qrs, 0.08),
                (WaveComponent::T, 0.12),
            ] {
                let Some(scale) = component_scale(lead, component, &axis) else {
                    panic!("{lead} is a limb lead");
                };
                assert!(
                    scale.abs() >= min - 1e-12,
                    "{lead} {component:?} at {deg}\u{b0}: {scale}"
                );
            }
        }
    }
}

#[test]
fn chest_leads_have_no_limb_scale() {
    for lead in [LeadId::V1, LeadId::V3, LeadId::V6] {
        assert_eq!(component_scale(lead, WaveComponent::Qrs, &AxisState::default()), None);
    }
}

#[test]
fn axis_mode_and_degrees_stay_consistent() {
    let mut axis = AxisState::default();
    for deg in (-180..=180).step_by(7) {
        axis.set_degrees(deg as f64);
        assert_eq!(axis.mode(), AxisMode::from_degrees(deg as f64), "at {deg}\u{b0}");
    }
    for mode in AxisMode::ALL {
        axis.set_mode(mode);
        assert_eq!(axis.degrees(), mode.degrees());
        assert_eq!(AxisMode::from_degrees(axis.degrees()), mode);
    }
    axis.set_degrees(f64::NAN);
    assert_eq!(axis.degrees(), 0.0);
    assert_eq!(axis.mode(), AxisMode::Normal);
}

#[test]
fn lead_names_parse_or_error() {
    assert_eq!("aVF".parse::<LeadId>(), Ok(LeadId::AVF));
    assert_eq!("ii".parse::<LeadId>(), Ok(LeadId::II));
    assert_eq!("X1".parse::<LeadId>(), Err(EngineError::UnknownLead("X1".to_string())));
    for lead in LeadId::ALL {
        assert_eq!(lead.label().parse::<LeadId>(), Ok(lead), "label of {lead:?} should parse");
    }
}

fn mid_st_time(id: RhythmId) -> (ecg_core::BeatSchedule, f64) {
    let s = build_schedule(id.preset(), id.preset().default_hr, 10_000.0, 11);
    let beat = s.beats[2];
    let t = (beat.qrs_end_ms() + beat.t_end_ms()) / 2.0;
    (s, t)
}

#[test]
fn inferior_stemi_elevates_inferior_and_depresses_reciprocal_leads() {
    let (schedule, t) = mid_st_time(RhythmId::StemiInferior);
    let model = VoltageModel {
        schedule: &schedule,
        amps: Amplitudes::for_pixels_per_mm(4.0),
        axis: AxisState::default(),
        st_elevation_mv: 0.25,
    };
    for lead in [LeadId::II, LeadId::III, LeadId::AVF] {
        assert!(model.components(t, lead).st > 0.0, "{lead} should be elevated");
    }
    for lead in [LeadId::I, LeadId::AVL] {
        assert!(model.components(t, lead).st < 0.0, "{lead} should be depressed");
    }
    for lead in [LeadId::V1, LeadId::V6] {
        assert_eq!(model.components(t, lead).st, 0.0, "{lead} is outside the territory");
    }
}

#[test]
fn sinus_has_no_st_component() {
    let (schedule, t) = mid_st_time(RhythmId::Sinus);
    let model = VoltageModel {
        schedule: &schedule,
        amps: Amplitudes::for_pixels_per_mm(4.0),
        axis: AxisState::default(),
        st_elevation_mv: 0.25,
    };
    for lead in LeadId::ALL {
        assert_eq!(model.components(t, lead).st, 0.0, "{lead}");
    }
}

#[test]
fn avr_voltage_is_the_inverted_projection() {
    let schedule = build_schedule(RhythmId::Sinus.preset(), 75.0, 10_000.0, 1);
    let r = schedule.beats[1].r_time_ms;
    for deg in [60.0, -150.0] {
        let axis = axis_at(deg);
        let model = VoltageModel {
            schedule: &schedule,
            amps: Amplitudes::for_pixels_per_mm(4.0),
            axis,
            st_elevation_mv: 0.25,
        };
        let Some(scale) = component_scale(LeadId::AVR, WaveComponent::Qrs, &axis) else {
            panic!("aVR is a limb lead");
        };
        let v = model.lead_voltage(r, LeadId::AVR);
        assert!(v * scale < 0.0, "aVR at {deg}\u{b0}: voltage {v}, scale {scale}");
    }
}
