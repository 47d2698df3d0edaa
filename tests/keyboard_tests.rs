// Host-side tests for the keyboard shortcut map.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]

#[path = "../src/events/keymap.rs"]
mod keymap;

use ecg_core::RhythmId;
use keymap::*;

#[test]
fn digits_select_rhythms_in_table_order() {
    let keys = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-"];
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(
            action_for_key(key),
            Some(KeyAction::SelectRhythm(i)),
            "key {key:?} should pick rhythm #{i}"
        );
    }
}

#[test]
fn every_rhythm_has_a_shortcut() {
    let keys = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-"];
    assert_eq!(keys.len(), RhythmId::ALL.len());
    assert_eq!(rhythm_index_for_key("0").map(|i| RhythmId::ALL[i]), Some(RhythmId::MonomorphicVt));
    assert_eq!(rhythm_index_for_key("-").map(|i| RhythmId::ALL[i]), Some(RhythmId::PolymorphicVt));
}

#[test]
fn transport_and_rate_keys() {
    assert_eq!(action_for_key(" "), Some(KeyAction::TogglePlay));
    assert_eq!(action_for_key("r"), Some(KeyAction::Reset));
    assert_eq!(action_for_key("R"), Some(KeyAction::Reset));
    assert_eq!(action_for_key("ArrowUp"), Some(KeyAction::AdjustHeartRate(HR_STEP_BPM)));
    assert_eq!(action_for_key("ArrowDown"), Some(KeyAction::AdjustHeartRate(-HR_STEP_BPM)));
    assert_eq!(HR_STEP_BPM, 5.0);
}

#[test]
fn axis_and_hint_keys() {
    assert_eq!(action_for_key("a"), Some(KeyAction::CycleAxis));
    assert_eq!(action_for_key("A"), Some(KeyAction::CycleAxis));
    assert_eq!(action_for_key("h"), Some(KeyAction::ToggleHint));
}

#[test]
fn m_toggles_the_calipers() {
    assert_eq!(action_for_key("m"), Some(KeyAction::ToggleMeasure));
    assert_eq!(action_for_key("M"), Some(KeyAction::ToggleMeasure));
}

#[test]
fn unmapped_keys_are_ignored() {
    for key in ["x", "Enter", "ArrowLeft", "ArrowRight", "=", "Shift", ""] {
        assert_eq!(action_for_key(key), None, "{key:?} should not be mapped");
    }
}
