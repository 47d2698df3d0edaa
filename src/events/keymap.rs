//! Pure key-to-action mapping for the global keyboard shortcuts.
//! Kept free of DOM types so host-side tests can `include!` it.

/// Heart-rate change per arrow key press, in bpm.
pub const HR_STEP_BPM: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    TogglePlay,
    Reset,
    AdjustHeartRate(f64),
    /// Index into the rhythm table.
    SelectRhythm(usize),
    CycleAxis,
    ToggleHint,
    ToggleMeasure,
}

/// Digits pick rhythms in table order, `0` is the tenth and `-` the eleventh.
#[inline]
pub fn rhythm_index_for_key(key: &str) -> Option<usize> {
    match key {
        "1" => Some(0),
        "2" => Some(1),
        "3" => Some(2),
        "4" => Some(3),
        "5" => Some(4),
        "6" => Some(5),
        "7" => Some(6),
        "8" => Some(7),
        "9" => Some(8),
        "0" => Some(9),
        "-" => Some(10),
        _ => None,
    }
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    if let Some(i) = rhythm_index_for_key(key) {
        return Some(KeyAction::SelectRhythm(i));
    }
    match key {
        " " | "Spacebar" => Some(KeyAction::TogglePlay),
        "r" | "R" => Some(KeyAction::Reset),
        "ArrowUp" => Some(KeyAction::AdjustHeartRate(HR_STEP_BPM)),
        "ArrowDown" => Some(KeyAction::AdjustHeartRate(-HR_STEP_BPM)),
        "a" | "A" => Some(KeyAction::CycleAxis),
        "h" | "H" => Some(KeyAction::ToggleHint),
        "m" | "M" => Some(KeyAction::ToggleMeasure),
        _ => None,
    }
}
