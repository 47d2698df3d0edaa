// Host-side tests for drawing constants.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
#[path = "../src/constants.rs"]
mod constants;

use constants::*;

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[test]
fn element_ids_are_unique() {
    let mut ids = vec![
        GRID_CANVAS_ID,
        ZOOM_CANVAS_ID,
        RHYTHM_SELECT_ID,
        HEART_RATE_INPUT_ID,
        AXIS_SELECT_ID,
        LEAD_I_SIGN_ID,
        AVF_SIGN_ID,
        SPEED_SELECT_ID,
        PLAY_BUTTON_ID,
        PAUSE_BUTTON_ID,
        RESET_BUTTON_ID,
        HINT_OVERLAY_ID,
        ADVISORY_ID,
    ];
    ids.extend(WAVE_TOGGLE_IDS.iter().map(|(id, _)| *id));
    ids.extend(INTERVAL_TOGGLE_IDS.iter().map(|(id, _)| *id));
    let n = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), n, "duplicate element id");
}

#[test]
fn bracket_colours_cover_every_lane() {
    assert_eq!(BRACKET_COLORS.len(), INTERVAL_TOGGLE_IDS.len());
    for (stroke, fill) in BRACKET_COLORS {
        assert!(is_hex_color(stroke), "{stroke}");
        assert!(fill.starts_with("rgba("), "{fill}");
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn band_leaves_room_for_four_lanes() {
    let usable = BRACKET_BAND_PX - BRACKET_PAD_TOP_PX;
    assert!(usable / 4.0 > BRACKET_HEIGHT_PX, "lanes would overlap");
    assert!(GRID_MAJOR_EVERY == 5, "major boxes are 5 mm");
    assert!(TRACE_LINE_WIDTH > 0.0 && CURSOR_LINE_WIDTH > 0.0);
}
