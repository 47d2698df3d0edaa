//! Drawing and layout constants for the canvas front-end.
//!
//! Engine calibration lives in `ecg_core::constants`; everything here only
//! affects how the trace is painted.

// Element ids
pub const GRID_CANVAS_ID: &str = "ecg12-canvas";
pub const ZOOM_CANVAS_ID: &str = "ecg-zoom-canvas";
pub const RHYTHM_SELECT_ID: &str = "ecg-rhythm";
pub const HEART_RATE_INPUT_ID: &str = "ecg-hr";
pub const AXIS_SELECT_ID: &str = "ecg-axis";
pub const LEAD_I_SIGN_ID: &str = "ecg-lead-i-sign";
pub const AVF_SIGN_ID: &str = "ecg-avf-sign";
pub const SPEED_SELECT_ID: &str = "ecg-speed";
pub const PLAY_BUTTON_ID: &str = "ecg-play";
pub const PAUSE_BUTTON_ID: &str = "ecg-pause";
pub const RESET_BUTTON_ID: &str = "ecg-reset";
pub const HINT_OVERLAY_ID: &str = "hint-overlay";
pub const ADVISORY_ID: &str = "ecg-advisory";

// Wave highlight checkboxes: (element id, wave key)
pub const WAVE_TOGGLE_IDS: [(&str, &str); 3] = [
    ("ecg-hl-p", "p"),
    ("ecg-hl-qrs", "qrs"),
    ("ecg-hl-t", "t"),
];

// Interval highlight checkboxes: (element id, interval key)
pub const INTERVAL_TOGGLE_IDS: [(&str, &str); 4] = [
    ("ecg-iv-rr", "rr"),
    ("ecg-iv-pr", "pr"),
    ("ecg-iv-qrs", "qrs"),
    ("ecg-iv-qt", "qt"),
];

// Paper
pub const PAPER_COLOR: &str = "#fffaf5";
pub const GRID_MINOR_COLOR: &str = "rgba(239,68,68,0.12)";
pub const GRID_MAJOR_COLOR: &str = "rgba(239,68,68,0.28)";
pub const GRID_MAJOR_EVERY: u32 = 5; // 5 mm boxes

// Tiles
pub const TILE_BORDER_COLOR: &str = "rgba(15,23,42,0.15)";
pub const TILE_LABEL_COLOR: &str = "rgba(15,23,42,0.8)";
pub const TILE_BASELINE_COLOR: &str = "rgba(148,163,184,0.5)";
pub const TILE_HIGHLIGHT_COLOR: &str = "#f97316";
pub const TILE_SELECTED_COLOR: &str = "#0ea5e9";
pub const LABEL_FONT: &str = "12px Arial";

// Trace strokes
pub const TRACE_LINE_WIDTH: f64 = 1.5;
pub const CURSOR_LINE_WIDTH: f64 = 1.0;

// Interval brackets: lane offsets within the bracket band (fractions of lane height)
pub const BRACKET_BAND_PX: f64 = 96.0;
pub const BRACKET_HEIGHT_PX: f64 = 10.0;
pub const BRACKET_PAD_TOP_PX: f64 = 14.0;
pub const BRACKET_COLORS: [(&str, &str); 4] = [
    ("#7c3aed", "rgba(124,58,237,0.10)"), // RR
    ("#2563eb", "rgba(37,99,235,0.10)"),  // PR
    ("#d33f49", "rgba(211,63,73,0.10)"),  // QRS
    ("#2f855a", "rgba(47,133,90,0.10)"),  // QT
];

// Readout box
pub const READOUT_FONT: &str = "12px \"SFMono-Regular\", Consolas, monospace";
pub const READOUT_FONT_PX: f64 = 12.0;
pub const READOUT_PADDING_PX: f64 = 8.0;
pub const READOUT_MARGIN_PX: f64 = 12.0;
pub const READOUT_FILL: &str = "rgba(255,255,255,0.75)";
pub const READOUT_STROKE: &str = "rgba(0,0,0,0.12)";
pub const READOUT_TEXT: &str = "#0f172a";

// Calipers
pub const MEASURE_LINE_COLOR: &str = "rgba(15,23,42,0.55)";
pub const MEASURE_HANDLE_COLOR: &str = "rgba(15,23,42,0.9)";
pub const MEASURE_LABEL_FILL: &str = "rgba(255,255,255,0.85)";
pub const MEASURE_LABEL_STROKE: &str = "rgba(15,23,42,0.18)";
pub const MEASURE_FONT: &str = "11px \"SFMono-Regular\", Consolas, monospace";
pub const MEASURE_LINE_HEIGHT_PX: f64 = 12.0;
pub const MEASURE_LABEL_PAD_PX: (f64, f64) = (5.0, 6.0);
pub const MEASURE_HANDLE_RADIUS_PX: f64 = 2.5;

// Calibration pulse
pub const CALIBRATION_COLOR: &str = "#0f172a";
pub const CALIBRATION_X_PX: f32 = 12.0;
