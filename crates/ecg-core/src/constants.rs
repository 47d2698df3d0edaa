// Calibration and morphology constants shared by every simulator instance.
// Amplitudes are in millivolts and get converted to pixels through the
// configured pixels-per-millimetre (see `Amplitudes::for_pixels_per_mm`).

// Paper calibration
pub const MM_PER_MV: f64 = 10.0; // standard 10 mm/mV gain
pub const DEFAULT_PAPER_SPEED_MM_S: f64 = 25.0;
pub const FAST_PAPER_SPEED_MM_S: f64 = 50.0;
pub const PIXELS_PER_MM_TWELVE_LEAD: f64 = 4.0;
pub const PIXELS_PER_MM_SINGLE_LEAD: f64 = 3.0;

// Wave amplitudes (mV)
pub const AMP_P_MV: f64 = 0.15;
pub const AMP_Q_MV: f64 = -0.25;
pub const AMP_R_MV: f64 = 1.0;
pub const AMP_S_MV: f64 = -0.35;
pub const AMP_T_MV: f64 = 0.4;

// Gaussian width divisors: sigma = width / divisor
pub const P_SIGMA_DIVISOR: f64 = 6.0;
pub const QRS_SIGMA_DIVISOR: f64 = 10.0;
pub const T_SIGMA_DIVISOR: f64 = 5.0;

// Q and S sub-wave offsets as a fraction of QRS width
pub const QS_OFFSET_FRACTION: f64 = 0.25;
pub const S_SKEW_FACTOR: f64 = 0.6;

// Wave placement and evaluation windows (ms)
pub const P_CENTER_OFFSET_MS: f64 = 40.0; // P centre = R - PR + offset
pub const P_WIDTH_MS: f64 = 80.0;
pub const P_SUPPORT_MS: f64 = 160.0;
pub const T_WIDTH_MS: f64 = 120.0;
pub const T_SUPPORT_MS: f64 = 160.0;
pub const QRS_SUPPORT_WIDTHS: f64 = 2.0; // evaluate QRS within +/- 2 widths of R
pub const MIN_ST_SEGMENT_MS: f64 = 60.0;

// Wave-type classification windows (ms)
pub const P_CLASSIFY_WINDOW_MS: f64 = 90.0;
pub const T_CLASSIFY_MIN_WINDOW_MS: f64 = 80.0;

// Limb-lead projection floors
pub const LIMB_QRS_MIN_SCALE: f64 = 0.08;
pub const LIMB_PT_MIN_SCALE: f64 = 0.12;

// Rhythm generation
pub const MIN_RATE_BPM: f64 = 10.0;
pub const DEFAULT_WINDOW_MS: f64 = 10_000.0;
pub const FIRST_DEGREE_MIN_PR_MS: f64 = 240.0;
pub const MOBITZ_I_PR_STEPS_MS: [f64; 3] = [200.0, 260.0, 320.0];
pub const MOBITZ_II_MIN_PR_MS: f64 = 80.0;
pub const MOBITZ_II_FIRST_DROP: usize = 3; // 4:3 conduction to start
pub const MOBITZ_II_MIN_DROP_SPACING: usize = 3; // never strict 2:1
pub const AVB3_ATRIAL_RATE_BPM: f64 = 80.0;
pub const AVB3_ATRIAL_PR_MS: f64 = 140.0;
pub const AVB3_VENT_RATE_MIN_BPM: f64 = 30.0;
pub const AVB3_VENT_RATE_MAX_BPM: f64 = 50.0;
pub const AVB3_MIN_QRS_MS: f64 = 160.0;
pub const AVB3_MIN_QT_MS: f64 = 420.0;
pub const AFIB_MIN_RATE_BPM: f64 = 30.0;
pub const AFIB_RR_JITTER_SIGMA: f64 = 0.25;
pub const AFIB_MIN_RR_MS: f64 = 350.0;
pub const AFIB_MAX_RR_MS: f64 = 1800.0;
pub const AFIB_T_SCALE: f64 = 0.22;
pub const VT_MIN_RATE_BPM: f64 = 170.0;
pub const VT_QRS_MS: f64 = 160.0;
pub const VT_MIN_QT_MS: f64 = 440.0;

// Injury current
pub const DEFAULT_ST_ELEVATION_MV: f64 = 0.25;
pub const STEMI_S_BLUNTING: f64 = 0.45;

// Memoization
pub const SAMPLE_CACHE_LIMIT: usize = 2000;

// Calibration pulse drawn on the zoomed strip
pub const CALIBRATION_PULSE_MS: f64 = 200.0;
pub const CALIBRATION_PULSE_MV: f64 = 1.0;
