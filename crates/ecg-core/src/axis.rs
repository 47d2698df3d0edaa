//! Mean electrical axis: degrees and the four clinical quadrants.

use std::str::FromStr;

/// Wrap an angle into `[-180, 180)`.
#[inline]
pub fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisMode {
    #[default]
    Normal,
    LeftDeviation,
    RightDeviation,
    Extreme,
}

impl AxisMode {
    pub const ALL: [AxisMode; 4] = [
        AxisMode::Normal,
        AxisMode::LeftDeviation,
        AxisMode::RightDeviation,
        AxisMode::Extreme,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AxisMode::Normal => "normal",
            AxisMode::LeftDeviation => "lad",
            AxisMode::RightDeviation => "rad",
            AxisMode::Extreme => "extreme",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisMode::Normal => "Normal Axis (0\u{b0} to +90\u{b0})",
            AxisMode::LeftDeviation => "Left Axis Deviation (0\u{b0} to \u{2212}90\u{b0})",
            AxisMode::RightDeviation => "Right Axis Deviation (+90\u{b0} to +180\u{b0})",
            AxisMode::Extreme => "Extreme Axis (\u{2212}90\u{b0} to \u{2212}180\u{b0})",
        }
    }

    /// Representative axis for the quadrant.
    pub fn degrees(self) -> f64 {
        match self {
            AxisMode::Normal => 60.0,
            AxisMode::LeftDeviation => -30.0,
            AxisMode::RightDeviation => 120.0,
            AxisMode::Extreme => -120.0,
        }
    }

    pub fn from_degrees(deg: f64) -> Self {
        let d = if (-180.0..=180.0).contains(&deg) { deg } else { wrap_degrees(deg) };
        if (0.0..=90.0).contains(&d) {
            AxisMode::Normal
        } else if (-90.0..0.0).contains(&d) {
            AxisMode::LeftDeviation
        } else if d > 90.0 && d <= 180.0 {
            AxisMode::RightDeviation
        } else {
            AxisMode::Extreme
        }
    }

    /// Quadrant from the net QRS polarity in leads I and aVF.
    pub fn from_quadrant(lead_i_positive: bool, avf_positive: bool) -> Self {
        match (lead_i_positive, avf_positive) {
            (true, true) => AxisMode::Normal,
            (true, false) => AxisMode::LeftDeviation,
            (false, true) => AxisMode::RightDeviation,
            (false, false) => AxisMode::Extreme,
        }
    }

    /// Net QRS polarity of (lead I, aVF) for this quadrant.
    pub fn quadrant(self) -> (bool, bool) {
        match self {
            AxisMode::Normal => (true, true),
            AxisMode::LeftDeviation => (true, false),
            AxisMode::RightDeviation => (false, true),
            AxisMode::Extreme => (false, false),
        }
    }

    pub fn next(self) -> Self {
        let i = AxisMode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        AxisMode::ALL[(i + 1) % AxisMode::ALL.len()]
    }
}

impl FromStr for AxisMode {
    type Err = std::convert::Infallible;

    /// Unknown names read as the normal axis.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "lad" => AxisMode::LeftDeviation,
            "rad" => AxisMode::RightDeviation,
            "extreme" => AxisMode::Extreme,
            _ => AxisMode::Normal,
        })
    }
}

/// Axis degrees and mode, always consistent with each other.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisState {
    degrees: f64,
    mode: AxisMode,
}

impl Default for AxisState {
    fn default() -> Self {
        Self::from_mode(AxisMode::Normal)
    }
}

impl AxisState {
    pub fn from_mode(mode: AxisMode) -> Self {
        Self {
            degrees: mode.degrees(),
            mode,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn mode(&self) -> AxisMode {
        self.mode
    }

    /// Returns true when the state changed.
    pub fn set_degrees(&mut self, deg: f64) -> bool {
        let clamped = if deg.is_finite() { deg.clamp(-180.0, 180.0) } else { 0.0 };
        if clamped == self.degrees {
            return false;
        }
        self.degrees = clamped;
        self.mode = AxisMode::from_degrees(clamped);
        true
    }

    pub fn set_mode(&mut self, mode: AxisMode) -> bool {
        if mode == self.mode {
            return false;
        }
        *self = Self::from_mode(mode);
        true
    }

    /// Axis of a wave component: P sits 10 degrees left of the QRS axis,
    /// T sits 20 degrees right.
    pub fn p_axis(&self) -> f64 {
        wrap_degrees(self.degrees - 10.0)
    }

    pub fn qrs_axis(&self) -> f64 {
        wrap_degrees(self.degrees)
    }

    pub fn t_axis(&self) -> f64 {
        wrap_degrees(self.degrees + 20.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_stays_in_range() {
        for i in -1000..1000 {
            let w = wrap_degrees(i as f64 * 1.7);
            assert!((-180.0..180.0).contains(&w), "{w}");
        }
        assert_eq!(wrap_degrees(60.0), 60.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
    }

    #[test]
    fn mode_and_degrees_round_trip() {
        for mode in AxisMode::ALL {
            assert_eq!(AxisMode::from_degrees(mode.degrees()), mode);
            assert_eq!(AxisMode::from_quadrant(mode.quadrant().0, mode.quadrant().1), mode);
        }
        assert_eq!(AxisMode::from_degrees(180.0), AxisMode::RightDeviation);
        assert_eq!(AxisMode::from_degrees(-180.0), AxisMode::Extreme);
    }

    #[test]
    fn unknown_mode_name_is_normal() {
        assert_eq!("sideways".parse::<AxisMode>(), Ok(AxisMode::Normal));
        assert_eq!("LAD".parse::<AxisMode>(), Ok(AxisMode::LeftDeviation));
    }
}
