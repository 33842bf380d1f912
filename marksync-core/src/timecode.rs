//! Frame rates and frame-count timecodes

use crate::{Error, FrameIndex};
use std::fmt;
use std::str::FromStr;

/// Frames per second of a timeline or a source clip. Always finite and positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct FrameRate(f64);

impl FrameRate {
    /// Creates a frame rate, rejecting zero, negative and non-finite values
    pub fn new(fps: f64) -> Option<Self> {
        (fps.is_finite() && fps > 0.0).then_some(Self(fps))
    }

    /// Parses a project setting such as `"24"` or `"29.97 DF"`.
    ///
    /// Only the text before the first space is read, so any qualifier the
    /// host appends is ignored. Drop-frame rates are still counted as
    /// non-drop-frame.
    pub fn from_setting(value: &str) -> crate::Result<Self> {
        let numeric = value.split(' ').next().unwrap_or(value);
        numeric
            .parse()
            .map_err(|_| Error::InvalidFrameRate(value.to_string()))
    }

    /// Returns the rate as frames per second
    pub fn fps(self) -> f64 {
        self.0
    }
}

impl FromStr for FrameRate {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        s.trim()
            .parse::<f64>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| Error::InvalidFrameRate(s.to_string()))
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A frame position broken down into wall-clock units.
///
/// Displays as `HH:MM:SS`. The `frames` remainder is kept on the struct but
/// is not part of the displayed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub hours: u64,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u32,
}

impl Timecode {
    /// Converts a frame index at the given rate. Negative frames clamp to zero.
    pub fn from_frames(frame: FrameIndex, rate: FrameRate) -> Self {
        let total_seconds = (frame.max(0) as f64) / rate.fps();
        let hours = (total_seconds / 3600.0).floor() as u64;
        let minutes = (total_seconds.rem_euclid(3600.0) / 60.0).floor() as u8;
        let seconds = total_seconds.rem_euclid(60.0).floor() as u8;
        let fraction = total_seconds - total_seconds.floor();
        let frames = (fraction * rate.fps()).round() as u32;

        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fps(value: f64) -> FrameRate {
        FrameRate::new(value).unwrap()
    }

    #[test]
    fn test_one_second_in() {
        assert_eq!(Timecode::from_frames(24, fps(24.0)).to_string(), "00:00:01");
    }

    #[test]
    fn test_zero_frame() {
        assert_eq!(Timecode::from_frames(0, fps(25.0)).to_string(), "00:00:00");
    }

    #[test]
    fn test_hours_minutes_seconds() {
        // 25h 1m 1s at 24 fps
        let frame = (25 * 3600 + 61) * 24;
        let tc = Timecode::from_frames(frame, fps(24.0));
        assert_eq!(tc.hours, 25);
        assert_eq!(tc.minutes, 1);
        assert_eq!(tc.seconds, 1);
        assert_eq!(tc.to_string(), "25:01:01");
    }

    #[test]
    fn test_frames_remainder_not_displayed() {
        let tc = Timecode::from_frames(36, fps(24.0));
        assert_eq!(tc.frames, 12);
        assert_eq!(tc.to_string(), "00:00:01");
    }

    #[test]
    fn test_fractional_rate() {
        let tc = Timecode::from_frames(1439, fps(23.976));
        assert_eq!(tc.to_string(), "00:01:00");
    }

    #[test]
    fn test_negative_frame_clamps() {
        let tc = Timecode::from_frames(-10, fps(24.0));
        assert_eq!(tc.to_string(), "00:00:00");
    }

    #[test]
    fn test_rate_rejects_non_positive() {
        assert!(FrameRate::new(0.0).is_none());
        assert!(FrameRate::new(-24.0).is_none());
        assert!(FrameRate::new(f64::NAN).is_none());
        assert!("0".parse::<FrameRate>().is_err());
        assert!("abc".parse::<FrameRate>().is_err());
        assert!("".parse::<FrameRate>().is_err());
    }

    #[test]
    fn test_rate_parses_property_value() {
        assert_eq!(" 25 ".parse::<FrameRate>().unwrap().fps(), 25.0);
        assert_eq!("23.976".parse::<FrameRate>().unwrap().fps(), 23.976);
    }

    #[test]
    fn test_setting_with_qualifier() {
        assert_eq!(FrameRate::from_setting("29.97 DF").unwrap().fps(), 29.97);
        assert_eq!(FrameRate::from_setting("24").unwrap().fps(), 24.0);
        assert!(FrameRate::from_setting(" 24").is_err());
        assert!(FrameRate::from_setting("DF 24").is_err());
    }
}
