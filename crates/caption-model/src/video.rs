//! Source video properties supplied by an external media prober.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rational frame rate such as `30000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRate {
    pub num: u32,
    pub den: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frame rate: {0}")]
pub struct FrameRateParseError(pub String);

impl FrameRate {
    pub fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    pub fn fps(&self) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        self.num as f64 / self.den as f64
    }
}

impl FromStr for FrameRate {
    type Err = FrameRateParseError;

    /// Accepts `num/den` or a plain integer rate.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || FrameRateParseError(s.to_string());
        let (num, den) = match s.trim().split_once('/') {
            Some((n, d)) => (n.trim(), d.trim()),
            None => (s.trim(), "1"),
        };
        let num: u32 = num.parse().map_err(|_| err())?;
        let den: u32 = den.parse().map_err(|_| err())?;
        if den == 0 {
            return Err(err());
        }
        Ok(FrameRate { num, den })
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl Serialize for FrameRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FrameRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Decoded properties of the source video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVideo {
    pub width: u32,
    pub height: u32,
    pub duration_secs: f64,
    /// Nominal (container) frame rate.
    #[serde(default)]
    pub frame_rate: Option<FrameRate>,
    /// Average frame rate over the stream.
    #[serde(default)]
    pub avg_frame_rate: Option<FrameRate>,
}

/// Nominal and average rates further apart than this mark a VFR source.
const VFR_THRESHOLD_FPS: f64 = 1.0;

impl SourceVideo {
    pub fn new(width: u32, height: u32, duration_secs: f64) -> Self {
        Self {
            width,
            height,
            duration_secs,
            frame_rate: None,
            avg_frame_rate: None,
        }
    }

    pub fn with_frame_rates(mut self, nominal: FrameRate, average: FrameRate) -> Self {
        self.frame_rate = Some(nominal);
        self.avg_frame_rate = Some(average);
        self
    }

    /// Whether the source looks variable-frame-rate.
    ///
    /// Unknown rates are treated as constant.
    pub fn is_variable_frame_rate(&self) -> bool {
        match (self.frame_rate, self.avg_frame_rate) {
            (Some(nominal), Some(average)) => {
                (nominal.fps() - average.fps()).abs() > VFR_THRESHOLD_FPS
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rational_and_integer() {
        let ntsc: FrameRate = "30000/1001".parse().unwrap();
        assert!((ntsc.fps() - 29.97).abs() < 0.01);

        let plain: FrameRate = "60".parse().unwrap();
        assert_eq!(plain, FrameRate::new(60, 1));

        assert!("30/0".parse::<FrameRate>().is_err());
        assert!("abc".parse::<FrameRate>().is_err());
    }

    #[test]
    fn test_vfr_detection() {
        let cfr = SourceVideo::new(1080, 1920, 10.0)
            .with_frame_rates(FrameRate::new(30, 1), FrameRate::new(30000, 1001));
        assert!(!cfr.is_variable_frame_rate());

        let vfr = SourceVideo::new(1080, 1920, 10.0)
            .with_frame_rates(FrameRate::new(60, 1), FrameRate::new(2400, 100));
        assert!(vfr.is_variable_frame_rate());

        assert!(!SourceVideo::new(1080, 1920, 10.0).is_variable_frame_rate());
    }

    #[test]
    fn test_serde_roundtrip_uses_strings() {
        let video = SourceVideo::new(1920, 1080, 3.5)
            .with_frame_rates(FrameRate::new(25, 1), FrameRate::new(25, 1));
        let json = serde_json::to_string(&video).unwrap();
        assert!(json.contains("\"25/1\""));
    }
}
