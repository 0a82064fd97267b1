use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::StanceError;

/// Fraction of maximum actuator speed used for a posture transition.
///
/// The service accepts values in `(0.0, 1.0]`. Zero is rejected because a
/// transition at zero speed never completes. The conventional default is
/// half speed.
///
/// # Example
///
/// ```
/// use stance_common::protocol::Speed;
///
/// assert_eq!(Speed::default().get(), 0.5);
/// assert!(Speed::new(1.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Speed(f32);

impl Speed {
    /// Half speed, the conventional pace for scripted transitions.
    pub const DEFAULT: Speed = Speed(0.5);

    /// Validates `value` as a speed fraction.
    ///
    /// Returns [`StanceError::InvalidSpeed`] unless `0.0 < value <= 1.0`.
    /// NaN fails the range check like any other out-of-range value.
    pub fn new(value: f32) -> std::result::Result<Self, StanceError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Speed(value))
        } else {
            Err(StanceError::InvalidSpeed(value))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for Speed {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let value: f32 = s
            .parse()
            .map_err(|_| format!("'{}' is not a number", s))?;
        Speed::new(value).map_err(|e| e.to_string())
    }
}

// Serialized as a bare JSON number so the wire stays `"speed": 0.5`, while
// decoding still enforces the range.
impl Serialize for Speed {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f32(self.0)
    }
}

impl<'de> Deserialize<'de> for Speed {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f32::deserialize(deserializer)?;
        Speed::new(value).map_err(serde::de::Error::custom)
    }
}
