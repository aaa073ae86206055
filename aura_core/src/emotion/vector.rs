use std::fmt::{self, Display};
use std::str::FromStr;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// One axis of the emotional profile.
///
/// The declaration order is the radar axis order and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    Fear,
    Desire,
    Calm,
    Mystery,
    Connection,
    Transformation,
}

impl Dimension {
    pub const COUNT: usize = 6;

    /// All dimensions in axis order.
    pub const ALL: [Dimension; Dimension::COUNT] = [
        Dimension::Fear,
        Dimension::Desire,
        Dimension::Calm,
        Dimension::Mystery,
        Dimension::Connection,
        Dimension::Transformation,
    ];

    pub fn index(self) -> usize {
        match self {
            Dimension::Fear => 0,
            Dimension::Desire => 1,
            Dimension::Calm => 2,
            Dimension::Mystery => 3,
            Dimension::Connection => 4,
            Dimension::Transformation => 5,
        }
    }

    /// Display name, also used as the JSON key.
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Fear => "Fear",
            Dimension::Desire => "Desire",
            Dimension::Calm => "Calm",
            Dimension::Mystery => "Mystery",
            Dimension::Connection => "Connection",
            Dimension::Transformation => "Transformation",
        }
    }

    /// Colour used for this dimension on the aura spectrum bar.
    pub fn spectrum_rgb(self) -> [u8; 3] {
        match self {
            Dimension::Fear => [0x1f, 0x3b, 0x73],
            Dimension::Desire => [0xe7, 0x54, 0x80],
            Dimension::Calm => [0x7f, 0xc8, 0xf8],
            Dimension::Mystery => [0x6a, 0x4c, 0x93],
            Dimension::Connection => [0xf4, 0xa2, 0x61],
            Dimension::Transformation => [0xf6, 0xe0, 0x5e],
        }
    }
}

impl Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .iter()
            .copied()
            .find(|dimension| dimension.name().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| format!("unknown emotion dimension '{value}'"))
    }
}

/// Errors raised when building an [`EmotionVector`] from untrusted values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EmotionRangeError {
    #[error("emotion {dimension} is not a finite number")]
    NotFinite { dimension: Dimension },
    #[error("emotion {dimension} = {value} lies outside [0, 1]")]
    OutOfRange { dimension: Dimension, value: f32 },
}

/// Six-dimensional emotional intensity profile.
///
/// Every value lies in `[0.0, 1.0]` and the dimensions always appear in
/// [`Dimension::ALL`] order.
///
/// # Examples
///
/// ```
/// use aura_core::{Dimension, EmotionVector};
///
/// let vector = EmotionVector::new([0.9, 0.1, 0.4, 0.3, 0.2, 0.6]).unwrap();
/// assert_eq!(vector.get(Dimension::Fear), 0.9);
/// assert_eq!(vector.ranked()[0].0, Dimension::Fear);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionVector {
    values: [f32; Dimension::COUNT],
}

impl EmotionVector {
    /// Neutral baseline returned for empty input and for a zero-range
    /// (signal-free) score vector.
    pub const NEUTRAL: EmotionVector = EmotionVector {
        values: [0.2; Dimension::COUNT],
    };

    /// Builds a vector, rejecting NaN and values outside `[0, 1]`.
    pub fn new(values: [f32; Dimension::COUNT]) -> Result<Self, EmotionRangeError> {
        for dimension in Dimension::ALL {
            let value = values[dimension.index()];
            if !value.is_finite() {
                return Err(EmotionRangeError::NotFinite { dimension });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(EmotionRangeError::OutOfRange { dimension, value });
            }
        }
        Ok(Self { values })
    }

    /// Builds a vector by clamping every value into `[0, 1]`; NaN becomes 0.
    pub fn clamped(values: [f32; Dimension::COUNT]) -> Self {
        let mut out = [0.0f32; Dimension::COUNT];
        for (slot, value) in out.iter_mut().zip(values) {
            *slot = if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
        Self { values: out }
    }

    pub fn get(&self, dimension: Dimension) -> f32 {
        self.values[dimension.index()]
    }

    pub fn values(&self) -> [f32; Dimension::COUNT] {
        self.values
    }

    /// Iterates `(dimension, value)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, f32)> + '_ {
        Dimension::ALL
            .iter()
            .map(move |dimension| (*dimension, self.values[dimension.index()]))
    }

    pub fn total(&self) -> f32 {
        self.values.iter().sum()
    }

    /// Dimensions sorted by descending value; ties keep axis order.
    pub fn ranked(&self) -> Vec<(Dimension, f32)> {
        let mut ranked: Vec<(Dimension, f32)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    pub fn dominant(&self) -> Dimension {
        self.ranked()
            .first()
            .map(|(dimension, _)| *dimension)
            .unwrap_or(Dimension::Fear)
    }
}

impl Default for EmotionVector {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl Display for EmotionVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(dimension, value)| format!("{}={:.3}", dimension.name(), value))
            .collect();
        write!(f, "EmotionVector({})", parts.join(", "))
    }
}

impl Serialize for EmotionVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Dimension::COUNT))?;
        for (dimension, value) in self.iter() {
            map.serialize_entry(dimension.name(), &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EmotionVector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EmotionVisitor;

        impl<'de> Visitor<'de> for EmotionVisitor {
            type Value = EmotionVector;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object with the six emotion dimensions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut values: [Option<f32>; Dimension::COUNT] = [None; Dimension::COUNT];
                while let Some(key) = access.next_key::<String>()? {
                    match Dimension::from_str(&key) {
                        Ok(dimension) => values[dimension.index()] = Some(access.next_value()?),
                        Err(_) => {
                            access.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }

                let mut out = [0.0f32; Dimension::COUNT];
                for dimension in Dimension::ALL {
                    out[dimension.index()] = values[dimension.index()]
                        .ok_or_else(|| de::Error::missing_field(dimension.name()))?;
                }
                EmotionVector::new(out).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_map(EmotionVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_order_is_fixed() {
        let names: Vec<&str> = Dimension::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(
            names,
            ["Fear", "Desire", "Calm", "Mystery", "Connection", "Transformation"]
        );
        for (idx, dimension) in Dimension::ALL.iter().enumerate() {
            assert_eq!(dimension.index(), idx);
        }
    }

    #[test]
    fn new_rejects_out_of_range_values() {
        let err = EmotionVector::new([0.1, 1.2, 0.0, 0.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            EmotionRangeError::OutOfRange {
                dimension: Dimension::Desire,
                ..
            }
        ));
        assert!(EmotionVector::new([f32::NAN, 0.0, 0.0, 0.0, 0.0, 0.0]).is_err());
    }

    #[test]
    fn clamped_scrubs_invalid_values() {
        let vector = EmotionVector::clamped([-0.5, 1.5, f32::NAN, 0.3, 0.0, 1.0]);
        assert_eq!(vector.values(), [0.0, 1.0, 0.0, 0.3, 0.0, 1.0]);
    }

    #[test]
    fn ranked_breaks_ties_by_axis_order() {
        let vector = EmotionVector::new([0.5, 0.9, 0.5, 0.1, 0.9, 0.0]).unwrap();
        let order: Vec<Dimension> = vector.ranked().into_iter().map(|(d, _)| d).collect();
        assert_eq!(
            order,
            vec![
                Dimension::Desire,
                Dimension::Connection,
                Dimension::Fear,
                Dimension::Calm,
                Dimension::Mystery,
                Dimension::Transformation,
            ]
        );
    }

    #[test]
    fn serializes_as_ordered_object() {
        let vector = EmotionVector::new([0.25, 0.5, 0.0, 1.0, 0.75, 0.125]).unwrap();
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(
            json,
            r#"{"Fear":0.25,"Desire":0.5,"Calm":0.0,"Mystery":1.0,"Connection":0.75,"Transformation":0.125}"#
        );
    }

    #[test]
    fn deserialize_requires_every_dimension() {
        let missing = r#"{"Fear":0.2,"Desire":0.5,"Calm":0.1,"Mystery":0.4,"Connection":0.3}"#;
        let err = serde_json::from_str::<EmotionVector>(missing).unwrap_err();
        assert!(err.to_string().contains("Transformation"));

        let extra = r#"{"Fear":0.2,"Desire":0.5,"Calm":0.1,"Mystery":0.4,"Connection":0.3,"Transformation":0.9,"Joy":1.0}"#;
        let vector: EmotionVector = serde_json::from_str(extra).unwrap();
        assert_eq!(vector.get(Dimension::Transformation), 0.9);
    }
}
