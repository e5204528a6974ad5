//! Deserializers that read JSON `null` numbers as NaN.
//!
//! JSON has no literal for NaN or infinity, so a producer that computed one
//! emits `null` instead. Those values are neutralized at display time rather
//! than rejected here.

use serde::{Deserialize, Deserializer};

pub(crate) fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

pub(crate) fn samples<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Option<f32>>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
}

pub(crate) fn grid<'de, D>(deserializer: D) -> Result<Vec<Vec<f32>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Vec<Option<f32>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
        .collect())
}
