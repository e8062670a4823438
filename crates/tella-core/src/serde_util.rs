use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` like a missing field.
///
/// The backend serializes optional pydantic fields as `null`, which
/// `#[serde(default)]` alone would reject for non-`Option` targets.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
