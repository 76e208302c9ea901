pub mod attendance;
pub mod fee;
pub mod session;
pub mod student;
pub mod test_score;

use serde::{Deserialize, Deserializer};

/// Remote records sometimes carry `null` where a value is expected; treat it
/// like a missing field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
