use chrono::{DateTime, Utc};

/// Determine the `DateTime<Utc>` from the provided seconds since the epoch.
///
/// Returns `None` if the value is outside the range `chrono` can represent.
pub fn datetime_utc_from_epoch_secs(epoch_s: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(epoch_s, 0)
}

/// Deserialize a sequence of `i64` epoch seconds as a `Vec<DateTime<Utc>>`.
pub fn de_vec_epoch_s_as_datetime_utc<'de, D>(
    deserializer: D,
) -> Result<Vec<DateTime<Utc>>, D::Error>
where
    D: serde::de::Deserializer<'de>,
{
    let epochs: Vec<i64> = serde::de::Deserialize::deserialize(deserializer)?;
    epochs
        .into_iter()
        .map(|epoch_s| {
            datetime_utc_from_epoch_secs(epoch_s).ok_or_else(|| {
                serde::de::Error::custom(format!("epoch seconds out of range: {epoch_s}"))
            })
        })
        .collect()
}

/// Deserialize an optional value, treating an explicit JSON `null` the same as a missing field.
pub fn de_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::de::Deserializer<'de>,
    T: serde::de::Deserialize<'de> + Default,
{
    let value: Option<T> = serde::de::Deserialize::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(deserialize_with = "de_vec_epoch_s_as_datetime_utc")]
        timestamp: Vec<DateTime<Utc>>,
        #[serde(default, deserialize_with = "de_null_as_default")]
        close: Vec<Option<f64>>,
    }

    #[test]
    fn test_de_vec_epoch_s_as_datetime_utc() {
        let payload: Payload =
            serde_json::from_str(r#"{"timestamp":[1700000000,1700000900],"close":null}"#).unwrap();

        assert_eq!(payload.timestamp.len(), 2);
        assert_eq!(payload.timestamp[0].timestamp(), 1_700_000_000);
        assert_eq!(payload.timestamp[1].timestamp(), 1_700_000_900);
        assert!(payload.close.is_empty());
    }

    #[test]
    fn test_de_null_as_default_keeps_values() {
        let payload: Payload =
            serde_json::from_str(r#"{"timestamp":[],"close":[1.5,null,2.0]}"#).unwrap();

        assert_eq!(payload.close, vec![Some(1.5), None, Some(2.0)]);
    }
}
