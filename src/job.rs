//! Job identifiers and the framework's job envelope.

use crate::error::ValidationError;
use crate::message::MessageId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

/// Identifier the framework uses to address an in-flight job
///
/// For jobs obtained through `dequeue_next` this is the remote queue's
/// message id. Ids are opaque beyond equality, hashing, and ordering; the id
/// a caller passes to `store` lives in a separate space and never matches the
/// id the same message is later dequeued under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Create a job id from an existing string
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the job id as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<MessageId> for JobId {
    fn from(id: MessageId) -> Self {
        Self(id.into_string())
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "job_id".to_string(),
            });
        }

        Ok(Self(s.to_string()))
    }
}

/// Job envelope carried as the remote message body
///
/// Serializes to a single JSON object: the optional framework metadata fields
/// under their wire names, with the business payload flattened alongside
/// them. A bare business object with no metadata therefore decodes cleanly,
/// with every metadata field `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    /// Name of the job type the payload belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,

    /// When the job was placed on the queue
    #[serde(
        default,
        with = "epoch_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub queued_at: Option<DateTime<Utc>>,

    /// Earliest time the job should run
    #[serde(
        default,
        with = "epoch_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay_until: Option<DateTime<Utc>>,

    /// Retry budget granted by the enqueuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retry_count: Option<u32>,

    /// Deliveries so far, as counted by the enqueuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempts: Option<u32>,

    /// Business payload, opaque to the driver
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl JobData {
    /// Create an envelope holding only a business payload
    pub fn new(payload: Map<String, Value>) -> Self {
        Self {
            payload,
            ..Self::default()
        }
    }

    /// Create an envelope stamped as queued now
    ///
    /// The timestamp is truncated to whole seconds so the wire encoding
    /// decodes back to an equal value.
    pub fn enqueued(job_name: String, payload: Map<String, Value>) -> Self {
        Self {
            job_name: Some(job_name),
            queued_at: Some(truncate_to_seconds(Utc::now())),
            payload,
            ..Self::default()
        }
    }

    /// Set the retry budget
    pub fn with_max_retry_count(mut self, max_retry_count: u32) -> Self {
        self.max_retry_count = Some(max_retry_count);
        self
    }

    /// Set the delivery count
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = Some(attempts);
        self
    }

    /// Set the earliest run time, truncated to whole seconds
    pub fn with_delay_until(mut self, delay_until: DateTime<Utc>) -> Self {
        self.delay_until = Some(truncate_to_seconds(delay_until));
        self
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(dt.timestamp(), 0).unwrap_or(dt)
}

/// Serde codec for optional timestamps carried as numeric seconds since the
/// Unix epoch
///
/// Encoding writes whole seconds as an integer. Decoding accepts integer or
/// fractional values; producers of this envelope differ on which they emit.
pub(crate) mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(dt) => serializer.serialize_i64(dt.timestamp()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(OptionSecondsVisitor)
    }

    struct OptionSecondsVisitor;

    impl<'de> Visitor<'de> for OptionSecondsVisitor {
        type Value = Option<DateTime<Utc>>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("numeric seconds since the Unix epoch or null")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(SecondsVisitor).map(Some)
        }
    }

    struct SecondsVisitor;

    impl<'de> Visitor<'de> for SecondsVisitor {
        type Value = DateTime<Utc>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("numeric seconds since the Unix epoch")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            DateTime::from_timestamp(value, 0)
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", value)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = i64::try_from(value)
                .map_err(|_| E::custom(format!("timestamp out of range: {}", value)))?;
            self.visit_i64(value)
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !value.is_finite() {
                return Err(E::custom("timestamp must be finite"));
            }

            let mut secs = value.floor();
            let mut nanos = ((value - secs) * 1_000_000_000.0).round();
            if nanos >= 1_000_000_000.0 {
                secs += 1.0;
                nanos = 0.0;
            }

            DateTime::from_timestamp(secs as i64, nanos as u32)
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", value)))
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
