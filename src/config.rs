//! Configuration for the driver and the SQS client.

use crate::error::ConfigError;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Tuning for driver behavior
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Long-poll wait `dequeue_next` asks of the remote queue
    ///
    /// The SQS client clamps this to the 20 second maximum the service
    /// accepts.
    pub receive_wait: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            receive_wait: Duration::seconds(10),
        }
    }
}

impl DriverConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the long-poll wait for `dequeue_next`
    pub fn with_receive_wait(mut self, receive_wait: Duration) -> Self {
        self.receive_wait = receive_wait;
        self
    }
}

/// AWS SQS client configuration
///
/// The queue URL is fixed at configuration time; the client never resolves
/// queue names. Credentials are optional so the client can talk to local
/// emulators that accept unsigned requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SqsConfig {
    /// Full URL of the queue all operations target
    pub queue_url: String,

    /// AWS region the queue lives in
    pub region: String,

    /// Static access key id; both credential fields must be set for signing
    #[serde(default)]
    pub access_key_id: Option<String>,

    /// Static secret access key
    #[serde(default)]
    pub secret_access_key: Option<String>,

    /// Endpoint override for local emulators and test servers
    ///
    /// Defaults to the regional SQS endpoint when absent.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// HTTP timeout applied to each request
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

fn default_request_timeout_seconds() -> u64 {
    30
}

impl SqsConfig {
    /// Create a configuration for one queue
    pub fn new(queue_url: String, region: String) -> Self {
        Self {
            queue_url,
            region,
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }

    /// Set static signing credentials
    pub fn with_credentials(mut self, access_key_id: String, secret_access_key: String) -> Self {
        self.access_key_id = Some(access_key_id);
        self.secret_access_key = Some(secret_access_key);
        self
    }

    /// Point the client at a non-default endpoint
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_request_timeout_seconds(mut self, seconds: u64) -> Self {
        self.request_timeout_seconds = seconds;
        self
    }

    /// Read the configuration from environment variables
    ///
    /// `SQS_QUEUE_URL` and `AWS_REGION` are required.
    /// `AWS_ACCESS_KEY_ID`/`AWS_SECRET_ACCESS_KEY`, `SQS_ENDPOINT`, and
    /// `SQS_REQUEST_TIMEOUT_SECONDS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let queue_url = lookup("SQS_QUEUE_URL").ok_or_else(|| ConfigError::Missing {
            key: "SQS_QUEUE_URL".to_string(),
        })?;
        let region = lookup("AWS_REGION").ok_or_else(|| ConfigError::Missing {
            key: "AWS_REGION".to_string(),
        })?;

        let mut config = Self::new(queue_url, region);
        config.access_key_id = lookup("AWS_ACCESS_KEY_ID");
        config.secret_access_key = lookup("AWS_SECRET_ACCESS_KEY");
        config.endpoint = lookup("SQS_ENDPOINT");

        if let Some(raw) = lookup("SQS_REQUEST_TIMEOUT_SECONDS") {
            config.request_timeout_seconds = raw.parse().map_err(|_| ConfigError::Invalid {
                message: format!("SQS_REQUEST_TIMEOUT_SECONDS is not a number: '{}'", raw),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Endpoint the client should talk to
    pub fn endpoint_or_default(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://sqs.{}.amazonaws.com", self.region),
        }
    }

    /// Check the configuration for values the client cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region.is_empty() {
            return Err(ConfigError::Invalid {
                message: "region cannot be empty".to_string(),
            });
        }

        validate_http_url("queue_url", &self.queue_url)?;
        if let Some(endpoint) = &self.endpoint {
            validate_http_url("endpoint", endpoint)?;
        }

        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(ConfigError::Invalid {
                message: "access_key_id and secret_access_key must be set together".to_string(),
            });
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "request_timeout_seconds must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let parsed = url::Url::parse(value).map_err(|e| ConfigError::Invalid {
        message: format!("{} is not a valid URL: {}", field, e),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Invalid {
            message: format!("{} must use http or https", field),
        });
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::Invalid {
            message: format!("{} has no host", field),
        });
    }

    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
