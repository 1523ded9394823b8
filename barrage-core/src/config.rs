use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationSeconds};
use std::num::NonZeroUsize;
use std::time::Duration;
use thiserror::Error;

use crate::DEFAULT_CONCURRENCY;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No call given; expected a fully-qualified method name")]
    MissingCall,

    #[error("No host given")]
    MissingHost,

    #[error("Concurrency must be greater than zero")]
    ZeroConcurrency,
}

/// Settings for a single load-generation run.
///
/// Only a handful of these are echoed into the report (see [`Options`]); the rest are carried for
/// the caller pool driving the run.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub name: String,
    pub call: String,
    pub host: String,
    #[serde(default)]
    pub insecure: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_cpus")]
    pub cpus: usize,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde_as(as = "Option<DurationSeconds>")]
    pub duration: Option<Duration>,
}

impl RunConfig {
    pub fn new(call: &str, host: &str) -> Result<Self, ConfigError> {
        let config = Self {
            name: call.to_string(),
            call: call.to_string(),
            host: host.to_string(),
            insecure: false,
            binary: false,
            cpus: default_cpus(),
            concurrency: default_concurrency(),
            total: None,
            duration: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants `new` enforces. Useful after deserializing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.call.trim().is_empty() {
            return Err(ConfigError::MissingCall);
        }
        if self.host.trim().is_empty() {
            return Err(ConfigError::MissingHost);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    pub fn binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    pub fn cpus(mut self, cpus: usize) -> Self {
        self.cpus = cpus;
        self
    }

    pub fn concurrency(mut self, concurrency: NonZeroUsize) -> Self {
        self.concurrency = concurrency.get();
        self
    }

    pub fn total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// The snapshot of settings echoed verbatim into the report.
    pub fn options(&self) -> Options {
        Options {
            insecure: self.insecure,
            binary: self.binary,
            cpus: self.cpus,
        }
    }
}

/// Read-only configuration snapshot carried by a [`crate::Report`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    pub insecure: bool,
    pub binary: bool,
    #[serde(rename = "CPUs")]
    pub cpus: usize,
}

fn default_cpus() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_fills_defaults() {
        let config = RunConfig::new("helloworld.Greeter.SayHello", "localhost:50051").unwrap();
        assert_eq!(config.name, "helloworld.Greeter.SayHello");
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert!(config.cpus >= 1);
        assert!(!config.insecure);
        assert!(!config.binary);
    }

    #[test]
    fn new_rejects_missing_fields() {
        assert_eq!(RunConfig::new("", "host"), Err(ConfigError::MissingCall));
        assert_eq!(RunConfig::new("call", "  "), Err(ConfigError::MissingHost));
    }

    #[test]
    fn options_echo_config() {
        let config = RunConfig::new("call", "host")
            .unwrap()
            .insecure(true)
            .cpus(8);
        assert_eq!(
            config.options(),
            Options {
                insecure: true,
                binary: false,
                cpus: 8,
            }
        );
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: RunConfig = serde_json::from_str(
            r#"{"name":"smoke","call":"pkg.Svc.Call","host":"127.0.0.1:9000","duration":30}"#,
        )
        .unwrap();
        assert_eq!(config.duration, Some(Duration::from_secs(30)));
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.total, None);
        assert!(config.validate().is_ok());
    }
}
