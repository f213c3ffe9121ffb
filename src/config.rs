use crate::engine::{EngineError, EngineResult};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MB: usize = 1024 * 1024;

/// Engine settings applied when an [`Instance`](crate::Instance) initializes the platform and
/// when it creates isolates.
///
/// ```json
/// {
///     "v8_flags": ["--use-strict"],
///     "platform_threads": 2,
///     "heap": { "initial_mb": 16, "max_mb": 256 },
///     "max_isolates": 8
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Command-line style flags handed to the engine before platform initialization.
    pub v8_flags: Vec<String>,
    /// Worker threads of the default platform. 0 lets the engine pick.
    pub platform_threads: u32,
    /// Per-isolate heap limits. `None` keeps the engine defaults.
    pub heap: Option<HeapLimits>,
    /// Upper bound on isolates alive at once per instance. `None` means unbounded.
    pub max_isolates: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeapLimits {
    pub initial_mb: usize,
    pub max_mb: usize,
}

impl EngineConfig {
    /// Reads a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if let Some(heap) = self.heap {
            if heap.max_mb == 0 {
                return Err(EngineError::InvalidConfig(
                    "heap.max_mb must be greater than 0".to_owned(),
                ));
            }
            if heap.initial_mb > heap.max_mb {
                return Err(EngineError::InvalidConfig(format!(
                    "heap.initial_mb ({}) exceeds heap.max_mb ({})",
                    heap.initial_mb, heap.max_mb
                )));
            }
            if heap.max_mb.checked_mul(MB).is_none() {
                return Err(EngineError::InvalidConfig(format!(
                    "heap.max_mb ({}) is too large",
                    heap.max_mb
                )));
            }
        }

        if self.max_isolates == Some(0) {
            return Err(EngineError::InvalidConfig(
                "max_isolates must be greater than 0".to_owned(),
            ));
        }

        if let Some(flag) = self.v8_flags.iter().find(|flag| !flag.starts_with("--")) {
            return Err(EngineError::InvalidConfig(format!(
                "v8 flag `{}` must start with `--`",
                flag
            )));
        }

        Ok(())
    }

    /// Flags joined the way the engine's flag parser expects them.
    pub(crate) fn flag_string(&self) -> String {
        self.v8_flags.join(" ")
    }

    // Only called on validated configs, so the byte counts fit in `usize`.
    pub(crate) fn create_params(&self) -> v8::CreateParams {
        let params = v8::CreateParams::default();
        match self.heap {
            Some(heap) => params.heap_limits(heap.initial_mb * MB, heap.max_mb * MB),
            None => params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_empty_object() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(EngineConfig::default(), config);
        assert!(config.validate().is_ok());
        assert_eq!("", config.flag_string());
    }

    #[test]
    fn parses_full_config() {
        let config: EngineConfig = serde_json::from_str(
            r#"{
                "v8_flags": ["--use-strict", "--stack-size=2048"],
                "platform_threads": 2,
                "heap": { "initial_mb": 16, "max_mb": 256 },
                "max_isolates": 4
            }"#,
        )
        .unwrap();

        assert_eq!(2, config.platform_threads);
        assert_eq!(
            Some(HeapLimits {
                initial_mb: 16,
                max_mb: 256
            }),
            config.heap
        );
        assert_eq!(Some(4), config.max_isolates);
        assert_eq!("--use-strict --stack-size=2048", config.flag_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_heap_limits() {
        let config = EngineConfig {
            heap: Some(HeapLimits {
                initial_mb: 512,
                max_mb: 64,
            }),
            ..Default::default()
        };
        match config.validate() {
            Err(EngineError::InvalidConfig(reason)) => assert!(reason.contains("initial_mb")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_heap_and_bare_flags() {
        let zero_heap = EngineConfig {
            heap: Some(HeapLimits {
                initial_mb: 0,
                max_mb: 0,
            }),
            ..Default::default()
        };
        assert!(zero_heap.validate().is_err());

        let huge_heap: EngineConfig =
            serde_json::from_str(r#"{"heap":{"initial_mb":0,"max_mb":18446744073709551615}}"#)
                .unwrap();
        match huge_heap.validate() {
            Err(EngineError::InvalidConfig(reason)) => assert!(reason.contains("too large")),
            other => panic!("unexpected result: {:?}", other),
        }

        let largest = usize::MAX / MB;
        let largest_heap = EngineConfig {
            heap: Some(HeapLimits {
                initial_mb: largest,
                max_mb: largest,
            }),
            ..Default::default()
        };
        assert!(largest_heap.validate().is_ok());
        let overflowing_heap = EngineConfig {
            heap: Some(HeapLimits {
                initial_mb: 1,
                max_mb: largest + 1,
            }),
            ..Default::default()
        };
        assert!(overflowing_heap.validate().is_err());

        let bare_flag = EngineConfig {
            v8_flags: vec!["use-strict".to_owned()],
            ..Default::default()
        };
        assert!(bare_flag.validate().is_err());

        let no_isolates = EngineConfig {
            max_isolates: Some(0),
            ..Default::default()
        };
        assert!(no_isolates.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = EngineConfig::load("/nonexistent/v8-embed.json").unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
