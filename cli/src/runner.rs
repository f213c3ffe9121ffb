use anyhow::{Context, Result};
use std::path::Path;
use v8_embed::{EngineResult, Isolate};

/// One unit of source handed to the isolate, with the location name shown in diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub location: String,
    pub source: String,
}

impl SourceUnit {
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Self {
            location: path.display().to_string(),
            source,
        })
    }

    pub fn inline(index: usize, source: String) -> Self {
        Self {
            location: format!("<eval:{}>", index),
            source,
        }
    }
}

/// Compiles and runs `source`, returning the printable completion value. `undefined` results
/// print nothing.
pub fn evaluate(isolate: &Isolate, source: &str, location: &str) -> EngineResult<Option<String>> {
    let script = isolate.compile(source, location)?;
    let value = script.run()?;
    if value.is_undefined() {
        return Ok(None);
    }

    value.coerce_string().map(Some)
}
