use super::*;
use std::error::Error as StdError;
use std::fmt;
use std::result::Result as StdResult;

pub type EngineResult<T> = StdResult<T, EngineError>;

/// An error originating from engine handle usage.
#[derive(Debug)]
pub enum EngineError {
    /// The source could not be compiled. Always carries a location and a source snippet.
    Compile(Diagnostic),
    /// An exception escaped while running a script or coercing a value.
    Runtime(Diagnostic),
    /// The isolate is already inside a scope on this thread.
    ///
    /// Isolates are not reentrant; this is reported instead of entering the isolate twice.
    IsolateBusy,
    /// The instance already has as many live isolates as its config allows.
    IsolateLimit {
        /// The configured `max_isolates`.
        limit: usize,
    },
    /// Neither `argv[0]` nor the current executable path could be determined.
    HostPathUnavailable,
    /// The engine configuration was rejected.
    InvalidConfig(String),
    /// A string passed to the engine exceeds its maximum string length.
    StringTooLong {
        /// Length of the rejected string, in bytes.
        len: usize,
    },
    /// A JavaScript value could not be converted to the expected type.
    FromJsConversionError {
        /// Name of the JavaScript type that could not be converted.
        from: &'static str,
        /// Name of the type that could not be created.
        to: &'static str,
    },
}

impl EngineError {
    /// The engine diagnostic behind a compile or run failure.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            EngineError::Compile(diagnostic) | EngineError::Runtime(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }

    pub fn is_compile(&self) -> bool {
        matches!(self, EngineError::Compile(_))
    }

    pub fn is_runtime(&self) -> bool {
        matches!(self, EngineError::Runtime(_))
    }

    pub(crate) fn from_js_conversion(from: &'static str, to: &'static str) -> EngineError {
        EngineError::FromJsConversionError { from, to }
    }
}

impl StdError for EngineError {}

impl fmt::Display for EngineError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EngineError::Compile(diagnostic) | EngineError::Runtime(diagnostic) => {
                fmt::Display::fmt(diagnostic, fmt)
            }
            EngineError::IsolateBusy => write!(fmt, "isolate is already in use on this thread"),
            EngineError::IsolateLimit { limit } => {
                write!(fmt, "isolate limit of {} reached", limit)
            }
            EngineError::HostPathUnavailable => {
                write!(fmt, "unable to determine the host executable path")
            }
            EngineError::InvalidConfig(reason) => write!(fmt, "invalid engine config: {}", reason),
            EngineError::StringTooLong { len } => {
                write!(fmt, "string of {} bytes exceeds the engine limit", len)
            }
            EngineError::FromJsConversionError { from, to } => {
                write!(fmt, "error converting JavaScript {} to {}", from, to)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_and_runtime_errors_display_the_diagnostic() {
        let diagnostic = Diagnostic {
            location: Some("main.js".to_owned()),
            line_number: 3,
            message: "unexpected token".to_owned(),
            wavy_underline: Some("   ^".to_owned()),
            stack_trace: None,
        };
        let expected = "main.js:3: unexpected token\n   ^";

        let compile = EngineError::Compile(diagnostic.clone());
        assert!(compile.is_compile());
        assert_eq!(expected, compile.to_string());

        let runtime = EngineError::Runtime(diagnostic.clone());
        assert!(runtime.is_runtime());
        assert_eq!(Some(&diagnostic), runtime.diagnostic());
        assert_eq!(expected, runtime.to_string());
    }

    #[test]
    fn other_errors_have_no_diagnostic() {
        assert!(EngineError::IsolateBusy.diagnostic().is_none());
        assert_eq!(
            "error converting JavaScript value to function",
            EngineError::from_js_conversion("value", "function").to_string()
        );
    }
}
