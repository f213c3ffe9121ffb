use std::fmt;

/// A compile- or run-time failure reported by the engine.
///
/// Records are captured inside the try-catch scope of the failing call and never outlive it as
/// engine objects; what leaves the call is this plain copy, usually already wrapped in an
/// [`EngineError`](super::EngineError).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diagnostic {
    /// Logical name of the source unit (the location name passed to `compile`). `None` for bare
    /// system errors, which are printed as the message alone.
    pub location: Option<String>,
    /// 1-based line of the failure, 0 when the engine did not report one.
    pub line_number: usize,
    pub message: String,
    /// The offending source line followed by a caret marker beneath the failing columns.
    pub wavy_underline: Option<String>,
    pub stack_trace: Option<String>,
}

impl Diagnostic {
    /// A diagnostic without a source location, printed as `message` alone.
    pub fn bare(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Builds the snippet shown beneath a located error: the source line, a newline, then one `^`
    /// per character in `start..end` (at least one). Columns are UTF-16 offsets, as the engine
    /// reports them. Tabs in the prefix are kept so the marker stays aligned in terminals.
    pub fn underline(source_line: &str, start_column: usize, end_column: usize) -> String {
        let mut chars = source_line.chars();
        let mut column = 0;

        let mut padding = String::new();
        while column < start_column {
            let c = chars.next().unwrap_or(' ');
            padding.push(if c == '\t' { '\t' } else { ' ' });
            column += c.len_utf16();
        }

        let mut width = 0;
        while column < end_column {
            column += chars.next().map_or(1, char::len_utf16);
            width += 1;
        }

        format!("{}\n{}{}", source_line, padding, "^".repeat(width.max(1)))
    }

    /// Captures the pending exception of `scope`.
    ///
    /// `with_stack` controls whether the exception's `stack` property is recorded; compile
    /// failures leave it out.
    pub(crate) fn capture(scope: &mut v8::TryCatch<v8::HandleScope>, with_stack: bool) -> Self {
        if scope.has_terminated() {
            return Self::bare("execution terminated");
        }

        let exception = scope.exception();
        let message = match scope.message() {
            Some(message) => message,
            None => {
                return Self::bare(match exception {
                    Some(exception) => exception.to_rust_string_lossy(scope),
                    None => "unknown engine error".to_owned(),
                })
            }
        };

        let location = message
            .get_script_resource_name(scope)
            .filter(|name| !name.is_null_or_undefined())
            .map(|name| name.to_rust_string_lossy(scope));
        let line_number = message.get_line_number(scope).unwrap_or(0);
        let text = message.get(scope).to_rust_string_lossy(scope);
        let wavy_underline = message.get_source_line(scope).map(|line| {
            let line = line.to_rust_string_lossy(scope);
            Self::underline(&line, message.get_start_column(), message.get_end_column())
        });
        let stack_trace = if with_stack {
            scope
                .stack_trace()
                .filter(|stack| stack.is_string())
                .map(|stack| stack.to_rust_string_lossy(scope))
        } else {
            None
        };

        Self {
            location,
            line_number,
            message: text,
            wavy_underline,
            stack_trace,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = match &self.location {
            Some(location) => location,
            None => return f.write_str(&self.message),
        };

        write!(
            f,
            "{}:{}: {}\n{}",
            location,
            self.line_number,
            self.message,
            self.wavy_underline.as_deref().unwrap_or_default()
        )?;

        if let Some(stack_trace) = &self.stack_trace {
            write!(f, "\nstack trace:\n{}", stack_trace)?;
        }

        Ok(())
    }
}
