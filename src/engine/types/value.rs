use crate::engine::*;
use log::trace;
use std::fmt;

/// The JavaScript type of a [`Value`], fixed when the value is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    BigInt,
    String,
    Symbol,
    /// A callable object. Arrays and functions are reported as their own kinds, not as `Object`.
    Function,
    Array,
    Promise,
    Object,
}

impl ValueKind {
    fn of(value: v8::Local<v8::Value>) -> Self {
        if value.is_undefined() {
            ValueKind::Undefined
        } else if value.is_null() {
            ValueKind::Null
        } else if value.is_boolean() {
            ValueKind::Boolean
        } else if value.is_number() {
            ValueKind::Number
        } else if value.is_big_int() {
            ValueKind::BigInt
        } else if value.is_string() {
            ValueKind::String
        } else if value.is_symbol() {
            ValueKind::Symbol
        } else if value.is_function() {
            ValueKind::Function
        } else if value.is_array() {
            ValueKind::Array
        } else if value.is_promise() {
            ValueKind::Promise
        } else {
            ValueKind::Object
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::BigInt => "bigint",
            ValueKind::String => "string",
            ValueKind::Symbol => "symbol",
            ValueKind::Function => "function",
            ValueKind::Array => "array",
            ValueKind::Promise => "promise",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An engine value owned by the host, typically the completion value of [`Script::run`].
///
/// A value borrows the isolate it lives in but not the script that produced it; scripts and
/// values may be dropped in any order. Values cannot be cloned: each one holds its own handle
/// and releases it exactly once.
pub struct Value<'a> {
    isolate: &'a Isolate<'a>,
    kind: ValueKind,
    handle: v8::Global<v8::Value>,
}

impl<'a> Value<'a> {
    pub(crate) fn from_v8_value(
        isolate: &'a Isolate<'a>,
        scope: &mut v8::HandleScope,
        value: v8::Local<v8::Value>,
    ) -> Self {
        Self {
            isolate,
            kind: ValueKind::of(value),
            handle: v8::Global::new(scope, value),
        }
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Returns the name of the type of value it is.
    pub fn type_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == ValueKind::Undefined
    }

    pub fn is_null(&self) -> bool {
        self.kind == ValueKind::Null
    }

    pub fn is_function(&self) -> bool {
        self.kind == ValueKind::Function
    }

    /// Coerces the value to a boolean, following JavaScript truthiness. Never throws.
    pub fn coerce_boolean(&self) -> EngineResult<bool> {
        self.isolate.scope(|scope| {
            let value = v8::Local::new(scope, &self.handle);
            Ok(value.boolean_value(scope))
        })
    }

    /// Coerces the value to a number, as the unary `+` operator does.
    ///
    /// Fails with [`EngineError::Runtime`] if the coercion throws, e.g. for symbols or objects
    /// whose `valueOf` throws.
    pub fn coerce_number(&self) -> EngineResult<f64> {
        self.isolate.try_catch(|scope| {
            let value = v8::Local::new(scope, &self.handle);
            value
                .number_value(scope)
                .ok_or_else(|| EngineError::Runtime(Diagnostic::capture(scope, true)))
        })
    }

    /// Coerces the value to a string, as `String(value)` does.
    pub fn coerce_string(&self) -> EngineResult<String> {
        self.isolate.try_catch(|scope| {
            let value = v8::Local::new(scope, &self.handle);
            match value.to_string(scope) {
                Some(string) => Ok(string.to_rust_string_lossy(scope)),
                None => Err(EngineError::Runtime(Diagnostic::capture(scope, true))),
            }
        })
    }

    /// Converts the value into a [`Function`] handle.
    ///
    /// Fails with [`EngineError::FromJsConversionError`] if the value is not callable; check
    /// [`Value::is_function`] first to keep the value in that case.
    pub fn into_function(self) -> EngineResult<Function<'a>> {
        let handle = self.isolate.scope(|scope| {
            let value = v8::Local::new(scope, &self.handle);
            let function = v8::Local::<v8::Function>::try_from(value)
                .map_err(|_| EngineError::from_js_conversion(self.type_name(), "function"))?;
            Ok(v8::Global::new(scope, function))
        })?;

        Ok(Function::new(self.isolate, handle))
    }

    /// Releases the value.
    pub fn dispose(self) {
        drop(self)
    }
}

impl Drop for Value<'_> {
    fn drop(&mut self) {
        trace!("disposing {} value in isolate {}", self.kind, self.isolate.id());
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{}>", self.kind)
    }
}
