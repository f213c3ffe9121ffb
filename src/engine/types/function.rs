use crate::engine::*;
use log::trace;
use std::fmt;

/// A reference to a callable engine object.
///
/// Only the lifecycle is modeled here: a function handle is obtained with
/// [`Value::into_function`] and released by dropping it or calling [`Function::dispose`].
pub struct Function<'a> {
    isolate: &'a Isolate<'a>,
    handle: v8::Global<v8::Function>,
}

impl<'a> Function<'a> {
    pub(crate) fn new(isolate: &'a Isolate<'a>, handle: v8::Global<v8::Function>) -> Self {
        Self { isolate, handle }
    }

    /// The function's `name` property, empty for anonymous functions.
    pub fn name(&self) -> EngineResult<String> {
        self.isolate.scope(|scope| {
            let function = v8::Local::new(scope, &self.handle);
            Ok(function.get_name(scope).to_rust_string_lossy(scope))
        })
    }

    /// Releases the function reference.
    pub fn dispose(self) {
        drop(self)
    }
}

impl Drop for Function<'_> {
    fn drop(&mut self) {
        trace!("disposing function in isolate {}", self.isolate.id());
    }
}

impl fmt::Debug for Function<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<function>")
    }
}
