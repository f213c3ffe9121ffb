use super::*;
use log::debug;
use std::fmt;

/// A compiled unit of source code, bound to the isolate that compiled it.
///
/// Obtained from [`Isolate::compile`]. Running it does not consume it: a script may be run any
/// number of times, and each successful run yields an independent [`Value`].
pub struct Script<'a> {
    isolate: &'a Isolate<'a>,
    location: String,
    handle: v8::Global<v8::Script>,
}

impl<'a> Script<'a> {
    pub(crate) fn new(
        isolate: &'a Isolate<'a>,
        location: &str,
        handle: v8::Global<v8::Script>,
    ) -> Self {
        Self {
            isolate,
            location: location.to_owned(),
            handle,
        }
    }

    /// The location name this script was compiled under.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Runs the script in its isolate's global context and returns the completion value.
    ///
    /// Global-scope effects are visible to later scripts in the same isolate. An uncaught
    /// exception is returned as [`EngineError::Runtime`], with the stack trace when the engine
    /// provides one. Blocks until the script returns; there is no timeout.
    pub fn run(&self) -> EngineResult<Value<'a>> {
        let isolate = self.isolate;
        isolate.try_catch(|scope| {
            let script = v8::Local::new(scope, &self.handle);
            match script.run(scope) {
                Some(result) => Ok(Value::from_v8_value(isolate, scope, result)),
                None => Err(EngineError::Runtime(Diagnostic::capture(scope, true))),
            }
        })
    }

    /// Releases the compiled unit. Values produced by earlier runs stay valid.
    pub fn dispose(self) {
        drop(self)
    }
}

impl Drop for Script<'_> {
    fn drop(&mut self) {
        debug!(
            "disposing script {} in isolate {}",
            self.location,
            self.isolate.id()
        );
    }
}

impl fmt::Debug for Script<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<script {}>", self.location)
    }
}
