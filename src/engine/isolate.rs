use super::*;
use log::debug;
use std::cell::RefCell;
use std::fmt;

/// Identifies an isolate in log output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IsolateId(pub String);

impl IsolateId {
    fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for IsolateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An isolated heap with one global context.
///
/// Created by [`Instance::new_isolate`]. Scripts compiled here borrow the isolate, so it cannot
/// be dropped while any of them (or any value or function obtained from them) is alive. Scripts
/// run in the same isolate share its global scope.
///
/// An isolate is confined to the thread that created it. It is only entered on that thread for
/// the duration of a call, so several isolates on one thread can be used and dropped in any order.
///
/// A script cannot outlive its isolate:
///
/// ```compile_fail
/// let instance = v8_embed::Instance::new().unwrap();
/// let script = {
///     let isolate = instance.new_isolate().unwrap();
///     isolate.compile("1 + 1", "main.js").unwrap()
/// };
/// ```
pub struct Isolate<'i> {
    instance: &'i Instance,
    id: IsolateId,
    // declared before `handle` so the context is released while the isolate is still alive
    context: v8::Global<v8::Context>,
    handle: RefCell<v8::OwnedIsolate>,
}

impl<'i> Isolate<'i> {
    pub(crate) fn new(instance: &'i Instance, params: v8::CreateParams) -> Self {
        let mut isolate = v8::Isolate::new(params);
        let context = {
            let scope = &mut v8::HandleScope::new(&mut isolate);
            let context = v8::Context::new(scope);
            v8::Global::new(scope, context)
        };
        // the engine enters a new isolate for the lifetime of the handle; leave it so that it is
        // only current while a scope is open
        unsafe { isolate.exit() };

        Self {
            instance,
            id: IsolateId::generate(),
            context,
            handle: RefCell::new(isolate),
        }
    }

    pub fn id(&self) -> &IsolateId {
        &self.id
    }

    /// Compiles `source` without running it.
    ///
    /// `location` names the source unit in diagnostics and stack traces, e.g. a file path. A
    /// syntax error is returned as [`EngineError::Compile`]; the isolate stays usable afterwards.
    pub fn compile(&self, source: &str, location: &str) -> EngineResult<Script<'_>> {
        let handle = self.try_catch(|scope| {
            let code = create_string(scope, source)?;
            let name = create_string(scope, location)?.into();
            let source_map_url = create_string(scope, "")?.into();
            let origin = v8::ScriptOrigin::new(
                scope,
                name,
                0,
                0,
                false,
                0,
                source_map_url,
                false,
                false,
                false,
            );

            match v8::Script::compile(scope, code, Some(&origin)) {
                Some(script) => Ok(v8::Global::new(scope, script)),
                None => Err(EngineError::Compile(Diagnostic::capture(scope, false))),
            }
        })?;

        debug!("compiled {} in isolate {}", location, self.id);
        Ok(Script::new(self, location, handle))
    }

    /// Releases the isolate. All scripts, functions and values from it must already be gone,
    /// which the borrow checker guarantees.
    pub fn dispose(self) {
        drop(self)
    }

    // Opens a handle scope in the isolate's global context. Nesting calls to this or
    // `Isolate::try_catch` fails with `EngineError::IsolateBusy`.
    pub(crate) fn scope<F, T>(&self, func: F) -> EngineResult<T>
    where
        F: FnOnce(&mut v8::ContextScope<v8::HandleScope>) -> EngineResult<T>,
    {
        let mut isolate = self
            .handle
            .try_borrow_mut()
            .map_err(|_| EngineError::IsolateBusy)?;
        // declared before the scopes so it exits after they are closed
        let _entered = unsafe { Entered::new(&mut isolate) };
        let scope = &mut v8::HandleScope::new(&mut *isolate);
        let context = v8::Local::new(scope, &self.context);
        let scope = &mut v8::ContextScope::new(scope, context);
        func(scope)
    }

    // Opens a try-catch scope in the isolate's global context. Any exception is confined to the
    // scope and gone once `func` returns.
    pub(crate) fn try_catch<F, T>(&self, func: F) -> EngineResult<T>
    where
        F: FnOnce(&mut v8::TryCatch<v8::HandleScope>) -> EngineResult<T>,
    {
        self.scope(|scope| func(&mut v8::TryCatch::new(scope)))
    }
}

impl Drop for Isolate<'_> {
    fn drop(&mut self) {
        // `OwnedIsolate` exits the isolate before disposing it, which has to pair with an enter
        unsafe { self.handle.get_mut().enter() };
        self.instance.release_isolate();
        debug!(
            "disposing isolate {} ({} live)",
            self.id,
            self.instance.live_isolates()
        );
    }
}

impl fmt::Debug for Isolate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Isolate").field("id", &self.id).finish()
    }
}

// Keeps an isolate entered on the current thread until dropped.
struct Entered(*mut v8::Isolate);

impl Entered {
    // Safety: the isolate must outlive the guard, and guards must be dropped in reverse order of
    // creation.
    unsafe fn new(isolate: &mut v8::Isolate) -> Self {
        isolate.enter();
        Self(isolate)
    }
}

impl Drop for Entered {
    fn drop(&mut self) {
        unsafe { (*self.0).exit() }
    }
}

pub(crate) fn create_string<'s>(
    scope: &mut v8::HandleScope<'s>,
    value: &str,
) -> EngineResult<v8::Local<'s, v8::String>> {
    v8::String::new(scope, value).ok_or(EngineError::StringTooLong { len: value.len() })
}
