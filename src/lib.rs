//! Explicitly managed handles over an embedded V8 engine.
//!
//! The ownership graph is `Instance -> Isolate -> {Script, Function, Value}`. Every handle owns
//! exactly one engine resource and releases it when dropped (or when `dispose` is called, which
//! consumes the handle). Borrows encode the teardown order: an [`Isolate`] borrows its
//! [`Instance`], and scripts, functions and values borrow the isolate they live in.
//!
//! ```no_run
//! use v8_embed::Instance;
//!
//! let instance = Instance::new()?;
//! let isolate = instance.new_isolate()?;
//! let script = isolate.compile("1 + 1", "main.js")?;
//! let value = script.run()?;
//! assert_eq!(value.coerce_number()?, 2.0);
//! # Ok::<(), v8_embed::EngineError>(())
//! ```
//!
//! Compile and run failures are reported as a single formatted message:
//!
//! ```text
//! main.js:1: Uncaught Error: x
//! throw new Error('x')
//! ^^^^^^^^^^^^^^^^^^^^
//! stack trace:
//! Error: x
//!     at main.js:1:7
//! ```

pub mod config;
pub mod engine;

pub use config::{EngineConfig, HeapLimits};
pub use engine::*;
