pub mod types;

mod diagnostic;
mod error;
mod instance;
mod isolate;
mod script;
#[cfg(test)]
mod tests;

pub use diagnostic::*;
pub use error::*;
pub use instance::*;
pub use isolate::*;
pub use script::*;
pub use types::*;
