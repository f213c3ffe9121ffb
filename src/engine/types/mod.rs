mod function;
mod value;

pub use function::*;
pub use value::*;
