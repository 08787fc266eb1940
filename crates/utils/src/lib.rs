pub mod signature;
pub mod path;
pub mod errors;

pub use signature::*;
pub use path::*;
pub use errors::*;
