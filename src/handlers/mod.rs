pub mod diagnostics;
pub mod document;
pub mod health;

pub use diagnostics::*;
pub use document::*;
pub use health::*;
