pub mod builder;
pub mod conversion;
pub mod definition;
pub mod document;

pub use builder::*;
pub use conversion::*;
pub use definition::*;
pub use document::*;
