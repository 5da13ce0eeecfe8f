//! HTML attributes, styles and tags.

mod attrs;
mod data;
mod style;
mod tag;
mod value;
mod writer;

pub use self::attrs::*;
pub use self::data::{to_camel, to_kebab};
pub use self::style::*;
pub use self::tag::is_void;
pub use self::value::*;
pub use self::writer::Writer;
