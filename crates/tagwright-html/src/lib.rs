//! Tagwright's HTML tag writer.
//!
//! Tags are written into any [`std::io::Write`] sink. Every writing function
//! returns the number of bytes written, and on failure reports exactly how
//! many bytes made it into the sink before the error. The `render_*`
//! variants produce strings instead.

mod builder;
mod encode;
mod label;

pub use self::builder::TagBuilder;
pub use self::encode::{
    comment, indent, render_tag, render_tag_formatted, render_tag_no_space,
    render_tag_no_space_formatted, render_void_tag, write_tag, write_tag_formatted,
    write_tag_no_space, write_tag_no_space_formatted, write_void_tag, Content, Stream,
    TagFlags,
};
pub use self::label::{render_image, render_label, write_image, write_label, LabelMode};

pub use tagwright_library::diag::{SinkError, StrResult, ValidationError};
pub use tagwright_library::html::{Attributes, Style, FALSE_VALUE};
