use std::io::{self, Read, Write};

use bitflags::bitflags;
use ecow::EcoString;
use serde::{Deserialize, Serialize};
use tagwright_library::diag::SinkError;
use tagwright_library::html::{Attributes, Writer};

bitflags! {
    /// How a tag is rendered.
    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct TagFlags: u8 {
        /// The tag has no content and no closing tag, like `<br>`.
        const VOID = 1 << 0;
        /// No newlines are inserted around the content. Inline tags use this
        /// to sit right next to their neighbours.
        const NO_SPACE = 1 << 1;
        /// Attributes are sorted and, unless `NO_SPACE` is set, the content
        /// is indented.
        const FORMAT = 1 << 2;
    }
}

/// Inner markup of a tag, which is written into the tag on demand.
///
/// Content is already markup, so it is never escaped.
pub trait Content {
    /// Write the markup. Errors carry the count of the writer they occurred
    /// in.
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError>;
}

impl Content for str {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        w.write_str(self)
    }
}

impl Content for &str {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        w.write_str(self)
    }
}

impl Content for String {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        w.write_str(self)
    }
}

impl Content for EcoString {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        w.write_str(self)
    }
}

impl<C: Content + ?Sized> Content for &mut C {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        (**self).write_to(w)
    }
}

impl<C: Content + ?Sized> Content for Box<C> {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        (**self).write_to(w)
    }
}

/// Writes both contents, one after the other.
impl<A: Content, B: Content> Content for (A, B) {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        self.0.write_to(w)?;
        self.1.write_to(w)
    }
}

/// Writes all contents in order.
impl<C: Content> Content for Vec<C> {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        self.iter_mut().try_for_each(|content| content.write_to(w))
    }
}

/// Markup that is pulled from a reader while the tag is written.
///
/// A stream is drained by writing it, so it can only be written once. A
/// read error is reported as a [`SinkError`] at the current byte count.
pub struct Stream<R>(pub R);

impl<R: Read> Content for Stream<R> {
    fn write_to(&mut self, w: &mut Writer) -> Result<(), SinkError> {
        let mut buf = [0; 8 * 1024];
        loop {
            match self.0.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => w.write_bytes(&buf[..n])?,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(w.fail(err)),
            }
        }
    }
}

/// Writes a tag into a sink and returns the number of bytes written.
///
/// The tag is rendered as `<tag attrs>content</tag>`. Unless `NO_SPACE` is
/// set, the content is surrounded by newlines. `VOID` tags are rendered
/// without content and closing tag. With `FORMAT`, the attributes are
/// sorted and the content is buffered and indented before it is flushed.
///
/// On failure, the error holds the exact number of bytes the sink accepted.
pub fn write_tag(
    sink: &mut dyn Write,
    tag: &str,
    attrs: &Attributes,
    content: Option<&mut dyn Content>,
    flags: TagFlags,
) -> Result<usize, SinkError> {
    let mut w = Writer::new(sink);
    write_element(&mut w, tag, attrs, content, flags)?;
    Ok(w.written())
}

/// Writes a void tag like `<img src="x">`.
pub fn write_void_tag(
    sink: &mut dyn Write,
    tag: &str,
    attrs: &Attributes,
) -> Result<usize, SinkError> {
    write_tag(sink, tag, attrs, None, TagFlags::VOID)
}

/// Writes a tag with sorted attributes and indented content.
///
/// Do not use this for tags whose appearance changes with whitespace in
/// their content.
pub fn write_tag_formatted(
    sink: &mut dyn Write,
    tag: &str,
    attrs: &Attributes,
    content: Option<&mut dyn Content>,
) -> Result<usize, SinkError> {
    write_tag(sink, tag, attrs, content, TagFlags::FORMAT)
}

/// Writes a tag without newlines around its content.
pub fn write_tag_no_space(
    sink: &mut dyn Write,
    tag: &str,
    attrs: &Attributes,
    content: Option<&mut dyn Content>,
) -> Result<usize, SinkError> {
    write_tag(sink, tag, attrs, content, TagFlags::NO_SPACE)
}

/// Writes a tag with sorted attributes but without newlines around or
/// indentation in its content.
pub fn write_tag_no_space_formatted(
    sink: &mut dyn Write,
    tag: &str,
    attrs: &Attributes,
    content: Option<&mut dyn Content>,
) -> Result<usize, SinkError> {
    write_tag(sink, tag, attrs, content, TagFlags::NO_SPACE | TagFlags::FORMAT)
}

/// Renders a void tag into a string.
pub fn render_void_tag(tag: &str, attrs: &Attributes) -> String {
    render(tag, attrs, "", TagFlags::VOID)
}

/// Renders a tag into a string. The content must already be escaped.
///
/// The content is surrounded by newlines, which gives inline tags a space
/// to their neighbours. Use [`render_tag_no_space`] to avoid that.
pub fn render_tag(tag: &str, attrs: &Attributes, inner_html: &str) -> String {
    render(tag, attrs, inner_html, TagFlags::empty())
}

/// Renders a tag with sorted attributes and indented content.
pub fn render_tag_formatted(tag: &str, attrs: &Attributes, inner_html: &str) -> String {
    render(tag, attrs, inner_html, TagFlags::FORMAT)
}

/// Renders a tag that sits right next to its content.
pub fn render_tag_no_space(tag: &str, attrs: &Attributes, inner_html: &str) -> String {
    render(tag, attrs, inner_html, TagFlags::NO_SPACE)
}

/// Renders a tag with sorted attributes that sits right next to its content.
pub fn render_tag_no_space_formatted(
    tag: &str,
    attrs: &Attributes,
    inner_html: &str,
) -> String {
    render(tag, attrs, inner_html, TagFlags::NO_SPACE | TagFlags::FORMAT)
}

/// Renders into memory. Empty inner markup counts as no content.
fn render(tag: &str, attrs: &Attributes, mut inner_html: &str, flags: TagFlags) -> String {
    let content =
        (!inner_html.is_empty()).then_some(&mut inner_html as &mut dyn Content);
    render_with(|sink| write_tag(sink, tag, attrs, content, flags))
}

/// Runs a writing function against an in-memory buffer.
pub(crate) fn render_with(
    f: impl FnOnce(&mut dyn Write) -> Result<usize, SinkError>,
) -> String {
    let mut buf = Vec::new();
    f(&mut buf).expect("writing to memory cannot fail");
    String::from_utf8(buf).expect("rendered markup is valid UTF-8")
}

/// Encode one element into the writer.
pub(crate) fn write_element(
    w: &mut Writer,
    tag: &str,
    attrs: &Attributes,
    content: Option<&mut dyn Content>,
    flags: TagFlags,
) -> Result<(), SinkError> {
    w.write_str("<")?;
    w.write_str(tag)?;
    if !attrs.is_empty() {
        w.write_str(" ")?;
        attrs.write_to(w, flags.contains(TagFlags::FORMAT))?;
    }
    w.write_str(">")?;

    if flags.contains(TagFlags::VOID) {
        if content.is_some() {
            log::warn!("ignoring content of void tag <{tag}>");
        }
        return Ok(());
    }

    if let Some(content) = content {
        let spaced = !flags.contains(TagFlags::NO_SPACE);
        if flags.contains(TagFlags::FORMAT) {
            write_buffered(w, content, spaced)?;
        } else {
            write_content(w, content, spaced)?;
        }
    }

    w.write_str("</")?;
    w.write_str(tag)?;
    w.write_str(">")
}

/// Write content, optionally on lines of its own.
fn write_content(
    w: &mut Writer,
    content: &mut dyn Content,
    spaced: bool,
) -> Result<(), SinkError> {
    if spaced {
        w.write_str("\n")?;
    }
    content.write_to(w)?;
    if spaced {
        w.write_str("\n")?;
    }
    Ok(())
}

/// Drain the content into a buffer, indent it if it is spaced and flush it.
fn write_buffered(
    w: &mut Writer,
    content: &mut dyn Content,
    spaced: bool,
) -> Result<(), SinkError> {
    let mut buf = Vec::new();
    write_content(&mut Writer::new(&mut buf), content, spaced)
        .map_err(|err| err.at(w.written()))?;
    if spaced {
        w.write_str(&indent(&String::from_utf8_lossy(&buf)))
    } else {
        w.write_bytes(&buf)
    }
}

/// Indents every non-empty line by two spaces.
///
/// Everything from a `<textarea` up to its `</textarea>` is kept verbatim,
/// since indentation would change the value of the text area. If a text area
/// is not closed, the rest of the text is appended unmodified.
pub fn indent(text: &str) -> String {
    const OPEN: &str = "<textarea";
    const CLOSE: &str = "</textarea>";

    let mut out = String::with_capacity(text.len() + text.len() / 8);
    let mut rest = text;
    let mut line_start = true;
    while let Some(start) = rest.find(OPEN) {
        indent_lines(&mut out, &rest[..start], line_start);
        rest = &rest[start..];
        let Some(end) = rest.find(CLOSE) else {
            log::warn!("found an unclosed <textarea>, leaving the rest unindented");
            out.push_str(rest);
            return out;
        };
        let end = end + CLOSE.len();
        out.push_str(&rest[..end]);
        rest = &rest[end..];
        line_start = false;
    }
    indent_lines(&mut out, rest, line_start);
    out
}

/// Indent the lines of a text. The first line only counts as a line if the
/// text starts at the beginning of one.
fn indent_lines(out: &mut String, text: &str, line_start: bool) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() && (i > 0 || line_start) {
            out.push_str("  ");
        }
        out.push_str(line);
    }
}

/// Creates an HTML comment.
pub fn comment(text: &str) -> String {
    format!("<!-- {text} -->")
}
