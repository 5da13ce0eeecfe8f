use std::fmt::{self, Display, Formatter};

use ecow::EcoString;
use tagwright_library::html::{is_void, Attributes};
use tagwright_utils::escape_text;

use crate::encode::{render_tag, render_void_tag};

/// Builds a tag piece by piece.
///
/// This is a convenience for markup that is known to be valid: invalid
/// attributes make it panic. Use [`Attributes`] and
/// [`write_tag`](crate::write_tag) directly to handle errors.
///
/// ```
/// # use tagwright_html::TagBuilder;
/// let html = TagBuilder::new().tag("div").id("main").inner_text("1 < 2").render();
/// assert_eq!(html, "<div id=\"main\">\n1 &lt; 2\n</div>");
/// ```
#[derive(Debug, Default, Clone)]
pub struct TagBuilder {
    tag: EcoString,
    attrs: Attributes,
    inner_html: EcoString,
    void: bool,
}

impl TagBuilder {
    /// Start with no tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tag name. Void tags like `img` are detected automatically.
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = tag.into();
        self.void = is_void(tag);
        self
    }

    /// Set an attribute.
    ///
    /// # Panics
    /// If the attribute is rejected by [`Attributes::set`].
    #[track_caller]
    pub fn set(mut self, name: &str, value: &str) -> Self {
        if let Err(err) = self.attrs.set(name, value) {
            panic!("cannot set attribute {name:?} to {value:?}: {err}");
        }
        self
    }

    /// Set the `id` attribute.
    #[track_caller]
    pub fn id(self, id: &str) -> Self {
        self.set("id", id)
    }

    /// Set the class list. Like with [`Attributes::set_class`], a `+ ` prefix
    /// adds classes and a `- ` prefix removes them.
    pub fn class(mut self, class: &str) -> Self {
        self.attrs.set_class(class);
        self
    }

    /// Turn this into an `a` tag pointing to the destination.
    #[track_caller]
    pub fn link(self, href: &str) -> Self {
        self.tag("a").set("href", href)
    }

    /// Render a void tag regardless of the tag name.
    pub fn void(mut self) -> Self {
        self.void = true;
        self
    }

    /// Set the content, which is not escaped.
    pub fn inner_html(mut self, html: &str) -> Self {
        self.inner_html = html.into();
        self
    }

    /// Set the content to escaped text.
    pub fn inner_text(mut self, text: &str) -> Self {
        self.inner_html = escape_text(text).into();
        self
    }

    /// Render the tag.
    ///
    /// # Panics
    /// If no tag name was set.
    #[track_caller]
    pub fn render(&self) -> String {
        assert!(!self.tag.is_empty(), "cannot render a tag builder without a tag");
        if self.void {
            render_void_tag(&self.tag, &self.attrs)
        } else {
            render_tag(&self.tag, &self.attrs, &self.inner_html)
        }
    }
}

impl Display for TagBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
