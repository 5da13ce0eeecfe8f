use std::io::Write;

use serde::{Deserialize, Serialize};
use tagwright_library::diag::SinkError;
use tagwright_library::html::{Attributes, Writer};
use tagwright_utils::escape_text;

use crate::encode::{render_with, write_element, write_tag, Content, TagFlags};

/// Where a label goes relative to its control.
///
/// CSS frameworks tend to expect one particular arrangement.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelMode {
    /// `<label>Text</label> <input>`
    Before,
    /// `<input> <label>Text</label>`
    After,
    /// The label wraps the control, with the text in front of it.
    WrapBefore,
    /// The label wraps the control, with the text after it.
    WrapAfter,
}

/// Writes a label together with the markup of its control. The label text
/// is escaped, the control markup is not.
pub fn write_label(
    sink: &mut dyn Write,
    attrs: &Attributes,
    label: &str,
    control: &mut dyn Content,
    mode: LabelMode,
) -> Result<usize, SinkError> {
    let mut w = Writer::new(sink);
    let text = escape_text(label);
    match mode {
        LabelMode::Before => {
            write_element(&mut w, "label", attrs, Some(&mut text.as_str()), TagFlags::NO_SPACE)?;
            w.write_str(" ")?;
            control.write_to(&mut w)?;
        }
        LabelMode::After => {
            control.write_to(&mut w)?;
            w.write_str(" ")?;
            write_element(&mut w, "label", attrs, Some(&mut text.as_str()), TagFlags::NO_SPACE)?;
        }
        LabelMode::WrapBefore => {
            let mut inner = (format!("{text} "), control);
            write_element(&mut w, "label", attrs, Some(&mut inner), TagFlags::empty())?;
        }
        LabelMode::WrapAfter => {
            let mut inner = (control, format!(" {text}"));
            write_element(&mut w, "label", attrs, Some(&mut inner), TagFlags::empty())?;
        }
    }
    Ok(w.written())
}

/// Renders a label together with the markup of its control.
pub fn render_label(
    attrs: &Attributes,
    label: &str,
    mut control: &str,
    mode: LabelMode,
) -> String {
    render_with(|sink| write_label(sink, attrs, label, &mut control, mode))
}

/// Writes an `img` tag. The source and alternate text are added to a copy of
/// the attributes.
pub fn write_image(
    sink: &mut dyn Write,
    src: &str,
    alt: &str,
    attrs: &Attributes,
) -> Result<usize, SinkError> {
    let mut attrs = attrs.clone();
    attrs.insert("src", src);
    attrs.insert("alt", alt);
    write_tag(sink, "img", &attrs, None, TagFlags::VOID)
}

/// Renders an `img` tag.
pub fn render_image(src: &str, alt: &str, attrs: &Attributes) -> String {
    render_with(|sink| write_image(sink, src, alt, attrs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::tests::Limited;

    #[test]
    fn test_label_modes() {
        let none = Attributes::new();
        let cases = [
            (LabelMode::Before, "<label>Title</label> <input>"),
            (LabelMode::After, "<input> <label>Title</label>"),
            (LabelMode::WrapBefore, "<label>\nTitle <input>\n</label>"),
            (LabelMode::WrapAfter, "<label>\n<input> Title\n</label>"),
        ];
        for (mode, expected) in cases {
            assert_eq!(render_label(&none, "Title", "<input>", mode), expected, "{mode:?}");
        }
    }

    #[test]
    fn test_label_escapes_text() {
        let attrs = Attributes::from([("for", "x")]);
        assert_eq!(
            render_label(&attrs, "Tom & Jerry", "<input id=\"x\">", LabelMode::Before),
            "<label for=\"x\">Tom &amp; Jerry</label> <input id=\"x\">"
        );
    }

    #[test]
    fn test_label_failure_accounting() {
        let none = Attributes::new();
        let modes =
            [LabelMode::Before, LabelMode::After, LabelMode::WrapBefore, LabelMode::WrapAfter];
        for mode in modes {
            let full = render_label(&none, "T", "<br>", mode);
            for k in 0..full.len() {
                let mut sink = Limited::new(k);
                let err = write_label(&mut sink, &none, "T", &mut "<br>", mode).unwrap_err();
                assert_eq!(err.written, k, "{mode:?} failing after {k} bytes");
            }
        }
    }

    #[test]
    fn test_render_image() {
        let attrs = Attributes::from([("class", "pic")]);
        let image = render_image("http://a/b.img", "alt", &attrs);
        assert_eq!(image, r#"<img class="pic" src="http://a/b.img" alt="alt">"#);
        assert!(!attrs.has("src"));

        let image = render_image("x.png", "\"quoted\"", &Attributes::new());
        assert_eq!(image, r#"<img src="x.png" alt="&quot;quoted&quot;">"#);
    }

    #[test]
    fn test_label_mode_serde() {
        let json = serde_json::to_string(&LabelMode::WrapBefore).unwrap();
        assert_eq!(json, r#""wrap-before""#);
        assert_eq!(serde_json::from_str::<LabelMode>(r#""after""#).unwrap(), LabelMode::After);
    }
}
