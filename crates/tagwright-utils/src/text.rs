use rand::Rng;

/// Characters that are legal in HTML attribute values and query strings
/// without any encoding.
const HTML_SAFE: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ123456789-_()!";

/// Escapes plain text so that it can be embedded as HTML text.
pub fn escape_text(text: &str) -> String {
    let mut buf = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '&' => buf.push_str("&amp;"),
            '\'' => buf.push_str("&#39;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(c),
        }
    }
    buf
}

/// Escapes a value for use inside a double-quoted attribute.
pub fn escape_attr_value(value: &str) -> String {
    let mut buf = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '&' => buf.push_str("&amp;"),
            '"' => buf.push_str("&quot;"),
            _ => buf.push(c),
        }
    }
    buf
}

/// Makes plain text presentable as HTML.
///
/// The text is escaped, double newlines become paragraph breaks and the
/// remaining single newlines become line breaks.
pub fn text_to_html(text: &str) -> String {
    escape_text(text).replace("\n\n", "<p>").replace('\n', "<br />")
}

/// Generates a pseudo-random string of `len` characters that never need
/// encoding in HTML.
///
/// Not suitable for anything security related.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| HTML_SAFE[rng.gen_range(0..HTML_SAFE.len())] as char)
        .collect()
}
