/// Whether this is a void tag, whose element never has content or a
/// closing tag.
pub fn is_void(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "command"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_void() {
        for tag in ["br", "img", "input", "keygen", "command", "wbr"] {
            assert!(is_void(tag), "{tag}");
        }
        for tag in ["div", "a", "textarea", "label", "BR", ""] {
            assert!(!is_void(tag), "{tag}");
        }
    }
}
