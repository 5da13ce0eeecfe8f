//! Conversion between the camelCase keys that scripts use for `data-*`
//! attributes and the kebab-case names that appear in markup.
//!
//! Browsers expose `data-test-case` as `dataset.testCase`. Both directions
//! only accept names that survive the round trip; anything else is rejected
//! instead of being coerced.

use ecow::EcoString;

use crate::diag::{bail, StrResult};

/// Converts a camelCase key into the kebab-case suffix of a `data-*`
/// attribute, e.g. `testCase` into `test-case`.
///
/// The key must start with a lowercase ASCII letter, must not contain two
/// consecutive uppercase letters and may only contain ASCII letters, digits
/// and underscores. The empty key maps to the empty suffix.
pub fn to_kebab(key: &str) -> StrResult<EcoString> {
    let acceptable = key.chars().next().map_or(true, |c| c.is_ascii_lowercase())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !key
            .as_bytes()
            .windows(2)
            .any(|pair| pair[0].is_ascii_uppercase() && pair[1].is_ascii_uppercase());
    if !acceptable {
        bail!("{key:?} is not an acceptable camelCase name");
    }

    let mut kebab = EcoString::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            kebab.push('-');
            kebab.push(c.to_ascii_lowercase());
        } else {
            kebab.push(c);
        }
    }
    Ok(kebab)
}

/// Converts the kebab-case suffix of a `data-*` attribute into the camelCase
/// key that scripts see, e.g. `test-case` into `testCase`.
///
/// The name may only contain lowercase ASCII letters, digits and hyphens, and
/// every hyphen-separated word must be at least two characters long. The
/// empty name maps to the empty key.
pub fn to_camel(name: &str) -> StrResult<EcoString> {
    if let Some(c) =
        name.chars().find(|&c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
    {
        bail!("{name:?} is not an acceptable kebab-case name, found {c:?}");
    }

    if name.is_empty() {
        return Ok(EcoString::new());
    }

    let mut camel = EcoString::with_capacity(name.len());
    for (i, word) in name.split('-').enumerate() {
        if word.len() < 2 {
            bail!("individual kebab-case words must be at least 2 characters long");
        }
        let mut chars = word.chars();
        if i > 0 {
            if let Some(first) = chars.next() {
                camel.push(first.to_ascii_uppercase());
            }
        }
        camel.push_str(chars.as_str());
    }
    Ok(camel)
}
