use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter, Write};
use std::str::FromStr;

use ecow::{eco_format, EcoString};
use serde::{Deserialize, Serialize};
use unscanny::Scanner;

use crate::diag::{bail, StrResult, ValidationError};

/// The unit appended to bare numbers for properties that take a length.
const LENGTH_UNIT: &str = "px";

/// Properties that take a number which is not a length.
const NON_LENGTH_NUMERICS: &[&str] = &[
    "volume",
    "speech-rate",
    "orphans",
    "widows",
    "pitch-range",
    "font-weight",
    "z-index",
    "counter-increment",
    "counter-reset",
];

/// Decimal digits kept by style arithmetic.
const PRECISION: f64 = 1e6;

/// The CSS declarations of a `style` attribute.
///
/// Properties are kept sorted by name, so the encoded form is canonical:
/// `property:value` pairs joined by `;` without a trailing separator.
///
/// ```
/// # use tagwright_library::html::Style;
/// let mut style: Style = "height: 9em; width: 100%; position:absolute".parse().unwrap();
/// style.set("height", "* 2").unwrap();
/// assert_eq!(style.to_string(), "height:18em;position:absolute;width:100%");
/// ```
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Style(BTreeMap<EcoString, EcoString>);

impl Style {
    /// Create an empty style.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the property is set.
    pub fn has(&self, property: &str) -> bool {
        self.0.contains_key(property)
    }

    /// The value of a property.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.0.get(property).map(EcoString::as_str)
    }

    /// Iterate over the properties in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Remove a property. Returns whether it was set.
    pub fn remove(&mut self, property: &str) -> bool {
        self.0.remove(property).is_some()
    }

    /// Remove all properties.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Set a property and return whether its value changed.
    ///
    /// A value of the form `<op> <number>` with `op` being one of `+`, `-`,
    /// `*` or `/` is not stored literally. Instead, the operation is applied
    /// to every number in the current value, keeping the units. For example,
    /// setting `"/ 2"` on `2em 9px` yields `1em 4.5px`. The space after the
    /// operator distinguishes the operation from a negative number.
    ///
    /// A bare number other than `0` gets a `px` unit, unless the property
    /// takes a number that is not a length, like `z-index`.
    pub fn set(&mut self, property: &str, value: &str) -> StrResult<bool> {
        if property.contains(' ') {
            bail!("style property names cannot contain spaces");
        }

        if let Some((op, operand)) = Op::split(value) {
            return self.apply(property, op, operand);
        }

        let value = if value != "0"
            && is_numeric(value)
            && !NON_LENGTH_NUMERICS.contains(&property)
        {
            eco_format!("{value}{LENGTH_UNIT}")
        } else {
            value.into()
        };

        Ok(self.insert(property, value))
    }

    /// Replace all properties with the declarations in a CSS text such as
    /// `width: 4px; border: 1px solid black`.
    ///
    /// Every `;`-separated segment must be a `property:value` pair, so the
    /// empty text and a trailing `;` are rejected. Returns whether the
    /// properties differ from the previous ones. On error, the style is left
    /// empty.
    pub fn parse(&mut self, text: &str) -> StrResult<bool> {
        let previous = std::mem::take(&mut self.0);
        match self.parse_declarations(text) {
            Ok(()) => Ok(self.0 != previous),
            Err(err) => {
                self.0.clear();
                Err(err)
            }
        }
    }

    fn parse_declarations(&mut self, text: &str) -> StrResult<()> {
        for declaration in text.split(';') {
            let mut parts = declaration.split(':');
            let (Some(property), Some(value), None) =
                (parts.next(), parts.next(), parts.next())
            else {
                bail!(
                    "css must be a name/value pair separated by a colon, \
                     but {text:?} was given"
                );
            };

            self.set(property.trim(), value.trim())?;
        }
        Ok(())
    }

    /// Merge the properties of another style into this one. Conflicts are
    /// won by `other`. Values are copied as they are.
    pub fn merge(&mut self, other: &Style) {
        self.0.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    /// Apply an arithmetic operation to each number in a property's value.
    fn apply(&mut self, property: &str, op: Op, operand: &str) -> StrResult<bool> {
        let rhs = match operand.trim().parse::<f64>() {
            Ok(rhs) if rhs.is_finite() => rhs,
            _ => bail!("{operand:?} is not a number"),
        };
        if op == Op::Div && rhs == 0.0 {
            bail!("cannot divide the {property} style by zero");
        }

        let current = self.get(property).filter(|v| !v.is_empty()).unwrap_or("0");
        let mut out = EcoString::with_capacity(current.len());
        let mut s = Scanner::new(current);
        while !s.done() {
            let start = s.cursor();
            if eat_number(&mut s) {
                let number = s.from(start);
                match number.parse::<f64>() {
                    Ok(lhs) => write!(out, "{}", round(op.apply(lhs, rhs))).unwrap(),
                    Err(_) => out.push_str(number),
                }
            } else if let Some(c) = s.eat() {
                out.push(c);
            }
        }

        Ok(self.insert(property, out))
    }

    /// A raw insertion that returns whether something changed.
    fn insert(&mut self, property: &str, value: EcoString) -> bool {
        match self.0.insert(property.into(), value.clone()) {
            Some(old) => old != value,
            None => true,
        }
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_char(';')?;
            }
            write!(f, "{property}:{value}")?;
        }
        Ok(())
    }
}

impl FromStr for Style {
    type Err = ValidationError;

    fn from_str(text: &str) -> StrResult<Self> {
        let mut style = Self::new();
        style.parse(text)?;
        Ok(style)
    }
}

/// Builds a style from literal pairs. Values are stored exactly as given,
/// without unit inference or arithmetic.
impl<K, V> FromIterator<(K, V)> for Style
where
    K: Into<EcoString>,
    V: Into<EcoString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Style
where
    K: Into<EcoString>,
    V: Into<EcoString>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Merges two CSS texts, with `b` winning conflicts. Malformed texts
/// contribute no properties.
pub fn merge_style_strings(a: &str, b: &str) -> EcoString {
    let decode = |text: &str| {
        text.parse::<Style>().unwrap_or_else(|err| {
            log::debug!("ignoring malformed style {text:?}: {err}");
            Style::new()
        })
    };
    let mut style = decode(a);
    style.merge(&decode(b));
    eco_format!("{style}")
}

/// An in-place arithmetic operation on style values.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Split a value like `* 2` into its operation and operand.
    fn split(value: &str) -> Option<(Self, &str)> {
        let mut chars = value.chars();
        let op = match chars.next()? {
            '+' => Self::Add,
            '-' => Self::Sub,
            '*' => Self::Mul,
            '/' => Self::Div,
            _ => return None,
        };
        chars.as_str().strip_prefix(' ').map(|operand| (op, operand))
    }

    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
        }
    }
}

/// Rounds to six decimal digits to hide floating point noise, so that
/// `1.6 - 2` prints as `-0.4`.
fn round(value: f64) -> f64 {
    let scaled = value * PRECISION;
    if scaled.abs() < 0.5 {
        return 0.0;
    }
    scaled.round() / PRECISION
}

/// Whether the whole value is a bare number.
fn is_numeric(value: &str) -> bool {
    let mut s = Scanner::new(value);
    eat_number(&mut s) && s.done()
}

/// Eat a number of the form `-?\d*(\.\d+)?` with at least one digit.
/// Leaves the scanner untouched if there is none.
fn eat_number(s: &mut Scanner) -> bool {
    let start = s.cursor();
    s.eat_if('-');
    let int = s.eat_while(|c: char| c.is_ascii_digit());
    let mut frac = "";
    if s.at('.') && s.scout(1).is_some_and(|c| c.is_ascii_digit()) {
        s.eat();
        frac = s.eat_while(|c: char| c.is_ascii_digit());
    }
    if int.is_empty() && frac.is_empty() {
        s.jump(start);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(text: &str) -> Style {
        text.parse().unwrap()
    }

    #[test]
    fn test_style_parse() {
        let s = style("height: 9em; width: 100%; position:absolute");
        assert_eq!(s.to_string(), "height:9em;position:absolute;width:100%");
        assert_eq!(s.get("width"), Some("100%"));
        assert_eq!(s.len(), 3);
        assert!(s.has("width"));
        assert!(!s.has("display"));
    }

    #[test]
    fn test_style_parse_changes() {
        let mut s = Style::new();
        assert_eq!(s.set("height", "4"), Ok(true));
        assert_eq!(s.parse("height: 3; width: 5"), Ok(true));
        assert_eq!(s.get("width"), Some("5px"));
        assert_eq!(s.get("height"), Some("3px"));
        assert_eq!(s.parse("width:5px;height:3px"), Ok(false));

        assert!(s.parse("height of: 3; width: 4").is_err());
        assert!(s.is_empty());
        assert!(s.parse("a b").is_err());
        assert!(s.parse("a:b:c").is_err());
    }

    #[test]
    fn test_style_parse_rejects_empty_segments() {
        for text in ["", " ", "width:5px;", "width:5px; ;height:2px", ";width:5px"] {
            let mut s = style("color:red;top:1px");
            assert!(s.parse(text).is_err(), "{text:?}");
            assert!(s.is_empty(), "{text:?}");
        }
        assert!("width:5px;".parse::<Style>().is_err());
    }

    #[test]
    fn test_style_serde() {
        let s = style("width: 5; color: red");
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"color":"red","width":"5px"}"#);
        assert_eq!(serde_json::from_str::<Style>(&json).unwrap(), s);
    }

    #[test]
    fn test_style_lengths() {
        let mut s = Style::new();
        assert_eq!(s.set("height", "4px"), Ok(true));
        assert_eq!(s.set("height", "4"), Ok(false));
        assert_eq!(s.set("height", "4em"), Ok(true));
        assert_eq!(s.set("width", "0"), Ok(true));
        assert_eq!(s.get("width"), Some("0"));
        assert_eq!(s.set("width", "1"), Ok(true));
        assert_eq!(s.get("width"), Some("1px"));
        assert_eq!(s.set("width", "-1.5"), Ok(true));
        assert_eq!(s.get("width"), Some("-1.5px"));
        assert_eq!(s.set("volume", "4"), Ok(true));
        assert_eq!(s.get("volume"), Some("4"));
        assert_eq!(s.set("z-index", "-2"), Ok(true));
        assert_eq!(s.get("z-index"), Some("-2"));
        assert_eq!(s.set("position", "9"), Ok(true));
        assert_eq!(s.get("position"), Some("9px"));
        assert_eq!(s.set("color", "red"), Ok(true));
        assert_eq!(s.get("color"), Some("red"));
        assert!(s.set("bad name", "1").is_err());
    }

    #[test]
    fn test_style_math() {
        let mut s = Style::new();
        s.set("height", "4em").unwrap();
        s.set("height", "* 2").unwrap();
        assert_eq!(s.get("height"), Some("8em"));

        s.set("height", "2em 9px").unwrap();
        s.set("height", "/ 2").unwrap();
        assert_eq!(s.get("height"), Some("1em 4.5px"));

        s.set("width", "7.6in").unwrap();
        s.set("width", "+ 2").unwrap();
        assert_eq!(s.get("width"), Some("9.6in"));

        s.set("width", "1.6in").unwrap();
        s.set("width", "- 2").unwrap();
        assert_eq!(s.get("width"), Some("-0.4in"));

        s.set("top", "9px").unwrap();
        assert_eq!(s.set("top", "+ 10"), Ok(true));
        assert_eq!(s.get("top"), Some("19px"));
        assert_eq!(s.set("top", "* 1"), Ok(false));

        s.set("left", "0.0000001px").unwrap();
        s.set("left", "* 1").unwrap();
        assert_eq!(s.get("left"), Some("0px"));
    }

    #[test]
    fn test_style_math_edge_cases() {
        let base = Style::from([("height", "10"), ("margin", ""), ("width", "20en")]);

        let mut s = base.clone();
        assert_eq!(s.set("margin", "+ 1"), Ok(true));
        assert_eq!(s.to_string(), "height:10;margin:1;width:20en");

        let mut s = base.clone();
        assert!(s.set("margin", "+ 1a").is_err());
        assert_eq!(s.to_string(), "height:10;margin:;width:20en");

        let mut s = base.clone();
        assert_eq!(s.set("height", "* 2"), Ok(true));
        assert_eq!(s.to_string(), "height:20;margin:;width:20en");

        let mut s = base.clone();
        assert_eq!(s.set("width", "/ 2"), Ok(true));
        assert_eq!(s.to_string(), "height:10;margin:;width:10en");

        let mut s = base.clone();
        assert_eq!(s.set("padding", "+ 3"), Ok(true));
        assert_eq!(s.get("padding"), Some("3"));

        let mut s = base;
        assert!(s.set("width", "/ 0").is_err());
        assert_eq!(s.get("width"), Some("20en"));
    }

    #[test]
    fn test_style_negative_value_is_not_math() {
        let mut s = Style::new();
        s.set("margin", "-2").unwrap();
        assert_eq!(s.get("margin"), Some("-2px"));
        s.set("margin", "-2em -3em").unwrap();
        s.set("margin", "- 1").unwrap();
        assert_eq!(s.get("margin"), Some("-3em -4em"));
    }

    #[test]
    fn test_style_merge() {
        let mut s = style("color:green;size:9");
        s.merge(&Style::from([("color", "yellow"), ("top", "3")]));
        assert_eq!(s.to_string(), "color:yellow;size:9px;top:3");
        assert_eq!(
            merge_style_strings("color:blue;top:1px", "color:red").as_str(),
            "color:red;top:1px"
        );
        assert_eq!(merge_style_strings("a b", "color:red").as_str(), "color:red");
    }

    #[test]
    fn test_style_remove() {
        let mut s = style("height: 9em; width: 100%; position:absolute");
        assert!(s.remove("position"));
        assert!(!s.remove("position"));
        assert_eq!(s.to_string(), "height:9em;width:100%");
        s.clear();
        assert_eq!(s.to_string(), "");
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn test_style_copy_is_independent() {
        let s = Style::from([("color", "green"), ("size", "9")]);
        let mut copy = s.clone();
        copy.set("color", "red").unwrap();
        assert_eq!(s.to_string(), "color:green;size:9");
        assert_eq!(copy.to_string(), "color:red;size:9");
    }
}
