use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};

use ecow::{eco_format, EcoString};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tagwright_utils::{
    escape_attr_value, has_word, has_word_with_prefix, merge_words, remove_words,
    remove_words_with_prefix,
};
use unscanny::Scanner;

use super::{data, merge_style_strings, Style, Writer};
use crate::diag::{bail, SinkError, StrResult};

/// Setting an attribute to this value removes it.
///
/// This makes it easy to toggle boolean attributes: the empty value renders
/// the attribute without a value, and this one drops it.
pub const FALSE_VALUE: &str = "**TAGWRIGHT-FALSE**";

/// Attributes that are encoded first, in this order, when sorting.
const PRIORITY: &[&str] =
    &["id", "class", "style", "name", "value", "src", "alt", "width", "height"];

/// The attributes of an HTML tag.
///
/// Setting an attribute goes through [`set`](Self::set), which gives a few
/// attributes special treatment: `style` is kept in canonical form, `class`
/// understands `+ ` and `- ` prefixes, `id` may not contain whitespace and
/// `data-*` names are validated. Every mutation reports whether the
/// attributes actually changed, which helps to avoid needless re-renders.
///
/// Cloning produces an independent copy.
///
/// ```
/// # use tagwright_library::html::Attributes;
/// let mut attrs = Attributes::new();
/// attrs.set("class", "a").unwrap();
/// attrs.set("id", "b").unwrap();
/// attrs.set_style("height", "4").unwrap();
/// assert_eq!(attrs.encode(true), r#"id="b" class="a" style="height:4px""#);
/// ```
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<EcoString, EcoString>);

/// How [`Attributes::set`] treats an attribute name.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum AttrKind<'a> {
    Id,
    Class,
    Style,
    /// A `data-*` attribute with the camelCase key after the prefix.
    Data(&'a str),
    Plain,
}

impl<'a> AttrKind<'a> {
    fn of(name: &'a str) -> Self {
        match name {
            "id" => Self::Id,
            "class" => Self::Class,
            "style" => Self::Style,
            _ => match name.strip_prefix("data-") {
                Some(key) => Self::Data(key),
                None => Self::Plain,
            },
        }
    }
}

impl Attributes {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the attribute is present.
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The value of an attribute. Boolean attributes have the empty value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(EcoString::as_str)
    }

    /// Iterate over the attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over the attributes in the order used by sorted encoding,
    /// which is stable across calls.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (&str, &str)> {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by(|(a, _), (b, _)| compare_names(a, b));
        pairs.into_iter()
    }

    /// Set an attribute and return whether something changed.
    ///
    /// The empty value creates a boolean attribute and [`FALSE_VALUE`]
    /// removes the attribute. A `data-*` attribute is removed under the
    /// same kebab-case name that setting it would store.
    pub fn set(&mut self, name: &str, value: &str) -> StrResult<bool> {
        if name.contains(' ') {
            bail!("attribute names cannot contain spaces");
        }

        let kind = AttrKind::of(name);
        if value == FALSE_VALUE {
            return match kind {
                AttrKind::Data(key) => Ok(self.remove(&data_name(key)?)),
                _ => Ok(self.remove(name)),
            };
        }

        match kind {
            AttrKind::Style => self.set_styles_to(value),
            AttrKind::Id => self.set_id(value),
            AttrKind::Class => Ok(self.set_class(value)),
            AttrKind::Data(key) => self.set_data(key, value),
            AttrKind::Plain => Ok(self.insert(name, value)),
        }
    }

    /// Set an attribute verbatim, bypassing the special treatment of
    /// [`set`](Self::set). Returns whether the value changed.
    pub fn insert(&mut self, name: &str, value: &str) -> bool {
        match self.0.get_mut(name) {
            Some(old) if old == value => false,
            Some(old) => {
                *old = value.into();
                true
            }
            None => {
                self.0.insert(name.into(), value.into());
                true
            }
        }
    }

    /// Remove an attribute. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.0.shift_remove(name).is_some()
    }

    /// The `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    /// Set the `id` attribute. The empty value removes it.
    pub fn set_id(&mut self, id: &str) -> StrResult<bool> {
        if id.is_empty() {
            return Ok(self.remove("id"));
        }
        if id.contains(char::is_whitespace) {
            bail!("id attributes cannot contain spaces");
        }
        Ok(self.insert("id", id))
    }

    /// The `class` attribute.
    pub fn class(&self) -> Option<&str> {
        self.get("class")
    }

    /// Set the `class` attribute and return whether it changed.
    ///
    /// A value prefixed with `+ ` adds its classes to the end of the list,
    /// one prefixed with `- ` removes its classes, and any other value
    /// replaces the list. The empty value removes the attribute.
    pub fn set_class(&mut self, value: &str) -> bool {
        if value.is_empty() {
            self.remove("class")
        } else if let Some(classes) = value.strip_prefix("+ ") {
            self.add_class(classes)
        } else if let Some(classes) = value.strip_prefix("- ") {
            self.remove_class(classes)
        } else {
            self.insert("class", value)
        }
    }

    /// Add space-separated classes that are not yet present to the end of
    /// the class list. Existing classes keep their position.
    pub fn add_class(&mut self, classes: &str) -> bool {
        self.add_values("class", classes)
    }

    /// Remove space-separated classes from the class list.
    pub fn remove_class(&mut self, classes: &str) -> bool {
        self.update_words("class", |current| remove_words(current, classes))
    }

    /// Remove all classes starting with the prefix, for example a family of
    /// sizing classes like `col-lg-6`.
    pub fn remove_classes_with_prefix(&mut self, prefix: &str) -> bool {
        self.update_words("class", |current| remove_words_with_prefix(current, prefix))
    }

    /// Whether the class is in the class list.
    pub fn has_class(&self, class: &str) -> bool {
        self.has_value("class", class)
    }

    /// Whether any class in the class list starts with the prefix.
    pub fn has_class_with_prefix(&self, prefix: &str) -> bool {
        self.get("class").is_some_and(|current| has_word_with_prefix(current, prefix))
    }

    /// Add space-separated values to a multi-valued attribute, such as
    /// `aria-labelledby`. Values that are already present are skipped.
    pub fn add_values(&mut self, name: &str, values: &str) -> bool {
        if values.trim().is_empty() {
            return false;
        }
        match self.get(name) {
            Some(current) => {
                let merged = merge_words(current, values);
                merged != current && self.insert(name, &merged)
            }
            None => self.insert(name, &merge_words("", values)),
        }
    }

    /// Whether the value is one of the space-separated values of the
    /// attribute.
    pub fn has_value(&self, name: &str, value: &str) -> bool {
        self.get(name).is_some_and(|current| has_word(current, value))
    }

    /// Rewrite a word list attribute, removing it once it is empty.
    fn update_words(&mut self, name: &str, f: impl FnOnce(&str) -> String) -> bool {
        let Some(current) = self.get(name) else { return false };
        let updated = f(current);
        if updated == current {
            return false;
        }
        if updated.is_empty() {
            self.remove(name)
        } else {
            self.insert(name, &updated)
        }
    }

    /// Set a `data-*` attribute.
    ///
    /// The key is given in camelCase, as scripts see it in an element's
    /// `dataset`, and appears in kebab-case in the markup: the key
    /// `testCase` is stored as `data-test-case`.
    pub fn set_data(&mut self, key: &str, value: &str) -> StrResult<bool> {
        let name = data_name(key)?;
        Ok(self.insert(&name, value))
    }

    /// The value of a `data-*` attribute, looked up by its camelCase key.
    pub fn data(&self, key: &str) -> Option<&str> {
        self.get(&data_name(key).ok()?)
    }

    /// Whether a `data-*` attribute is present.
    pub fn has_data(&self, key: &str) -> bool {
        data_name(key).is_ok_and(|name| self.has(&name))
    }

    /// Remove a `data-*` attribute. Returns whether it existed.
    pub fn remove_data(&mut self, key: &str) -> bool {
        data_name(key).is_ok_and(|name| self.remove(&name))
    }

    /// The encoded `style` attribute.
    pub fn style_string(&self) -> Option<&str> {
        self.get("style")
    }

    /// The decoded `style` attribute. A malformed attribute decodes as an
    /// empty style.
    pub fn style(&self) -> Style {
        let Some(text) = self.get("style") else { return Style::new() };
        text.parse().unwrap_or_else(|err| {
            log::debug!("treating malformed style attribute {text:?} as empty: {err}");
            Style::new()
        })
    }

    /// The value of a single style property.
    pub fn get_style(&self, property: &str) -> Option<EcoString> {
        self.style().get(property).map(Into::into)
    }

    /// Whether the style property is set.
    pub fn has_style(&self, property: &str) -> bool {
        self.style().has(property)
    }

    /// Set a single style property. This supports the unit inference and
    /// arithmetic of [`Style::set`], so `set_style("height", "* 2")` doubles
    /// the height.
    pub fn set_style(&mut self, property: &str, value: &str) -> StrResult<bool> {
        let mut style = self.style();
        let changed = style.set(property, value)?;
        self.store_style(&style);
        Ok(changed)
    }

    /// Merge the given properties into the style. Conflicts are won by
    /// `styles`.
    pub fn set_styles(&mut self, styles: &Style) -> bool {
        let mut style = self.style();
        style.merge(styles);
        self.store_style(&style)
    }

    /// Replace the style with the declarations of a CSS text.
    ///
    /// Whether something changed is decided by comparing the properties, not
    /// the text, so reordered declarations do not count as a change.
    pub fn set_styles_to(&mut self, text: &str) -> StrResult<bool> {
        let style: Style = text.parse()?;
        if style == self.style() {
            return Ok(false);
        }
        Ok(self.store_style(&style))
    }

    /// Remove a style property. Returns whether it was set.
    pub fn remove_style(&mut self, property: &str) -> bool {
        let mut style = self.style();
        style.remove(property) && self.store_style(&style)
    }

    /// Store a style in canonical form, dropping the attribute when there
    /// are no properties.
    fn store_style(&mut self, style: &Style) -> bool {
        if style.is_empty() {
            self.remove("style")
        } else {
            self.insert("style", &style.to_string())
        }
    }

    /// Add or remove the boolean `disabled` attribute.
    pub fn set_disabled(&mut self, disabled: bool) -> bool {
        if disabled {
            self.insert("disabled", "")
        } else {
            self.remove("disabled")
        }
    }

    /// Whether the `disabled` attribute is present.
    pub fn is_disabled(&self) -> bool {
        self.has("disabled")
    }

    /// Set the `display` style property.
    pub fn set_display(&mut self, display: &str) -> StrResult<bool> {
        self.set_style("display", display)
    }

    /// Whether the element is displayed, i.e. its `display` style property
    /// is not `none`.
    pub fn is_displayed(&self) -> bool {
        self.get_style("display").as_deref() != Some("none")
    }

    /// Merge other attributes into these ones.
    ///
    /// Conflicts are won by `other`, except that styles are merged property
    /// by property and classes are united. See
    /// [`override_with`](Self::override_with) for a plain replacement.
    pub fn merge(&mut self, other: &Attributes) -> &mut Self {
        for (name, value) in &other.0 {
            let value = match (name.as_str(), self.0.get(name)) {
                ("style", Some(current)) => merge_style_strings(current, value),
                ("class", Some(current)) => merge_words(current, value).into(),
                _ => value.clone(),
            };
            self.0.insert(name.clone(), value);
        }
        self
    }

    /// Replace attributes with the ones in `other`, one by one.
    pub fn override_with(&mut self, other: &Attributes) -> &mut Self {
        for (name, value) in &other.0 {
            self.0.insert(name.clone(), value.clone());
        }
        self
    }

    /// Merge an attribute string like `a="b" c="d"` into these attributes,
    /// like [`merge`](Self::merge) does.
    pub fn merge_str(&mut self, text: &str) -> StrResult<&mut Self> {
        let other = Self::from_template(text)?;
        Ok(self.merge(&other))
    }

    /// Override these attributes with an attribute string like
    /// `a="b" c="d"`, like [`override_with`](Self::override_with) does.
    pub fn override_str(&mut self, text: &str) -> StrResult<&mut Self> {
        let other = Self::from_template(text)?;
        Ok(self.override_with(&other))
    }

    /// Extract the `name="value"` pairs of an attribute string. Fragments
    /// of any other shape are skipped.
    fn from_template(text: &str) -> StrResult<Self> {
        let mut attrs = Self::new();
        let mut s = Scanner::new(text);
        while !s.done() {
            let name = s.eat_while(|c: char| c.is_ascii_alphanumeric() || c == '_');
            if name.is_empty() {
                s.eat();
                continue;
            }
            if !s.eat_if("=\"") {
                log::debug!("skipping {name:?} in attribute string {text:?}");
                continue;
            }
            let value = s.eat_until('"');
            if !s.eat_if('"') {
                log::debug!("skipping unterminated attribute {name:?} in {text:?}");
                break;
            }
            attrs.set(name, value)?;
        }
        Ok(attrs)
    }

    /// Encode the attributes for embedding in a tag, e.g. `a="b" c`.
    ///
    /// Values are escaped. When `sorted` is set, `id`, `class`, `style`,
    /// `name`, `value`, `src`, `alt`, `width` and `height` come first and
    /// the rest follows alphabetically. Otherwise, the insertion order is
    /// kept.
    pub fn encode(&self, sorted: bool) -> String {
        let mut buf = Vec::new();
        self.write_to(&mut Writer::new(&mut buf), sorted)
            .expect("writing to memory cannot fail");
        String::from_utf8(buf).expect("encoded attributes are valid UTF-8")
    }

    /// Write the encoded attributes into a writer.
    pub fn write_to(&self, w: &mut Writer, sorted: bool) -> Result<(), SinkError> {
        if sorted {
            write_pairs(w, self.iter_sorted())
        } else {
            write_pairs(w, self.iter())
        }
    }
}

/// Write space-separated `name="value"` pairs.
fn write_pairs<'a>(
    w: &mut Writer,
    pairs: impl Iterator<Item = (&'a str, &'a str)>,
) -> Result<(), SinkError> {
    for (i, (name, value)) in pairs.enumerate() {
        if i > 0 {
            w.write_str(" ")?;
        }
        w.write_str(name)?;
        if !value.is_empty() {
            w.write_str("=\"")?;
            w.write_str(&escape_attr_value(value))?;
            w.write_str("\"")?;
        }
    }
    Ok(())
}

/// The order of attribute names in sorted encoding.
fn compare_names(a: &str, b: &str) -> Ordering {
    let rank = |name: &str| PRIORITY.iter().position(|&p| p == name);
    match (rank(a), rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// The attribute name for a camelCase data key.
fn data_name(key: &str) -> StrResult<EcoString> {
    if key.is_empty() {
        bail!("data attribute names cannot be empty");
    }
    Ok(eco_format!("data-{}", data::to_kebab(key)?))
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(false))
    }
}

/// Builds attributes from literal pairs. Values are stored exactly as given,
/// like with [`Attributes::insert`].
impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<EcoString>,
    V: Into<EcoString>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Attributes
where
    K: Into<EcoString>,
    V: Into<EcoString>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
