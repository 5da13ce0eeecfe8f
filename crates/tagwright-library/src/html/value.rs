use ecow::{eco_format, EcoString};

use super::FALSE_VALUE;

/// Converts a Rust value into a value for [`Attributes::set`].
///
/// `true` becomes a boolean attribute (the empty value) and `false` becomes
/// [`FALSE_VALUE`], so that setting it removes the attribute.
///
/// [`Attributes::set`]: super::Attributes::set
pub trait ToAttrValue {
    /// The attribute value.
    fn to_attr_value(&self) -> EcoString;
}

/// Converts a Rust value into a value for [`Style::set`]. Numbers become
/// pixel lengths.
///
/// [`Style::set`]: super::Style::set
pub trait ToStyleValue {
    /// The style value.
    fn to_style_value(&self) -> EcoString;
}

impl ToAttrValue for bool {
    fn to_attr_value(&self) -> EcoString {
        if *self {
            EcoString::new()
        } else {
            FALSE_VALUE.into()
        }
    }
}

impl<T: ToAttrValue + ?Sized> ToAttrValue for &T {
    fn to_attr_value(&self) -> EcoString {
        (**self).to_attr_value()
    }
}

impl<T: ToStyleValue + ?Sized> ToStyleValue for &T {
    fn to_style_value(&self) -> EcoString {
        (**self).to_style_value()
    }
}

macro_rules! text {
    ($($ty:ty),*) => {
        $(
            impl ToAttrValue for $ty {
                fn to_attr_value(&self) -> EcoString {
                    let text: &str = self.as_ref();
                    text.into()
                }
            }

            impl ToStyleValue for $ty {
                fn to_style_value(&self) -> EcoString {
                    let text: &str = self.as_ref();
                    text.into()
                }
            }
        )*
    };
}

macro_rules! numeric {
    ($($ty:ty),*) => {
        $(
            impl ToAttrValue for $ty {
                fn to_attr_value(&self) -> EcoString {
                    eco_format!("{self}")
                }
            }

            impl ToStyleValue for $ty {
                fn to_style_value(&self) -> EcoString {
                    eco_format!("{self}px")
                }
            }
        )*
    };
}

text!(str, String, EcoString);
numeric!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_values() {
        assert_eq!(1i32.to_attr_value(), "1");
        assert_eq!(2.2f32.to_attr_value(), "2.2");
        assert_eq!("test".to_attr_value(), "test");
        assert_eq!(true.to_attr_value(), "");
        assert_eq!(false.to_attr_value(), FALSE_VALUE);
    }

    #[test]
    fn test_style_values() {
        assert_eq!(5i32.to_style_value(), "5px");
        assert_eq!(5.1f32.to_style_value(), "5.1px");
        assert_eq!(5.2f64.to_style_value(), "5.2px");
        assert_eq!("9em".to_style_value(), "9em");
        assert_eq!(String::from("9").to_style_value(), "9");
    }
}
