//! Tagwright's attribute and style model.
//!
//! This crate contains the mutable attribute store that backs every rendered
//! tag, the CSS-like style model embedded in its `style` attribute, and the
//! naming rules for `data-*` attributes.

pub mod diag;
pub mod html;
