//! URL handling module for Wiki-Harvest
//!
//! This module provides the visited-set key normalization, the site name
//! derivation used for output scoping, and the link classifier that separates
//! content pages from wiki system pages.

mod classify;
mod domain;
mod normalize;

pub use classify::{is_content_page, LinkClassification, PageClassifier, DEFAULT_EXCLUDED_PATTERNS};
pub use domain::site_name;
pub use normalize::normalize_url;
