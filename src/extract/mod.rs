//! Field extraction for content pages
//!
//! Extraction is data-driven. Each output field owns an ordered list of
//! candidate queries (most specific first); the resolver walks the list and
//! keeps the first value that passes the field's validity check.
//!
//! - `query`: parsed documents and the query language evaluated against them
//! - `resolver`: the generic "first valid candidate wins" walk
//! - `candidates`: built-in candidate lists, overridable from config
//! - `image`: image URL validity and canonicalization rules
//! - `fields`: one extractor per record field, assembled by [`Extractor`]

mod candidates;
mod fields;
mod image;
mod query;
mod resolver;

pub use candidates::CandidateQueries;
pub use fields::{
    extract_additional_images, extract_categories, extract_character_type, extract_description,
    extract_infobox_data, extract_main_image, extract_name, name_from_url, select_attributes,
    title_case, Extractor, ATTRIBUTE_PRIORITIES, DEFAULT_CHARACTER_TYPE, MAX_ADDITIONAL_IMAGES,
    MIN_DESCRIPTION_CHARS, ROLE_KEYWORDS, TYPE_LABELS,
};
pub use image::{clean_image_url, is_valid_image_url, resolve_image_url};
pub use query::{Document, Query};
pub use resolver::{collect_all, first_valid, resolve};

use thiserror::Error;

/// Errors raised while extracting fields from one page
///
/// These are caught at the per-page boundary by the crawler: the page is
/// skipped and the failure is added to the run's error log.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid query '{query}': {message}")]
    InvalidQuery { query: String, message: String },
}
