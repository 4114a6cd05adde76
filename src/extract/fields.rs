use crate::extract::image::{is_valid_image_url, resolve_image_url};
use crate::extract::query::Document;
use crate::extract::resolver::{collect_all, resolve};
use crate::extract::{CandidateQueries, ExtractionError};
use crate::record::Record;
use chrono::Utc;
use percent_encoding::percent_decode_str;
use std::collections::BTreeMap;
use url::Url;

/// Infobox labels searched (as substrings) for the category/type, in order
pub const TYPE_LABELS: &[&str] = &[
    "type",
    "class",
    "role",
    "species",
    "occupation",
    "position",
    "race",
    "faction",
    "allegiance",
    "origin",
];

/// Category words that make a page category usable as the type
pub const ROLE_KEYWORDS: &[&str] = &["character", "hero", "villain", "champion"];

/// Infobox keys filling the two attribute slots, highest priority first
pub const ATTRIBUTE_PRIORITIES: &[&str] = &[
    // games
    "power",
    "ability",
    "element",
    "weapon",
    "class",
    "rarity",
    // anime and manga
    "affiliation",
    "village",
    "clan",
    "devil_fruit",
    "quirk",
    // general
    "height",
    "weight",
    "age",
    "birthplace",
    "status",
    "first_appearance",
    "creator",
    "voice_actor",
];

pub const DEFAULT_CHARACTER_TYPE: &str = "Character";

pub const MAX_ADDITIONAL_IMAGES: usize = 5;

/// A description candidate must be strictly longer than this
pub const MIN_DESCRIPTION_CHARS: usize = 50;

const FALLBACK_PARAGRAPHS: usize = 3;

/// Entity name: the first heading candidate, else the page URL's last segment
pub fn extract_name(document: &Document, queries: &[String]) -> Result<String, ExtractionError> {
    match resolve(document, queries, |_| true)? {
        Some(name) => Ok(name),
        None => Ok(name_from_url(document.url())),
    }
}

/// Derives a display name from the last non-empty path segment
///
/// Underscores become spaces and percent escapes are decoded. Query and
/// fragment are never part of the segment.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_harvest::extract::name_from_url;
///
/// let url = Url::parse("https://starwars.fandom.com/wiki/Padm%C3%A9_Amidala?so=search").unwrap();
/// assert_eq!(name_from_url(&url), "Padmé Amidala");
/// ```
pub fn name_from_url(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or("");

    percent_decode_str(&segment.replace('_', " "))
        .decode_utf8_lossy()
        .trim()
        .to_string()
}

/// Primary image: first candidate that is a real image and resolves to http(s)
///
/// `None` means the page cannot produce a record.
pub fn extract_main_image(
    document: &Document,
    queries: &[String],
) -> Result<Option<String>, ExtractionError> {
    let base = document.url();
    let found = resolve(document, queries, |src| {
        is_valid_image_url(src) && resolve_image_url(base, src).is_some()
    })?;

    Ok(found.and_then(|src| resolve_image_url(base, &src)))
}

/// Description: a long enough candidate, else the first paragraphs joined
pub fn extract_description(
    document: &Document,
    queries: &[String],
    fallback: &[String],
) -> Result<String, ExtractionError> {
    if let Some(description) = resolve(document, queries, |s| {
        s.chars().count() > MIN_DESCRIPTION_CHARS
    })? {
        return Ok(description);
    }

    let paragraphs = collect_all(document, fallback, |_| true)?;
    Ok(paragraphs
        .into_iter()
        .take(FALLBACK_PARAGRAPHS)
        .collect::<Vec<_>>()
        .join(" "))
}

/// Category/type from infobox rows, then page categories, then the default
///
/// Rows are searched label by label in [`TYPE_LABELS`] order, so a `Species`
/// row beats an earlier `Origin` row.
pub fn extract_character_type(
    document: &Document,
    queries: &CandidateQueries,
) -> Result<String, ExtractionError> {
    let rows = document.labeled_rows(&queries.type_rows, &queries.row_label, &queries.row_value)?;

    for label in TYPE_LABELS {
        if let Some((_, value)) = rows
            .iter()
            .find(|(header, _)| header.to_lowercase().contains(label))
        {
            return Ok(value.clone());
        }
    }

    let categories = extract_categories(document, &queries.categories)?;
    if let Some(category) = categories.into_iter().find(|category| {
        let lower = category.to_lowercase();
        ROLE_KEYWORDS.iter().any(|word| lower.contains(word))
    }) {
        return Ok(category);
    }

    Ok(DEFAULT_CHARACTER_TYPE.to_string())
}

/// All label/value rows of infobox-like structures
///
/// Labels are lower-cased; a later row with the same label replaces an
/// earlier one.
pub fn extract_infobox_data(
    document: &Document,
    queries: &CandidateQueries,
) -> Result<BTreeMap<String, String>, ExtractionError> {
    let rows =
        document.labeled_rows(&queries.infobox_rows, &queries.row_label, &queries.row_value)?;

    Ok(rows
        .into_iter()
        .map(|(label, value)| (label.to_lowercase(), value))
        .collect())
}

/// Fills the two attribute slots from [`ATTRIBUTE_PRIORITIES`]
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use wiki_harvest::extract::select_attributes;
///
/// let data = BTreeMap::from([("power".to_string(), "fire".to_string())]);
/// assert_eq!(select_attributes(&data), (Some("Power: fire".to_string()), None));
/// ```
pub fn select_attributes(data: &BTreeMap<String, String>) -> (Option<String>, Option<String>) {
    let mut found = ATTRIBUTE_PRIORITIES.iter().filter_map(|key| {
        data.get(*key)
            .map(|value| format!("{}: {}", title_case(key), value))
    });

    (found.next(), found.next())
}

/// Capitalizes the first letter of every alphabetic run, lower-cases the rest
///
/// `devil_fruit` becomes `Devil_Fruit`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

pub fn extract_categories(
    document: &Document,
    queries: &[String],
) -> Result<Vec<String>, ExtractionError> {
    collect_all(document, queries, |_| true)
}

/// In-content images passing the primary image rules, capped at five
///
/// Rejected sources (icons, placeholders) do not count toward the cap: it
/// applies to accepted images, so a leading icon never costs a gallery slot.
pub fn extract_additional_images(
    document: &Document,
    queries: &[String],
) -> Result<Vec<String>, ExtractionError> {
    let base = document.url();
    Ok(collect_all(document, queries, is_valid_image_url)?
        .iter()
        .filter_map(|src| resolve_image_url(base, src))
        .take(MAX_ADDITIONAL_IMAGES)
        .collect())
}

/// Assembles a [`Record`] from one content page
#[derive(Debug, Clone)]
pub struct Extractor {
    queries: CandidateQueries,
    site_url: String,
    site_name: String,
}

impl Extractor {
    pub fn new(
        queries: CandidateQueries,
        site_url: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            queries,
            site_url: site_url.into(),
            site_name: site_name.into(),
        }
    }

    /// Extracts every field of one page
    ///
    /// The primary image is the only vetoing field: without one the page
    /// yields `Ok(None)`. Every other field has a fallback.
    pub fn extract(&self, document: &Document) -> Result<Option<Record>, ExtractionError> {
        let queries = &self.queries;

        let name = extract_name(document, &queries.name)?;

        let image_url = match extract_main_image(document, &queries.image)? {
            Some(url) => url,
            None => {
                tracing::warn!("No image found for {}, skipping", document.url());
                return Ok(None);
            }
        };

        let description =
            extract_description(document, &queries.description, &queries.description_fallback)?;
        let character_type = extract_character_type(document, queries)?;
        let infobox_data = extract_infobox_data(document, queries)?;
        let (attribute_1, attribute_2) = select_attributes(&infobox_data);

        Ok(Some(Record {
            name,
            image_url,
            description,
            character_type,
            attribute_1,
            attribute_2,
            site_url: self.site_url.clone(),
            site_name: self.site_name.clone(),
            page_url: document.url().to_string(),
            scraped_at: Utc::now(),
            additional_images: extract_additional_images(document, &queries.additional_images)?,
            categories: extract_categories(document, &queries.categories)?,
            infobox_data,
        }))
    }
}
