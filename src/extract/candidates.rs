use serde::Deserialize;

const NAME: &[&str] = &[
    "h1.page-header__title::text",
    "h1.title::text",
    "h1#firstHeading::text",
    "h1.mw-page-title-main::text",
    ".mw-page-title-main::text",
    ".page-title::text",
    "h1::text",
    "#content h1::text",
    ".mw-parser-output h1::text",
];

// Infobox images first, then templates, then general content images
const IMAGE: &[&str] = &[
    ".infobox img::attr(src)",
    ".portable-infobox img::attr(src)",
    ".infobox-image img::attr(src)",
    ".infobox .image img::attr(src)",
    ".character-infobox img::attr(src)",
    ".hero-infobox img::attr(src)",
    ".pokemon-infobox img::attr(src)",
    ".mw-content-text p:first-of-type img::attr(src)",
    ".article-content img:first-of-type::attr(src)",
    "figure.thumb img::attr(src)",
    ".thumbinner img::attr(src)",
];

const DESCRIPTION: &[&str] = &[
    ".mw-content-text > p:first-of-type",
    ".article-content > p:first-of-type",
    ".character-bio",
    ".description",
];

const DESCRIPTION_FALLBACK: &[&str] = &[".mw-content-text p, #mw-content-text p"];

const INFOBOX_ROWS: &[&str] = &[
    ".infobox tr",
    ".portable-infobox .pi-item",
    ".character-infobox tr",
];

const TYPE_ROWS: &[&str] = &[".portable-infobox .pi-item", "tr"];

const ROW_LABEL: &[&str] = &["th, .pi-data-label"];

const ROW_VALUE: &[&str] = &["td, .pi-data-value"];

const CATEGORIES: &[&str] = &[".page-footer__categories a::text"];

const ADDITIONAL_IMAGES: &[&str] =
    &[".mw-content-text img::attr(src), #mw-content-text img::attr(src)"];

const LISTING_LINKS: &[&str] = &[
    "div.category-page__members a::attr(href)",
    "div.category-page__member a::attr(href)",
    "li.category-page__member a::attr(href)",
    "div.mw-content-text ul li a::attr(href)",
    "div#mw-content-text ul li a::attr(href)",
    "div.mw-category-group ul li a::attr(href)",
    "div.CategoryTreeChildren a::attr(href)",
    "table.wikitable td a::attr(href)",
    ".category-page__trending-pages a::attr(href)",
];

const NEXT_PAGE: &[&str] = &[
    "a.category-page__pagination-next::attr(href)",
    r#"a[rel="next"]::attr(href)"#,
    ".mw-nextlink::attr(href)",
];

/// Ordered candidate query lists, one per extracted field
///
/// Lists run from most specific (a dedicated infobox structure) to most
/// generic (the first heading on the page). Any list can be replaced from the
/// `[queries]` table of the config file; omitted lists keep these defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CandidateQueries {
    pub name: Vec<String>,
    pub image: Vec<String>,
    pub description: Vec<String>,
    /// Paragraph queries whose first three results are joined when no
    /// description candidate is long enough
    pub description_fallback: Vec<String>,
    pub infobox_rows: Vec<String>,
    /// Rows searched for the category/type label
    pub type_rows: Vec<String>,
    pub row_label: Vec<String>,
    pub row_value: Vec<String>,
    pub categories: Vec<String>,
    pub additional_images: Vec<String>,
    pub listing_links: Vec<String>,
    pub next_page: Vec<String>,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|q| q.to_string()).collect()
}

impl Default for CandidateQueries {
    fn default() -> Self {
        Self {
            name: owned(NAME),
            image: owned(IMAGE),
            description: owned(DESCRIPTION),
            description_fallback: owned(DESCRIPTION_FALLBACK),
            infobox_rows: owned(INFOBOX_ROWS),
            type_rows: owned(TYPE_ROWS),
            row_label: owned(ROW_LABEL),
            row_value: owned(ROW_VALUE),
            categories: owned(CATEGORIES),
            additional_images: owned(ADDITIONAL_IMAGES),
            listing_links: owned(LISTING_LINKS),
            next_page: owned(NEXT_PAGE),
        }
    }
}

impl CandidateQueries {
    /// Every list with its config key, for validation and dry-run output
    pub fn lists(&self) -> [(&'static str, &Vec<String>); 12] {
        [
            ("name", &self.name),
            ("image", &self.image),
            ("description", &self.description),
            ("description-fallback", &self.description_fallback),
            ("infobox-rows", &self.infobox_rows),
            ("type-rows", &self.type_rows),
            ("row-label", &self.row_label),
            ("row-value", &self.row_value),
            ("categories", &self.categories),
            ("additional-images", &self.additional_images),
            ("listing-links", &self.listing_links),
            ("next-page", &self.next_page),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Query;

    #[test]
    fn test_defaults_all_parse() {
        let queries = CandidateQueries::default();
        for (field, list) in queries.lists() {
            for raw in list {
                assert!(Query::parse(raw).is_ok(), "{} query '{}' should parse", field, raw);
            }
        }
    }

    #[test]
    fn test_image_candidates_are_infobox_first() {
        let queries = CandidateQueries::default();
        assert!(queries.image[0].contains("infobox"));
        assert!(queries.image.last().unwrap().contains("thumbinner"));
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let queries: CandidateQueries =
            toml::from_str(r#"next-page = ["a.next::attr(href)"]"#).unwrap();
        assert_eq!(queries.next_page, vec!["a.next::attr(href)"]);
        assert_eq!(queries.name, owned(NAME));
    }
}
