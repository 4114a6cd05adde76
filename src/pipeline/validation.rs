use crate::record::Record;
use thiserror::Error;

pub const MIN_NAME_CHARS: usize = 2;

/// Category/type given to records that reach cleaning without one
pub const UNKNOWN_CHARACTER_TYPE: &str = "Unknown";

/// Required-field failures; the record is dropped, the run continues
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid name: '{0}'")]
    NameTooShort(String),

    #[error("Image URL is required")]
    MissingImage,

    #[error("Invalid image URL: {0}")]
    InvalidImageUrl(String),
}

/// Checks the required-field rules
///
/// Records are never corrected here: a short name or an unusable image URL
/// rejects the record outright.
pub fn validate_record(record: &Record) -> Result<(), ValidationError> {
    if record.name.trim().chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort(record.name.clone()));
    }

    if record.image_url.trim().is_empty() {
        return Err(ValidationError::MissingImage);
    }

    if !record.image_url.starts_with("http://") && !record.image_url.starts_with("https://") {
        return Err(ValidationError::InvalidImageUrl(record.image_url.clone()));
    }

    Ok(())
}

/// Trims the free-text fields and fills an empty category/type
pub fn clean_record(mut record: Record) -> Record {
    record.name = record.name.trim().to_string();
    record.description = record.description.trim().to_string();
    record.character_type = record.character_type.trim().to_string();

    if record.character_type.is_empty() {
        record.character_type = UNKNOWN_CHARACTER_TYPE.to_string();
    }

    record
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::BTreeMap;

    pub(crate) fn record(name: &str, image_url: &str) -> Record {
        Record {
            name: name.to_string(),
            image_url: image_url.to_string(),
            description: String::new(),
            character_type: "Character".to_string(),
            attribute_1: None,
            attribute_2: None,
            site_url: "https://wiki.example.com".to_string(),
            site_name: "wiki".to_string(),
            page_url: format!("https://wiki.example.com/wiki/{}", name.trim()),
            scraped_at: Utc::now(),
            additional_images: vec![],
            categories: vec![],
            infobox_data: BTreeMap::new(),
        }
    }

    #[test]
    fn test_valid_record() {
        assert_eq!(
            validate_record(&record("Yoda", "https://cdn.example.com/Yoda.png")),
            Ok(())
        );
    }

    #[test]
    fn test_short_name() {
        assert_eq!(
            validate_record(&record(" Y ", "https://cdn.example.com/Yoda.png")),
            Err(ValidationError::NameTooShort(" Y ".to_string()))
        );
        assert!(validate_record(&record("", "https://cdn.example.com/a.png")).is_err());
    }

    #[test]
    fn test_image_rules() {
        assert_eq!(
            validate_record(&record("Yoda", "")),
            Err(ValidationError::MissingImage)
        );
        assert_eq!(
            validate_record(&record("Yoda", "//cdn.example.com/Yoda.png")),
            Err(ValidationError::InvalidImageUrl(
                "//cdn.example.com/Yoda.png".to_string()
            ))
        );
        assert!(validate_record(&record("Yoda", "http://cdn.example.com/Yoda.png")).is_ok());
    }

    #[test]
    fn test_clean_trims_and_defaults_type() {
        let mut raw = record("  Yoda ", "https://cdn.example.com/Yoda.png");
        raw.description = "  Jedi Master.\n".to_string();
        raw.character_type = "   ".to_string();

        let cleaned = clean_record(raw);
        assert_eq!(cleaned.name, "Yoda");
        assert_eq!(cleaned.description, "Jedi Master.");
        assert_eq!(cleaned.character_type, UNKNOWN_CHARACTER_TYPE);
    }
}
