//! The harvested record and its on-disk schema
//!
//! Field names serialize exactly as downstream consumers expect them
//! (`image_url`, `fandom_name`, ...), so renaming a Rust field must keep its
//! serde name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entity extracted from one content page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,

    /// Absolute, cleaned URL of the primary image
    pub image_url: String,

    /// May be empty
    pub description: String,

    /// Category or role label
    pub character_type: String,

    /// First prioritized attribute, formatted `"Label: Value"`
    pub attribute_1: Option<String>,

    pub attribute_2: Option<String>,

    /// Root URL of the wiki
    #[serde(rename = "fandom_url")]
    pub site_url: String,

    #[serde(rename = "fandom_name")]
    pub site_name: String,

    pub page_url: String,

    pub scraped_at: DateTime<Utc>,

    /// At most five, same rules as `image_url`
    pub additional_images: Vec<String>,

    /// Page category tags in page order, duplicates kept
    pub categories: Vec<String>,

    /// Lower-cased infobox label to value
    pub infobox_data: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record {
            name: "Yoda".to_string(),
            image_url: "https://static.example.net/Yoda.png".to_string(),
            description: String::new(),
            character_type: "Jedi".to_string(),
            attribute_1: Some("Height: 0.66 meters".to_string()),
            attribute_2: None,
            site_url: "https://starwars.fandom.com".to_string(),
            site_name: "starwars".to_string(),
            page_url: "https://starwars.fandom.com/wiki/Yoda".to_string(),
            scraped_at: Utc::now(),
            additional_images: vec![],
            categories: vec!["Jedi Masters".to_string()],
            infobox_data: BTreeMap::from([("height".to_string(), "0.66 meters".to_string())]),
        }
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "additional_images",
                "attribute_1",
                "attribute_2",
                "categories",
                "character_type",
                "description",
                "fandom_name",
                "fandom_url",
                "image_url",
                "infobox_data",
                "name",
                "page_url",
                "scraped_at",
            ]
        );
    }

    #[test]
    fn test_unset_attribute_is_null() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value["attribute_2"].is_null());
        assert_eq!(value["attribute_1"], "Height: 0.66 meters");
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let value = serde_json::to_value(sample()).unwrap();
        let raw = value["scraped_at"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(raw).is_ok());
    }
}
