use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Media category discriminator, selects the upstream collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    /// Upstream collection path segment
    pub fn collection(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Audio => "audio",
        }
    }

    /// Lowercase noun used in error messages
    pub fn noun(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio => "audio",
        }
    }

    pub fn not_found_message(&self) -> String {
        match self {
            MediaKind::Image => "Image not found".to_string(),
            MediaKind::Audio => "Audio not found".to_string(),
        }
    }

    pub fn search_failed_message(&self) -> String {
        format!("Failed to search {}", self.collection())
    }

    pub fn get_failed_message(&self) -> String {
        format!("Failed to get {}", self.noun())
    }
}

/// A record type served by one upstream collection
pub trait MediaRecord: serde::de::DeserializeOwned + Serialize + Send {
    const KIND: MediaKind;
}

// Upstream records are relayed to the caller as received: every field except
// `id` may be absent or `null`, and `null` is re-emitted as `null`. Keys not
// modelled here land in `extra`.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(rename = "unstable__provider", default)]
    pub unstable_provider: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltFile {
    pub url: String,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub bit_rate: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub creator_url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub license_version: Option<String>,
    #[serde(default)]
    pub foreign_landing_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub fields_matched: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(default)]
    pub mature: Option<bool>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaRecord for Image {
    const KIND: MediaKind = MediaKind::Image;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Audio {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub creator_url: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub license_version: Option<String>,
    #[serde(default)]
    pub foreign_landing_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default)]
    pub fields_matched: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    /// Milliseconds
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub bit_rate: Option<u64>,
    #[serde(default)]
    pub sample_rate: Option<u64>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub audio_set: Option<Value>,
    #[serde(default)]
    pub filesize: Option<u64>,
    #[serde(default)]
    pub mature: Option<bool>,
    #[serde(default)]
    pub alt_files: Option<Vec<AltFile>>,
    #[serde(default)]
    pub attribution: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MediaRecord for Audio {
    const KIND: MediaKind = MediaKind::Audio;
}

/// Paginated upstream listing, passed through as received
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub result_count: u64,
    pub page_count: u64,
    pub page_size: u32,
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub warnings: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
