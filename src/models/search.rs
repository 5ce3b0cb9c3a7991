use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::media::{Audio, Image, MediaKind, MediaRecord};

pub const MAX_PAGE_SIZE: u32 = 100;
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_PAGE: u32 = 1;

/// Creative Commons license codes accepted by the upstream filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum License {
    #[serde(rename = "by")]
    By,
    #[serde(rename = "by-sa")]
    BySa,
    #[serde(rename = "by-nc")]
    ByNc,
    #[serde(rename = "by-nd")]
    ByNd,
    #[serde(rename = "by-nc-sa")]
    ByNcSa,
    #[serde(rename = "by-nc-nd")]
    ByNcNd,
    #[serde(rename = "pdm")]
    Pdm,
    #[serde(rename = "cc0")]
    Cc0,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageCategory {
    Photograph,
    Illustration,
    DigitizedArtwork,
}

/// Search parameters for one upstream collection.
///
/// The serialized form is the upstream query string: absent filters are
/// omitted and enums travel as their literal codes.
pub trait MediaQuery: Serialize + Sync {
    type Item: MediaRecord;

    fn query(&self) -> &str;
    fn page(&self) -> u32;
    fn page_size(&self) -> u32;

    fn kind(&self) -> MediaKind {
        Self::Item::KIND
    }

    fn validate(&self) -> AppResult<()> {
        if self.query().trim().is_empty() {
            return Err(AppError::InvalidRequest("q should not be empty".to_string()));
        }
        if self.page() < 1 {
            return Err(AppError::InvalidRequest(
                "page must not be less than 1".to_string(),
            ));
        }
        if self.page_size() < 1 || self.page_size() > MAX_PAGE_SIZE {
            return Err(AppError::InvalidRequest(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSearchParams {
    pub q: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ImageCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Comma separated, e.g. `nature,landscape`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSearchParams {
    pub q: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<String>,
    /// Range in seconds, e.g. `0-300`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

impl ImageSearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page: DEFAULT_PAGE,
            license: None,
            category: None,
            source: None,
            creator: None,
            tags: None,
        }
    }
}

impl AudioSearchParams {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page_size: DEFAULT_PAGE_SIZE,
            page: DEFAULT_PAGE,
            license: None,
            source: None,
            creator: None,
            genres: None,
            duration: None,
            tags: None,
        }
    }
}

impl MediaQuery for ImageSearchParams {
    type Item = Image;

    fn query(&self) -> &str {
        &self.q
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}

impl MediaQuery for AudioSearchParams {
    type Item = Audio;

    fn query(&self) -> &str {
        &self.q
    }

    fn page(&self) -> u32 {
        self.page
    }

    fn page_size(&self) -> u32 {
        self.page_size
    }
}
