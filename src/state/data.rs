/// Shared data structures for the gallery state
///
/// These structs represent the data model that flows between
/// the image-list endpoint and the UI layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a single image in the gallery
///
/// The server identifies images by their object key (e.g., "cat dog.png"),
/// so an image is just that key. Immutable once fetched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Image(String);

impl Image {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Object key as returned by the server
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used when matching search tokens
    pub fn search_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Image {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Image {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Body of the `/allimages` response
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ImageList {
    /// Image keys in server order
    pub images: Vec<Image>,
}

impl ImageList {
    /// Parse from a JSON response body
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_list() {
        let list = ImageList::from_json(r#"{"images": ["cat.png", "Dog Meme.JPG"]}"#).unwrap();

        assert_eq!(list.images, vec![Image::from("cat.png"), Image::from("Dog Meme.JPG")]);
    }

    #[test]
    fn test_missing_images_field_is_an_error() {
        assert!(ImageList::from_json(r#"{"files": []}"#).is_err());
    }

    #[test]
    fn test_search_key_preserves_name() {
        let image = Image::from("Dog Meme.JPG");

        assert_eq!(image.search_key(), "dog meme.jpg");
        assert_eq!(image.name(), "Dog Meme.JPG");
        assert_eq!(image.to_string(), "Dog Meme.JPG");
    }
}
