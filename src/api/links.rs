/// Link builders for gallery images
///
/// All links hang off the service base address. Image names are pushed
/// as a single path segment, so spaces become `%20` and slashes are escaped.

use url::Url;

use crate::state::data::Image;

/// Build `{base}/{segments...}`, dropping any query or fragment on `base`
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    // Only cannot-be-a-base addresses (mailto:, data:) refuse segments;
    // config validation keeps those out.
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }

    url
}

/// Direct link to the full-size image
pub fn direct_link(base: &Url, image: &Image) -> Url {
    endpoint(base, &["image", image.name()])
}

/// Markdown image embed pointing at the direct link
pub fn markdown_link(base: &Url, image: &Image) -> String {
    format!("![{}]({})", image.name(), direct_link(base, image))
}

/// Share page for a single image
pub fn info_link(base: &Url, image: &Image) -> Url {
    endpoint(base, &["image_info", image.name()])
}

/// 200x200 JPEG thumbnail
pub fn thumbnail_link(base: &Url, image: &Image) -> Url {
    endpoint(base, &["thumbnail", image.name()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://memes.example.com/").unwrap()
    }

    #[test]
    fn test_direct_link_encodes_spaces() {
        let link = direct_link(&base(), &Image::from("grumpy cat.png"));

        assert_eq!(link.as_str(), "https://memes.example.com/image/grumpy%20cat.png");
    }

    #[test]
    fn test_markdown_link() {
        let link = markdown_link(&base(), &Image::from("grumpy cat.png"));

        assert_eq!(
            link,
            "![grumpy cat.png](https://memes.example.com/image/grumpy%20cat.png)"
        );
    }

    #[test]
    fn test_links_keep_base_path_and_drop_query() {
        let base = Url::parse("https://example.com/memes/?q=cat&p=2").unwrap();
        let image = Image::from("dog.png");

        assert_eq!(
            thumbnail_link(&base, &image).as_str(),
            "https://example.com/memes/thumbnail/dog.png"
        );
        assert_eq!(
            info_link(&base, &image).as_str(),
            "https://example.com/memes/image_info/dog.png"
        );
    }

    #[test]
    fn test_endpoint_without_trailing_slash() {
        let base = Url::parse("http://localhost:8000").unwrap();

        assert_eq!(endpoint(&base, &["allimages"]).as_str(), "http://localhost:8000/allimages");
    }

    #[test]
    fn test_slash_in_name_stays_one_segment() {
        let link = direct_link(&base(), &Image::from("folder/cat.png"));

        assert_eq!(link.as_str(), "https://memes.example.com/image/folder%2Fcat.png");
    }
}
