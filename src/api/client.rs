use log::{error, info};
use reqwest::Client;
use url::Url;

use super::links;
use crate::error::ApiError;
use crate::state::data::{Image, ImageList};

/// Client for the memes service
///
/// Cheap to clone; clones share one connection pool, so each background
/// task can own its copy.
#[derive(Debug, Clone)]
pub struct MemesClient {
    http: Client,
    base: Url,
}

impl MemesClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: Client::new(),
            base,
        }
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Fetch the full image list in server order.
    ///
    /// No paging or filtering parameters are sent; the whole list comes
    /// back in one response.
    pub async fn fetch_images(&self) -> Result<Vec<Image>, ApiError> {
        let url = links::endpoint(&self.base, &["allimages"]);
        info!("🌐 Fetching image list from {}", url);

        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let list = ImageList::from_json(&body)?;
        Ok(list.images)
    }

    /// Fetch the JPEG thumbnail for an image
    pub async fn fetch_thumbnail(&self, image: &Image) -> Result<Vec<u8>, ApiError> {
        let url = links::thumbnail_link(&self.base, image);

        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }

    /// Check the service is up: `/up` must answer exactly `OK`
    pub async fn healthcheck(&self) -> Result<(), ApiError> {
        let url = links::endpoint(&self.base, &["up"]);

        let body = match self.http.get(url).send().await {
            Ok(response) => response.error_for_status()?.text().await?,
            Err(err) => {
                error!("Unable to reach {}", self.base);
                return Err(err.into());
            }
        };

        if body == "OK" {
            Ok(())
        } else {
            Err(ApiError::UnexpectedBody(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Port 9 (discard) on loopback; nothing listens there in CI
    fn unreachable_client() -> MemesClient {
        MemesClient::new(Url::parse("http://127.0.0.1:9/").unwrap())
    }

    #[tokio::test]
    async fn test_fetch_images_unreachable() {
        let result = unreachable_client().fetch_images().await;

        assert!(matches!(result, Err(ApiError::Request(_))));
    }

    #[tokio::test]
    async fn test_healthcheck_unreachable() {
        let result = unreachable_client().healthcheck().await;

        assert!(matches!(result, Err(ApiError::Request(_))));
    }

    #[test]
    fn test_clone_shares_base() {
        let client = unreachable_client();

        assert_eq!(client.clone().base(), client.base());
    }
}
