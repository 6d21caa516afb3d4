/// Memes service API module
///
/// This module handles:
/// - Fetching the image list and thumbnails (client.rs)
/// - Building shareable links for images (links.rs)

pub mod client;
pub mod links;
