/// Gallery view model
///
/// Holds the fetched image list plus the user-facing search and page state.
/// Filtered and paginated views are derived on every read, never cached,
/// so they always reflect the latest search term. Every search or page
/// change is written back into the address without keeping history.

use log::{debug, info};
use std::time::Duration;
use url::Url;

use super::data::Image;
use super::query::QueryState;
use crate::api::links;

/// Number of images shown per page
pub const PAGE_SIZE: usize = 15;

/// How long a copy button stays highlighted after a copy
pub const COPY_HIGHLIGHT_DELAY: Duration = Duration::from_millis(1000);

/// The two copy affordances on the selected image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyButton {
    /// Plain link to the full-size image (`button_copy`)
    Direct,
    /// Markdown image embed (`button_md`)
    Markdown,
}

pub struct GalleryState {
    /// Raw image list, replaced wholesale when a fetch completes
    images: Vec<Image>,
    /// Search term as typed; lower-cased only when matching
    search: String,
    /// 1-based page number
    current_page: usize,
    /// Current address, rewritten on every search/page change
    address: Url,
    /// Image whose links the copy buttons act on
    selected: Option<Image>,
    button_copy: bool,
    button_md: bool,
}

impl GalleryState {
    /// Seed search and page from the address query.
    ///
    /// The image list starts empty; the caller issues the fetch and hands
    /// the result to [`GalleryState::replace_images`].
    pub fn from_address(address: Url) -> Self {
        let query = QueryState::from_url(&address);

        info!(
            "🔎 Gallery starting at page {} with search {:?}",
            query.page, query.search
        );

        Self {
            images: Vec::new(),
            search: query.search,
            current_page: query.page,
            address,
            selected: None,
            button_copy: false,
            button_md: false,
        }
    }

    /// Replace the raw image list with a freshly fetched one
    pub fn replace_images(&mut self, images: Vec<Image>) {
        info!("🖼️  Loaded {} images", images.len());
        self.images = images;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    /// Images matching every token of the search term, in list order
    pub fn filtered_images(&self) -> Vec<&Image> {
        filter_images(&self.images, &self.search)
    }

    /// The current page of the filtered view
    pub fn paginated_images(&self) -> Vec<&Image> {
        page_slice(&self.filtered_images(), self.current_page).to_vec()
    }

    /// Images on the current page and `margin` pages either side of it
    pub fn nearby_images(&self, margin: usize) -> Vec<&Image> {
        let filtered = self.filtered_images();
        let first = self.current_page.saturating_sub(margin).max(1);
        let last = self.current_page.saturating_add(margin);

        let mut nearby = Vec::new();
        for page in first..=last {
            let slice = page_slice(&filtered, page);
            if slice.is_empty() {
                break;
            }
            nearby.extend_from_slice(slice);
        }
        nearby
    }

    pub fn count_filtered_images(&self) -> usize {
        self.filtered_images().len()
    }

    pub fn total_images(&self) -> usize {
        self.images.len()
    }

    /// Pages needed for the filtered view; 0 when nothing matches
    pub fn page_count(&self) -> usize {
        page_count(self.count_filtered_images())
    }

    /// Update the search term, snapping back to page 1 if the current
    /// page no longer exists, then rewrite the address.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search = term.into();

        // The page count shrinks with the filtered view; fall back to the
        // first page rather than showing an empty one
        if self.current_page > self.page_count() {
            self.current_page = 1;
        }

        self.update_url();
    }

    /// Jump to a 1-based page.
    ///
    /// No bounds check against [`GalleryState::page_count`]; the pagination
    /// control only offers valid pages.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page;
        self.update_url();
    }

    pub fn reset_search(&mut self) {
        self.set_search_term("");
    }

    /// Write search and page into the address query (non-navigating)
    pub fn update_url(&mut self) {
        // Only the query changes; there is no history to push onto
        QueryState {
            search: self.search.clone(),
            page: self.current_page,
        }
        .write_to(&mut self.address);

        debug!("🔗 Address is now {}", self.address);
    }

    pub fn selected(&self) -> Option<&Image> {
        self.selected.as_ref()
    }

    pub fn select_image(&mut self, image: Option<Image>) {
        self.selected = image;
    }

    /// Text the given copy button puts on the clipboard for the selected
    /// image, highlighting the button. `None` if nothing is selected.
    ///
    /// The caller schedules [`highlight_reset`]; earlier timers are not
    /// cancelled, so an older timer may clear a newer highlight early.
    pub fn copy_link(&mut self, button: CopyButton, base: &Url) -> Option<String> {
        let image = self.selected.as_ref()?;

        let text = match button {
            CopyButton::Direct => links::direct_link(base, image).to_string(),
            CopyButton::Markdown => links::markdown_link(base, image),
        };

        info!("📋 Copied {:?} link for {}", button, image);
        self.mark_copied(button);
        Some(text)
    }

    pub fn mark_copied(&mut self, button: CopyButton) {
        *self.flag_mut(button) = true;
    }

    pub fn clear_highlight(&mut self, button: CopyButton) {
        *self.flag_mut(button) = false;
    }

    pub fn is_highlighted(&self, button: CopyButton) -> bool {
        match button {
            CopyButton::Direct => self.button_copy,
            CopyButton::Markdown => self.button_md,
        }
    }

    fn flag_mut(&mut self, button: CopyButton) -> &mut bool {
        match button {
            CopyButton::Direct => &mut self.button_copy,
            CopyButton::Markdown => &mut self.button_md,
        }
    }
}

/// Case-insensitive AND match: every space-separated token of `search`
/// must occur somewhere in the image name.
///
/// Tokens come from splitting on single spaces only, so repeated spaces
/// yield empty tokens, which match anything.
pub fn matches_search(image: &Image, search: &str) -> bool {
    let search = search.to_lowercase();
    if search.is_empty() {
        return true;
    }

    let key = image.search_key();
    search.split(' ').all(|token| key.contains(token))
}

pub fn filter_images<'a>(images: &'a [Image], search: &str) -> Vec<&'a Image> {
    images
        .iter()
        .filter(|image| matches_search(image, search))
        .collect()
}

/// `ceil(count / PAGE_SIZE)`
pub fn page_count(count: usize) -> usize {
    count.div_ceil(PAGE_SIZE)
}

/// Items on 1-based `page`, i.e. `[(page-1)*PAGE_SIZE, page*PAGE_SIZE)`
/// clamped to what exists. Page 0, and pages whose offset would overflow,
/// are empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = page.checked_sub(1).and_then(|p| p.checked_mul(PAGE_SIZE));
    let Some(start) = start.filter(|start| *start < items.len()) else {
        return &[];
    };

    // Overflow here means "past the end", which the clamp handles anyway
    let end = page.checked_mul(PAGE_SIZE).unwrap_or(usize::MAX).min(items.len());
    &items[start..end]
}

/// One-shot timer for a copy highlight; resolves to the button to clear
pub async fn highlight_reset(button: CopyButton) -> CopyButton {
    tokio::time::sleep(COPY_HIGHLIGHT_DELAY).await;
    button
}
