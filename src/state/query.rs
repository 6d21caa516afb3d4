/// Address query string handling
///
/// The gallery keeps its search term and page number in the address
/// (`?q=cat&p=2`) so a view can be bookmarked and shared.

use url::Url;

/// Query key holding the search term
pub const SEARCH_KEY: &str = "q";
/// Query key holding the 1-based page number
pub const PAGE_KEY: &str = "p";

/// Search and page state as carried by an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search: String,
    pub page: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

impl QueryState {
    /// Read `q` and `p` from an address.
    ///
    /// Missing, empty or malformed values fall back to the defaults
    /// (no search, page 1). Only the first occurrence of a key counts.
    pub fn from_url(url: &Url) -> Self {
        let mut state = Self::default();

        if let Some(search) = first_value(url, SEARCH_KEY) {
            if !search.is_empty() {
                state.search = search;
            }
        }

        if let Some(page) = first_value(url, PAGE_KEY).as_deref().and_then(parse_page) {
            state.page = page;
        }

        state
    }

    /// Replace the query of `url` with this state.
    ///
    /// `q` is always written, even when empty. Scheme, host, path and
    /// fragment are left alone.
    pub fn write_to(&self, url: &mut Url) {
        url.query_pairs_mut()
            .clear()
            .append_pair(SEARCH_KEY, &self.search)
            .append_pair(PAGE_KEY, &self.page.to_string());
    }
}

fn first_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Pages are positive integers; anything else is treated as absent
fn parse_page(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|page| *page > 0)
}

/// Resolve the address the gallery starts at.
///
/// `location` may be a full address or something relative to `base`,
/// typically a bare query string like `?q=cat&p=2`.
pub fn resolve_location(base: &Url, location: Option<&str>) -> Result<Url, url::ParseError> {
    match location {
        Some(location) => base.join(location),
        None => Ok(base.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_defaults_without_query() {
        let state = QueryState::from_url(&url("https://memes.example.com/"));

        assert_eq!(state, QueryState::default());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_reads_search_and_page() {
        let state = QueryState::from_url(&url("https://memes.example.com/?q=Cat+Dog&p=3"));

        assert_eq!(state.search, "Cat Dog");
        assert_eq!(state.page, 3);
    }

    #[test]
    fn test_malformed_page_falls_back_to_first() {
        for raw in ["p=", "p=abc", "p=0", "p=-2", "p=1.5"] {
            let state = QueryState::from_url(&url(&format!("https://memes.example.com/?{}", raw)));
            assert_eq!(state.page, 1, "query {:?}", raw);
        }
    }

    #[test]
    fn test_huge_page_is_read_as_given() {
        // Out-of-range pages are kept; the gallery shows them as empty
        let state = QueryState::from_url(&url("https://memes.example.com/?p=18446744073709551615"));
        assert_eq!(state.page, usize::MAX);

        // Beyond usize it no longer parses and falls back
        let state = QueryState::from_url(&url("https://memes.example.com/?p=18446744073709551616"));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn test_empty_search_is_no_search() {
        let state = QueryState::from_url(&url("https://memes.example.com/?q=&p=2"));

        assert_eq!(state.search, "");
        assert_eq!(state.page, 2);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let state = QueryState::from_url(&url("https://memes.example.com/?q=cat&q=dog"));

        assert_eq!(state.search, "cat");
    }

    #[test]
    fn test_write_always_includes_search_key() {
        let mut address = url("https://memes.example.com/gallery?old=1");
        QueryState::default().write_to(&mut address);

        assert_eq!(address.as_str(), "https://memes.example.com/gallery?q=&p=1");
    }

    #[test]
    fn test_write_then_read_round_trips() {
        let state = QueryState {
            search: "Grumpy cat & friends".to_string(),
            page: 4,
        };
        let mut address = url("https://memes.example.com/");
        state.write_to(&mut address);

        assert_eq!(QueryState::from_url(&address), state);
    }

    #[test]
    fn test_resolve_bare_query() {
        let base = url("https://memes.example.com/");
        let resolved = resolve_location(&base, Some("?q=cat&p=2")).unwrap();

        assert_eq!(resolved.as_str(), "https://memes.example.com/?q=cat&p=2");
        assert_eq!(resolve_location(&base, None).unwrap(), base);
    }

    #[test]
    fn test_resolve_absolute_address() {
        let base = url("https://memes.example.com/");
        let resolved = resolve_location(&base, Some("http://localhost:8000/?q=dog")).unwrap();

        assert_eq!(resolved.host_str(), Some("localhost"));
        assert_eq!(QueryState::from_url(&resolved).search, "dog");
    }
}
