//! Next-page discovery from GitHub's `Link` response header.

use reqwest::header::{HeaderMap, LINK};
use url::Url;

/// Pagination links found in a `Link` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPagination {
    /// Page number of the `rel="next"` link.
    pub next_page: Option<u32>,
    /// Page number of the `rel="last"` link.
    pub last_page: Option<u32>,
}

impl LinkPagination {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .map(parse_link_header)
            .unwrap_or_default()
    }

    /// Next page cursor, `0` once the last page has been reached.
    pub fn next_cursor(&self) -> u32 {
        self.next_page.unwrap_or(0)
    }
}

/// Parse a header such as
/// `<https://api.github.com/user/1/followers?per_page=100&page=2>; rel="next", <...&page=5>; rel="last"`.
pub fn parse_link_header(link_header: &str) -> LinkPagination {
    let mut info = LinkPagination::default();

    for part in link_header.split(',') {
        let mut url = None;
        let mut rel = None;

        for segment in part.split(';').map(str::trim) {
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(value) = segment.strip_prefix("rel=") {
                rel = Some(value.trim_matches('"'));
            }
        }

        let (Some(url), Some(rel)) = (url, rel) else {
            continue;
        };
        let Some(page) = page_param(url) else {
            continue;
        };

        match rel {
            "next" => info.next_page = Some(page),
            "last" => info.last_page = Some(page),
            _ => {}
        }
    }

    info
}

fn page_param(url: &str) -> Option<u32> {
    let url = Url::parse(url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
