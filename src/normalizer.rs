use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashSet;

use crate::errors::ItemParseError;
use crate::filter::Blocklist;

/// One SERP page as returned by the google scraper.
#[derive(Debug, Deserialize)]
pub struct OrganicPage {
    pub organic_results: Vec<LinkSlot>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LinkSlot {
    Link { link: String },
    Other(IgnoredAny),
}

/// A page slot that may or may not be a SERP page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PageSlot {
    Organic(OrganicPage),
    Other(IgnoredAny),
}

#[derive(Debug, Deserialize)]
pub struct LinkList {
    pub results: Vec<LinkSlot>,
}

/// Per-query result, in one of the shapes the search service has been
/// observed to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchItem {
    /// `{"results": [[{"organic_results": [{"link": ..}]}]]}`, one inner
    /// list per requested page.
    Paged { results: Vec<Vec<PageSlot>> },
    /// `{"results": {"results": [{"link": ..}]}}`
    Wrapped { results: LinkList },
    /// `[{"organic_results": [{"link": ..}]}]`
    Pages(Vec<PageSlot>),
    Unrecognized(serde_json::Value),
}

impl SearchItem {
    /// Links carried by this item, or `None` if the item holds no
    /// organic results at all.
    pub fn into_links(self) -> Option<Vec<String>> {
        let links_of = |slots: Vec<LinkSlot>| {
            slots.into_iter().filter_map(|slot| match slot {
                LinkSlot::Link { link } => Some(link),
                LinkSlot::Other(_) => None,
            })
        };
        let organic = |pages: Vec<PageSlot>| {
            pages
                .into_iter()
                .filter_map(|page| match page {
                    PageSlot::Organic(page) => Some(page.organic_results),
                    PageSlot::Other(_) => None,
                })
                .collect::<Vec<_>>()
        };

        let pages = match self {
            SearchItem::Paged { results } => organic(results.into_iter().flatten().collect()),
            SearchItem::Pages(pages) => organic(pages),
            SearchItem::Wrapped { results } => return Some(links_of(results.results).collect()),
            SearchItem::Unrecognized(_) => return None,
        };
        if pages.is_empty() {
            return None;
        }
        Some(pages.into_iter().flat_map(links_of).collect())
    }
}

/// Whole search response: one item per query, in catalog order.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Normalized {
    /// Unblocked, deduplicated urls in first-seen order.
    pub urls: Vec<String>,
    /// Number of per-query results (items) in the response.
    pub results: usize,
    /// Items that carried no recognizable organic results.
    pub failed: usize,
    /// Links collected across all items, before filtering.
    pub total_links: usize,
    /// Links dropped by the blocklist.
    pub filtered_out: usize,
}

/// Flattens a search response into a list of lead candidate urls.
///
/// Never fails: items in an unknown shape are counted in `failed` and
/// skipped.
pub fn normalize(response: SearchResponse, blocklist: &Blocklist) -> Normalized {
    let results = response.items.len();
    let mut failed = 0;
    let mut all_links = Vec::new();

    for (index, item) in response.items.into_iter().enumerate() {
        match item.into_links() {
            Some(links) => all_links.extend(links),
            None => {
                failed += 1;
                let err = ItemParseError {
                    kind: "search",
                    index,
                    reason: "no organic results".to_string(),
                };
                log::debug!("{err}");
            }
        }
    }

    let total_links = all_links.len();
    let unblocked: Vec<String> = all_links
        .into_iter()
        .filter(|url| !blocklist.blocks(url))
        .collect();
    let filtered_out = total_links - unblocked.len();

    Normalized {
        urls: dedup(unblocked),
        results,
        failed,
        total_links,
        filtered_out,
    }
}

/// Filters and deduplicates a plain url list. Applying it to its own output
/// is a no-op.
pub fn normalize_urls<I>(urls: I, blocklist: &Blocklist) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    dedup(urls.into_iter().filter(|url| !blocklist.blocks(url)))
}

fn dedup<I>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
