use crate::record::Record;
use url::Url;

/// Position of the crawl: the page about to be fetched and how many pages
/// have been fetched so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// URL of the next page to fetch
    pub url: Url,

    /// Number of pages fetched successfully
    pub pages: u32,
}

impl PageCursor {
    /// Creates a cursor positioned on the start URL
    pub fn start(url: Url) -> Self {
        Self { url, pages: 0 }
    }

    /// True before the first fetch
    pub fn is_first(&self) -> bool {
        self.pages == 0
    }

    /// Records one fetched page
    pub fn advance_count(&mut self) {
        self.pages += 1;
    }

    /// Moves to the next page
    pub fn move_to(&mut self, url: Url) {
        self.url = url;
    }
}

/// Everything the crawl loop carries from one step to the next
///
/// The loop takes this by value and hands it back, so there is exactly one
/// owner of the accumulated records at any time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    pub cursor: PageCursor,
    pub records: Vec<Record>,
}

impl CrawlState {
    pub fn new(start: Url) -> Self {
        Self {
            cursor: PageCursor::start(start),
            records: Vec::new(),
        }
    }
}
