use std::borrow::Cow;
use std::iter::FusedIterator;

use cofecms_core::{Error, Result};
use http::HeaderMap;
use log::debug;

use super::client::Client;
use super::params::{BasicParams, Query, SearchParams};
use super::response::{RateLimit, Record};

/// One page of a paginated call.
///
/// A page remembers how it was requested, so its siblings can be fetched with
/// the same diocese, search criteria and basic params. Pages are never cached:
/// every fetch is a new signed request.
#[derive(Debug, Clone)]
pub struct PageResult {
    pub(crate) client: Client,
    pub(crate) records: Vec<Record>,
    pub(crate) rate_limit: RateLimit,
    pub(crate) headers: HeaderMap,
    pub(crate) total_count: u64,
    pub(crate) limit: u64,
    pub(crate) offset: u64,
    pub(crate) endpoint_url: String,
    pub(crate) diocese_id: u64,
    pub(crate) search_params: SearchParams,
    pub(crate) basic_params: BasicParams,
}

impl PageResult {
    /// Records of this page in response order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the records of this page.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Total number of records across all pages, from `X-Total-Count`.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Page size this page was requested with.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Offset this page was requested with.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of pages.
    ///
    /// Computed as `total_count / limit + 1`, so a total that is an exact
    /// multiple of `limit` ends with an empty page. Saturates at `u64::MAX`.
    pub fn total_pages(&self) -> u64 {
        (self.total_count / self.limit).saturating_add(1)
    }

    /// Url the page was fetched from.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Diocese the page belongs to.
    pub fn diocese_id(&self) -> u64 {
        self.diocese_id
    }

    /// Search criteria the page was requested with, without `diocese_id`.
    pub fn search_params(&self) -> &SearchParams {
        &self.search_params
    }

    /// Basic params the page was requested with, without offset and limit.
    pub fn basic_params(&self) -> &BasicParams {
        &self.basic_params
    }

    /// Rate limit counters of the response.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// Raw response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Fetch page `page_num`, at offset `page_num * limit`.
    pub fn fetch_page(&self, page_num: u64) -> Result<PageResult> {
        let offset = page_num.checked_mul(self.limit).ok_or_else(|| {
            Error::request_invalid(format!("page {page_num} is out of range"))
        })?;

        debug!(
            "fetching page {page_num} of {} from {}",
            self.total_pages(),
            self.endpoint_url
        );
        let query = Query {
            diocese_id: Some(self.diocese_id),
            search: self.search_params.clone(),
            params: self
                .basic_params
                .clone()
                .with_offset(offset)
                .with_limit(self.limit),
        };
        self.client.paged_get(&self.endpoint_url, &query)
    }

    /// Iterate all pages lazily.
    ///
    /// The first item is this page, without a request. Every following item
    /// is fetched when asked for. The iterator stops after the first error.
    pub fn pages(&self) -> Pages<'_> {
        Pages {
            seed: self,
            total_pages: self.total_pages(),
            state: PagesState::Seeded,
        }
    }

    /// Fetch every page and return all records in page order.
    pub fn all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for page in self.pages() {
            match page? {
                Cow::Borrowed(page) => records.extend_from_slice(&page.records),
                Cow::Owned(page) => records.extend(page.records),
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PagesState {
    Seeded,
    Fetching(u64),
    Exhausted,
}

/// Lazy iterator over the pages of a [`PageResult`], see [`PageResult::pages`].
#[derive(Debug, Clone)]
pub struct Pages<'a> {
    seed: &'a PageResult,
    total_pages: u64,
    state: PagesState,
}

impl Pages<'_> {
    fn advance_to(&mut self, page_num: u64) {
        self.state = if page_num < self.total_pages {
            PagesState::Fetching(page_num)
        } else {
            PagesState::Exhausted
        };
    }
}

impl<'a> Iterator for Pages<'a> {
    type Item = Result<Cow<'a, PageResult>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            PagesState::Seeded => {
                self.advance_to(1);
                Some(Ok(Cow::Borrowed(self.seed)))
            }
            PagesState::Fetching(page_num) => match self.seed.fetch_page(page_num) {
                Ok(page) => {
                    self.advance_to(page_num + 1);
                    Some(Ok(Cow::Owned(page)))
                }
                Err(err) => {
                    self.state = PagesState::Exhausted;
                    Some(Err(err))
                }
            },
            PagesState::Exhausted => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.state {
            PagesState::Seeded => self.total_pages,
            PagesState::Fetching(page_num) => self.total_pages - page_num,
            PagesState::Exhausted => 0,
        };
        // An error may end the iteration early.
        (
            usize::from(remaining > 0),
            usize::try_from(remaining).ok(),
        )
    }
}

impl FusedIterator for Pages<'_> {}
