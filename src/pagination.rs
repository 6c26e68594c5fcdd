use crate::error::FetchError;
use crate::ports::{PageRequest, MAX_PER_PAGE};
use std::future::Future;
use tracing::{debug, warn};

/// Everything a page sequence produced before it ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    /// Set when a page failed; `items` then holds the pages before it.
    pub interrupted: Option<FetchError>,
}

impl<T> Paginated<T> {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }

    /// True when the very first page failed, so nothing at all is known.
    #[must_use]
    pub fn failed_outright(&self) -> bool {
        self.interrupted.is_some() && self.items.is_empty()
    }
}

/// Fetches pages 1, 2, ... until a page comes back shorter than `per_page`.
///
/// A failed page stops the sequence without retrying; whatever was collected
/// so far is returned together with the failure.
pub async fn collect_pages<T, F, Fut>(per_page: u32, mut fetch: F) -> Paginated<T>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>, FetchError>>,
{
    let per_page = per_page.clamp(1, MAX_PER_PAGE);
    let mut items = Vec::new();
    let mut page = 1_u32;

    loop {
        match fetch(PageRequest::new(page, per_page)).await {
            Ok(batch) => {
                let short_page = batch.len() < per_page as usize;
                debug!(page, count = batch.len(), "fetched page");
                items.extend(batch);
                if short_page {
                    return Paginated {
                        items,
                        pages_fetched: page,
                        interrupted: None,
                    };
                }
                page = page.saturating_add(1);
            }
            Err(err) => {
                warn!(
                    page,
                    collected = items.len(),
                    url = err.url(),
                    "pagination stopped: {err}"
                );
                return Paginated {
                    items,
                    pages_fetched: page,
                    interrupted: Some(err),
                };
            }
        }
    }
}
