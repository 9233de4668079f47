//! Helpers shared by the platform fetchers.

use crate::discovery::SourceError;
use chrono::{DateTime, Utc};

const LOG_TARGET: &str = " analytics";

/// Most pages requested when walking a paginated commit listing
pub const MAX_COMMIT_PAGES: u32 = 10;

/// Most pages requested when counting open pull requests or contributors
pub const MAX_LISTING_PAGES: u32 = 50;

/// Page size used for paginated listings
pub const PAGE_SIZE: usize = 100;

/// Resolve a supplementary request, logging and discarding its failure
pub async fn optional<T>(what: &str, request: impl Future<Output = Result<T, SourceError>>) -> Option<T> {
    match request.await {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Could not fetch {what}: {e}");
            None
        }
    }
}

/// Fetch consecutive pages, starting at page 1, until a short page or the page limit
pub async fn collect_pages<T, F, Fut>(page_size: usize, max_pages: u32, mut fetch_page: F) -> Result<Vec<T>, SourceError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SourceError>>,
{
    let mut items = Vec::new();

    for page in 1..=max_pages {
        let batch = fetch_page(page).await?;
        let done = batch.len() < page_size;
        items.extend(batch);

        if done {
            break;
        }
    }

    Ok(items)
}

/// Mean duration in hours between the start and end of each pair
#[must_use]
pub fn mean_hours(spans: impl IntoIterator<Item = (DateTime<Utc>, DateTime<Utc>)>) -> Option<f64> {
    let hours: Vec<f64> = spans
        .into_iter()
        .filter(|(start, end)| end >= start)
        .map(|(start, end)| {
            #[expect(clippy::cast_precision_loss, reason = "durations in seconds are far below 2^52")]
            let seconds = (end - start).num_seconds() as f64;
            seconds / 3600.0
        })
        .collect();

    if hours.is_empty() {
        return None;
    }

    #[expect(clippy::cast_precision_loss, reason = "small sample")]
    let len = hours.len() as f64;
    Some(hours.iter().sum::<f64>() / len)
}
