//! Concurrent settling of independent fetches.
//!
//! Multi-area and multi-mountain sources issue one request per area. All of
//! them run concurrently and all of them settle: a failing area becomes
//! `None` instead of aborting its siblings.

use std::future::Future;

use futures::future::join_all;
use tracing::warn;

use crate::error::FetchError;

/// Runs labelled fetches concurrently and waits for every one of them.
///
/// Results keep the input order. Failures are logged with their label and
/// failure category, then become `None`.
pub async fn settle_all<L, F, T>(fetches: impl IntoIterator<Item = (L, F)>) -> Vec<Option<T>>
where
    L: std::fmt::Display,
    F: Future<Output = Result<T, FetchError>>,
{
    let (labels, futures): (Vec<L>, Vec<F>) = fetches.into_iter().unzip();
    let results = join_all(futures).await;

    labels
        .into_iter()
        .zip(results)
        .map(|(label, result)| match result {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(
                    area = %label,
                    category = %error.category(),
                    error = %error,
                    "Area fetch failed"
                );
                None
            }
        })
        .collect()
}

/// Returns true if there were results and every one of them failed.
pub fn all_failed<T>(results: &[Option<T>]) -> bool {
    !results.is_empty() && results.iter().all(Option::is_none)
}
