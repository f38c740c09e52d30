// * Ordered-Candidate Resolution
// * Evaluates a sequence of lazy attempts in declaration order and stops at the first hit.
// * Shared by the list prober and the PDF-link resolver.

use std::future::Future;

/// Every candidate was tried without a hit
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: usize,
    /// Most recent failure; structural misses do not overwrite it
    pub last_error: Option<E>,
}

/// Tries `attempts` in order.
///
/// Each attempt reports one of three outcomes:
/// * `Ok(Some(value))` - a hit; no later attempt is constructed or awaited
/// * `Ok(None)` - a structural miss; move on
/// * `Err(e)` - a failure; remembered as the last error, then move on
pub async fn first_success<I, F, Fut, T, E>(attempts: I) -> Result<T, Exhausted<E>>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let mut tried = 0;
    let mut last_error = None;

    for attempt in attempts {
        tried += 1;
        match attempt().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => last_error = Some(e),
        }
    }

    Err(Exhausted {
        attempts: tried,
        last_error,
    })
}
