//! Debounced, last-query-wins search pipeline.
//!
//! Keystrokes are submitted as they happen. The pipeline waits for a quiet
//! period, drops a query equal to the previous one, and starts a search.
//! A newer search supersedes the in-flight one: the old task is aborted and
//! a generation counter, checked before and after the network call, keeps
//! any result that still slips through from being published.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::client::PlaceSearch;
use super::proxy::PlaceSearchProxy;
use super::types::SearchResults;
use crate::geo::Coordinate;

/// Quiet period before a query is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

struct Submission {
    query: String,
    proximity: Option<Coordinate>,
}

/// Caller-side search pipeline.
///
/// Results are published on a `watch` channel; only the latest query's
/// results are ever visible.
pub struct DebouncedSearch {
    input: mpsc::UnboundedSender<Submission>,
    results: watch::Receiver<SearchResults>,
    cancellation: CancellationToken,
}

impl DebouncedSearch {
    /// Spawn the pipeline on the current runtime.
    pub fn spawn<S: PlaceSearch + 'static>(
        proxy: Arc<PlaceSearchProxy<S>>,
        debounce: Duration,
    ) -> Self {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (results_tx, results) = watch::channel(SearchResults::default());
        let cancellation = CancellationToken::new();

        let pipeline = Pipeline {
            proxy,
            debounce,
            results: Arc::new(results_tx),
            generation: Arc::new(AtomicU64::new(0)),
        };
        tokio::spawn(pipeline.run(input_rx, cancellation.clone()));

        Self {
            input,
            results,
            cancellation,
        }
    }

    /// Submit the current text of the search box.
    pub fn submit(&self, query: impl Into<String>, proximity: Option<Coordinate>) {
        let submission = Submission {
            query: query.into(),
            proximity,
        };
        if self.input.send(submission).is_err() {
            debug!("Search pipeline closed, dropping query");
        }
    }

    /// Receiver for published results.
    pub fn results(&self) -> watch::Receiver<SearchResults> {
        self.results.clone()
    }

    pub fn latest(&self) -> SearchResults {
        self.results.borrow().clone()
    }

    /// Stop the pipeline and abort any in-flight search.
    pub fn close(&self) {
        self.cancellation.cancel();
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}

struct Pipeline<S: PlaceSearch> {
    proxy: Arc<PlaceSearchProxy<S>>,
    debounce: Duration,
    results: Arc<watch::Sender<SearchResults>>,
    generation: Arc<AtomicU64>,
}

impl<S: PlaceSearch + 'static> Pipeline<S> {
    async fn run(
        self,
        mut input: mpsc::UnboundedReceiver<Submission>,
        cancellation: CancellationToken,
    ) {
        let mut pending: Option<Submission> = None;
        let mut last_query: Option<String> = None;
        let mut in_flight: Option<JoinHandle<()>> = None;

        let quiet = tokio::time::sleep(self.debounce);
        tokio::pin!(quiet);

        loop {
            tokio::select! {
                _ = cancellation.cancelled() => break,
                submission = input.recv() => match submission {
                    Some(submission) => {
                        trace!(query = %submission.query, "Search input");
                        pending = Some(submission);
                        quiet.as_mut().reset(Instant::now() + self.debounce);
                    }
                    None => break,
                },
                _ = &mut quiet, if pending.is_some() => {
                    if let Some(submission) = pending.take() {
                        let query = submission.query.trim().to_string();
                        if last_query.as_deref() == Some(query.as_str()) {
                            trace!(query = %query, "Query unchanged, skipping");
                        } else {
                            last_query = Some(query.clone());
                            if let Some(previous) = in_flight.take() {
                                previous.abort();
                            }
                            in_flight = Some(self.start(query, submission.proximity));
                        }
                    }
                }
            }
        }

        if let Some(task) = in_flight {
            task.abort();
        }
        debug!("Search pipeline stopped");
    }

    fn start(&self, query: String, proximity: Option<Coordinate>) -> JoinHandle<()> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let proxy = Arc::clone(&self.proxy);
        let counter = Arc::clone(&self.generation);
        let results = Arc::clone(&self.results);

        tokio::spawn(async move {
            if counter.load(Ordering::SeqCst) != generation {
                return;
            }

            let candidates = proxy.search(&query, proximity).await;

            if counter.load(Ordering::SeqCst) != generation {
                debug!(query = %query, "Discarding superseded search results");
                return;
            }

            debug!(query = %query, candidates = candidates.len(), "Search results published");
            results.send_replace(SearchResults { query, candidates });
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::proxy::tests::ScriptedSearch;

    fn pipeline(service: ScriptedSearch) -> DebouncedSearch {
        DebouncedSearch::spawn(Arc::new(PlaceSearchProxy::new(service)), DEFAULT_DEBOUNCE)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_sends_only_last_query() {
        let service = ScriptedSearch::new()
            .with_results("a", &["Alpha"])
            .with_results("ab", &["Abasolo"]);
        let search = pipeline(service.clone());

        search.submit("a", None);
        tokio::time::sleep(Duration::from_millis(100)).await;
        search.submit("ab", None);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(service.calls(), 1);
        let latest = search.latest();
        assert_eq!(latest.query, "ab");
        assert_eq!(latest.candidates[0].name, "Abasolo");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_earlier_query_never_published() {
        let service = ScriptedSearch::new()
            .with_results("a", &["Alpha"])
            .with_results("ab", &["Abasolo"])
            .with_delay("a", Duration::from_secs(2))
            .with_delay("ab", Duration::from_millis(50));
        let search = pipeline(service.clone());
        let mut results = search.results();

        search.submit("a", None);
        tokio::time::sleep(Duration::from_millis(400)).await;
        search.submit("ab", None);

        results.changed().await.unwrap();
        assert_eq!(results.borrow_and_update().query, "ab");

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(service.calls(), 2);
        assert_eq!(search.latest().query, "ab");
        assert!(!results.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_query_ignored() {
        let service = ScriptedSearch::new().with_results("plaza", &["Plaza"]);
        let search = pipeline(service.clone());

        search.submit("plaza", None);
        tokio::time::sleep(Duration::from_millis(400)).await;
        search.submit("plaza ", None);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(service.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_stops_pipeline() {
        let service = ScriptedSearch::new().with_results("plaza", &["Plaza"]);
        let search = pipeline(service.clone());

        search.close();
        tokio::time::sleep(Duration::from_millis(10)).await;
        search.submit("plaza", None);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(service.calls(), 0);
        assert_eq!(search.latest(), SearchResults::default());
    }
}
