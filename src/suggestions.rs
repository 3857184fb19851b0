//! Autocompletion of college and major names

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::college::SuggestionKind;
use crate::config;
use crate::debounce::Debouncer;
use crate::traits::SuggestionSource;

/// Fetches suggestions while the user types.
///
/// Fetches are debounced, and the latest results are published on a watch channel (see [`SuggestionBox::subscribe`]).
pub struct SuggestionBox<S: SuggestionSource + 'static> {
    source: Arc<S>,
    kind: SuggestionKind,
    debouncer: Debouncer,
    results: Arc<watch::Sender<Vec<String>>>,
    /// Incremented on every query, so that answers to older queries can be told apart
    seq: Arc<AtomicU64>,
}

impl<S: SuggestionSource + 'static> SuggestionBox<S> {
    pub fn new(source: Arc<S>, kind: SuggestionKind) -> Self {
        Self::with_delay(source, kind, config::SUGGESTION_DEBOUNCE)
    }

    pub fn with_delay(source: Arc<S>, kind: SuggestionKind, delay: Duration) -> Self {
        let (sender, _) = watch::channel(Vec::new());
        Self {
            source,
            kind,
            debouncer: Debouncer::new(delay),
            results: Arc::new(sender),
            seq: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn kind(&self) -> SuggestionKind {
        self.kind
    }

    /// The current suggestions
    pub fn current(&self) -> Vec<String> {
        self.results.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<String>> {
        self.results.subscribe()
    }

    /// The query text has changed
    pub fn on_query(&mut self, query: &str) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = query.trim().to_string();

        if query.chars().count() < config::MIN_SUGGESTION_QUERY_LEN {
            self.debouncer.cancel();
            self.results.send_replace(Vec::new());
            return;
        }

        let source = Arc::clone(&self.source);
        let results = Arc::clone(&self.results);
        let latest = Arc::clone(&self.seq);
        let kind = self.kind;
        self.debouncer.call(async move {
            let fetched = source.get_suggestions(kind, &query).await;

            if latest.load(Ordering::SeqCst) != seq {
                log::debug!("Discarding suggestions for {:?}, a newer query has been typed", query);
                return;
            }
            match fetched {
                Ok(suggestions) => {
                    log::trace!("{} suggestions for {:?}", suggestions.len(), query);
                    results.send_replace(suggestions);
                },
                Err(err) => {
                    log::warn!("Unable to fetch suggestions for {:?}: {}", query, err);
                    results.send_replace(Vec::new());
                },
            }
        });
    }

    /// Forget the current suggestions and cancel any pending fetch (e.g. once a suggestion has been picked)
    pub fn clear(&mut self) {
        self.seq.fetch_add(1, Ordering::SeqCst);
        self.debouncer.cancel();
        self.results.send_replace(Vec::new());
    }
}
