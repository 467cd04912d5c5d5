//! Saved-label search. Results can be sent to the editor or the queue.

use std::sync::Mutex;

use crate::app::ModuleContext;
use crate::bus::AppEvent;
use crate::model::SearchResult;

pub struct SearchModule {
    ctx: ModuleContext,
    results: Mutex<Vec<SearchResult>>,
}

impl SearchModule {
    pub fn new(ctx: ModuleContext) -> Self {
        Self {
            ctx,
            results: Mutex::new(Vec::new()),
        }
    }

    /// Results of the last successful search.
    pub fn results(&self) -> Vec<SearchResult> {
        self.results.lock().expect("search mutex poisoned").clone()
    }

    pub fn result(&self, index: usize) -> Option<SearchResult> {
        self.results
            .lock()
            .expect("search mutex poisoned")
            .get(index)
            .cloned()
    }

    pub async fn perform_search(&self, query: &str) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            self.ctx.notifier.notify("Please enter a search term");
            return Vec::new();
        }

        match self.ctx.backend.search_labels(query).await {
            Ok(results) => {
                tracing::debug!(query, hits = results.len(), "search finished");
                *self.results.lock().expect("search mutex poisoned") = results.clone();
                results
            }
            Err(error) => {
                tracing::error!(query, "search error: {error}");
                self.ctx.notifier.notify("Error performing search");
                Vec::new()
            }
        }
    }

    pub fn load_in_editor(&self, result: &SearchResult) {
        self.ctx
            .bus
            .publish(AppEvent::LoadInEditor(result.editor_data()));
        self.ctx.notifier.notify("Loaded label into editor");
    }

    pub fn add_to_queue(&self, result: &SearchResult) {
        self.ctx
            .bus
            .publish(AppEvent::AddToQueue(result.queue_data()));
        self.ctx.notifier.notify("Added to queue");
    }
}

impl std::fmt::Debug for SearchModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchModule").finish_non_exhaustive()
    }
}
