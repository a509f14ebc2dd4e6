use std::sync::Arc;

use crate::assistants::AssistantsApi;
use crate::ledger::ThreadLedger;

/// Shared handles for request handlers: the assistants client and the
/// thread ledger, both constructed once in `main`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    api: Arc<dyn AssistantsApi>,
    ledger: ThreadLedger,
}

impl AppState {
    pub fn new(api: Arc<dyn AssistantsApi>, ledger: ThreadLedger) -> Self {
        Self {
            inner: Arc::new(AppStateInner { api, ledger }),
        }
    }

    pub fn api(&self) -> &dyn AssistantsApi {
        self.inner.api.as_ref()
    }

    pub fn ledger(&self) -> &ThreadLedger {
        &self.inner.ledger
    }
}
