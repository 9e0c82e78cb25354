use std::sync::Arc;

use sehati_auth::session::SessionKeys;
use sehati_push::payload::PushDefaults;
use sehati_push::{Dispatcher, PushTransport};
use sehati_storage::RecordStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub dispatcher: Dispatcher,
    pub sessions: SessionKeys,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        transport: Arc<dyn PushTransport>,
        sessions: SessionKeys,
        push_defaults: PushDefaults,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&store), transport, push_defaults);
        Self {
            store,
            dispatcher,
            sessions,
        }
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}
