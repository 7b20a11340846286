//! Session ViewModel
//!
//! Fetches the current session once on mount and exposes
//! `user` / `is_loading` / `error` to the screen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::ClientEvent;
use crate::http::{ApiClient, SessionFetch};

pub struct SessionViewModel {
    pub user: Option<Value>,
    pub is_loading: bool,
    pub error: Option<String>,
    client: Arc<ApiClient>,
    mounted: Arc<AtomicBool>,
    started: bool,
    event_tx: mpsc::UnboundedSender<ClientEvent>,
    event_rx: mpsc::UnboundedReceiver<ClientEvent>,
}

impl SessionViewModel {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            user: None,
            is_loading: true,
            error: None,
            client,
            mounted: Arc::new(AtomicBool::new(false)),
            started: false,
            event_tx,
            event_rx,
        }
    }

    /// Starts the single session fetch. Later calls are no-ops and return `None`.
    pub fn mount(&mut self) -> Option<JoinHandle<()>> {
        if self.started {
            return None;
        }
        self.started = true;
        self.mounted.store(true, Ordering::SeqCst);

        let client = Arc::clone(&self.client);
        let mounted = Arc::clone(&self.mounted);
        let tx = self.event_tx.clone();

        Some(tokio::spawn(async move {
            let event = match client.fetch_session().await {
                Ok(SessionFetch::Authenticated(user)) => ClientEvent::SessionLoaded(user),
                Ok(SessionFetch::Unauthenticated) => ClientEvent::SessionUnauthenticated,
                Err(e) => ClientEvent::SessionFailed(e.to_string()),
            };

            if mounted.load(Ordering::SeqCst) {
                let _ = tx.send(event);
            } else {
                debug!("Session fetch finished after unmount, result dropped");
            }
        }))
    }

    pub fn unmount(&mut self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Drains pending events. Returns true when state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.event_rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    pub fn apply(&mut self, event: ClientEvent) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match event {
            ClientEvent::SessionLoaded(user) => self.on_session_loaded(user),
            ClientEvent::SessionUnauthenticated => self.on_unauthenticated(),
            ClientEvent::SessionFailed(error) => self.on_session_failed(error),
        }
        true
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn on_session_loaded(&mut self, user: Value) {
        self.is_loading = false;
        self.error = None;
        self.user = Some(user);
    }

    fn on_unauthenticated(&mut self) {
        self.is_loading = false;
        self.user = None;
    }

    fn on_session_failed(&mut self, error: String) {
        self.is_loading = false;
        self.error = Some(error);
    }
}

impl Drop for SessionViewModel {
    fn drop(&mut self) {
        self.unmount();
    }
}
