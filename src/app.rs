use std::sync::Arc;
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use crate::chat::ChatSession;
use crate::slang::{SlangBackend, SlangError};
use crate::state::Role;
use crate::tui::AppEvent;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub session: ChatSession,

    // Backend
    pub backend_url: String,
    backend: Arc<dyn SlangBackend>,
    events: mpsc::UnboundedSender<AppEvent>,

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub send_area: Option<Rect>,
}

impl App {
    pub fn new(
        backend: Arc<dyn SlangBackend>,
        backend_url: String,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            session: ChatSession::new(),
            backend_url,
            backend,
            events,
            chat_area: None,
            send_area: None,
        }
    }

    /// Commit the draft and fire one request for it. The reply comes back as
    /// an [`AppEvent::Settled`] on the event queue.
    pub fn submit(&mut self) {
        let Some(text) = self.session.begin_submit() else {
            return;
        };
        tracing::info!(chars = text.chars().count(), "sending text to /slang");

        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = backend.convert(&text).await;
            if events.send(AppEvent::Settled(outcome)).is_err() {
                tracing::debug!("event loop gone before the request settled");
            }
        });
    }

    pub fn settle(&mut self, outcome: Result<String, SlangError>) {
        let turn = self.session.count(Role::User);
        match &outcome {
            Ok(reply) => tracing::info!(turn, chars = reply.chars().count(), "backend replied"),
            Err(e) => tracing::warn!(turn, "backend request failed: {e}"),
        }
        self.session.settle(outcome);
    }
}
