use std::sync::Arc;

use nextword_core::replace_last_word;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::debug;

use crate::predictor::SuggestionEngine;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
}

/// Pushed to the client as the session progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    Busy { sequence: u64 },
    Suggestions {
        sequence: u64,
        text: String,
        suggestions: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub text: String,
    pub suggestions: Vec<String>,
    pub state: RequestState,
    pub sequence: u64,
}

#[derive(Debug, Default)]
struct SessionState {
    text: String,
    suggestions: Vec<String>,
    state: RequestState,
    latest_sequence: u64,
    /// Bumped on every text change; a timer armed for an older value is void.
    generation: u64,
}

/// Owns one session's text and drives debounced suggestion requests.
///
/// Only the newest keystroke's timer may fire. Computations already dispatched
/// are never cancelled; a result is applied only if no newer computation was
/// dispatched after it.
pub struct InputOrchestrator {
    engine: Arc<SuggestionEngine>,
    debounce: Duration,
    session: Arc<Mutex<SessionState>>,
    pending: Option<JoinHandle<()>>,
    updates: UnboundedSender<SessionUpdate>,
}

impl InputOrchestrator {
    pub fn new(
        engine: Arc<SuggestionEngine>,
        debounce: Duration,
        updates: UnboundedSender<SessionUpdate>,
    ) -> Self {
        Self {
            engine,
            debounce,
            session: Arc::new(Mutex::new(SessionState::default())),
            pending: None,
            updates,
        }
    }

    pub async fn on_text_changed(&mut self, text: String) {
        let generation = {
            let mut session = self.session.lock().await;
            session.text = text;
            session.generation = session.generation.wrapping_add(1);
            session.generation
        };
        self.rearm(generation);
    }

    /// Swaps the last (possibly partial) word for `word`, then treats the
    /// result as a regular text change. Returns the new text.
    pub async fn on_suggestion_accepted(&mut self, word: &str) -> String {
        let rewritten = {
            let session = self.session.lock().await;
            replace_last_word(&session.text, word)
        };
        self.on_text_changed(rewritten.clone()).await;
        rewritten
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let session = self.session.lock().await;
        SessionSnapshot {
            text: session.text.clone(),
            suggestions: session.suggestions.clone(),
            state: session.state,
            sequence: session.latest_sequence,
        }
    }

    fn rearm(&mut self, generation: u64) {
        if let Some(previous) = self.pending.take() {
            previous.abort();
        }

        let engine = self.engine.clone();
        let session = self.session.clone();
        let updates = self.updates.clone();
        let debounce = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            sleep(debounce).await;
            dispatch(engine, session, updates, generation).await;
        }));
    }
}

impl Drop for InputOrchestrator {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

/// Timer fired: snapshot the text, mark the session busy and hand the work
/// to a detached task so a later keystroke cannot abort it.
///
/// `abort` cannot stop a timer that already woke on another worker, so the
/// generation check under the lock is what keeps superseded timers silent.
async fn dispatch(
    engine: Arc<SuggestionEngine>,
    session: Arc<Mutex<SessionState>>,
    updates: UnboundedSender<SessionUpdate>,
    generation: u64,
) {
    let (sequence, text) = {
        let mut state = session.lock().await;
        if state.generation != generation {
            debug!(
                generation,
                current = state.generation,
                "skipping superseded debounce timer"
            );
            return;
        }
        state.latest_sequence = state.latest_sequence.wrapping_add(1);
        state.state = RequestState::InFlight;
        (state.latest_sequence, state.text.clone())
    };
    let _ = updates.send(SessionUpdate::Busy { sequence });

    tokio::spawn(async move {
        let suggestions = engine.compute_suggestions(&text).await;
        settle(session, updates, sequence, text, suggestions).await;
    });
}

async fn settle(
    session: Arc<Mutex<SessionState>>,
    updates: UnboundedSender<SessionUpdate>,
    sequence: u64,
    text: String,
    suggestions: Vec<String>,
) {
    let mut state = session.lock().await;
    if sequence != state.latest_sequence {
        debug!(
            sequence,
            latest = state.latest_sequence,
            "discarding stale suggestions"
        );
        return;
    }

    state.suggestions = suggestions.clone();
    state.state = RequestState::Idle;
    drop(state);

    let _ = updates.send(SessionUpdate::Suggestions {
        sequence,
        text,
        suggestions,
    });
}
