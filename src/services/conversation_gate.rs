// services/conversation_gate.rs

//! Per-match conversation state machine.
//!
//! A match's conversation is locked until one side opens it by responding
//! to one of the other side's profile prompt answers with a message of at
//! least twenty words. Once that first message lands, the conversation is
//! permanently open and later messages carry no constraint beyond being
//! non-empty.
//!
//! The gate owns a read-through projection of backend state: the started
//! flag, the respondable prompt pool, and the message list. All methods
//! take `&self` so the hosting view can call them from render and event
//! code; internal state sits behind a mutex that is never held across an
//! `.await`. Dropping an in-flight refresh future cancels the fetch;
//! a dispatched send is not cancellable and the backend keeps the
//! message even if the caller goes away.

use chrono::NaiveDateTime;
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;
use uuid::Uuid;

use crate::api::client::ApiError;
use crate::models::message::{ConversationStatus, Message, RespondablePrompt, SendMessagePayload};
use crate::services::message_rules::{
    is_blank, prompt_is_listed, word_count, FIRST_MESSAGE_MIN_WORDS,
};

/// The remote collaborators the gate consumes, kept transport-agnostic so
/// tests can drive the gate with an in-memory fake. Implemented for
/// `Arc<ApiClient>` in the api layer.
#[allow(async_fn_in_trait)]
pub trait ConversationBackend {
    async fn fetch_status(&self, match_id: Uuid) -> Result<ConversationStatus, ApiError>;
    async fn fetch_prompts(&self, match_id: Uuid) -> Result<Vec<RespondablePrompt>, ApiError>;
    async fn fetch_messages(&self, match_id: Uuid) -> Result<Vec<Message>, ApiError>;
    async fn send_message(
        &self,
        match_id: Uuid,
        payload: &SendMessagePayload,
    ) -> Result<Message, ApiError>;
}

/// Local precondition failure. Never reaches the network; always
/// recoverable by the user correcting their input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("Message is empty")]
    EmptyMessage,

    /// The other user published no prompt answers, so the conversation
    /// cannot be opened from this side. The hosting view should say so
    /// instead of silently disabling the send button.
    #[error("The other user has no prompt answers to respond to")]
    NoPromptsAvailable,

    #[error("Select a prompt to respond to before sending the first message")]
    NoPromptSelected,

    #[error("First message must be at least {minimum} words (currently {words})")]
    TooShort { words: usize, minimum: usize },

    #[error("A send is already in progress for this conversation")]
    SendInProgress,

    /// `select_prompt` is only meaningful before the conversation starts.
    #[error("The conversation has already started")]
    AlreadyStarted,

    #[error("That prompt is not in the other user's answer pool")]
    UnknownPrompt,
}

/// Why a `send` did not produce a message. The two variants must not be
/// conflated: a rejection should light up the compose affordance that is
/// wrong, a failure should offer a retry with the preserved draft.
#[derive(Error, Debug)]
pub enum SendError {
    /// Local precondition failure; nothing went over the network.
    #[error("Message not sent: {0}")]
    Rejected(#[from] ComposeError),

    /// The messaging collaborator rejected or could not process the send
    /// (backend re-validation, auth expiry, network fault). Gate state
    /// and the pending prompt selection are untouched.
    #[error("Message delivery failed: {0}")]
    Failed(#[source] ApiError),
}

impl SendError {
    pub fn is_local(&self) -> bool {
        matches!(self, SendError::Rejected(_))
    }
}

/// A status/prompts/messages refresh failed. Non-fatal: the view keeps
/// showing last-known data and may retry; gate state is unaffected.
#[derive(Error, Debug)]
#[error("Failed to refresh {operation}: {source}")]
pub struct FetchError {
    pub operation: &'static str,
    #[source]
    pub source: ApiError,
}

/// Sender attribution of a timeline entry, relative to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageDirection {
    Sent,
    Received,
}

/// The prompt a first message responded to. `question` resolves against
/// the current prompt pool and is None when the prompt has since left it
/// (or when the message came from the other side, whose pool is the
/// viewer's own answers and not tracked here).
#[derive(Debug, Clone)]
pub struct RespondedPrompt {
    pub question_index: usize,
    pub question: Option<String>,
}

/// One rendered row of the conversation view.
#[derive(Debug, Clone)]
pub struct TimelineEntry {
    pub id: Uuid,
    pub content: String,
    pub sent_at: NaiveDateTime,
    pub direction: MessageDirection,
    pub responds_to: Option<RespondedPrompt>,
}

#[derive(Default)]
struct GateState {
    started: bool,
    available_prompts: Vec<RespondablePrompt>,
    pending_selection: Option<RespondablePrompt>,
    messages: Vec<Message>,
    send_in_flight: bool,
}

pub struct ConversationGate<B> {
    match_id: Uuid,
    viewer_id: Uuid,
    backend: B,
    state: Mutex<GateState>,
}

impl<B: ConversationBackend> ConversationGate<B> {
    /// Creates a gate with an empty projection. Call the refresh methods
    /// (or `refresh_all`) to populate it; until then the conversation
    /// reads as not started with no prompts.
    pub fn new(match_id: Uuid, viewer_id: Uuid, backend: B) -> Self {
        Self {
            match_id,
            viewer_id,
            backend,
            state: Mutex::new(GateState::default()),
        }
    }

    pub fn match_id(&self) -> Uuid {
        self.match_id
    }

    pub fn viewer_id(&self) -> Uuid {
        self.viewer_id
    }

    pub fn started(&self) -> bool {
        self.lock_state().started
    }

    pub fn available_prompts(&self) -> Vec<RespondablePrompt> {
        self.lock_state().available_prompts.clone()
    }

    pub fn pending_selection(&self) -> Option<RespondablePrompt> {
        self.lock_state().pending_selection.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().messages.clone()
    }

    pub fn send_in_flight(&self) -> bool {
        self.lock_state().send_in_flight
    }

    /// Selects the prompt the first message will respond to. Only valid
    /// before the conversation starts; replacing an earlier selection is
    /// allowed any number of times pre-send. Membership in the pool is
    /// checked here and deliberately not re-checked at send time, so a
    /// selection made before the other user edited their profile stays
    /// usable.
    pub fn select_prompt(&self, prompt: RespondablePrompt) -> Result<(), ComposeError> {
        let mut state = self.lock_state();
        if state.started {
            return Err(ComposeError::AlreadyStarted);
        }
        if !prompt_is_listed(&state.available_prompts, prompt.question_index) {
            return Err(ComposeError::UnknownPrompt);
        }
        state.pending_selection = Some(prompt);
        Ok(())
    }

    /// Whether `send` would accept this draft right now.
    pub fn can_send(&self, text: &str) -> bool {
        self.compose_check(text).is_ok()
    }

    /// Like `can_send`, but reports which precondition blocks the draft
    /// so the view can highlight the right affordance.
    pub fn compose_check(&self, text: &str) -> Result<(), ComposeError> {
        let state = self.lock_state();
        Self::check_draft(&state, text)
    }

    fn check_draft(state: &GateState, text: &str) -> Result<(), ComposeError> {
        if is_blank(text) {
            return Err(ComposeError::EmptyMessage);
        }
        if state.send_in_flight {
            return Err(ComposeError::SendInProgress);
        }
        if state.started {
            return Ok(());
        }
        match &state.pending_selection {
            None if state.available_prompts.is_empty() => Err(ComposeError::NoPromptsAvailable),
            None => Err(ComposeError::NoPromptSelected),
            Some(_) => {
                let words = word_count(text);
                if words < FIRST_MESSAGE_MIN_WORDS {
                    return Err(ComposeError::TooShort {
                        words,
                        minimum: FIRST_MESSAGE_MIN_WORDS,
                    });
                }
                Ok(())
            }
        }
    }

    /// Sends a message. Single-flight per conversation: a second call
    /// while one is outstanding is rejected locally, never queued.
    ///
    /// On success the conversation is marked started (idempotent), the
    /// pending selection is cleared and the created message is appended.
    /// On failure nothing is mutated, so the user keeps their draft and
    /// prompt selection for a retry.
    pub async fn send(&self, text: &str) -> Result<Message, SendError> {
        let payload = {
            let mut state = self.lock_state();
            Self::check_draft(&state, text)?;
            let response_to_question = if state.started {
                None
            } else {
                state.pending_selection.as_ref().map(|p| p.question_index)
            };
            state.send_in_flight = true;
            SendMessagePayload::text(text, response_to_question)
        };

        let result = self.backend.send_message(self.match_id, &payload).await;

        let mut state = self.lock_state();
        state.send_in_flight = false;
        match result {
            Ok(message) => {
                log::debug!("Message {} delivered in match {}", message.id, self.match_id);
                state.pending_selection = None;
                state.started = true;
                if !state.messages.iter().any(|m| m.id == message.id) {
                    state.messages.push(message.clone());
                }
                Ok(message)
            }
            Err(source) => Err(SendError::Failed(source)),
        }
    }

    /// Re-fetches the started flag. The flag is monotonic: a stale fetch
    /// can never undo a start that a just-completed send established.
    pub async fn refresh_status(&self) -> Result<(), FetchError> {
        let status = self
            .backend
            .fetch_status(self.match_id)
            .await
            .map_err(|source| FetchError {
                operation: "conversation status",
                source,
            })?;
        let mut state = self.lock_state();
        state.started = state.started || status.conversation_started;
        Ok(())
    }

    /// Re-fetches the other user's respondable prompts. The pool is
    /// replaced wholesale; a pending selection that dropped out of the
    /// refreshed pool is kept, since membership only matters at
    /// selection time.
    pub async fn refresh_prompts(&self) -> Result<(), FetchError> {
        let prompts = self
            .backend
            .fetch_prompts(self.match_id)
            .await
            .map_err(|source| FetchError {
                operation: "respondable prompts",
                source,
            })?;
        let mut state = self.lock_state();
        state.available_prompts = prompts;
        Ok(())
    }

    /// Re-fetches the message list. History is append-only server-side,
    /// so a fetched list shorter than the local one is a stale snapshot
    /// and is dropped rather than applied.
    pub async fn refresh_messages(&self) -> Result<(), FetchError> {
        let messages = self
            .backend
            .fetch_messages(self.match_id)
            .await
            .map_err(|source| FetchError {
                operation: "messages",
                source,
            })?;
        let mut state = self.lock_state();
        if messages.len() < state.messages.len() {
            log::debug!(
                "Dropping stale message fetch for match {} ({} < {})",
                self.match_id,
                messages.len(),
                state.messages.len()
            );
            return Ok(());
        }
        if !messages.is_empty() {
            state.started = true;
        }
        state.messages = messages;
        Ok(())
    }

    /// Runs all three refreshes concurrently and collects the failures.
    /// Partial failure is fine: whatever succeeded is applied, the rest
    /// keeps its last-known value.
    pub async fn refresh_all(&self) -> Vec<FetchError> {
        let (status, prompts, messages) = tokio::join!(
            self.refresh_status(),
            self.refresh_prompts(),
            self.refresh_messages()
        );
        [status, prompts, messages]
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }

    /// Projects the message list for rendering: chronological order,
    /// sender attribution relative to the viewer, and the responded
    /// prompt resolved to its question text where the pool still has it.
    pub fn timeline(&self) -> Vec<TimelineEntry> {
        let state = self.lock_state();
        let mut entries: Vec<TimelineEntry> = state
            .messages
            .iter()
            .map(|message| {
                let direction = if message.sender_id == self.viewer_id {
                    MessageDirection::Sent
                } else {
                    MessageDirection::Received
                };
                let responds_to = message.response_to_question.map(|question_index| {
                    let question = match direction {
                        // The tracked pool holds the other user's answers,
                        // which is what the viewer's own first message
                        // responded to. A received first message responded
                        // to one of the viewer's answers instead.
                        MessageDirection::Sent => state
                            .available_prompts
                            .iter()
                            .find(|p| p.question_index == question_index)
                            .map(|p| p.question.clone()),
                        MessageDirection::Received => None,
                    };
                    RespondedPrompt {
                        question_index,
                        question,
                    }
                });
                TimelineEntry {
                    id: message.id,
                    content: message.content.clone(),
                    sent_at: message.sent_at,
                    direction,
                    responds_to,
                }
            })
            .collect();
        // stable sort keeps server order for identical timestamps
        entries.sort_by_key(|entry| entry.sent_at);
        entries
    }

    fn lock_state(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().expect("conversation state lock poisoned")
    }
}
