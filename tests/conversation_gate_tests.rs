//! Integration tests for the conversation gate:
//!
//! - the first message must respond to one of the other user's prompt
//!   answers and clear the 20-word floor; later messages only need to be
//!   non-empty.
//! - `started` is monotonic and survives stale refreshes.
//! - `send` is single-flight per conversation and preserves the draft
//!   and the prompt selection when the backend rejects it.

use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use uuid::Uuid;

use dateconnect_client::api::client::ApiError;
use dateconnect_client::models::message::{
    ConversationStatus, Message, RespondablePrompt, SendMessagePayload,
};
use dateconnect_client::services::conversation_gate::{
    ComposeError, ConversationBackend, ConversationGate, MessageDirection, SendError,
};

// ---------------------------------------------------------------------------
// Helper: an in-memory ConversationBackend the tests can steer
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeState {
    started: bool,
    prompts: Vec<RespondablePrompt>,
    messages: Vec<Message>,
    fail_next_send: Option<(u16, String)>,
    sent_payloads: Vec<SendMessagePayload>,
}

#[derive(Default, Clone)]
struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
    other_user_id: Uuid,
    /// When set, `send_message` parks until the notify fires, so a test
    /// can hold a send in flight.
    hold_sends: Option<Arc<Notify>>,
}

impl FakeBackend {
    fn with_prompts(prompts: Vec<RespondablePrompt>) -> Self {
        let backend = FakeBackend {
            other_user_id: Uuid::new_v4(),
            ..Default::default()
        };
        backend.state.lock().unwrap().prompts = prompts;
        backend
    }

    fn fail_next_send(&self, status: u16, detail: &str) {
        self.state.lock().unwrap().fail_next_send = Some((status, detail.to_string()));
    }

    fn set_prompts(&self, prompts: Vec<RespondablePrompt>) {
        self.state.lock().unwrap().prompts = prompts;
    }

    fn set_messages(&self, messages: Vec<Message>) {
        self.state.lock().unwrap().messages = messages;
    }

    fn set_started(&self, started: bool) {
        self.state.lock().unwrap().started = started;
    }

    fn sent_payloads(&self) -> Vec<SendMessagePayload> {
        self.state.lock().unwrap().sent_payloads.clone()
    }
}

impl ConversationBackend for FakeBackend {
    async fn fetch_status(&self, _match_id: Uuid) -> Result<ConversationStatus, ApiError> {
        Ok(ConversationStatus {
            conversation_started: self.state.lock().unwrap().started,
        })
    }

    async fn fetch_prompts(&self, _match_id: Uuid) -> Result<Vec<RespondablePrompt>, ApiError> {
        Ok(self.state.lock().unwrap().prompts.clone())
    }

    async fn fetch_messages(&self, _match_id: Uuid) -> Result<Vec<Message>, ApiError> {
        Ok(self.state.lock().unwrap().messages.clone())
    }

    async fn send_message(
        &self,
        match_id: Uuid,
        payload: &SendMessagePayload,
    ) -> Result<Message, ApiError> {
        if let Some(hold) = &self.hold_sends {
            hold.notified().await;
        }

        let mut state = self.state.lock().unwrap();
        state.sent_payloads.push(payload.clone());

        if let Some((status, detail)) = state.fail_next_send.take() {
            return Err(ApiError::Remote { status, detail });
        }

        let message = Message {
            id: Uuid::new_v4(),
            match_id,
            sender_id: self.other_user_id, // overwritten by callers that care
            content: payload.content.clone(),
            response_to_question: payload.response_to_question,
            sent_at: Utc::now().naive_utc(),
            read_at: None,
        };
        state.started = true;
        state.messages.push(message.clone());
        Ok(message)
    }
}

fn prompt(question_index: usize) -> RespondablePrompt {
    RespondablePrompt {
        question_index,
        question: format!("Question number {}", question_index),
        answer: "An answer that says something real about the person who wrote it.".to_string(),
    }
}

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

fn message(match_id: Uuid, sender_id: Uuid, content: &str, seconds: i64) -> Message {
    Message {
        id: Uuid::new_v4(),
        match_id,
        sender_id,
        content: content.to_string(),
        response_to_question: None,
        sent_at: (Utc::now() + Duration::seconds(seconds)).naive_utc(),
        read_at: None,
    }
}

async fn opened_gate(backend: FakeBackend) -> ConversationGate<FakeBackend> {
    let gate = ConversationGate::new(Uuid::new_v4(), Uuid::new_v4(), backend);
    let errors = gate.refresh_all().await;
    assert!(errors.is_empty());
    gate
}

// ---------------------------------------------------------------------------
// First-message gating
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nineteen_words_are_rejected_locally() {
    let backend = FakeBackend::with_prompts(vec![prompt(2)]);
    let gate = opened_gate(backend.clone()).await;

    gate.select_prompt(prompt(2)).unwrap();
    let draft = words(19);
    assert!(!gate.can_send(&draft));

    match gate.send(&draft).await {
        Err(SendError::Rejected(ComposeError::TooShort { words, minimum })) => {
            assert_eq!(words, 19);
            assert_eq!(minimum, 20);
        }
        other => panic!("expected a too-short rejection, got {:?}", other.map(|m| m.id)),
    }
    // nothing reached the network
    assert!(backend.sent_payloads().is_empty());
    assert!(!gate.started());
}

#[tokio::test]
async fn exactly_twenty_words_open_the_conversation() {
    let backend = FakeBackend::with_prompts(vec![prompt(2)]);
    let gate = opened_gate(backend.clone()).await;

    gate.select_prompt(prompt(2)).unwrap();
    let draft = words(20);
    assert!(gate.can_send(&draft));

    let sent = gate.send(&draft).await.expect("send should succeed");
    assert_eq!(sent.response_to_question, Some(2));

    let payloads = backend.sent_payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].response_to_question, Some(2));
    assert_eq!(payloads[0].message_type, "text");

    assert!(gate.started());
    assert!(gate.pending_selection().is_none());
    assert_eq!(gate.messages().len(), 1);
}

#[tokio::test]
async fn no_selection_blocks_sending_regardless_of_length() {
    let backend = FakeBackend::with_prompts(vec![prompt(0)]);
    let gate = opened_gate(backend).await;

    for draft in [words(5), words(20), words(200)] {
        assert_eq!(
            gate.compose_check(&draft),
            Err(ComposeError::NoPromptSelected)
        );
    }
}

#[tokio::test]
async fn empty_prompt_pool_blocks_every_first_message() {
    let backend = FakeBackend::with_prompts(vec![]);
    let gate = opened_gate(backend).await;

    assert_eq!(
        gate.compose_check(&words(50)),
        Err(ComposeError::NoPromptsAvailable)
    );
    assert!(!gate.can_send(&words(50)));
}

#[tokio::test]
async fn whitespace_only_drafts_are_never_sendable() {
    let backend = FakeBackend::with_prompts(vec![prompt(1)]);
    let gate = opened_gate(backend.clone()).await;

    assert_eq!(gate.compose_check(" \t\n "), Err(ComposeError::EmptyMessage));

    // still unsendable once the conversation is running
    backend.set_started(true);
    gate.refresh_status().await.unwrap();
    assert_eq!(gate.compose_check(" \t\n "), Err(ComposeError::EmptyMessage));
}

#[tokio::test]
async fn free_chat_after_start_needs_no_selection_or_floor() {
    let backend = FakeBackend::with_prompts(vec![prompt(1)]);
    backend.set_started(true);
    let gate = opened_gate(backend.clone()).await;

    assert!(gate.can_send("ok"));
    let sent = gate.send("ok").await.expect("short reply should succeed");
    assert_eq!(sent.response_to_question, None);
    assert_eq!(backend.sent_payloads()[0].response_to_question, None);

    // repeated sends keep working without a selection
    gate.send("another").await.expect("repeat send should succeed");
    assert_eq!(backend.sent_payloads()[1].response_to_question, None);
    assert_eq!(gate.messages().len(), 2);
}

// ---------------------------------------------------------------------------
// Prompt selection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn selection_can_be_replaced_before_sending() {
    let backend = FakeBackend::with_prompts(vec![prompt(1), prompt(4)]);
    let gate = opened_gate(backend).await;

    gate.select_prompt(prompt(1)).unwrap();
    gate.select_prompt(prompt(4)).unwrap();
    assert_eq!(gate.pending_selection().unwrap().question_index, 4);
}

#[tokio::test]
async fn selecting_an_unlisted_prompt_is_rejected() {
    let backend = FakeBackend::with_prompts(vec![prompt(1)]);
    let gate = opened_gate(backend).await;

    assert_eq!(
        gate.select_prompt(prompt(9)),
        Err(ComposeError::UnknownPrompt)
    );
}

#[tokio::test]
async fn selection_is_refused_once_started() {
    let backend = FakeBackend::with_prompts(vec![prompt(1)]);
    backend.set_started(true);
    let gate = opened_gate(backend).await;

    assert_eq!(
        gate.select_prompt(prompt(1)),
        Err(ComposeError::AlreadyStarted)
    );
}

#[tokio::test]
async fn stale_selection_survives_a_pool_refresh_and_still_sends() {
    let backend = FakeBackend::with_prompts(vec![prompt(3)]);
    let gate = opened_gate(backend.clone()).await;

    gate.select_prompt(prompt(3)).unwrap();

    // the other user edits their profile mid-composition
    backend.set_prompts(vec![]);
    gate.refresh_prompts().await.unwrap();

    assert_eq!(gate.pending_selection().unwrap().question_index, 3);
    let sent = gate.send(&words(20)).await.expect("stale index may send");
    assert_eq!(sent.response_to_question, Some(3));
}

// ---------------------------------------------------------------------------
// Failure semantics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn remote_rejection_preserves_state_and_selection() {
    let backend = FakeBackend::with_prompts(vec![prompt(2)]);
    let gate = opened_gate(backend.clone()).await;

    gate.select_prompt(prompt(2)).unwrap();
    backend.fail_next_send(401, "Token expired");

    match gate.send(&words(20)).await {
        Err(SendError::Failed(error)) => {
            assert_eq!(error.status(), Some(401));
        }
        other => panic!("expected a remote failure, got {:?}", other.map(|m| m.id)),
    }

    assert!(!gate.started());
    assert_eq!(gate.pending_selection().unwrap().question_index, 2);
    assert!(gate.messages().is_empty());

    // the preserved selection allows an immediate retry
    let sent = gate.send(&words(20)).await.expect("retry should succeed");
    assert_eq!(sent.response_to_question, Some(2));
    assert!(gate.started());
}

#[tokio::test]
async fn local_rejections_never_reach_the_backend() {
    let backend = FakeBackend::with_prompts(vec![prompt(0)]);
    let gate = opened_gate(backend.clone()).await;

    let rejection = gate.send(&words(20)).await.unwrap_err();
    assert!(rejection.is_local());
    assert!(backend.sent_payloads().is_empty());
}

// ---------------------------------------------------------------------------
// Single-flight sends
// ---------------------------------------------------------------------------

#[tokio::test]
async fn second_send_while_one_is_outstanding_is_rejected() {
    let release = Arc::new(Notify::new());
    let backend = FakeBackend {
        other_user_id: Uuid::new_v4(),
        hold_sends: Some(release.clone()),
        ..Default::default()
    };
    backend.set_prompts(vec![prompt(1)]);

    let gate = opened_gate(backend.clone()).await;
    gate.select_prompt(prompt(1)).unwrap();
    let draft = words(20);

    let first = gate.send(&draft);
    let second = async {
        tokio::task::yield_now().await; // let the first send claim the slot
        let outcome = gate.send(&draft).await;
        release.notify_one();
        outcome
    };

    let (first, second) = tokio::join!(first, second);
    let sent = first.expect("the outstanding send completes unaffected");
    assert_eq!(sent.response_to_question, Some(1));
    match second {
        Err(SendError::Rejected(ComposeError::SendInProgress)) => {}
        other => panic!(
            "expected an in-progress rejection, got {:?}",
            other.map(|m| m.id)
        ),
    }

    // only the first send reached the backend
    assert_eq!(backend.sent_payloads().len(), 1);
    assert!(!gate.send_in_flight());
}

// ---------------------------------------------------------------------------
// Refresh merges
// ---------------------------------------------------------------------------

#[tokio::test]
async fn started_never_reverts_on_a_stale_status_fetch() {
    let backend = FakeBackend::with_prompts(vec![prompt(1)]);
    let gate = opened_gate(backend.clone()).await;

    gate.select_prompt(prompt(1)).unwrap();
    gate.send(&words(20)).await.expect("send should succeed");
    assert!(gate.started());

    // a slow status fetch dispatched before the send resolves now
    backend.set_started(false);
    gate.refresh_status().await.unwrap();
    assert!(gate.started());
}

#[tokio::test]
async fn shorter_message_fetches_are_dropped_as_stale() {
    let match_id = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    let other = Uuid::new_v4();
    let backend = FakeBackend::with_prompts(vec![prompt(1)]);
    backend.set_messages(vec![
        message(match_id, viewer, "first", 0),
        message(match_id, other, "second", 1),
    ]);

    let gate = ConversationGate::new(match_id, viewer, backend.clone());
    gate.refresh_messages().await.unwrap();
    assert_eq!(gate.messages().len(), 2);
    assert!(gate.started());

    backend.set_messages(vec![message(match_id, viewer, "first", 0)]);
    gate.refresh_messages().await.unwrap();
    assert_eq!(gate.messages().len(), 2, "stale snapshot must not apply");
}

#[tokio::test]
async fn refreshing_a_nonempty_history_marks_the_conversation_started() {
    let match_id = Uuid::new_v4();
    let backend = FakeBackend::with_prompts(vec![]);
    backend.set_messages(vec![message(match_id, Uuid::new_v4(), "hello there", 0)]);

    let gate = ConversationGate::new(match_id, Uuid::new_v4(), backend);
    assert!(!gate.started());
    gate.refresh_messages().await.unwrap();
    assert!(gate.started());
}

// ---------------------------------------------------------------------------
// Timeline projection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn timeline_orders_chronologically_and_attributes_senders() {
    let match_id = Uuid::new_v4();
    let viewer = Uuid::new_v4();
    let other = Uuid::new_v4();
    let backend = FakeBackend::with_prompts(vec![prompt(2)]);

    let mut opener = message(match_id, viewer, &words(20), 0);
    opener.response_to_question = Some(2);
    let reply = message(match_id, other, "good question!", 5);
    // delivered out of order
    backend.set_messages(vec![reply.clone(), opener.clone()]);

    let gate = ConversationGate::new(match_id, viewer, backend);
    gate.refresh_all().await;

    let timeline = gate.timeline();
    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].id, opener.id);
    assert_eq!(timeline[0].direction, MessageDirection::Sent);
    assert_eq!(timeline[1].direction, MessageDirection::Received);

    let responds_to = timeline[0].responds_to.as_ref().unwrap();
    assert_eq!(responds_to.question_index, 2);
    assert_eq!(responds_to.question.as_deref(), Some("Question number 2"));
    assert!(timeline[1].responds_to.is_none());
}
