// services/session.rs

use std::sync::{Arc, RwLock};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::api::auth::{AuthApi, MessageReceipt};
use crate::api::client::{ApiClient, ApiError};
use crate::api::profile::ProfileApi;
use crate::models::profile::ProfileUpdate;
use crate::models::user::{AccountSummary, LoginData, RegisterData};
use crate::services::conversation_gate::ConversationGate;
use crate::services::message_rules::{word_count, FIRST_MESSAGE_MIN_WORDS};
use crate::utils::password_rules::{PasswordPolicy, PasswordPolicyError};

#[derive(Error, Debug)]
pub enum AuthFlowError {
    #[error("Registration data is invalid: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Password does not meet requirements: {0}")]
    WeakPassword(#[from] PasswordPolicyError),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Remote(#[from] ApiError),
}

#[derive(Error, Debug)]
pub enum ProfileUpdateError {
    /// Prompt answers clear the same word floor as first messages; the
    /// check runs client-side before the request goes out.
    #[error("Answer to question {question_index} must be at least {minimum} words (currently {words})")]
    AnswerTooShort {
        question_index: usize,
        words: usize,
        minimum: usize,
    },

    #[error(transparent)]
    Remote(#[from] ApiError),
}

/// Login state and the flows that depend on it. Owns the shared
/// `ApiClient` handle and installs/clears the bearer token on it.
pub struct Session {
    api: Arc<ApiClient>,
    current_user: RwLock<Option<AccountSummary>>,
}

impl Session {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            current_user: RwLock::new(None),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn current_user(&self) -> Option<AccountSummary> {
        self.current_user
            .read()
            .expect("session lock poisoned")
            .clone()
    }

    /// Registers a new account. Validation order follows the backend:
    /// field rules first, then the password policy, then the remote call.
    pub async fn register(&self, payload: &RegisterData) -> Result<MessageReceipt, AuthFlowError> {
        payload.validate()?;
        PasswordPolicy::default().check(&payload.password)?;
        let receipt = AuthApi::register(&self.api, payload).await?;
        log::info!("Registered account for {}", payload.email);
        Ok(receipt)
    }

    /// Logs in and installs the issued token on the shared API client.
    pub async fn login(&self, email: &str, password: &str) -> Result<AccountSummary, AuthFlowError> {
        let response = AuthApi::login(
            &self.api,
            &LoginData {
                email: email.to_string(),
                password: password.to_string(),
            },
        )
        .await?;

        self.api.set_token(&response.access_token);
        let mut slot = self.current_user.write().expect("session lock poisoned");
        *slot = Some(response.user.clone());
        log::info!("Logged in as {}", response.user.email);
        Ok(response.user)
    }

    pub fn logout(&self) {
        self.api.clear_token();
        let mut slot = self.current_user.write().expect("session lock poisoned");
        *slot = None;
    }

    /// Updates the profile after preflighting every prompt answer against
    /// the shared word floor, so the user gets the same feedback the
    /// backend would give without a round trip.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<(), ProfileUpdateError> {
        if let Some(answers) = &update.question_answers {
            for answer in answers {
                let words = word_count(&answer.answer);
                if words < FIRST_MESSAGE_MIN_WORDS {
                    return Err(ProfileUpdateError::AnswerTooShort {
                        question_index: answer.question_index,
                        words,
                        minimum: FIRST_MESSAGE_MIN_WORDS,
                    });
                }
            }
        }
        ProfileApi::update(&self.api, update).await?;
        Ok(())
    }

    /// Opens the conversation gate for a match, attributed to the logged
    /// in user. The returned gate starts with an empty projection; call
    /// `refresh_all` on it before first render.
    pub fn open_conversation(
        &self,
        match_id: Uuid,
    ) -> Result<ConversationGate<Arc<ApiClient>>, AuthFlowError> {
        let viewer = self.current_user().ok_or(AuthFlowError::NotLoggedIn)?;
        Ok(ConversationGate::new(match_id, viewer.id, self.api.clone()))
    }
}
