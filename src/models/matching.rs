use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::profile::PromptAnswer;

/// Another user's profile as shown in the discover feed, the match list
/// and the blocked-users list. The backend strips private fields before
/// serving these, so only the public surface is modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileCard {
    pub id: Uuid,
    pub first_name: String,
    pub age: u8,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub question_answers: Vec<PromptAnswer>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Result of liking a user; `is_match` flips when the like was mutual
/// and the backend created a match.
#[derive(Debug, Clone, Deserialize)]
pub struct LikeOutcome {
    pub message: String,
    #[serde(rename = "match")]
    pub is_match: bool,
}

/// One entry of GET /conversations: the match, the other participant and
/// a preview of the latest message.
#[derive(Debug, Clone, Deserialize)]
pub struct ConversationSummary {
    pub match_id: Uuid,
    pub other_user: ProfileCard,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<NaiveDateTime>,
}
