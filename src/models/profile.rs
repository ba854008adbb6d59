use serde::{Deserialize, Serialize};

/// One of the published profile questions users may answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileQuestion {
    pub index: usize,
    pub question: String,
}

/// A question/answer pair on a user's own profile. The backend requires
/// every answer to clear the same 20-word floor that gates first messages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptAnswer {
    pub question_index: usize,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_answers: Option<Vec<PromptAnswer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationUpdate {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPreferences {
    pub search_radius: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUploadReceipt {
    pub message: String,
    pub photo_count: usize,
}
