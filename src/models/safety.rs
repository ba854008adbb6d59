use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Harassment,
    FakeProfile,
    InappropriateContent,
    Spam,
    Other,
}

impl std::fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ReportCategory::Harassment => "harassment",
                ReportCategory::FakeProfile => "fake_profile",
                ReportCategory::InappropriateContent => "inappropriate_content",
                ReportCategory::Spam => "spam",
                ReportCategory::Other => "other",
            }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    pub reported_user_id: Uuid,
    pub category: ReportCategory,
    pub description: String,
    pub evidence_photos: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockRequest {
    pub user_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SafetyTip {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SafetyStats {
    #[serde(default)]
    pub verified_users: u64,
    #[serde(default)]
    pub verification_rate: f64,
}
