// Report reason value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    FalseContent,
    Inappropriate,
    Spam,
    Other,
}

impl ReportReason {
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_lowercase().as_str() {
            "false_content" => Some(ReportReason::FalseContent),
            "inappropriate" => Some(ReportReason::Inappropriate),
            "spam" => Some(ReportReason::Spam),
            "other" => Some(ReportReason::Other),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ReportReason::FalseContent => "허위 내용",
            ReportReason::Inappropriate => "부적절한 내용",
            ReportReason::Spam => "스팸/광고",
            ReportReason::Other => "기타",
        }
    }
}
