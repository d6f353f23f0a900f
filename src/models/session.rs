use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Academic quarter a session belongs to. Conflict checks never cross
/// quarter boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum Quarter {
    First,
    Second,
    Third,
    Fourth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum ClassMode {
    Online,
    #[serde(rename = "Face-to-Face")]
    #[sqlx(rename = "Face-to-Face")]
    FaceToFace,
    Homeschooling,
}

impl ClassMode {
    /// Parses the label used in spreadsheet exports ("Online",
    /// "Face-to-Face", "Homeschooling").
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Online" => Some(Self::Online),
            "Face-to-Face" => Some(Self::FaceToFace),
            "Homeschooling" => Some(Self::Homeschooling),
            _ => None,
        }
    }

    /// Whether this mode requires a physical room assignment.
    pub fn requires_room(&self) -> bool {
        matches!(self, Self::FaceToFace)
    }
}

/// One scheduled class meeting. Times are canonical 24-hour "HH:MM", so
/// lexical comparison is equivalent to numeric comparison.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: String,
    pub section_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub academic_year: String,
    pub quarter: Quarter,
    pub week: String,
    pub start_time: String,
    pub end_time: String,
    pub class_mode: ClassMode,
    pub room: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Session enriched with display names for read paths. Dangling
/// teacher/subject references resolve to "Unknown" instead of failing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionView {
    pub id: String,
    pub section_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub academic_year: String,
    pub quarter: Quarter,
    pub week: String,
    pub start_time: String,
    pub end_time: String,
    pub class_mode: ClassMode,
    pub room: Option<String>,
    pub subject_name: String,
    pub teacher_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionRequest {
    pub section_id: String,
    pub subject_id: String,
    pub teacher_id: String,
    pub academic_year: String,
    pub quarter: Quarter,
    pub week: String,
    pub start_time: String,
    pub end_time: String,
    pub class_mode: ClassMode,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSessionRequest {
    pub section_id: Option<String>,
    pub subject_id: Option<String>,
    pub teacher_id: Option<String>,
    pub week: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub class_mode: Option<ClassMode>,
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleFilter {
    pub section_id: Option<String>,
    pub teacher_id: Option<String>,
    pub academic_year: Option<String>,
    pub quarter: Option<Quarter>,
}
