// Read models for the content surfaces. These are deliberately thin: the
// portal's content pages are straight row listings gated by the entitlement
// guard, with no business logic of their own.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A JSS curriculum subject (e.g. "BST" - Basic Science and Technology).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub grade_levels: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub subject_id: String,
    pub title: String,
    pub topic: Option<String>,
    pub question_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlashcardSet {
    pub id: Uuid,
    pub subject_id: String,
    pub title: String,
    pub card_count: i32,
    pub created_at: DateTime<Utc>,
}

/// An uploaded study resource (PDF or similar), stored externally; the row
/// carries the storage path only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResourceDoc {
    pub id: Uuid,
    pub subject_id: String,
    pub title: String,
    pub storage_path: String,
    pub created_at: DateTime<Utc>,
}

/// A worked past-question solution in the solution bank.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SolutionEntry {
    pub id: Uuid,
    pub subject_id: String,
    pub question: String,
    pub solution: String,
    pub exam_year: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumThread {
    pub id: Uuid,
    pub author_id: Uuid,
    pub subject_id: Option<String>,
    pub title: String,
    pub body: String,
    pub reply_count: i32,
    pub created_at: DateTime<Utc>,
}

/// A homework-help request submitted by a student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HomeworkRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: String,
    pub question: String,
    pub answered: bool,
    pub created_at: DateTime<Utc>,
}

/// A quick-help question (short-form, no attachment).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuickQuestion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub question: String,
    pub created_at: DateTime<Utc>,
}
