use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Roles a portal account can hold. Most users carry exactly one, but the
/// store tolerates a set per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    /// Teachers and admins skip subscription checks entirely.
    pub fn bypasses_subscriptions(&self) -> bool {
        matches!(self, Self::Teacher | Self::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            "admin" => Ok(Self::Admin),
            _ => Err(format!(
                "Invalid role: '{}'. Expected one of: student, teacher, admin",
                s
            )),
        }
    }
}

/// One row in the role store. Assignments are superseded, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleAssignment {
    pub user_id: Uuid,
    pub role: Role,
    pub assigned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bypass_roles() {
        assert!(Role::Teacher.bypasses_subscriptions());
        assert!(Role::Admin.bypasses_subscriptions());
        assert!(!Role::Student.bypasses_subscriptions());
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("TEACHER".parse::<Role>().unwrap(), Role::Teacher);
        assert!("superuser".parse::<Role>().is_err());
    }
}
