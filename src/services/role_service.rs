use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::database::models::{Role, RoleAssignment};
use crate::entitlement::{ProviderError, RoleProvider};

#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read/write access to the role store. The read side doubles as the
/// resolver's RoleProvider.
pub struct RoleService {
    pool: PgPool,
}

impl RoleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All roles currently assigned to a user. Missing users read as empty.
    pub async fn roles_for(&self, user_id: Uuid) -> Result<HashSet<Role>, sqlx::Error> {
        let assignments = sqlx::query_as::<_, RoleAssignment>(
            "SELECT user_id, role, assigned_at FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(assignments.into_iter().map(|a| a.role).collect())
    }

    /// Assign a role to a user. Assignments are additive; re-assigning an
    /// already-held role refreshes its timestamp.
    pub async fn assign_role(
        &self,
        user_id: Uuid,
        role: Role,
    ) -> Result<RoleAssignment, RoleError> {
        let exists: Option<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if exists.is_none() {
            return Err(RoleError::UnknownUser(user_id.to_string()));
        }

        let assignment = sqlx::query_as::<_, RoleAssignment>(
            r#"
            INSERT INTO user_roles (user_id, role, assigned_at)
            VALUES ($1, $2, now())
            ON CONFLICT (user_id, role) DO UPDATE SET assigned_at = now()
            RETURNING user_id, role, assigned_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(assignment)
    }
}

#[async_trait]
impl RoleProvider for RoleService {
    async fn roles(&self, user_id: Uuid) -> Result<HashSet<Role>, ProviderError> {
        self.roles_for(user_id).await.map_err(ProviderError::from)
    }
}
