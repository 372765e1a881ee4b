use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Subscription, SubscriptionStatus, SubscriptionTier};
use crate::entitlement::{ProviderError, SubscriptionProvider};

/// Premium subscriptions run for exactly one year from creation.
const PREMIUM_TERM_DAYS: i64 = 365;

#[derive(Debug, thiserror::Error)]
pub enum SubscriptionError {
    #[error("Anonymous users cannot subscribe")]
    Anonymous,
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read/write access to the subscription store. The read side doubles as
/// the resolver's SubscriptionProvider.
pub struct SubscriptionService {
    pool: PgPool,
}

impl SubscriptionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Full subscription history for a user, valid or not.
    pub async fn list_for(&self, user_id: Uuid) -> Result<Vec<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, subject_id, tier, status, started_at, expires_at,
                   created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY started_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// The currently valid subscription for one subject, if any. When
    /// history holds several valid rows, the most recently started wins.
    pub async fn get_active_subscription(
        &self,
        user_id: Uuid,
        subject_id: &str,
    ) -> Result<Option<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, subject_id, tier, status, started_at, expires_at,
                   created_at, updated_at
            FROM subscriptions
            WHERE user_id = $1
              AND subject_id = $2
              AND status = 'active'
              AND (expires_at IS NULL OR expires_at > $3)
            ORDER BY started_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }

    /// Create a subscription for an authenticated user. Premium runs for
    /// exactly 365 days; free never expires.
    pub async fn create_subscription(
        &self,
        user_id: Option<Uuid>,
        subject_id: &str,
        tier: SubscriptionTier,
    ) -> Result<Subscription, SubscriptionError> {
        let user_id = user_id.ok_or(SubscriptionError::Anonymous)?;

        let subject: Option<(String,)> =
            sqlx::query_as("SELECT id FROM subjects WHERE id = $1")
                .bind(subject_id)
                .fetch_optional(&self.pool)
                .await?;

        if subject.is_none() {
            return Err(SubscriptionError::UnknownSubject(subject_id.to_string()));
        }

        let now = Utc::now();
        let expires_at = expiry_for(tier, now);

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions
                (id, user_id, subject_id, tier, status, started_at, expires_at,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $6, $6)
            RETURNING id, user_id, subject_id, tier, status, started_at, expires_at,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(subject_id)
        .bind(tier)
        .bind(SubscriptionStatus::Active)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(subscription)
    }

    /// Administrative listing across all users.
    pub async fn list_all(&self, limit: i64) -> Result<Vec<Subscription>, sqlx::Error> {
        sqlx::query_as::<_, Subscription>(
            r#"
            SELECT id, user_id, subject_id, tier, status, started_at, expires_at,
                   created_at, updated_at
            FROM subscriptions
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Mark active rows whose expiry has passed as expired. Returns the
    /// affected users so their cache entries can be invalidated.
    pub async fn sweep_expired(&self) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE subscriptions
            SET status = 'expired', updated_at = now()
            WHERE status = 'active' AND expires_at IS NOT NULL AND expires_at <= $1
            RETURNING user_id
            "#,
        )
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await?;

        let mut users: Vec<Uuid> = rows.into_iter().map(|(user_id,)| user_id).collect();
        users.sort();
        users.dedup();
        Ok(users)
    }
}

#[async_trait]
impl SubscriptionProvider for SubscriptionService {
    async fn list_subscriptions(&self, user_id: Uuid) -> Result<Vec<Subscription>, ProviderError> {
        self.list_for(user_id).await.map_err(ProviderError::from)
    }
}

/// Expiry for a subscription created at `now`: premium runs a fixed
/// 365-day term, free never expires.
fn expiry_for(
    tier: SubscriptionTier,
    now: chrono::DateTime<Utc>,
) -> Option<chrono::DateTime<Utc>> {
    match tier {
        SubscriptionTier::Premium => Some(now + Duration::days(PREMIUM_TERM_DAYS)),
        SubscriptionTier::Free => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_term_is_exactly_365_days() {
        let now = Utc::now();
        assert_eq!(
            expiry_for(SubscriptionTier::Premium, now),
            Some(now + Duration::days(365))
        );
    }

    #[test]
    fn free_subscriptions_never_expire() {
        assert_eq!(expiry_for(SubscriptionTier::Free, Utc::now()), None);
    }
}
