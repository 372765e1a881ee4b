use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Subscription level for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_tier", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    Free,
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubscriptionTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "free" => Ok(Self::Free),
            "premium" => Ok(Self::Premium),
            _ => Err(format!(
                "Invalid subscription tier: '{}'. Expected one of: free, premium",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
    Expired,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Expired => "expired",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user's entitlement to one subject at one tier. Rows accumulate as
/// history; at most one per subject should satisfy `is_valid_at` at any
/// evaluation instant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: String,
    pub tier: SubscriptionTier,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// A subscription counts at the evaluation instant iff it is active and
    /// its expiry (when present) is strictly in the future. An expiry equal
    /// to `now` does NOT count.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.status != SubscriptionStatus::Active {
            return false;
        }
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at > now,
        }
    }

    /// Valid at `now` AND premium tier.
    pub fn grants_premium_at(&self, now: DateTime<Utc>) -> bool {
        self.tier == SubscriptionTier::Premium && self.is_valid_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn subscription(
        tier: SubscriptionTier,
        status: SubscriptionStatus,
        expires_at: Option<DateTime<Utc>>,
    ) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            subject_id: "BST".to_string(),
            tier,
            status,
            started_at: now - Duration::days(1),
            expires_at,
            created_at: now - Duration::days(1),
            updated_at: now - Duration::days(1),
        }
    }

    #[test]
    fn active_without_expiry_is_valid() {
        let sub = subscription(SubscriptionTier::Premium, SubscriptionStatus::Active, None);
        assert!(sub.is_valid_at(Utc::now()));
    }

    #[test]
    fn expiry_boundary_is_strict() {
        let now = Utc::now();
        let at_now = subscription(
            SubscriptionTier::Premium,
            SubscriptionStatus::Active,
            Some(now),
        );
        let one_second_later = subscription(
            SubscriptionTier::Premium,
            SubscriptionStatus::Active,
            Some(now + Duration::seconds(1)),
        );

        assert!(!at_now.is_valid_at(now), "expiry equal to now must not count");
        assert!(one_second_later.is_valid_at(now));
    }

    #[test]
    fn inactive_and_expired_statuses_never_count() {
        let now = Utc::now();
        let future = Some(now + Duration::days(30));

        let inactive =
            subscription(SubscriptionTier::Premium, SubscriptionStatus::Inactive, future);
        let expired =
            subscription(SubscriptionTier::Premium, SubscriptionStatus::Expired, future);

        assert!(!inactive.is_valid_at(now));
        assert!(!expired.is_valid_at(now));
    }

    #[test]
    fn free_tier_never_grants_premium() {
        let sub = subscription(SubscriptionTier::Free, SubscriptionStatus::Active, None);
        assert!(sub.is_valid_at(Utc::now()));
        assert!(!sub.grants_premium_at(Utc::now()));
    }
}
