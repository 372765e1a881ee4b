use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Role, Subscription};

/// Errors a provider read can surface. The resolver absorbs all of them
/// fail-closed; they exist so the failure can be logged with its cause.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Resolves the set of roles held by a user. No user row, no assignments,
/// or a deleted account all read as the empty set.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    async fn roles(&self, user_id: Uuid) -> Result<HashSet<Role>, ProviderError>;
}

/// Resolves the subscription history of a user, valid or not. Validity is
/// the resolver's concern, not the provider's.
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    async fn list_subscriptions(&self, user_id: Uuid) -> Result<Vec<Subscription>, ProviderError>;
}
