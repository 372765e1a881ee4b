// In-memory providers for exercising the resolver and guard without a
// database.
use async_trait::async_trait;
use std::collections::HashSet;
use uuid::Uuid;

use crate::database::models::{Role, Subscription};
use crate::entitlement::{ProviderError, RoleProvider, SubscriptionProvider};

/// Role provider returning the same fixed set for every user.
pub struct StaticRoles {
    roles: HashSet<Role>,
}

impl StaticRoles {
    pub fn of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
        }
    }
}

#[async_trait]
impl RoleProvider for StaticRoles {
    async fn roles(&self, _user_id: Uuid) -> Result<HashSet<Role>, ProviderError> {
        Ok(self.roles.clone())
    }
}

/// Subscription provider returning the same fixed history for every user.
pub struct StaticSubscriptions {
    subscriptions: Vec<Subscription>,
}

impl StaticSubscriptions {
    pub fn none() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    pub fn of(subscriptions: Vec<Subscription>) -> Self {
        Self { subscriptions }
    }
}

#[async_trait]
impl SubscriptionProvider for StaticSubscriptions {
    async fn list_subscriptions(&self, _user_id: Uuid) -> Result<Vec<Subscription>, ProviderError> {
        Ok(self.subscriptions.clone())
    }
}

/// Role provider that always fails with a transport error.
pub struct FailingRoles;

#[async_trait]
impl RoleProvider for FailingRoles {
    async fn roles(&self, _user_id: Uuid) -> Result<HashSet<Role>, ProviderError> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }
}

/// Subscription provider that always fails with a transport error.
pub struct FailingSubscriptions;

#[async_trait]
impl SubscriptionProvider for FailingSubscriptions {
    async fn list_subscriptions(&self, _user_id: Uuid) -> Result<Vec<Subscription>, ProviderError> {
        Err(ProviderError::Transport("connection refused".to_string()))
    }
}
