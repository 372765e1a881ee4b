use async_trait::async_trait;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{Role, Subscription};
use crate::entitlement::provider::{ProviderError, RoleProvider, SubscriptionProvider};

/// Per-user TTL cache over provider reads. Staleness is bounded by the
/// configured TTL and mutations invalidate explicitly; there is no implicit
/// refresh-on-remount anywhere.
struct TtlCache<V> {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, (Instant, V)>>,
}

impl<V: Clone> TtlCache<V> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    async fn get(&self, user_id: Uuid) -> Option<V> {
        // Fast path: read lock only
        let entries = self.entries.read().await;
        match entries.get(&user_id) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    async fn insert(&self, user_id: Uuid, value: V) {
        let mut entries = self.entries.write().await;
        entries.insert(user_id, (Instant::now(), value));
    }

    async fn invalidate(&self, user_id: Uuid) {
        let mut entries = self.entries.write().await;
        entries.remove(&user_id);
    }
}

/// Caching decorator over a [`RoleProvider`]. Only successful reads are
/// cached, so a transient provider failure stays transient.
pub struct CachedRoles {
    inner: Arc<dyn RoleProvider>,
    cache: TtlCache<HashSet<Role>>,
}

impl CachedRoles {
    pub fn new(inner: Arc<dyn RoleProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    /// Drop the cached entry for a user, e.g. after a role assignment.
    pub async fn invalidate(&self, user_id: Uuid) {
        self.cache.invalidate(user_id).await;
    }
}

#[async_trait]
impl RoleProvider for CachedRoles {
    async fn roles(&self, user_id: Uuid) -> Result<HashSet<Role>, ProviderError> {
        if let Some(roles) = self.cache.get(user_id).await {
            return Ok(roles);
        }

        let roles = self.inner.roles(user_id).await?;
        self.cache.insert(user_id, roles.clone()).await;
        Ok(roles)
    }
}

/// Caching decorator over a [`SubscriptionProvider`].
pub struct CachedSubscriptions {
    inner: Arc<dyn SubscriptionProvider>,
    cache: TtlCache<Vec<Subscription>>,
}

impl CachedSubscriptions {
    pub fn new(inner: Arc<dyn SubscriptionProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            cache: TtlCache::new(ttl),
        }
    }

    /// Drop the cached entry for a user, e.g. after a subscription is
    /// created or swept to expired.
    pub async fn invalidate(&self, user_id: Uuid) {
        self.cache.invalidate(user_id).await;
    }
}

#[async_trait]
impl SubscriptionProvider for CachedSubscriptions {
    async fn list_subscriptions(&self, user_id: Uuid) -> Result<Vec<Subscription>, ProviderError> {
        if let Some(subscriptions) = self.cache.get(user_id).await {
            return Ok(subscriptions);
        }

        let subscriptions = self.inner.list_subscriptions(user_id).await?;
        self.cache.insert(user_id, subscriptions.clone()).await;
        Ok(subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingRoles {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RoleProvider for CountingRoles {
        async fn roles(&self, _user_id: Uuid) -> Result<HashSet<Role>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(HashSet::from([Role::Student]))
        }
    }

    #[tokio::test]
    async fn caches_within_ttl() {
        let inner = Arc::new(CountingRoles {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedRoles::new(inner.clone(), Duration::from_secs(60));
        let user = Uuid::new_v4();

        cached.roles(user).await.unwrap();
        cached.roles(user).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let inner = Arc::new(CountingRoles {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedRoles::new(inner.clone(), Duration::from_millis(20));
        let user = Uuid::new_v4();

        cached.roles(user).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        cached.roles(user).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let inner = Arc::new(CountingRoles {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedRoles::new(inner.clone(), Duration::from_secs(60));
        let user = Uuid::new_v4();

        cached.roles(user).await.unwrap();
        cached.invalidate(user).await;
        cached.roles(user).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn users_are_cached_independently() {
        let inner = Arc::new(CountingRoles {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedRoles::new(inner.clone(), Duration::from_secs(60));

        cached.roles(Uuid::new_v4()).await.unwrap();
        cached.roles(Uuid::new_v4()).await.unwrap();

        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
