use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config;
use crate::database::{DatabaseError, DatabaseManager};
use crate::entitlement::{
    CachedRoles, CachedSubscriptions, EntitlementResolver, FeatureCatalog, RoleProvider,
    SubscriptionProvider,
};
use crate::services::{RoleService, SubscriptionService};

/// Shared application state. Everything the handlers and the entitlement
/// guard need is injected here; there is no process-wide service singleton.
pub struct AppState {
    pub pool: PgPool,
    pub resolver: Arc<EntitlementResolver>,
    pub roles: Arc<CachedRoles>,
    pub subscriptions: Arc<CachedSubscriptions>,
}

impl AppState {
    /// Production wiring: providers backed by the application database,
    /// wrapped in TTL caches, joined by the resolver.
    pub async fn from_env() -> Result<Arc<Self>, DatabaseError> {
        let pool = DatabaseManager::pool().await?;
        let role_provider: Arc<dyn RoleProvider> = Arc::new(RoleService::new(pool.clone()));
        let subscription_provider: Arc<dyn SubscriptionProvider> =
            Arc::new(SubscriptionService::new(pool.clone()));
        Ok(Self::with_providers(pool, role_provider, subscription_provider))
    }

    /// Wire up state around arbitrary providers. Tests inject in-memory
    /// fakes here; production passes the database-backed services.
    pub fn with_providers(
        pool: PgPool,
        role_provider: Arc<dyn RoleProvider>,
        subscription_provider: Arc<dyn SubscriptionProvider>,
    ) -> Arc<Self> {
        let settings = &config::config().entitlements;
        let ttl = Duration::from_secs(settings.cache_ttl_secs);

        let roles = Arc::new(CachedRoles::new(role_provider, ttl));
        let subscriptions = Arc::new(CachedSubscriptions::new(subscription_provider, ttl));

        let resolver = Arc::new(EntitlementResolver::new(
            roles.clone() as Arc<dyn RoleProvider>,
            subscriptions.clone() as Arc<dyn SubscriptionProvider>,
            FeatureCatalog::from_config(settings),
            Duration::from_millis(settings.provider_timeout_ms),
        ));

        Arc::new(Self {
            pool,
            resolver,
            roles,
            subscriptions,
        })
    }
}
