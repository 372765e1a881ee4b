use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::database::models::{Role, Subscription};
use crate::entitlement::decision::{AccessDecision, Grant};
use crate::entitlement::feature::{Feature, FeatureCatalog, FeatureTier};
use crate::entitlement::provider::{RoleProvider, SubscriptionProvider};

/// Decide access from already-fetched inputs. The branch order is the
/// precedence contract: roles beat everything, the free allowlist beats
/// subscription state, and only then is the subscription set consulted.
///
/// A premium subscription to ANY subject grants every premium feature; the
/// check is deliberately not scoped to the subject being viewed.
pub fn evaluate(
    authenticated: bool,
    roles: &HashSet<Role>,
    subscriptions: &[Subscription],
    tier: FeatureTier,
    now: DateTime<Utc>,
) -> AccessDecision {
    if roles.iter().any(Role::bypasses_subscriptions) {
        return AccessDecision::Allowed(Grant::RoleBypass);
    }

    if tier == FeatureTier::Free {
        return AccessDecision::Allowed(Grant::FreeFeature);
    }

    if subscriptions.iter().any(|s| s.grants_premium_at(now)) {
        return AccessDecision::Allowed(Grant::PremiumSubscription);
    }

    if authenticated {
        AccessDecision::Denied
    } else {
        AccessDecision::Unauthenticated
    }
}

/// Boolean form of [`evaluate`], for callers that don't need the outcome
/// breakdown.
pub fn has_access(
    authenticated: bool,
    roles: &HashSet<Role>,
    subscriptions: &[Subscription],
    tier: FeatureTier,
    now: DateTime<Utc>,
) -> bool {
    evaluate(authenticated, roles, subscriptions, tier, now).is_allowed()
}

/// Joins the two provider reads with the feature catalog and produces the
/// decision a route guard branches on.
///
/// Constructed per application, injected through state; holds no global.
pub struct EntitlementResolver {
    roles: Arc<dyn RoleProvider>,
    subscriptions: Arc<dyn SubscriptionProvider>,
    catalog: FeatureCatalog,
    provider_timeout: Duration,
}

impl EntitlementResolver {
    pub fn new(
        roles: Arc<dyn RoleProvider>,
        subscriptions: Arc<dyn SubscriptionProvider>,
        catalog: FeatureCatalog,
        provider_timeout: Duration,
    ) -> Self {
        Self {
            roles,
            subscriptions,
            catalog,
            provider_timeout,
        }
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    /// Resolve access for a (possibly anonymous) user to a feature.
    pub async fn resolve(&self, user_id: Option<Uuid>, feature: Feature) -> AccessDecision {
        self.resolve_tier(user_id, self.catalog.tier(feature), feature.as_str())
            .await
    }

    /// Resolve access for a raw feature name. Unknown names classify as
    /// premium-required, never free.
    pub async fn resolve_named(&self, user_id: Option<Uuid>, name: &str) -> AccessDecision {
        self.resolve_tier(user_id, self.catalog.tier_of_name(name), name)
            .await
    }

    async fn resolve_tier(
        &self,
        user_id: Option<Uuid>,
        tier: FeatureTier,
        feature_name: &str,
    ) -> AccessDecision {
        let decision = match user_id {
            None => evaluate(false, &HashSet::new(), &[], tier, Utc::now()),
            Some(user_id) => {
                let (roles, subscriptions) = self.snapshot(user_id).await;
                evaluate(true, &roles, &subscriptions, tier, Utc::now())
            }
        };

        debug!(
            feature = feature_name,
            outcome = decision.outcome_str(),
            bypass = decision.bypass(),
            "entitlement decision"
        );
        decision
    }

    /// Issue both provider reads concurrently and join them. Each read is
    /// bounded by the configured timeout; a failed or timed-out read
    /// degrades to its empty value so the evaluation fails closed instead
    /// of erroring or hanging the guard.
    async fn snapshot(&self, user_id: Uuid) -> (HashSet<Role>, Vec<Subscription>) {
        let roles_read = timeout(self.provider_timeout, self.roles.roles(user_id));
        let subscriptions_read = timeout(
            self.provider_timeout,
            self.subscriptions.list_subscriptions(user_id),
        );

        let (roles_result, subscriptions_result) =
            futures::join!(roles_read, subscriptions_read);

        let roles = match roles_result {
            Ok(Ok(roles)) => roles,
            Ok(Err(e)) => {
                warn!("Role fetch failed for {}; treating as no roles: {}", user_id, e);
                HashSet::new()
            }
            Err(_) => {
                warn!("Role fetch timed out for {}; treating as no roles", user_id);
                HashSet::new()
            }
        };

        let subscriptions = match subscriptions_result {
            Ok(Ok(subscriptions)) => subscriptions,
            Ok(Err(e)) => {
                warn!(
                    "Subscription fetch failed for {}; treating as none: {}",
                    user_id, e
                );
                Vec::new()
            }
            Err(_) => {
                warn!("Subscription fetch timed out for {}; treating as none", user_id);
                Vec::new()
            }
        };

        (roles, subscriptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{SubscriptionStatus, SubscriptionTier};
    use crate::entitlement::provider::ProviderError;
    use crate::testing::{FailingRoles, FailingSubscriptions, StaticRoles, StaticSubscriptions};
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    fn premium_subscription(subject_id: &str, expires_at: Option<DateTime<Utc>>) -> Subscription {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            subject_id: subject_id.to_string(),
            tier: SubscriptionTier::Premium,
            status: SubscriptionStatus::Active,
            started_at: now - ChronoDuration::days(1),
            expires_at,
            created_at: now - ChronoDuration::days(1),
            updated_at: now - ChronoDuration::days(1),
        }
    }

    fn expired_premium(subject_id: &str) -> Subscription {
        let mut sub = premium_subscription(subject_id, Some(Utc::now() - ChronoDuration::days(1)));
        sub.status = SubscriptionStatus::Expired;
        sub
    }

    // --- pure evaluation ---

    #[test]
    fn teacher_and_admin_bypass_every_feature() {
        let now = Utc::now();
        for role in [Role::Teacher, Role::Admin] {
            let roles = HashSet::from([role]);
            for tier in [FeatureTier::Free, FeatureTier::Premium] {
                // No subscriptions at all
                let decision = evaluate(true, &roles, &[], tier, now);
                assert_eq!(decision, AccessDecision::Allowed(Grant::RoleBypass));
                assert!(decision.bypass());

                // Even an expired subscription set changes nothing
                let decision = evaluate(true, &roles, &[expired_premium("BST")], tier, now);
                assert_eq!(decision, AccessDecision::Allowed(Grant::RoleBypass));
            }
        }
    }

    #[test]
    fn free_features_are_open_to_anonymous_users() {
        let decision = evaluate(false, &HashSet::new(), &[], FeatureTier::Free, Utc::now());
        assert_eq!(decision, AccessDecision::Allowed(Grant::FreeFeature));
        assert!(!decision.bypass());
    }

    #[test]
    fn student_without_subscription_is_denied_not_unauthenticated() {
        let roles = HashSet::from([Role::Student]);
        let decision = evaluate(true, &roles, &[], FeatureTier::Premium, Utc::now());
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn anonymous_premium_request_is_unauthenticated() {
        let decision = evaluate(false, &HashSet::new(), &[], FeatureTier::Premium, Utc::now());
        assert_eq!(decision, AccessDecision::Unauthenticated);
    }

    #[test]
    fn valid_premium_subscription_grants_premium_features() {
        let now = Utc::now();
        let roles = HashSet::from([Role::Student]);
        let subs = vec![premium_subscription("BST", None)];

        let decision = evaluate(true, &roles, &subs, FeatureTier::Premium, now);
        assert_eq!(decision, AccessDecision::Allowed(Grant::PremiumSubscription));
    }

    #[test]
    fn premium_access_is_not_scoped_to_a_subject() {
        // A premium subscription to one subject opens premium features
        // regardless of which subject is being viewed.
        let now = Utc::now();
        let roles = HashSet::from([Role::Student]);
        let subs = vec![premium_subscription("BST", None)];

        let decision = evaluate(true, &roles, &subs, FeatureTier::Premium, now);
        assert!(decision.is_allowed());
    }

    #[test]
    fn expiry_boundary_is_strictly_future() {
        let now = Utc::now();
        let roles = HashSet::from([Role::Student]);

        let at_now = vec![premium_subscription("BST", Some(now))];
        assert_eq!(
            evaluate(true, &roles, &at_now, FeatureTier::Premium, now),
            AccessDecision::Denied
        );

        let one_second = vec![premium_subscription("BST", Some(now + ChronoDuration::seconds(1)))];
        assert!(has_access(true, &roles, &one_second, FeatureTier::Premium, now));
    }

    #[test]
    fn free_tier_subscription_does_not_open_premium_features() {
        let now = Utc::now();
        let roles = HashSet::from([Role::Student]);
        let mut sub = premium_subscription("BST", None);
        sub.tier = SubscriptionTier::Free;

        assert_eq!(
            evaluate(true, &roles, &[sub], FeatureTier::Premium, now),
            AccessDecision::Denied
        );
    }

    #[test]
    fn evaluation_is_deterministic_for_fixed_inputs() {
        let now = Utc::now();
        let roles = HashSet::from([Role::Student]);
        let subs = vec![premium_subscription("BST", Some(now + ChronoDuration::days(10)))];

        let first = evaluate(true, &roles, &subs, FeatureTier::Premium, now);
        let second = evaluate(true, &roles, &subs, FeatureTier::Premium, now);
        assert_eq!(first, second);
    }

    // --- resolver over providers ---

    fn resolver_with(
        roles: Arc<dyn RoleProvider>,
        subscriptions: Arc<dyn SubscriptionProvider>,
    ) -> EntitlementResolver {
        EntitlementResolver::new(
            roles,
            subscriptions,
            FeatureCatalog::default(),
            Duration::from_millis(500),
        )
    }

    #[tokio::test]
    async fn resolves_teacher_bypass_from_providers() {
        let resolver = resolver_with(
            Arc::new(StaticRoles::of([Role::Teacher])),
            Arc::new(StaticSubscriptions::none()),
        );

        let decision = resolver.resolve(Some(Uuid::new_v4()), Feature::Quizzes).await;
        assert_eq!(decision, AccessDecision::Allowed(Grant::RoleBypass));
    }

    #[tokio::test]
    async fn anonymous_user_never_touches_providers() {
        // Providers that would fail loudly if called
        let resolver = resolver_with(
            Arc::new(StaticRoles::of([])),
            Arc::new(FailingSubscriptions),
        );

        let allowed = resolver.resolve(None, Feature::Forum).await;
        assert_eq!(allowed, AccessDecision::Allowed(Grant::FreeFeature));

        let gated = resolver.resolve(None, Feature::Quizzes).await;
        assert_eq!(gated, AccessDecision::Unauthenticated);
    }

    #[tokio::test]
    async fn provider_failure_fails_closed() {
        let resolver = resolver_with(
            Arc::new(StaticRoles::of([Role::Student])),
            Arc::new(FailingSubscriptions),
        );

        let decision = resolver.resolve(Some(Uuid::new_v4()), Feature::Flashcards).await;
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn role_provider_failure_drops_bypass_but_not_subscriptions() {
        // Role reads failing must not error out the evaluation; the
        // subscription path still decides on its own merits.
        let resolver = resolver_with(
            Arc::new(FailingRoles),
            Arc::new(StaticSubscriptions::of(vec![premium_subscription("BST", None)])),
        );

        let decision = resolver.resolve(Some(Uuid::new_v4()), Feature::Quizzes).await;
        assert_eq!(decision, AccessDecision::Allowed(Grant::PremiumSubscription));
    }

    #[tokio::test]
    async fn slow_provider_times_out_and_fails_closed() {
        struct SlowSubscriptions;

        #[async_trait]
        impl SubscriptionProvider for SlowSubscriptions {
            async fn list_subscriptions(
                &self,
                _user_id: Uuid,
            ) -> Result<Vec<Subscription>, ProviderError> {
                // Would grant access if it ever returned in time
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(vec![premium_subscription("BST", None)])
            }
        }

        let resolver = EntitlementResolver::new(
            Arc::new(StaticRoles::of([Role::Student])),
            Arc::new(SlowSubscriptions),
            FeatureCatalog::default(),
            Duration::from_millis(50),
        );

        let decision = resolver.resolve(Some(Uuid::new_v4()), Feature::Quizzes).await;
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn cross_subject_premium_subscription_opens_other_features() {
        // Premium on "BST" while asking for flashcards browsed under "PVS"
        let resolver = resolver_with(
            Arc::new(StaticRoles::of([Role::Student])),
            Arc::new(StaticSubscriptions::of(vec![premium_subscription("BST", None)])),
        );

        let decision = resolver.resolve(Some(Uuid::new_v4()), Feature::Flashcards).await;
        assert_eq!(decision, AccessDecision::Allowed(Grant::PremiumSubscription));
    }

    #[tokio::test]
    async fn unknown_feature_names_require_premium() {
        let resolver = resolver_with(
            Arc::new(StaticRoles::of([Role::Student])),
            Arc::new(StaticSubscriptions::none()),
        );

        let anonymous = resolver.resolve_named(None, "secret-beta-page").await;
        assert_eq!(anonymous, AccessDecision::Unauthenticated);

        let student = resolver
            .resolve_named(Some(Uuid::new_v4()), "secret-beta-page")
            .await;
        assert_eq!(student, AccessDecision::Denied);
    }

    #[tokio::test]
    async fn repeated_resolution_is_idempotent() {
        let resolver = resolver_with(
            Arc::new(StaticRoles::of([Role::Student])),
            Arc::new(StaticSubscriptions::of(vec![premium_subscription("ENG", None)])),
        );
        let user = Some(Uuid::new_v4());

        let first = resolver.resolve(user, Feature::SolutionBank).await;
        let second = resolver.resolve(user, Feature::SolutionBank).await;
        assert_eq!(first, second);
    }
}
