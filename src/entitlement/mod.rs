// Entitlement core: the decision logic behind every gated page.
//
// Precedence is fixed: role bypass, then the free allowlist, then premium
// subscription validity. Provider reads are concurrent, bounded, and fail
// closed; only the three-way decision crosses this module's boundary.

pub mod cache;
pub mod decision;
pub mod feature;
pub mod provider;
pub mod resolver;

pub use cache::{CachedRoles, CachedSubscriptions};
pub use decision::{AccessDecision, Grant};
pub use feature::{Feature, FeatureCatalog, FeatureTier};
pub use provider::{ProviderError, RoleProvider, SubscriptionProvider};
pub use resolver::{evaluate, has_access, EntitlementResolver};
