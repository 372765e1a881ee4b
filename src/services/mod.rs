pub mod role_service;
pub mod subscription_service;

pub use role_service::{RoleError, RoleService};
pub use subscription_service::{SubscriptionError, SubscriptionService};
