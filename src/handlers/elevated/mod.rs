pub mod roles;
pub mod subscriptions;
