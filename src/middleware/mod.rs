pub mod auth;
pub mod entitlement;
pub mod response;

pub use auth::{
    jwt_auth_middleware, optional_auth_middleware, require_admin_middleware, AuthUser,
};
pub use entitlement::{entitlement_guard, SIGN_IN_REDIRECT, UPGRADE_REDIRECT};
pub use response::{ApiResponse, ApiResult};
