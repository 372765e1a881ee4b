pub mod content;
pub mod role;
pub mod subscription;
pub mod user;

pub use content::{
    FlashcardSet, ForumThread, HomeworkRequest, Quiz, QuickQuestion, ResourceDoc, SolutionEntry,
    Subject,
};
pub use role::{Role, RoleAssignment};
pub use subscription::{Subscription, SubscriptionStatus, SubscriptionTier};
pub use user::User;
