pub mod right;
pub mod user_groups;

pub use right::{access_tier, AccessEvaluator, AccessTier, CalendarRight, Visibility};
pub use user_groups::UserGroupCache;
