use std::collections::BTreeSet;

use crate::calendar::{GroupId, TeamCalendar, UserId};
use super::UserGroupCache;

/// Access level of a viewer on one calendar, most privileged first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessTier {
    Owner,
    FullAccess,
    ReadOnlyAccess,
    MinimalAccess,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Full,
    Redacted,
    Hidden,
}

impl AccessTier {
    pub fn visibility(self) -> Visibility {
        match self {
            AccessTier::Owner | AccessTier::FullAccess | AccessTier::ReadOnlyAccess => Visibility::Full,
            AccessTier::MinimalAccess => Visibility::Redacted,
            AccessTier::None => Visibility::Hidden,
        }
    }
}

pub trait AccessEvaluator {
    fn is_owner(&self, user_id: UserId, calendar: &TeamCalendar) -> bool;

    fn has_access_group(&self, group_ids: &BTreeSet<GroupId>, user_id: UserId) -> bool;
}

pub fn access_tier<A: AccessEvaluator + ?Sized>(
    evaluator: &A,
    user_id: UserId,
    calendar: &TeamCalendar,
) -> AccessTier {
    if evaluator.is_owner(user_id, calendar) {
        AccessTier::Owner
    } else if evaluator.has_access_group(&calendar.full_access_group_ids, user_id) {
        AccessTier::FullAccess
    } else if evaluator.has_access_group(&calendar.read_only_access_group_ids, user_id) {
        AccessTier::ReadOnlyAccess
    } else if evaluator.has_access_group(&calendar.minimal_access_group_ids, user_id) {
        AccessTier::MinimalAccess
    } else {
        AccessTier::None
    }
}

/// Evaluates calendar rights against cached group memberships.
pub struct CalendarRight<'a> {
    user_groups: &'a UserGroupCache,
}

impl<'a> CalendarRight<'a> {
    pub fn new(user_groups: &'a UserGroupCache) -> Self {
        Self { user_groups }
    }
}

impl AccessEvaluator for CalendarRight<'_> {
    fn is_owner(&self, user_id: UserId, calendar: &TeamCalendar) -> bool {
        calendar.owner_id == Some(user_id)
    }

    fn has_access_group(&self, group_ids: &BTreeSet<GroupId>, user_id: UserId) -> bool {
        group_ids
            .iter()
            .any(|group_id| self.user_groups.is_member(user_id, *group_id))
    }
}
