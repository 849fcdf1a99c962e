use std::collections::{BTreeSet, HashMap};

use crate::calendar::{GroupId, UserId};

/// Group memberships per user.
#[derive(Debug, Clone, Default)]
pub struct UserGroupCache {
    memberships: HashMap<UserId, BTreeSet<GroupId>>,
}

impl UserGroupCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the cache from `(group, user)` membership rows.
    pub fn from_memberships(rows: impl IntoIterator<Item = (GroupId, UserId)>) -> Self {
        let mut cache = Self::new();
        for (group_id, user_id) in rows {
            cache.add_membership(group_id, user_id);
        }
        cache
    }

    pub fn add_membership(&mut self, group_id: GroupId, user_id: UserId) {
        self.memberships.entry(user_id).or_default().insert(group_id);
    }

    pub fn is_member(&self, user_id: UserId, group_id: GroupId) -> bool {
        self.memberships
            .get(&user_id)
            .is_some_and(|groups| groups.contains(&group_id))
    }

    pub fn groups_of(&self, user_id: UserId) -> Option<&BTreeSet<GroupId>> {
        self.memberships.get(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_of_added_group() {
        let cache = UserGroupCache::from_memberships(vec![(1, 10), (2, 10), (2, 11)]);

        assert!(cache.is_member(10, 1));
        assert!(cache.is_member(10, 2));
        assert!(cache.is_member(11, 2));
    }

    #[test]
    fn not_member_of_other_group() {
        let cache = UserGroupCache::from_memberships(vec![(1, 10)]);

        assert!(!cache.is_member(10, 2));
        assert!(!cache.is_member(99, 1));
    }

    #[test]
    fn groups_of_unknown_user_is_none() {
        let cache = UserGroupCache::new();

        assert!(cache.groups_of(5).is_none());
    }
}
