use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{CalendarId, GroupId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCalendar {
    pub id: CalendarId,
    pub title: String,
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub full_access_group_ids: BTreeSet<GroupId>,
    #[serde(default)]
    pub read_only_access_group_ids: BTreeSet<GroupId>,
    #[serde(default)]
    pub minimal_access_group_ids: BTreeSet<GroupId>,
    #[serde(default)]
    pub deleted: bool,
}

impl TeamCalendar {
    pub fn new(id: CalendarId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            owner_id: None,
            full_access_group_ids: BTreeSet::new(),
            read_only_access_group_ids: BTreeSet::new(),
            minimal_access_group_ids: BTreeSet::new(),
            deleted: false,
        }
    }

    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn with_full_access_group(mut self, group_id: GroupId) -> Self {
        self.full_access_group_ids.insert(group_id);
        self
    }

    pub fn with_read_only_access_group(mut self, group_id: GroupId) -> Self {
        self.read_only_access_group_ids.insert(group_id);
        self
    }

    pub fn with_minimal_access_group(mut self, group_id: GroupId) -> Self {
        self.minimal_access_group_ids.insert(group_id);
        self
    }
}
