use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarCache, CalendarId, TeamCalendar, UserId};
use super::{Cached, CalendarProperties, TemplateError};

fn default_show_breaks() -> bool {
    true
}

/// Stores the properties as a list so a calendar id exists in one place only.
mod properties_by_calendar {
    use std::collections::BTreeMap;

    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::calendar::CalendarId;
    use crate::template::calendar_properties::{validate_color_code, CalendarProperties};

    pub fn serialize<S: Serializer>(
        properties: &BTreeMap<CalendarId, CalendarProperties>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(properties.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<CalendarId, CalendarProperties>, D::Error> {
        let list = Vec::<CalendarProperties>::deserialize(deserializer)?;
        let mut properties = BTreeMap::new();
        for props in list {
            validate_color_code(&props.color_code).map_err(de::Error::custom)?;
            properties.insert(props.calendar_id, props);
        }
        Ok(properties)
    }
}

/// A named set of calendar display settings.
///
/// Equality, hashing and ordering only look at the name; use
/// [`TemplateEntry::is_modified`] for a structural comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    name: Option<String>,
    default_calendar_id: Option<CalendarId>,
    #[serde(default, with = "properties_by_calendar")]
    calendar_properties: BTreeMap<CalendarId, CalendarProperties>,
    #[serde(default)]
    show_birthdays: bool,
    #[serde(default)]
    show_statistics: bool,
    #[serde(default)]
    show_timesheets: bool,
    #[serde(default = "default_show_breaks")]
    show_breaks: bool,
    #[serde(default)]
    show_planning: bool,
    timesheet_user_id: Option<UserId>,
    #[serde(skip)]
    visible_calendar_ids: Cached<BTreeSet<CalendarId>>,
}

impl TemplateEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a calendar as visible with the given color.
    ///
    /// A calendar can only be added once; a second add is rejected so callers
    /// never silently lose a customised color or visibility.
    pub fn add_calendar(
        &mut self,
        calendar_id: CalendarId,
        initial_color: &str,
    ) -> Result<&CalendarProperties, TemplateError> {
        if self.calendar_properties.contains_key(&calendar_id) {
            return Err(TemplateError::CalendarAlreadyPresent(calendar_id));
        }
        let props = CalendarProperties::new(calendar_id, initial_color)?;
        self.set_dirty();
        Ok(self.calendar_properties.entry(calendar_id).or_insert(props))
    }

    pub fn remove_calendar(&mut self, calendar_id: CalendarId) {
        self.calendar_properties.remove(&calendar_id);
        self.set_dirty();
    }

    pub fn properties(&self, calendar_id: CalendarId) -> Option<&CalendarProperties> {
        self.calendar_properties.get(&calendar_id)
    }

    pub fn calendar_properties(&self) -> impl Iterator<Item = &CalendarProperties> {
        self.calendar_properties.values()
    }

    pub fn contains(&self, calendar_id: CalendarId) -> bool {
        self.calendar_properties.contains_key(&calendar_id)
    }

    pub fn color_code(&self, calendar_id: CalendarId) -> Option<&str> {
        self.properties(calendar_id).map(CalendarProperties::color_code)
    }

    pub fn set_color_code(&mut self, calendar_id: CalendarId, color_code: &str) -> Result<(), TemplateError> {
        self.calendar_properties
            .get_mut(&calendar_id)
            .ok_or(TemplateError::UnknownCalendar(calendar_id))?
            .set_color_code(color_code)
    }

    pub fn set_visible(&mut self, calendar_id: CalendarId, visible: bool) -> Result<(), TemplateError> {
        let props = self
            .calendar_properties
            .get_mut(&calendar_id)
            .ok_or(TemplateError::UnknownCalendar(calendar_id))?;
        props.visible = visible;
        self.set_dirty();
        Ok(())
    }

    pub fn is_visible(&self, calendar_id: CalendarId) -> bool {
        self.properties(calendar_id).is_some_and(CalendarProperties::is_visible)
    }

    pub fn visible_calendar_ids(&self) -> &BTreeSet<CalendarId> {
        self.visible_calendar_ids.get_or_compute(|| {
            self.calendar_properties
                .values()
                .filter(|props| props.visible)
                .map(|props| props.calendar_id)
                .collect()
        })
    }

    /// All member calendars, visible or not.
    pub fn calendar_ids(&self) -> BTreeSet<CalendarId> {
        self.calendar_properties.keys().copied().collect()
    }

    /// Resolves all member calendars; ids missing from the cache are skipped.
    pub fn calendars<'a>(&self, cache: &'a CalendarCache) -> Vec<&'a TeamCalendar> {
        cache.get_calendars(self.calendar_properties.keys().copied())
    }

    /// Forces the visible calendar ids to be recalculated on the next read.
    pub fn set_dirty(&mut self) {
        self.visible_calendar_ids.invalidate();
    }

    pub fn is_dirty(&self) -> bool {
        self.visible_calendar_ids.is_stale()
    }

    pub fn default_calendar_id(&self) -> Option<CalendarId> {
        self.default_calendar_id
    }

    pub fn set_default_calendar_id(&mut self, calendar_id: Option<CalendarId>) -> &mut Self {
        self.default_calendar_id = calendar_id;
        self
    }

    pub fn show_birthdays(&self) -> bool {
        self.show_birthdays
    }

    pub fn set_show_birthdays(&mut self, show: bool) -> &mut Self {
        self.show_birthdays = show;
        self
    }

    pub fn show_statistics(&self) -> bool {
        self.show_statistics
    }

    pub fn set_show_statistics(&mut self, show: bool) -> &mut Self {
        self.show_statistics = show;
        self
    }

    /// Only consulted for users who may not see other users' time sheets.
    pub fn show_timesheets(&self) -> bool {
        self.show_timesheets
    }

    pub fn set_show_timesheets(&mut self, show: bool) -> &mut Self {
        self.show_timesheets = show;
        self
    }

    pub fn show_breaks(&self) -> bool {
        self.show_breaks
    }

    pub fn set_show_breaks(&mut self, show: bool) -> &mut Self {
        self.show_breaks = show;
        self
    }

    pub fn show_planning(&self) -> bool {
        self.show_planning
    }

    pub fn set_show_planning(&mut self, show: bool) -> &mut Self {
        self.show_planning = show;
        self
    }

    pub fn timesheet_user_id(&self) -> Option<UserId> {
        self.timesheet_user_id
    }

    pub fn set_timesheet_user_id(&mut self, user_id: Option<UserId>) -> &mut Self {
        self.timesheet_user_id = user_id;
        self
    }

    /// Structural comparison used to skip reloading the calendar view when
    /// nothing changed.
    pub fn is_modified(&self, other: &TemplateEntry) -> bool {
        if self.name != other.name {
            return true;
        }
        if self.calendar_properties.len() != other.calendar_properties.len() {
            return true;
        }
        if self.default_calendar_id != other.default_calendar_id
            || self.show_birthdays != other.show_birthdays
            || self.show_breaks != other.show_breaks
            || self.show_planning != other.show_planning
            || self.show_statistics != other.show_statistics
            || self.show_timesheets != other.show_timesheets
            || self.timesheet_user_id != other.timesheet_user_id
        {
            return true;
        }
        self.calendar_properties
            .values()
            .zip(other.calendar_properties.values())
            .any(|(mine, theirs)| mine.is_modified(theirs))
    }
}

impl Default for TemplateEntry {
    fn default() -> Self {
        Self {
            name: None,
            default_calendar_id: None,
            calendar_properties: BTreeMap::new(),
            show_birthdays: false,
            show_statistics: false,
            show_timesheets: false,
            show_breaks: default_show_breaks(),
            show_planning: false,
            timesheet_user_id: None,
            visible_calendar_ids: Cached::new(),
        }
    }
}

impl PartialEq for TemplateEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TemplateEntry {}

impl Hash for TemplateEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for TemplateEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// `None` sorts before every name.
impl Ord for TemplateEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
