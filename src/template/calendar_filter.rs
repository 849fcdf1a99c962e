use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarId;
use super::{CalendarProperties, TemplateEntry, TemplateError};

pub const DEFAULT_COLOR: &str = "#FAAF26";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Per-session calendar filter: the user's templates plus the active one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarFilter {
    templates: Vec<TemplateEntry>,
    active_template: Option<String>,
    #[serde(default = "default_color")]
    default_color: String,
}

impl CalendarFilter {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            active_template: None,
            default_color: default_color(),
        }
    }

    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self
    }

    pub fn templates(&self) -> &[TemplateEntry] {
        &self.templates
    }

    /// Inserts in name order, replacing a template of the same name.
    pub fn add_template(&mut self, entry: TemplateEntry) {
        match self.templates.binary_search(&entry) {
            Ok(index) => self.templates[index] = entry,
            Err(index) => self.templates.insert(index, entry),
        }
    }

    pub fn remove_template(&mut self, name: &str) -> Option<TemplateEntry> {
        let index = self.templates.iter().position(|t| t.name() == Some(name))?;
        if self.active_template.as_deref() == Some(name) {
            self.active_template = None;
        }
        Some(self.templates.remove(index))
    }

    pub fn template(&self, name: &str) -> Option<&TemplateEntry> {
        self.templates.iter().find(|t| t.name() == Some(name))
    }

    pub fn template_mut(&mut self, name: &str) -> Option<&mut TemplateEntry> {
        self.templates.iter_mut().find(|t| t.name() == Some(name))
    }

    pub fn set_active_template(&mut self, name: &str) -> Result<(), TemplateError> {
        if self.template(name).is_none() {
            return Err(TemplateError::UnknownTemplate(name.to_string()));
        }
        self.active_template = Some(name.to_string());
        Ok(())
    }

    pub fn active_template_name(&self) -> Option<&str> {
        self.active_template.as_deref()
    }

    pub fn active_template(&self) -> Option<&TemplateEntry> {
        self.template(self.active_template.as_deref()?)
    }

    pub fn active_template_mut(&mut self) -> Option<&mut TemplateEntry> {
        let name = self.active_template.clone()?;
        self.template_mut(&name)
    }

    /// Color a calendar already has in the active template, else in any other
    /// template, else the default color.
    pub fn used_color(&self, calendar_id: CalendarId) -> String {
        if let Some(color) = self.active_template().and_then(|t| t.color_code(calendar_id)) {
            return color.to_string();
        }
        self.templates
            .iter()
            .find_map(|t| t.color_code(calendar_id))
            .map(str::to_string)
            .unwrap_or_else(|| self.default_color.clone())
    }

    pub fn add_calendar_to_active(&mut self, calendar_id: CalendarId) -> Result<&CalendarProperties, TemplateError> {
        let color = self.used_color(calendar_id);
        self.active_template_mut()
            .ok_or(TemplateError::NoActiveTemplate)?
            .add_calendar(calendar_id, &color)
    }

    pub fn visible_calendar_ids(&self) -> BTreeSet<CalendarId> {
        self.active_template()
            .map(|t| t.visible_calendar_ids().clone())
            .unwrap_or_default()
    }

    pub fn is_modified(&self, other: &CalendarFilter) -> bool {
        if self.active_template != other.active_template
            || self.templates.len() != other.templates.len()
        {
            return true;
        }
        self.templates
            .iter()
            .zip(other.templates.iter())
            .any(|(mine, theirs)| mine.is_modified(theirs))
    }

    pub fn to_snapshot(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restores a filter, re-sorting the templates and keeping the last of
    /// several with the same name. An active name without a template is dropped.
    pub fn from_snapshot(snapshot: &str) -> Result<Self, TemplateError> {
        let mut filter: CalendarFilter = serde_json::from_str(snapshot)?;
        for entry in std::mem::take(&mut filter.templates) {
            filter.add_template(entry);
        }
        if let Some(name) = filter.active_template.as_deref()
            && filter.template(name).is_none()
        {
            tracing::warn!("Active template {} missing from snapshot", name);
            filter.active_template = None;
        }
        Ok(filter)
    }
}

impl Default for CalendarFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_filter() -> CalendarFilter {
        let mut work = TemplateEntry::new("Work");
        work.add_calendar(1, "#1a73e8").unwrap();
        work.add_calendar(2, "#e67c73").unwrap();

        let mut private = TemplateEntry::new("Private");
        private.add_calendar(3, "#33b679").unwrap();
        private.add_calendar(2, "#8e24aa").unwrap();

        let mut filter = CalendarFilter::new();
        filter.add_template(work);
        filter.add_template(private);
        filter.set_active_template("Work").unwrap();
        filter
    }

    #[test]
    fn templates_are_sorted_by_name() {
        let filter = create_test_filter();

        let names: Vec<Option<&str>> = filter.templates().iter().map(TemplateEntry::name).collect();

        assert_eq!(names, vec![Some("Private"), Some("Work")]);
    }

    #[test]
    fn adding_template_with_same_name_replaces_it() {
        let mut filter = create_test_filter();

        filter.add_template(TemplateEntry::new("Work"));

        assert_eq!(filter.templates().len(), 2);
        assert!(filter.template("Work").unwrap().calendar_ids().is_empty());
    }

    #[test]
    fn activating_unknown_template_fails() {
        let mut filter = create_test_filter();

        let result = filter.set_active_template("Holidays");

        assert!(matches!(result, Err(TemplateError::UnknownTemplate(_))));
        assert_eq!(filter.active_template_name(), Some("Work"));
    }

    #[test]
    fn removing_active_template_clears_selection() {
        let mut filter = create_test_filter();

        let removed = filter.remove_template("Work");

        assert!(removed.is_some());
        assert!(filter.active_template().is_none());
        assert!(filter.visible_calendar_ids().is_empty());
    }

    #[test]
    fn used_color_prefers_active_template() {
        let filter = create_test_filter();

        assert_eq!(filter.used_color(2), "#e67c73");
    }

    #[test]
    fn used_color_falls_back_to_other_templates() {
        let filter = create_test_filter();

        assert_eq!(filter.used_color(3), "#33b679");
    }

    #[test]
    fn used_color_falls_back_to_default() {
        let filter = create_test_filter().with_default_color("#000000");

        assert_eq!(filter.used_color(77), "#000000");
    }

    #[test]
    fn add_calendar_to_active_reuses_color() {
        let mut filter = create_test_filter();

        let props = filter.add_calendar_to_active(3).unwrap();

        assert_eq!(props.color_code(), "#33b679");
        assert_eq!(filter.visible_calendar_ids(), BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn add_calendar_without_active_template_fails() {
        let mut filter = CalendarFilter::new();

        let result = filter.add_calendar_to_active(1);

        assert!(matches!(result, Err(TemplateError::NoActiveTemplate)));
    }

    #[test]
    fn hiding_calendar_in_active_template_updates_visible_ids() {
        let mut filter = create_test_filter();
        assert_eq!(filter.visible_calendar_ids(), BTreeSet::from([1, 2]));

        filter.active_template_mut().unwrap().set_visible(1, false).unwrap();

        assert_eq!(filter.visible_calendar_ids(), BTreeSet::from([2]));
    }

    #[test]
    fn clone_is_not_modified() {
        let filter = create_test_filter();

        let cloned = filter.clone();

        assert!(!filter.is_modified(&cloned));
    }

    #[test]
    fn switching_active_template_is_modified() {
        let filter = create_test_filter();
        let mut cloned = filter.clone();

        cloned.set_active_template("Private").unwrap();

        assert!(filter.is_modified(&cloned));
    }

    #[test]
    fn snapshot_restores_filter() {
        let filter = create_test_filter();

        let snapshot = filter.to_snapshot().unwrap();
        let restored = CalendarFilter::from_snapshot(&snapshot).unwrap();

        assert!(!restored.is_modified(&filter));
        assert_eq!(restored.active_template_name(), Some("Work"));
        assert_eq!(restored.visible_calendar_ids(), BTreeSet::from([1, 2]));
    }

    #[test]
    fn unsorted_snapshot_is_restored_in_name_order() {
        let snapshot = r#"{"templates":[{"name":"Work","default_calendar_id":null,"timesheet_user_id":null},{"name":"Alpha","default_calendar_id":null,"timesheet_user_id":null},{"name":"Work","default_calendar_id":7,"timesheet_user_id":null}],"active_template":"Work"}"#;

        let mut filter = CalendarFilter::from_snapshot(snapshot).unwrap();
        filter.add_template(TemplateEntry::new("Work"));

        let names: Vec<Option<&str>> = filter.templates().iter().map(TemplateEntry::name).collect();
        assert_eq!(names, vec![Some("Alpha"), Some("Work")]);
        assert_eq!(filter.template("Work").unwrap().default_calendar_id(), None);
    }

    #[test]
    fn snapshot_with_unknown_active_template_has_none_active() {
        let snapshot = r#"{"templates":[{"name":"Work","default_calendar_id":null,"timesheet_user_id":null}],"active_template":"Gone"}"#;

        let filter = CalendarFilter::from_snapshot(snapshot).unwrap();

        assert!(filter.active_template_name().is_none());
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let result = CalendarFilter::from_snapshot("{not json");

        assert!(matches!(result, Err(TemplateError::SnapshotError(_))));
    }
}
