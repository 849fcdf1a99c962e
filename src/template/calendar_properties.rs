use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calendar::CalendarId;
use super::TemplateError;

static COLOR_CODE: OnceLock<Regex> = OnceLock::new();

fn color_code_regex() -> &'static Regex {
    COLOR_CODE.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("color code pattern is valid"))
}

pub fn validate_color_code(color_code: &str) -> Result<(), TemplateError> {
    if color_code_regex().is_match(color_code) {
        Ok(())
    } else {
        Err(TemplateError::InvalidColorCode(color_code.to_string()))
    }
}

/// Display settings of one calendar inside a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarProperties {
    pub(crate) calendar_id: CalendarId,
    pub(crate) color_code: String,
    pub(crate) visible: bool,
}

impl CalendarProperties {
    pub fn new(calendar_id: CalendarId, color_code: &str) -> Result<Self, TemplateError> {
        validate_color_code(color_code)?;
        Ok(Self {
            calendar_id,
            color_code: color_code.to_string(),
            visible: true,
        })
    }

    pub fn calendar_id(&self) -> CalendarId {
        self.calendar_id
    }

    pub fn color_code(&self) -> &str {
        &self.color_code
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_color_code(&mut self, color_code: &str) -> Result<(), TemplateError> {
        validate_color_code(color_code)?;
        self.color_code = color_code.to_string();
        Ok(())
    }

    pub fn is_modified(&self, other: &CalendarProperties) -> bool {
        self.calendar_id != other.calendar_id
            || self.visible != other.visible
            || self.color_code != other.color_code
    }
}
