use chrono::{DateTime, Days, NaiveDate, Utc};

use teamcal::{
    calendar::{CalendarId, GroupId, TeamCalendar, TeamEvent, UserId},
    storage::{PreferenceStore, SqliteEventStore},
    template::{CalendarFilter, TemplateEntry},
};

pub const LEAD: UserId = 1;
pub const TEAM_MEMBER: UserId = 2;

const DEV_TEAM: GroupId = 10;

const DEVELOPMENT: CalendarId = 1;
const MANAGEMENT: CalendarId = 2;
const HOLIDAYS: CalendarId = 3;

fn at(date: NaiveDate, hour: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, 0, 0).map(|dt| dt.and_utc())
}

pub fn seed_sample_data(
    store: &SqliteEventStore,
    preferences: &PreferenceStore,
    default_color: &str,
    today: NaiveDate,
) -> anyhow::Result<()> {
    store.store_calendar(
        &TeamCalendar::new(DEVELOPMENT, "Development")
            .with_owner(LEAD)
            .with_full_access_group(DEV_TEAM),
    )?;
    store.store_calendar(
        &TeamCalendar::new(MANAGEMENT, "Management")
            .with_owner(LEAD)
            .with_minimal_access_group(DEV_TEAM),
    )?;
    store.store_calendar(
        &TeamCalendar::new(HOLIDAYS, "Holidays")
            .with_owner(LEAD)
            .with_read_only_access_group(DEV_TEAM),
    )?;
    store.add_group_member(DEV_TEAM, TEAM_MEMBER)?;

    let Some(tomorrow) = today.succ_opt() else { return Ok(()) };
    let Some(yesterday) = today.pred_opt() else { return Ok(()) };
    let Some(next_week) = today.checked_add_days(Days::new(7)) else { return Ok(()) };

    let events = vec![
        (DEVELOPMENT, "Sprint Planning", today, 10, 11, "Zoom"),
        (DEVELOPMENT, "Code Review", tomorrow, 14, 15, ""),
        (MANAGEMENT, "Budget Review", today, 15, 16, "Board Room"),
        (MANAGEMENT, "Hiring Committee", yesterday, 9, 10, ""),
    ];

    for (i, (calendar_id, subject, date, start_h, end_h, location)) in events.into_iter().enumerate() {
        let (Some(start), Some(end)) = (at(date, start_h), at(date, end_h)) else { continue };
        store.store_event(&TeamEvent {
            id: i as i64 + 1,
            calendar_id,
            start,
            end,
            all_day: false,
            subject: subject.to_string(),
            location: location.to_string(),
            note: "Sample event".to_string(),
            attendees: vec!["lead".to_string(), "member".to_string()],
            deleted: false,
            last_update: Utc::now(),
        })?;
    }

    if let (Some(start), Some(end)) = (at(next_week, 0), next_week.succ_opt().and_then(|d| at(d, 0))) {
        store.store_event(&TeamEvent {
            id: 100,
            calendar_id: HOLIDAYS,
            start,
            end,
            all_day: true,
            subject: "Company Offsite".to_string(),
            location: String::new(),
            note: String::new(),
            attendees: vec![],
            deleted: false,
            last_update: Utc::now(),
        })?;
    }

    let mut template = TemplateEntry::new("Default");
    template.add_calendar(DEVELOPMENT, "#1a73e8")?;
    template.add_calendar(MANAGEMENT, "#e67c73")?;
    template.set_default_calendar_id(Some(DEVELOPMENT));

    let mut filter = CalendarFilter::new().with_default_color(default_color);
    filter.add_template(template);
    filter.set_active_template("Default")?;
    filter.add_calendar_to_active(HOLIDAYS)?;
    if let Some(active) = filter.active_template_mut() {
        active.set_visible(HOLIDAYS, false)?;
    }
    preferences.save_filter(LEAD, &filter)?;

    tracing::info!("Seeded sample calendars and events");
    Ok(())
}
