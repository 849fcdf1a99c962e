use std::collections::BTreeSet;

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

use teamcal::{
    access::{CalendarRight, UserGroupCache},
    calendar::{CalendarCache, CalendarId, TeamEvent, UserId},
    query::{EventFilter, TeamEventDao, TimeWindow},
    storage::{config::Config, PreferenceStore, SqliteEventStore},
};

use crate::sample_data::seed_sample_data;

pub const USAGE: &str =
    "Usage: teamcal [--sample] [--user ID] [--calendar ID]... [--from YYYY/MM/DD] [--to YYYY/MM/DD] [--recent]";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgendaOptions {
    pub sample: bool,
    pub user: Option<UserId>,
    pub calendars: Vec<CalendarId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub recent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Help,
    Agenda(AgendaOptions),
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y/%m/%d")
        .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", value))
}

fn parse_id(flag: &str, value: Option<String>) -> Result<i32, String> {
    let value = value.ok_or_else(|| format!("{} requires a value", flag))?;
    value
        .parse()
        .map_err(|_| format!("Invalid id '{}' for {}", value, flag))
}

pub fn parse_cli_command(mut args: impl Iterator<Item = String>) -> Result<CliCommand, String> {
    let mut options = AgendaOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => options.sample = true,
            "--recent" => options.recent = true,
            "--user" => options.user = Some(parse_id("--user", args.next())?),
            "--calendar" => options.calendars.push(parse_id("--calendar", args.next())?),
            "--from" => {
                let value = args.next().ok_or("--from requires a date")?;
                options.from = Some(parse_date(&value)?);
            }
            "--to" => {
                let value = args.next().ok_or("--to requires a date")?;
                options.to = Some(parse_date(&value)?);
            }
            "--help" => return Ok(CliCommand::Help),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    if let (Some(from), Some(to)) = (options.from, options.to)
        && from > to
    {
        return Err(format!("--from {} is after --to {}", from, to));
    }

    Ok(CliCommand::Agenda(options))
}

pub async fn run_agenda_mode(config: Config, options: AgendaOptions) -> anyhow::Result<()> {
    let agenda = tokio::task::spawn_blocking(move || build_agenda(&config, &options))
        .await
        .context("agenda task panicked")??;
    print!("{}", agenda);
    Ok(())
}

fn open_connection(config: &Config, sample: bool) -> anyhow::Result<Connection> {
    if sample {
        return Ok(Connection::open_in_memory()?);
    }
    let path = &config.storage.database_path;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Connection::open(path).with_context(|| format!("failed to open database {}", path.display()))
}

fn build_agenda(config: &Config, options: &AgendaOptions) -> anyhow::Result<String> {
    let store = SqliteEventStore::new(open_connection(config, options.sample)?);
    store.initialize()?;
    let preferences = PreferenceStore::new(store.connection());
    preferences.initialize()?;

    if options.sample {
        seed_sample_data(&store, &preferences, &config.calendars.default_color, Utc::now().date_naive())?;
    }

    let calendars = CalendarCache::new(store.load_calendars()?);
    let groups = UserGroupCache::from_memberships(store.load_group_members()?);
    let right = CalendarRight::new(&groups);
    let dao = TeamEventDao::new(&store, &calendars, &right);

    let viewer = options.user.unwrap_or(config.calendars.viewer_id);
    let calendar_ids = select_calendars(config, options, &preferences, viewer)?;
    tracing::info!("Building agenda for user {} on calendars {:?}", viewer, calendar_ids);

    let events = if options.recent {
        let Some(calendar_id) = calendar_ids.iter().next().copied() else {
            bail!("--recent needs a calendar");
        };
        if calendar_ids.len() > 1 {
            tracing::warn!("--recent only shows calendar {}", calendar_id);
        }
        dao.get_recent_list(calendar_id, false, viewer, Utc::now())?
    } else {
        let filter = EventFilter::new()
            .with_calendars(calendar_ids)
            .with_window(window_for(options.from, options.to));
        dao.get_list(&filter, viewer)?
    };

    Ok(format_agenda_text(&events, &calendars))
}

/// Explicit `--calendar` flags win, then the visible calendars of the
/// viewer's saved filter, then the configured default calendar.
fn select_calendars(
    config: &Config,
    options: &AgendaOptions,
    preferences: &PreferenceStore,
    viewer: UserId,
) -> anyhow::Result<BTreeSet<CalendarId>> {
    if !options.calendars.is_empty() {
        return Ok(options.calendars.iter().copied().collect());
    }
    if let Some(filter) = preferences.load_filter(viewer)? {
        let visible = filter.visible_calendar_ids();
        if !visible.is_empty() {
            return Ok(visible);
        }
    }
    Ok(config.calendars.default_calendar.into_iter().collect())
}

fn start_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}

fn end_of_day(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(23, 59, 59).map(|dt| dt.and_utc())
}

fn window_for(from: Option<NaiveDate>, to: Option<NaiveDate>) -> TimeWindow {
    TimeWindow::new(from.and_then(start_of_day), to.and_then(end_of_day))
}

fn format_agenda_text(events: &[TeamEvent], calendars: &CalendarCache) -> String {
    let mut lines = Vec::new();

    if events.is_empty() {
        lines.push("No events found.".to_string());
    } else {
        for event in events {
            lines.push(format!("- {}", build_agenda_line(event, calendars)));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn build_agenda_line(event: &TeamEvent, calendars: &CalendarCache) -> String {
    let time_label = if event.all_day {
        format!("{} All Day", event.start.format("%Y-%m-%d"))
    } else {
        format!(
            "{} {}-{}",
            event.start.format("%Y-%m-%d"),
            event.start.format("%H:%M"),
            event.end.format("%H:%M")
        )
    };
    let calendar = calendars
        .get_calendar(event.calendar_id)
        .map(|c| c.title.as_str())
        .unwrap_or("?");
    let subject = if event.is_redacted() { "(busy)" } else { event.subject.as_str() };

    let mut line = format!("{:<22} [{}] {}", time_label, calendar, subject);
    if !event.location.is_empty() {
        line.push_str(&format!(" @ {}", event.location));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use teamcal::TeamCalendar;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values.iter().map(|v| v.to_string()).collect::<Vec<_>>().into_iter()
    }

    fn create_test_event(subject: &str) -> TeamEvent {
        TeamEvent {
            id: 1,
            calendar_id: 1,
            start: Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 1, 6, 10, 30, 0).unwrap(),
            all_day: false,
            subject: subject.to_string(),
            location: String::new(),
            note: String::new(),
            attendees: vec![],
            deleted: false,
            last_update: Utc::now(),
        }
    }

    #[test]
    fn no_arguments_is_agenda_with_defaults() {
        let command = parse_cli_command(args(&[])).unwrap();

        assert_eq!(command, CliCommand::Agenda(AgendaOptions::default()));
    }

    #[test]
    fn parses_all_flags() {
        let command = parse_cli_command(args(&[
            "--sample", "--user", "3", "--calendar", "1", "--calendar", "2", "--from", "2025/01/06", "--to",
            "2025/01/12",
        ]))
        .unwrap();

        let CliCommand::Agenda(options) = command else { panic!("expected agenda") };
        assert!(options.sample);
        assert_eq!(options.user, Some(3));
        assert_eq!(options.calendars, vec![1, 2]);
        assert_eq!(options.from, NaiveDate::from_ymd_opt(2025, 1, 6));
        assert_eq!(options.to, NaiveDate::from_ymd_opt(2025, 1, 12));
    }

    #[test]
    fn help_flag_is_recognized() {
        assert_eq!(parse_cli_command(args(&["--help"])).unwrap(), CliCommand::Help);
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(parse_cli_command(args(&["--frobnicate"])).is_err());
    }

    #[test]
    fn missing_flag_value_is_rejected() {
        assert!(parse_cli_command(args(&["--user"])).is_err());
        assert!(parse_cli_command(args(&["--calendar", "abc"])).is_err());
    }

    #[test]
    fn inverted_date_range_is_rejected() {
        let result = parse_cli_command(args(&["--from", "2025/02/01", "--to", "2025/01/01"]));

        assert!(result.is_err());
    }

    #[test]
    fn window_covers_whole_days() {
        let window = window_for(NaiveDate::from_ymd_opt(2025, 1, 6), NaiveDate::from_ymd_opt(2025, 1, 6));

        assert_eq!(window.start, Some(Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()));
        assert_eq!(window.end, Some(Utc.with_ymd_and_hms(2025, 1, 6, 23, 59, 59).unwrap()));
    }

    #[test]
    fn redacted_event_is_shown_as_busy() {
        let calendars = CalendarCache::new(vec![TeamCalendar::new(1, "Board")]);
        let mut event = create_test_event("Budget");
        event.redact();

        let line = build_agenda_line(&event, &calendars);

        assert!(line.contains("[Board] (busy)"));
        assert!(line.contains("09:00-10:30"));
    }

    #[test]
    fn empty_agenda_says_so() {
        let text = format_agenda_text(&[], &CalendarCache::default());

        assert_eq!(text, "No events found.\n");
    }

    #[test]
    fn sample_agenda_hides_and_redacts_for_team_member() {
        let options = AgendaOptions {
            sample: true,
            user: Some(crate::sample_data::TEAM_MEMBER),
            calendars: vec![1, 2, 3],
            ..AgendaOptions::default()
        };

        let agenda = build_agenda(&Config::default(), &options).unwrap();

        assert!(agenda.contains("[Development] Sprint Planning"));
        assert!(agenda.contains("[Management] (busy)"));
        assert!(!agenda.contains("Budget Review"));
    }

    #[test]
    fn sample_agenda_uses_saved_filter_without_calendar_flags() {
        let options = AgendaOptions {
            sample: true,
            user: Some(crate::sample_data::LEAD),
            ..AgendaOptions::default()
        };

        let agenda = build_agenda(&Config::default(), &options).unwrap();

        assert!(agenda.contains("[Development]"));
        assert!(!agenda.contains("[Holidays]"));
    }
}
