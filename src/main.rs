// Agenda Calendar
// Headless entry point: sync the local store, then print this month's agenda

use agenda_calendar::config::AppConfig;
use agenda_calendar::models::event::Event;
use agenda_calendar::models::holiday::Holiday;
use agenda_calendar::models::schedule_item::ScheduleItem;
use agenda_calendar::models::user::User;
use agenda_calendar::models::year_month::YearMonth;
use agenda_calendar::schedule::ScheduleState;
use agenda_calendar::ui::app::AppContext;
use agenda_calendar::utils::date::padded_utc_bounds;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use std::fmt;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Agenda Calendar");

    let config = AppConfig::load().context("Failed to load configuration")?;
    let zone = config.zone()?;
    let context = AppContext::from_config(config)?;
    let today = Local::now().date_naive();

    let user_id = ensure_user(&context)?;
    let current = YearMonth::from_date(today);
    let window = context.config().schedule.window_months;
    let (first, last) = (current.minus_months(window), current.plus_months(window));

    sync_user(&context, user_id, first, last);
    let events = context
        .calendar_repository()
        .visible_events_for(user_id)
        .context("Failed to load events")?;
    let holidays = load_holidays(&context, first, last);

    match zone {
        Some(tz) => print_month(&context, current, events, holidays, tz),
        None => print_month(&context, current, events, holidays, Local),
    }

    Ok(())
}

fn ensure_user(context: &AppContext) -> Result<i64> {
    let repo = context.calendar_repository();
    if let Some(id) = repo.users()?.first().and_then(|user| user.id) {
        return Ok(id);
    }

    let user = repo.create_user(User::new("Me"))?;
    log::info!("Created default user {:?}", user.id);
    user.id.context("Created user has no id")
}

fn sync_user(context: &AppContext, user_id: i64, first: YearMonth, last: YearMonth) {
    let (start, end) = padded_utc_bounds(first.first_day(), last.last_day());
    if let Err(err) = context.calendar_repository().sync_user(user_id, start, end) {
        log::warn!("Sync failed, showing saved data: {}", err);
        eprintln!("{}", err.user_message());
    }
}

fn load_holidays(context: &AppContext, first: YearMonth, last: YearMonth) -> Vec<Holiday> {
    let country = &context.config().holidays.country_code;

    if let Some(repo) = context.holiday_repository() {
        let load = repo.load_span(country, first, last);
        if let Some(err) = load.error {
            eprintln!("{}", err.user_message());
        }
        return load.holidays;
    }

    context
        .holiday_service()
        .list_between(country, first.first_day(), last.last_day())
        .unwrap_or_else(|err| {
            log::error!("Failed to read cached holidays: {:#}", err);
            Vec::new()
        })
}

fn print_month<Tz: TimeZone>(
    context: &AppContext,
    month: YearMonth,
    events: Vec<Event>,
    holidays: Vec<Holiday>,
    tz: Tz,
) where
    Tz::Offset: fmt::Display,
{
    let schedule_config = &context.config().schedule;
    let schedule = ScheduleState::with_window(
        month,
        events,
        holidays,
        tz.clone(),
        schedule_config.window_months,
        schedule_config.expansion_months,
    );

    let items = &schedule.items()[schedule.initial_scroll_index()..];
    for (index, item) in items.iter().enumerate() {
        match item {
            ScheduleItem::MonthHeader(_) if index > 0 => break,
            ScheduleItem::MonthHeader(ym) => {
                println!("{}", ym.first_day().format("%B %Y"));
            }
            ScheduleItem::WeekHeader { start, end } => {
                println!("  {} - {}", start.format("%b %d"), end.format("%b %d"));
            }
            ScheduleItem::DayEvents {
                date,
                events,
                holidays,
            } => print_day(*date, events, holidays, &tz),
        }
    }
}

fn print_day<Tz: TimeZone>(date: NaiveDate, events: &[Event], holidays: &[Holiday], tz: &Tz)
where
    Tz::Offset: fmt::Display,
{
    println!("    {}", date.format("%a %d"));
    for holiday in holidays {
        println!("      * {}", holiday.name);
    }
    for event in events {
        let when = if event.all_day {
            "all day".to_string()
        } else {
            format!(
                "{}-{}",
                event.start.with_timezone(tz).format("%H:%M"),
                event.end.with_timezone(tz).format("%H:%M")
            )
        };
        println!("      {:<11} {}", when, event.title);
    }
}
