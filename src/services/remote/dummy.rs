//! Deterministic in-process backend used until a real calendar service exists.
//! Every user owns a "Personal" and a "Work" calendar with a fixed weekly rhythm.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};

use super::RemoteCalendarApi;
use crate::models::calendar::Calendar;
use crate::models::event::Event;
use crate::services::repository::error::{RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Personal,
    Work,
}

impl Slot {
    fn suffix(self) -> &'static str {
        match self {
            Slot::Personal => "personal",
            Slot::Work => "work",
        }
    }

    fn from_remote_id(remote_id: &str) -> Option<Self> {
        let (_, suffix) = remote_id.rsplit_once('-')?;
        [Slot::Personal, Slot::Work]
            .into_iter()
            .find(|slot| slot.suffix() == suffix)
    }
}

fn calendar_remote_id(user_id: i64, slot: Slot) -> String {
    format!("dummy-u{}-{}", user_id, slot.suffix())
}

#[derive(Debug, Clone, Default)]
pub struct DummyCalendarApi {
    failure: Option<RepositoryError>,
}

impl DummyCalendarApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that fails every call with `error`.
    pub fn failing(error: RepositoryError) -> Self {
        Self {
            failure: Some(error),
        }
    }

    fn check(&self) -> RepositoryResult<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

impl RemoteCalendarApi for DummyCalendarApi {
    fn list_calendars(&self, user_id: i64) -> RepositoryResult<Vec<Calendar>> {
        self.check()?;

        let mut personal = Calendar::new(user_id, "Personal");
        personal.remote_id = Some(calendar_remote_id(user_id, Slot::Personal));
        personal.is_primary = true;

        let mut work = Calendar::new(user_id, "Work");
        work.remote_id = Some(calendar_remote_id(user_id, Slot::Work));
        work.color = "#10B981".to_string();

        Ok(vec![personal, work])
    }

    fn list_events(
        &self,
        calendar_remote_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Event>> {
        self.check()?;
        let Some(slot) = Slot::from_remote_id(calendar_remote_id) else {
            return Ok(vec![]);
        };
        if end < start {
            return Ok(vec![]);
        }

        let mut events = Vec::new();
        // One day of slack on each side so overnight and all-day entries are caught.
        let mut day = start.date_naive() - Duration::days(1);
        let last = end.date_naive() + Duration::days(1);
        while day <= last {
            events.extend(events_on(calendar_remote_id, slot, day));
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }

        events.retain(|e| e.start <= end && e.end >= start);
        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.remote_id.cmp(&b.remote_id)));
        Ok(events)
    }
}

fn events_on(calendar: &str, slot: Slot, day: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();

    match slot {
        Slot::Personal => {
            if day.day() == 1 {
                events.push(all_day(calendar, day, 0, "Pay rent"));
            }
            if day.weekday() == Weekday::Sat {
                events.push(timed(calendar, day, 1, "Farmers market", (10, 0), (11, 30), Some("#F97316")));
            }
        }
        Slot::Work => match day.weekday() {
            Weekday::Mon => {
                let mut planning = timed(calendar, day, 0, "Sprint planning", (9, 0), (10, 0), None);
                planning.reminders = vec![10];
                events.push(planning);
            }
            Weekday::Thu => {
                events.push(timed(calendar, day, 1, "Product review", (15, 0), (16, 0), Some("#8B5CF6")));
            }
            _ => {}
        },
    }

    events
}

fn event_remote_id(calendar: &str, day: NaiveDate, index: u8) -> String {
    format!("{}-{}-{}", calendar, day.format("%Y%m%d"), index)
}

fn at(day: NaiveDate, (hour, minute): (u32, u32)) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN);
    Utc.from_utc_datetime(&day.and_time(time))
}

/// Remote events know only their remote ids; the local calendar id is
/// assigned when they are stored.
fn remote_event(calendar: &str, day: NaiveDate, index: u8, title: &str) -> Event {
    let start = at(day, (0, 0));
    Event {
        id: None,
        remote_id: Some(event_remote_id(calendar, day, index)),
        calendar_id: 0,
        title: title.to_string(),
        start,
        end: start,
        all_day: false,
        recurrence_rule: None,
        reminders: vec![],
        color: None,
        created_at: None,
        updated_at: None,
    }
}

fn timed(
    calendar: &str,
    day: NaiveDate,
    index: u8,
    title: &str,
    from: (u32, u32),
    to: (u32, u32),
    color: Option<&str>,
) -> Event {
    Event {
        start: at(day, from),
        end: at(day, to),
        color: color.map(str::to_string),
        ..remote_event(calendar, day, index, title)
    }
}

fn all_day(calendar: &str, day: NaiveDate, index: u8, title: &str) -> Event {
    let event = remote_event(calendar, day, index, title);
    Event {
        end: event.start + Duration::days(1),
        all_day: true,
        ..event
    }
}
