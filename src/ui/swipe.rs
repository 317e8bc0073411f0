//! Swipeable date-range pager shared by the day, 3-day, week and month views.
//!
//! The pager owns no drawing. It tracks the horizontal drag offset, decides on
//! release whether to commit to the neighbouring page or snap back, animates
//! the settle from frame ticks, and reports the new anchor once a commit lands.
//! Callers render the three pages returned by [`SwipePager::pages`].

use std::time::Duration;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate};

use crate::models::year_month::YearMonth;
use crate::utils::date::{shift_month_preserving_day, start_of_week};

/// Fraction of the page width a drag must cover to turn the page.
pub const COMMIT_THRESHOLD_RATIO: f32 = 0.3;
/// Length of the commit / snap-back animation.
pub const SETTLE_DURATION: Duration = Duration::from_millis(300);

/// How far one page reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageUnit {
    Days(u32),
    Month,
}

impl PageUnit {
    /// Start of the page containing `date`.
    pub fn page_start(&self, date: NaiveDate, first_day_of_week: u8) -> NaiveDate {
        match self {
            PageUnit::Days(7) => start_of_week(date, first_day_of_week),
            PageUnit::Days(_) => date,
            PageUnit::Month => YearMonth::from_date(date).first_day(),
        }
    }

    /// Anchor `steps` pages away from `anchor`.
    pub fn shift(&self, anchor: NaiveDate, steps: i32) -> NaiveDate {
        match self {
            PageUnit::Days(_) => anchor + ChronoDuration::days(self.page_len(anchor) * steps as i64),
            PageUnit::Month => shift_month_preserving_day(anchor, steps),
        }
    }

    /// Number of days on the page starting at `anchor`.
    pub fn page_len(&self, anchor: NaiveDate) -> i64 {
        match self {
            PageUnit::Days(days) => (*days).max(1) as i64,
            PageUnit::Month => YearMonth::from_date(anchor).length_of_month() as i64,
        }
    }

    /// Zero-based position of `date` on the page, if it is on the page.
    pub fn offset_within(&self, anchor: NaiveDate, date: NaiveDate) -> Option<i64> {
        let offset = match self {
            PageUnit::Days(_) => (date - anchor).num_days(),
            PageUnit::Month if YearMonth::from_date(anchor).contains(date) => date.day0() as i64,
            PageUnit::Month => return None,
        };
        (0..self.page_len(anchor)).contains(&offset).then_some(offset)
    }

    /// Date at `offset` on the page, or the page start when it does not fit.
    pub fn date_at(&self, anchor: NaiveDate, offset: i64) -> NaiveDate {
        if (0..self.page_len(anchor)).contains(&offset) {
            anchor + ChronoDuration::days(offset)
        } else {
            anchor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Towards earlier dates (finger moving right).
    Backward,
    /// Towards later dates (finger moving left).
    Forward,
}

impl SwipeDirection {
    pub fn step(&self) -> i32 {
        match self {
            SwipeDirection::Backward => -1,
            SwipeDirection::Forward => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipePhase {
    Idle,
    Dragging,
    Committing(SwipeDirection),
    SnappingBack,
}

/// Reported when a commit animation lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageChange {
    pub direction: SwipeDirection,
    pub anchor: NaiveDate,
    pub selected: NaiveDate,
}

/// One of the three rendered pages and its horizontal position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub anchor: NaiveDate,
    pub x: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SettleAnimation {
    from: f32,
    to: f32,
    elapsed: Duration,
}

pub struct SwipePager {
    unit: PageUnit,
    first_day_of_week: u8,
    anchor: NaiveDate,
    selected: NaiveDate,
    width: f32,
    offset_x: f32,
    phase: SwipePhase,
    animation: Option<SettleAnimation>,
    threshold_ratio: f32,
    settle_duration: Duration,
}

impl SwipePager {
    pub fn new(unit: PageUnit, selected: NaiveDate, width: f32) -> Self {
        Self {
            unit,
            first_day_of_week: 0,
            anchor: unit.page_start(selected, 0),
            selected,
            width: width.max(0.0),
            offset_x: 0.0,
            phase: SwipePhase::Idle,
            animation: None,
            threshold_ratio: COMMIT_THRESHOLD_RATIO,
            settle_duration: SETTLE_DURATION,
        }
    }

    pub fn with_first_day_of_week(mut self, first_day_of_week: u8) -> Self {
        self.first_day_of_week = first_day_of_week;
        self.anchor = self.unit.page_start(self.selected, first_day_of_week);
        self
    }

    pub fn with_threshold_ratio(mut self, ratio: f32) -> Self {
        self.threshold_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    pub fn with_settle_duration(mut self, duration: Duration) -> Self {
        self.settle_duration = duration;
        self
    }

    pub fn unit(&self) -> PageUnit {
        self.unit
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    pub fn phase(&self) -> SwipePhase {
        self.phase
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_idle(&self) -> bool {
        self.phase == SwipePhase::Idle
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width.max(0.0);
    }

    /// Start tracking a drag. Ignored while a settle animation is running.
    pub fn begin_drag(&mut self) -> bool {
        match self.phase {
            SwipePhase::Idle => {
                self.phase = SwipePhase::Dragging;
                self.offset_x = 0.0;
                true
            }
            SwipePhase::Dragging => true,
            SwipePhase::Committing(_) | SwipePhase::SnappingBack => false,
        }
    }

    /// Apply a horizontal pointer delta.
    pub fn drag_by(&mut self, delta_x: f32) {
        if !self.begin_drag() {
            return;
        }
        self.offset_x = (self.offset_x + delta_x).clamp(-self.width, self.width);
    }

    /// Pointer released: commit past the threshold, otherwise snap back.
    pub fn release(&mut self) {
        if self.phase != SwipePhase::Dragging {
            return;
        }

        let passed = self.width > 0.0
            && self.offset_x != 0.0
            && self.offset_x.abs() / self.width >= self.threshold_ratio;

        let (phase, target) = if passed {
            if self.offset_x < 0.0 {
                (SwipePhase::Committing(SwipeDirection::Forward), -self.width)
            } else {
                (SwipePhase::Committing(SwipeDirection::Backward), self.width)
            }
        } else {
            (SwipePhase::SnappingBack, 0.0)
        };

        log::trace!(
            "Swipe released at {:.1}/{:.1}: {:?}",
            self.offset_x,
            self.width,
            phase
        );

        self.phase = phase;
        self.animation = Some(SettleAnimation {
            from: self.offset_x,
            to: target,
            elapsed: Duration::ZERO,
        });
    }

    /// A cancelled gesture settles exactly like a release.
    pub fn cancel(&mut self) {
        self.release();
    }

    /// Advance the settle animation by one frame.
    pub fn tick(&mut self, frame: Duration) -> Option<PageChange> {
        let animation = self.animation.as_mut()?;
        animation.elapsed += frame;

        let progress = if self.settle_duration.is_zero() {
            1.0
        } else {
            (animation.elapsed.as_secs_f32() / self.settle_duration.as_secs_f32()).min(1.0)
        };
        self.offset_x = animation.from + (animation.to - animation.from) * ease_out_cubic(progress);

        if progress < 1.0 {
            return None;
        }
        self.finish_settle()
    }

    fn finish_settle(&mut self) -> Option<PageChange> {
        self.animation = None;
        self.offset_x = 0.0;
        let phase = std::mem::replace(&mut self.phase, SwipePhase::Idle);

        let SwipePhase::Committing(direction) = phase else {
            return None;
        };

        let relative = self.unit.offset_within(self.anchor, self.selected);
        self.anchor = self.unit.shift(self.anchor, direction.step());
        self.selected = match relative {
            Some(offset) => self.unit.date_at(self.anchor, offset),
            None => self.anchor,
        };

        log::debug!(
            "Pager moved {:?} to {} (selected {})",
            direction,
            self.anchor,
            self.selected
        );

        Some(PageChange {
            direction,
            anchor: self.anchor,
            selected: self.selected,
        })
    }

    /// Previous, current and next pages with their live x positions.
    pub fn pages(&self) -> [PagePlacement; 3] {
        [-1, 0, 1].map(|step| PagePlacement {
            anchor: self.unit.shift(self.anchor, step),
            x: step as f32 * self.width + self.offset_x,
        })
    }

    /// Switch unit, re-anchoring on the page that contains the selected day.
    pub fn set_unit(&mut self, unit: PageUnit) {
        self.unit = unit;
        self.reset_gesture();
        self.anchor = unit.page_start(self.selected, self.first_day_of_week);
    }

    /// Select a day; moves to its page if it is not on the current one.
    pub fn select(&mut self, date: NaiveDate) {
        if self.unit.offset_within(self.anchor, date).is_some() {
            self.selected = date;
        } else {
            self.jump_to(date);
        }
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        self.reset_gesture();
        self.selected = date;
        self.anchor = self.unit.page_start(date, self.first_day_of_week);
    }

    fn reset_gesture(&mut self) {
        self.phase = SwipePhase::Idle;
        self.animation = None;
        self.offset_x = 0.0;
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}
