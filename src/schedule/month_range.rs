use crate::models::year_month::YearMonth;

pub const DEFAULT_WINDOW_MONTHS: i32 = 25;
pub const DEFAULT_EXPANSION_MONTHS: u32 = 10;

/// Window of months materialised around a fixed start month.
///
/// Only the most recent expansion in each direction can be read back through
/// the `last_added_*` accessors; a second expansion before consuming the first
/// overwrites it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRange {
    start: YearMonth,
    min_offset: i32,
    max_offset: i32,
    last_min_offset: i32,
    last_max_offset: i32,
}

impl MonthRange {
    pub fn new(start: YearMonth) -> Self {
        Self::symmetric(start, DEFAULT_WINDOW_MONTHS)
    }

    pub fn symmetric(start: YearMonth, window: i32) -> Self {
        let window = window.saturating_abs();
        Self {
            start,
            min_offset: -window,
            max_offset: window,
            last_min_offset: -window,
            last_max_offset: window,
        }
    }

    pub fn with_offsets(start: YearMonth, min_offset: i32, max_offset: i32) -> Result<Self, String> {
        if min_offset > max_offset {
            return Err(format!(
                "Minimum offset {} must not exceed maximum offset {}",
                min_offset, max_offset
            ));
        }
        Ok(Self {
            start,
            min_offset,
            max_offset,
            last_min_offset: min_offset,
            last_max_offset: max_offset,
        })
    }

    pub fn start(&self) -> YearMonth {
        self.start
    }

    pub fn min_offset(&self) -> i32 {
        self.min_offset
    }

    pub fn max_offset(&self) -> i32 {
        self.max_offset
    }

    /// All months in `[min_offset, max_offset]`, ascending.
    pub fn months(&self) -> Vec<YearMonth> {
        self.months_in(self.min_offset, self.max_offset.saturating_add(1))
    }

    pub fn first_month(&self) -> YearMonth {
        self.start.plus_months(self.min_offset)
    }

    pub fn last_month(&self) -> YearMonth {
        self.start.plus_months(self.max_offset)
    }

    /// Extend the window `amount` months into the past, stopping at
    /// [`YearMonth::earliest`].
    pub fn expand_backward(&mut self, amount: u32) {
        let floor = self.start.months_until(YearMonth::earliest());
        let step = i32::try_from(amount).unwrap_or(i32::MAX);
        self.last_min_offset = self.min_offset;
        self.min_offset = self
            .min_offset
            .saturating_sub(step)
            .max(floor.min(self.min_offset));
    }

    /// Extend the window `amount` months into the future, stopping at
    /// [`YearMonth::latest`].
    pub fn expand_forward(&mut self, amount: u32) {
        let ceiling = self.start.months_until(YearMonth::latest());
        let step = i32::try_from(amount).unwrap_or(i32::MAX);
        self.last_max_offset = self.max_offset;
        self.max_offset = self
            .max_offset
            .saturating_add(step)
            .min(ceiling.max(self.max_offset));
    }

    /// Months in `[min_offset, last_min_offset)`.
    pub fn last_added_months_backward(&self) -> Vec<YearMonth> {
        self.months_in(self.min_offset, self.last_min_offset)
    }

    /// Months in `(last_max_offset, max_offset]`.
    pub fn last_added_months_forward(&self) -> Vec<YearMonth> {
        self.months_in(
            self.last_max_offset.saturating_add(1),
            self.max_offset.saturating_add(1),
        )
    }

    fn months_in(&self, from: i32, until_exclusive: i32) -> Vec<YearMonth> {
        (from..until_exclusive)
            .map(|offset| self.start.plus_months(offset))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_months_small_window() {
        let range = MonthRange::with_offsets(ym(2024, 6), -2, 2).unwrap();
        assert_eq!(
            range.months(),
            vec![ym(2024, 4), ym(2024, 5), ym(2024, 6), ym(2024, 7), ym(2024, 8)]
        );
    }

    #[test]
    fn test_default_window_length() {
        let range = MonthRange::new(ym(2024, 6));
        assert_eq!(range.months().len(), 51);
        assert_eq!(range.first_month(), ym(2022, 5));
        assert_eq!(range.last_month(), ym(2026, 7));
    }

    #[test]
    fn test_last_added_empty_before_expansion() {
        let range = MonthRange::new(ym(2024, 6));
        assert!(range.last_added_months_backward().is_empty());
        assert!(range.last_added_months_forward().is_empty());
    }

    #[test]
    fn test_expand_backward() {
        let mut range = MonthRange::with_offsets(ym(2024, 6), -2, 2).unwrap();
        range.expand_backward(3);
        assert_eq!(
            range.last_added_months_backward(),
            vec![ym(2024, 1), ym(2024, 2), ym(2024, 3)]
        );
        assert_eq!(range.months().len(), 8);
    }

    #[test]
    fn test_expand_forward_wraps_year() {
        let mut range = MonthRange::with_offsets(ym(2024, 11), 0, 0).unwrap();
        range.expand_forward(2);
        assert_eq!(
            range.last_added_months_forward(),
            vec![ym(2024, 12), ym(2025, 1)]
        );
    }

    #[test]
    fn test_double_expansion_keeps_only_latest_delta() {
        let mut range = MonthRange::with_offsets(ym(2024, 6), 0, 0).unwrap();
        range.expand_backward(2);
        range.expand_backward(1);
        assert_eq!(range.last_added_months_backward(), vec![ym(2024, 3)]);
        assert_eq!(range.months().len(), 4);
    }

    #[test]
    fn test_with_offsets_rejects_inverted_range() {
        assert!(MonthRange::with_offsets(ym(2024, 6), 3, -3).is_err());
    }

    #[test]
    fn test_huge_expansions_stop_at_representable_months() {
        let near_end = YearMonth::latest().minus_months(2);
        let mut range = MonthRange::with_offsets(near_end, 0, 0).unwrap();
        range.expand_forward(u32::MAX);
        assert_eq!(
            range.last_added_months_forward(),
            vec![near_end.plus_months(1), YearMonth::latest()]
        );
        range.expand_forward(1);
        assert!(range.last_added_months_forward().is_empty());

        let near_start = YearMonth::earliest().plus_months(1);
        let mut range = MonthRange::with_offsets(near_start, 0, 0).unwrap();
        range.expand_backward(u32::MAX);
        assert_eq!(range.last_added_months_backward(), vec![YearMonth::earliest()]);
        assert_eq!(range.first_month(), YearMonth::earliest());
    }

    #[test]
    fn test_extreme_symmetric_window_saturates() {
        let range = MonthRange::symmetric(ym(2024, 6), i32::MIN);
        assert_eq!(range.first_month(), YearMonth::earliest());
        assert_eq!(range.last_month(), YearMonth::latest());
    }
}
