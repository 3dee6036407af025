//! Contractor availability slots: validation, overlap detection, and
//! coverage checks.
//!
//! A slot is either weekly (a day of week, Sunday = 0) or bound to an
//! inclusive date range; both carry a same-day time window.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::error::CoreError;

/// Days of the week are numbered 0 (Sunday) through 6 (Saturday).
pub const MAX_DAY_OF_WEEK: i16 = 6;

/// When a slot applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDays {
    Weekly { day_of_week: i16 },
    DateRange { start: NaiveDate, end: NaiveDate },
}

/// A validated availability slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub days: SlotDays,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Build a slot from the raw columns, validating it.
///
/// For date ranges a missing `end_date` means a single day.
pub fn build_slot(
    is_recurring: bool,
    day_of_week: Option<i16>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Slot, CoreError> {
    if end_time <= start_time {
        return Err(CoreError::Validation(
            "End time must be after start time".into(),
        ));
    }

    let days = if is_recurring {
        if start_date.is_some() || end_date.is_some() {
            return Err(CoreError::Validation(
                "Recurring slots must not carry start/end dates".into(),
            ));
        }
        let day = day_of_week.ok_or_else(|| {
            CoreError::Validation("Recurring slots require a day_of_week".into())
        })?;
        if !(0..=MAX_DAY_OF_WEEK).contains(&day) {
            return Err(CoreError::Validation(format!(
                "day_of_week must be between 0 and {MAX_DAY_OF_WEEK} (got {day})"
            )));
        }
        SlotDays::Weekly { day_of_week: day }
    } else {
        if day_of_week.is_some() {
            return Err(CoreError::Validation(
                "Date-range slots must not carry a day_of_week".into(),
            ));
        }
        let start = start_date.ok_or_else(|| {
            CoreError::Validation("Date-range slots require a start_date".into())
        })?;
        let end = end_date.unwrap_or(start);
        if end < start {
            return Err(CoreError::Validation(
                "End date must be after or equal to start date".into(),
            ));
        }
        SlotDays::DateRange { start, end }
    };

    Ok(Slot {
        days,
        start_time,
        end_time,
    })
}

/// Day-of-week number for a date, Sunday = 0.
pub fn day_of_week(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

impl SlotDays {
    /// Whether the slot applies on `date`.
    pub fn includes(&self, date: NaiveDate) -> bool {
        match *self {
            SlotDays::Weekly { day_of_week: d } => day_of_week(date) == d,
            SlotDays::DateRange { start, end } => start <= date && date <= end,
        }
    }

    /// Whether there is at least one calendar day on which both apply.
    pub fn intersects(&self, other: &SlotDays) -> bool {
        match (*self, *other) {
            (SlotDays::Weekly { day_of_week: a }, SlotDays::Weekly { day_of_week: b }) => a == b,
            (SlotDays::DateRange { start: s1, end: e1 }, SlotDays::DateRange { start: s2, end: e2 }) => {
                s1 <= e2 && s2 <= e1
            }
            (SlotDays::Weekly { day_of_week: d }, SlotDays::DateRange { start, end })
            | (SlotDays::DateRange { start, end }, SlotDays::Weekly { day_of_week: d }) => {
                // A range of seven or more days covers every weekday.
                start
                    .iter_days()
                    .take_while(|date| *date <= end)
                    .take(7)
                    .any(|date| day_of_week(date) == d)
            }
        }
    }
}

impl Slot {
    /// Two slots overlap when they share a day and their time windows
    /// intersect. Touching windows (one ends when the other starts) do not.
    pub fn overlaps(&self, other: &Slot) -> bool {
        self.days.intersects(&other.days)
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    /// Whether this slot fully contains the window on `date`.
    pub fn covers(&self, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
        self.days.includes(date) && self.start_time <= start && end <= self.end_time
    }
}

/// Reject `candidate` if it overlaps any of `existing`.
pub fn check_no_overlap(candidate: &Slot, existing: &[Slot]) -> Result<(), CoreError> {
    if existing.iter().any(|slot| candidate.overlaps(slot)) {
        return Err(CoreError::Conflict(
            "Availability slot overlaps an existing slot".into(),
        ));
    }
    Ok(())
}

/// Whether any slot covers the requested window on `date`.
pub fn is_available(slots: &[Slot], date: NaiveDate, start: NaiveTime, end: NaiveTime) -> bool {
    end > start && slots.iter().any(|slot| slot.covers(date, start, end))
}
