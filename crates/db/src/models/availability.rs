//! Availability slot model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use fait_core::availability::{build_slot, Slot};
use fait_core::error::CoreError;
use fait_core::types::{DbId, Timestamp};

/// A row from the `availability_slots` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AvailabilitySlot {
    pub id: DbId,
    pub contractor_id: DbId,
    pub is_recurring: bool,
    pub day_of_week: Option<i16>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AvailabilitySlot {
    /// Domain view of the row, for overlap and coverage checks.
    pub fn to_slot(&self) -> Result<Slot, CoreError> {
        build_slot(
            self.is_recurring,
            self.day_of_week,
            self.start_date,
            self.end_date,
            self.start_time,
            self.end_time,
        )
    }
}

/// Request body for creating or replacing a slot.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilitySlotInput {
    pub is_recurring: bool,
    pub day_of_week: Option<i16>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl AvailabilitySlotInput {
    /// Validate the input, filling a missing end date from the start date.
    pub fn to_slot(&self) -> Result<Slot, CoreError> {
        build_slot(
            self.is_recurring,
            self.day_of_week,
            self.start_date,
            self.end_date,
            self.start_time,
            self.end_time,
        )
    }
}

/// Query parameters for the coverage check.
#[derive(Debug, Deserialize)]
pub struct AvailabilityCheckParams {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Coverage check result.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityCheck {
    pub contractor_id: DbId,
    pub available: bool,
}
