//! Repository for the `availability_slots` table.

use chrono::NaiveDate;
use sqlx::{PgConnection, PgPool};
use fait_core::availability::{check_no_overlap, Slot, SlotDays};
use fait_core::types::DbId;

use crate::models::availability::AvailabilitySlot;
use crate::repositories::ProfileRepo;

/// Column list for `availability_slots` queries.
const COLUMNS: &str = "\
    id, contractor_id, is_recurring, day_of_week, start_date, end_date, \
    start_time, end_time, created_at, updated_at";

/// Columns written for a slot, in bind order after the leading key.
fn slot_columns(slot: &Slot) -> (bool, Option<i16>, Option<NaiveDate>, Option<NaiveDate>) {
    match slot.days {
        SlotDays::Weekly { day_of_week } => (true, Some(day_of_week), None, None),
        SlotDays::DateRange { start, end } => (false, None, Some(start), Some(end)),
    }
}

/// Outcome of [`AvailabilityRepo::create`] and [`AvailabilityRepo::update`].
#[derive(Debug)]
pub enum SlotWrite {
    Written(AvailabilitySlot),
    /// The slot overlaps another slot of the same contractor; nothing was
    /// written.
    Overlaps,
}

/// Provides CRUD operations for availability slots.
pub struct AvailabilityRepo;

impl AvailabilityRepo {
    /// Insert an already-validated slot unless it overlaps one of the
    /// contractor's slots.
    ///
    /// The contractor's profile row is locked while the existing slots are
    /// read, so concurrent writes for the same contractor are serialised.
    pub async fn create(
        pool: &PgPool,
        contractor_id: DbId,
        slot: &Slot,
    ) -> Result<SlotWrite, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if Self::overlaps_on(&mut tx, contractor_id, slot, None).await? {
            return Ok(SlotWrite::Overlaps);
        }

        let (is_recurring, day_of_week, start_date, end_date) = slot_columns(slot);
        let query = format!(
            "INSERT INTO availability_slots \
                (contractor_id, is_recurring, day_of_week, start_date, end_date, start_time, end_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AvailabilitySlot>(&query)
            .bind(contractor_id)
            .bind(is_recurring)
            .bind(day_of_week)
            .bind(start_date)
            .bind(end_date)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(SlotWrite::Written(row))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AvailabilitySlot>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM availability_slots WHERE id = $1");
        sqlx::query_as::<_, AvailabilitySlot>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All slots of a contractor: weekly ones by weekday, then ranges by date.
    pub async fn list_for_contractor(
        pool: &PgPool,
        contractor_id: DbId,
    ) -> Result<Vec<AvailabilitySlot>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM availability_slots WHERE contractor_id = $1 \
             ORDER BY is_recurring DESC, day_of_week, start_date, start_time"
        );
        sqlx::query_as::<_, AvailabilitySlot>(&query)
            .bind(contractor_id)
            .fetch_all(pool)
            .await
    }

    /// Replace one of the contractor's slots in full, under the same
    /// overlap rule and lock as [`Self::create`]. The slot being replaced
    /// does not count as an overlap.
    ///
    /// Returns `None` if the contractor has no slot with this id.
    pub async fn update(
        pool: &PgPool,
        contractor_id: DbId,
        id: DbId,
        slot: &Slot,
    ) -> Result<Option<SlotWrite>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if Self::overlaps_on(&mut tx, contractor_id, slot, Some(id)).await? {
            return Ok(Some(SlotWrite::Overlaps));
        }

        let (is_recurring, day_of_week, start_date, end_date) = slot_columns(slot);
        let query = format!(
            "UPDATE availability_slots SET \
                is_recurring = $3, day_of_week = $4, start_date = $5, end_date = $6, \
                start_time = $7, end_time = $8 \
             WHERE id = $1 AND contractor_id = $2 \
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AvailabilitySlot>(&query)
            .bind(id)
            .bind(contractor_id)
            .bind(is_recurring)
            .bind(day_of_week)
            .bind(start_date)
            .bind(end_date)
            .bind(slot.start_time)
            .bind(slot.end_time)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row.map(SlotWrite::Written))
    }

    /// Lock the contractor and test `slot` against their other slots.
    async fn overlaps_on(
        conn: &mut PgConnection,
        contractor_id: DbId,
        slot: &Slot,
        skip_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        ProfileRepo::lock_on(&mut *conn, contractor_id).await?;

        let query = format!(
            "SELECT {COLUMNS} FROM availability_slots \
             WHERE contractor_id = $1 AND ($2::BIGINT IS NULL OR id <> $2)"
        );
        let rows = sqlx::query_as::<_, AvailabilitySlot>(&query)
            .bind(contractor_id)
            .bind(skip_id)
            .fetch_all(&mut *conn)
            .await?;

        // Stored rows already satisfy `chk_availability_slots_shape`.
        let existing: Vec<Slot> = rows.iter().filter_map(|row| row.to_slot().ok()).collect();
        Ok(check_no_overlap(slot, &existing).is_err())
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM availability_slots WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
