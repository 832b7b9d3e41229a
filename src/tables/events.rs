//! Event-side builders: actionable filter, actor dimension, time dimension.

use arrow::array::{
    Array, Int32Array, Int64Array, RecordBatch, Scalar, StringArray, TimestampSecondArray,
};
use arrow::compute::filter_record_batch;
use arrow::compute::kernels::cmp::eq;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use chrono::{DateTime, Datelike, Timelike};
use snafu::prelude::*;
use std::sync::Arc;

use super::{column, dedup_rows, project, string_column};
use crate::error::{ArrowSnafu, ColumnTypeSnafu, TransformError};

/// Sentinel marking an event as a play action. Only these events are
/// carried into the dimensions and the fact table.
const ACTIONABLE_PAGE: &str = "NextSong";

/// Filter the event dataset down to actionable rows.
///
/// Non-matching rows (including null `page`) are discarded permanently
/// and participate in no later table.
pub fn filter_actionable(events: &RecordBatch) -> Result<RecordBatch, TransformError> {
    let page = string_column(events, "page")?;
    let sentinel = StringArray::from(vec![ACTIONABLE_PAGE]);
    let mask = eq(page, &Scalar::new(&sentinel)).context(ArrowSnafu)?;
    filter_record_batch(events, &mask).context(ArrowSnafu)
}

/// Build the actor dimension from the filtered events, deduplicated by
/// exact row equality.
pub fn build_actor_table(events: &RecordBatch) -> Result<RecordBatch, TransformError> {
    let actors = project(
        events,
        &[
            ("userId", "actor_id"),
            ("firstName", "first_name"),
            ("lastName", "last_name"),
            ("gender", "gender"),
            ("level", "tier"),
        ],
    )?;
    dedup_rows(&actors)
}

/// Derive the time dimension from the filtered events.
///
/// The millisecond `ts` epoch becomes a second-precision timestamp plus
/// calendar parts. One row per event row; no deduplication, so repeated
/// timestamps persist.
pub fn build_time_table(events: &RecordBatch) -> Result<RecordBatch, TransformError> {
    let ts = column(events, "ts")?
        .as_any()
        .downcast_ref::<Int64Array>()
        .context(ColumnTypeSnafu {
            name: "ts",
            expected: "Int64",
        })?;

    let rows = ts.len();
    let mut timestamps: Vec<Option<i64>> = Vec::with_capacity(rows);
    let mut hours: Vec<Option<i32>> = Vec::with_capacity(rows);
    let mut days: Vec<Option<i32>> = Vec::with_capacity(rows);
    let mut weeks: Vec<Option<i32>> = Vec::with_capacity(rows);
    let mut months: Vec<Option<i32>> = Vec::with_capacity(rows);
    let mut years: Vec<Option<i32>> = Vec::with_capacity(rows);
    let mut weekdays: Vec<Option<String>> = Vec::with_capacity(rows);

    for i in 0..rows {
        let datetime = if ts.is_valid(i) {
            DateTime::from_timestamp(ts.value(i) / 1000, 0)
        } else {
            None
        };

        match datetime {
            Some(dt) => {
                timestamps.push(Some(dt.timestamp()));
                hours.push(Some(dt.hour() as i32));
                days.push(Some(dt.day() as i32));
                weeks.push(Some(dt.iso_week().week() as i32));
                months.push(Some(dt.month() as i32));
                years.push(Some(dt.year()));
                weekdays.push(Some(dt.format("%a").to_string()));
            }
            None => {
                timestamps.push(None);
                hours.push(None);
                days.push(None);
                weeks.push(None);
                months.push(None);
                years.push(None);
                weekdays.push(None);
            }
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("timestamp", DataType::Timestamp(TimeUnit::Second, None), true),
        Field::new("hour", DataType::Int32, true),
        Field::new("day_of_month", DataType::Int32, true),
        Field::new("week_of_year", DataType::Int32, true),
        Field::new("month", DataType::Int32, true),
        Field::new("year", DataType::Int32, true),
        Field::new("weekday_name", DataType::Utf8, true),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(TimestampSecondArray::from(timestamps)),
            Arc::new(Int32Array::from(hours)),
            Arc::new(Int32Array::from(days)),
            Arc::new(Int32Array::from(weeks)),
            Arc::new(Int32Array::from(months)),
            Arc::new(Int32Array::from(years)),
            Arc::new(StringArray::from(weekdays)),
        ],
    )
    .context(ArrowSnafu)
}
