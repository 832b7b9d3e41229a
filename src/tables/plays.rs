//! Fact table builder.
//!
//! Joins the filtered events against the work and contributor dimensions
//! and assigns the surrogate play identifier.

use arrow::array::{ArrayRef, Int64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use snafu::prelude::*;
use std::sync::Arc;

use super::{left_join, project};
use crate::error::{ArrowSnafu, TransformError};

/// Build the play fact table.
///
/// Events join to works on title text and to contributors on name text.
/// Both joins are left-outer: rows with no match keep null foreign keys
/// rather than being dropped, and duplicate titles or names on the
/// dimension side fan out. `play_id` is unique and strictly increasing
/// within the run, but carries no meaning across runs.
pub fn build_play_table(
    events: &RecordBatch,
    works: &RecordBatch,
    contributors: &RecordBatch,
) -> Result<RecordBatch, TransformError> {
    let with_works = left_join(events, "song", works, "title", &[("work_id", "work_id")])?;

    let stage = project(
        &with_works,
        &[
            ("ts", "start_time"),
            ("userId", "actor_id"),
            ("level", "tier"),
            ("sessionId", "session_id"),
            ("location", "location"),
            ("userAgent", "user_agent"),
            ("song", "song_title"),
            ("work_id", "work_id"),
            ("artist", "contributor_name"),
        ],
    )?;

    let with_contributors = left_join(
        &stage,
        "contributor_name",
        contributors,
        "name",
        &[("contributor_id", "contributor_id")],
    )?;

    let plays = project(
        &with_contributors,
        &[
            ("start_time", "start_time"),
            ("actor_id", "actor_id"),
            ("tier", "tier"),
            ("session_id", "session_id"),
            ("location", "location"),
            ("user_agent", "user_agent"),
            ("work_id", "work_id"),
            ("contributor_id", "contributor_id"),
        ],
    )?;

    append_play_id(&plays)
}

/// Append the surrogate key column, a sequential `Int64` over the final
/// row set.
fn append_play_id(plays: &RecordBatch) -> Result<RecordBatch, TransformError> {
    let mut fields: Vec<Field> = plays
        .schema_ref()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    fields.push(Field::new("play_id", DataType::Int64, false));

    let mut arrays: Vec<ArrayRef> = plays.columns().to_vec();
    arrays.push(Arc::new(Int64Array::from_iter_values(
        0..plays.num_rows() as i64,
    )));

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays).context(ArrowSnafu)
}
