mod rows;

pub use rows::read_rows;

use std::cell::Cell;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;

use csv::ByteRecord;
use rayon::prelude::*;

use crate::error::ParseError;
use crate::pipeline::cancel::CancelFlag;
use crate::types::activity::{Activity, Column, FieldPolicy, COLUMN_COUNT};

/// Parses every row on the rayon pool. Each worker sends its record into a
/// shared channel, so the returned order follows completion, not input.
/// The first failing row aborts the batch and nothing is returned.
pub fn parse_activities(
    rows: &[ByteRecord],
    policy: FieldPolicy,
    cancel: &CancelFlag,
) -> Result<Vec<Activity>, ParseError> {
    let (tx, rx) = mpsc::channel();
    let coerced_fields = AtomicUsize::new(0);
    let coerced_rows = AtomicUsize::new(0);

    rows.par_iter()
        .enumerate()
        .try_for_each_with(tx, |tx, (idx, record)| {
            if cancel.is_cancelled() {
                return Err(ParseError::Cancelled);
            }
            let fields = RowFields {
                row: idx + 1,
                record,
                policy,
                coerced: Cell::new(0),
            };
            let (activity, coerced) = fields.into_activity()?;
            if coerced > 0 {
                coerced_fields.fetch_add(coerced, Ordering::Relaxed);
                coerced_rows.fetch_add(1, Ordering::Relaxed);
            }
            tx.send(activity).map_err(|_| ParseError::Cancelled)
        })?;

    let coerced_fields = coerced_fields.into_inner();
    if coerced_fields > 0 {
        tracing::warn!(
            "Substituted zero for {} unparseable field(s) in {} of {} row(s)",
            coerced_fields,
            coerced_rows.into_inner(),
            rows.len()
        );
    }

    Ok(rx.into_iter().collect())
}

struct RowFields<'a> {
    row: usize,
    record: &'a ByteRecord,
    policy: FieldPolicy,
    coerced: Cell<usize>,
}

impl RowFields<'_> {
    /// Builds the record and reports how many fields were replaced by zero.
    /// Lenient parsing reads the first ten fields and ignores any extras;
    /// strict parsing wants exactly ten. Short rows always fail.
    fn into_activity(self) -> Result<(Activity, usize), ParseError> {
        let found = self.record.len();
        let width_ok = match self.policy {
            FieldPolicy::Lenient => found >= COLUMN_COUNT,
            FieldPolicy::Strict => found == COLUMN_COUNT,
        };
        if !width_ok {
            return Err(ParseError::ColumnCount {
                row: self.row,
                expected: COLUMN_COUNT,
                found,
            });
        }

        let activity = Activity {
            id: self.number(Column::Id)?,
            user_id: self.number(Column::UserId)?,
            start_time_seconds: self.number(Column::StartTime)?,
            duration_seconds: self.number(Column::Duration)?,
            distance_m: self.number(Column::Distance)?,
            steps: self.number(Column::Steps)?,
            avg_speed_mps: self.number(Column::AverageSpeed)?,
            avg_pace_min_per_km: self.number(Column::AveragePace)?,
            elevation_gain_m: self.number(Column::ElevationGain)?,
            avg_heart_rate_bpm: self.number(Column::HeartRate)?,
        };

        Ok((activity, self.coerced.get()))
    }

    /// Text that is not UTF-8 is handled like text that is not a number.
    fn number<T: FromStr + Default>(&self, column: Column) -> Result<T, ParseError> {
        let raw = self.record.get(column.index()).unwrap_or_default();
        let parsed = std::str::from_utf8(raw)
            .ok()
            .and_then(|text| text.parse::<T>().ok());

        match (parsed, self.policy) {
            (Some(value), _) => Ok(value),
            (None, FieldPolicy::Lenient) => {
                self.coerced.set(self.coerced.get() + 1);
                tracing::debug!(
                    "Row {}: {:?} in column {} is not a number, using zero",
                    self.row,
                    String::from_utf8_lossy(raw),
                    column
                );
                Ok(T::default())
            }
            (None, FieldPolicy::Strict) => Err(ParseError::MalformedField {
                row: self.row,
                column,
                value: String::from_utf8_lossy(raw).into_owned(),
            }),
        }
    }
}
