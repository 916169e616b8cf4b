use csv::ByteRecord;

use crate::error::PipelineError;
use crate::pipeline::aggregate::compute_aggregate;
use crate::pipeline::cancel::CancelFlag;
use crate::pipeline::classify::classify_suspicious;
use crate::pipeline::parse::{parse_activities, read_rows};
use crate::types::activity::{Activity, FieldPolicy};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub policy: FieldPolicy,
    pub cancel: CancelFlag,
}

/// Parse, aggregate and classify one batch of rows. An empty result means
/// nothing looked suspicious; an empty batch is an error.
pub fn run_pipeline(
    rows: &[ByteRecord],
    options: &PipelineOptions,
) -> Result<Vec<Activity>, PipelineError> {
    let activities = parse_activities(rows, options.policy, &options.cancel)?;
    let stats = compute_aggregate(&activities)?;
    let flagged = classify_suspicious(&activities, &stats);

    tracing::info!(
        "Classified {} activities (mean pace {:.2} min/km, mean duration {:.0}s, mean distance {:.0}m, max elevation {:.1}m): {} flagged",
        stats.count,
        stats.mean_pace_min_per_km,
        stats.mean_duration_seconds,
        stats.mean_distance_m,
        stats.max_elevation_gain_m,
        flagged.len()
    );

    Ok(flagged)
}

/// Same as [`run_pipeline`], starting from the raw bytes of an uploaded file.
pub fn process_bytes(bytes: &[u8], options: &PipelineOptions) -> Result<Vec<Activity>, PipelineError> {
    let rows = read_rows(bytes)?;
    run_pipeline(&rows, options)
}
