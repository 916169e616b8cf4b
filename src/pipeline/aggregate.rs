use crate::error::AggregateError;
use crate::types::activity::{Activity, AggregateStats};

/// Means of pace, duration and distance plus the largest elevation gain.
/// An empty set has no mean, so it is rejected instead of producing NaN.
pub fn compute_aggregate(activities: &[Activity]) -> Result<AggregateStats, AggregateError> {
    if activities.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let mut pace_sum = 0.0;
    let mut duration_sum = 0.0;
    let mut distance_sum = 0.0;
    let mut max_elevation = f64::NEG_INFINITY;

    for activity in activities {
        pace_sum += activity.avg_pace_min_per_km;
        duration_sum += activity.duration_seconds as f64;
        distance_sum += activity.distance_m;
        max_elevation = max_elevation.max(activity.elevation_gain_m);
    }

    let count = activities.len() as f64;

    Ok(AggregateStats {
        count: activities.len(),
        mean_pace_min_per_km: pace_sum / count,
        mean_duration_seconds: duration_sum / count,
        mean_distance_m: distance_sum / count,
        max_elevation_gain_m: max_elevation,
    })
}
