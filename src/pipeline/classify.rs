use rayon::prelude::*;
use serde::Serialize;

use crate::types::activity::{Activity, AggregateStats};

/// Pace below this many minutes per km is treated as implausibly fast.
pub const PACE_THRESHOLD: f64 = 4.0;
/// Multiple of the set's largest elevation gain.
pub const ELEVATION_THRESHOLD: f64 = 2.0;
/// Multiple of the mean duration or mean distance.
pub const RATIO_THRESHOLD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyReason {
    FastPace,
    /// Elevation gain above twice the maximum of the same set. Since the
    /// maximum is taken over the records being classified, no record with a
    /// non-negative gain can satisfy this; kept as-is until the intended
    /// baseline (a fixed limit or a previous upload's max) is decided.
    ExcessiveElevation,
    LongDuration,
    LongDistance,
}

/// Every heuristic the record trips, in a fixed order.
pub fn anomaly_reasons(activity: &Activity, stats: &AggregateStats) -> Vec<AnomalyReason> {
    let mut reasons = Vec::new();

    if activity.avg_pace_min_per_km < PACE_THRESHOLD {
        reasons.push(AnomalyReason::FastPace);
    }
    if activity.elevation_gain_m > ELEVATION_THRESHOLD * stats.max_elevation_gain_m {
        reasons.push(AnomalyReason::ExcessiveElevation);
    }
    if activity.duration_seconds as f64 / stats.mean_duration_seconds > RATIO_THRESHOLD {
        reasons.push(AnomalyReason::LongDuration);
    }
    if activity.distance_m / stats.mean_distance_m > RATIO_THRESHOLD {
        reasons.push(AnomalyReason::LongDistance);
    }

    reasons
}

pub fn is_suspicious(activity: &Activity, stats: &AggregateStats) -> bool {
    !anomaly_reasons(activity, stats).is_empty()
}

/// Returns copies of the records that trip at least one heuristic.
pub fn classify_suspicious(activities: &[Activity], stats: &AggregateStats) -> Vec<Activity> {
    activities
        .par_iter()
        .filter_map(|activity| {
            let reasons = anomaly_reasons(activity, stats);
            if reasons.is_empty() {
                return None;
            }
            tracing::debug!(
                "Activity {} (user {}) flagged: {:?}",
                activity.id,
                activity.user_id,
                reasons
            );
            Some(activity.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: i64, pace: f64, elevation: f64, duration: i64, distance: f64) -> Activity {
        Activity {
            id,
            user_id: 1,
            start_time_seconds: 0,
            duration_seconds: duration,
            distance_m: distance,
            steps: 0,
            avg_speed_mps: 0.0,
            avg_pace_min_per_km: pace,
            elevation_gain_m: elevation,
            avg_heart_rate_bpm: 0,
        }
    }

    fn stats(mean_duration: f64, mean_distance: f64, max_elevation: f64) -> AggregateStats {
        AggregateStats {
            count: 2,
            mean_pace_min_per_km: 5.0,
            mean_duration_seconds: mean_duration,
            mean_distance_m: mean_distance,
            max_elevation_gain_m: max_elevation,
        }
    }

    #[test]
    fn fast_pace_is_flagged_and_normal_record_is_not() {
        let activities = [
            activity(1, 3.5, 10.0, 100, 1000.0),
            activity(2, 6.0, 10.0, 100, 1000.0),
        ];
        let flagged = classify_suspicious(&activities, &stats(100.0, 1000.0, 10.0));
        assert_eq!(flagged, vec![activities[0].clone()]);
    }

    #[test]
    fn pace_at_threshold_is_not_flagged() {
        let reasons = anomaly_reasons(&activity(1, 4.0, 0.0, 1, 1.0), &stats(1.0, 1.0, 0.0));
        assert!(reasons.is_empty());
    }

    #[test]
    fn each_condition_is_reported() {
        let s = stats(100.0, 1000.0, 10.0);

        assert_eq!(
            anomaly_reasons(&activity(1, 6.0, 21.0, 100, 1000.0), &s),
            vec![AnomalyReason::ExcessiveElevation]
        );
        assert_eq!(
            anomaly_reasons(&activity(1, 6.0, 0.0, 201, 1000.0), &s),
            vec![AnomalyReason::LongDuration]
        );
        assert_eq!(
            anomaly_reasons(&activity(1, 6.0, 0.0, 100, 2000.1), &s),
            vec![AnomalyReason::LongDistance]
        );
        assert_eq!(
            anomaly_reasons(&activity(1, 3.0, 25.0, 300, 3000.0), &s),
            vec![
                AnomalyReason::FastPace,
                AnomalyReason::ExcessiveElevation,
                AnomalyReason::LongDuration,
                AnomalyReason::LongDistance,
            ]
        );
    }

    #[test]
    fn ratio_of_exactly_two_is_not_flagged() {
        let s = stats(100.0, 1000.0, 10.0);
        assert!(!is_suspicious(&activity(1, 6.0, 0.0, 200, 2000.0), &s));
    }

    #[test]
    fn zero_means_follow_float_division() {
        let s = stats(0.0, 0.0, 0.0);
        // 0 / 0 is NaN and never compares greater.
        assert!(!is_suspicious(&activity(1, 6.0, 0.0, 0, 0.0), &s));
        // x / 0 is infinite.
        assert!(is_suspicious(&activity(2, 6.0, 0.0, 5, 0.0), &s));
    }

    #[test]
    fn classification_is_idempotent_and_leaves_input_untouched() {
        let activities = vec![
            activity(1, 3.0, 1.0, 10, 10.0),
            activity(2, 6.0, 1.0, 10, 10.0),
            activity(3, 6.0, 1.0, 90, 10.0),
        ];
        let before = activities.clone();
        let s = stats(20.0, 10.0, 1.0);

        let first = classify_suspicious(&activities, &s);
        let second = classify_suspicious(&activities, &s);

        assert_eq!(first, second);
        assert_eq!(activities, before);
        assert_eq!(first.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 3]);
    }
}
