use serde::{Deserialize, Serialize};

/// Number of columns every input row must carry.
pub const COLUMN_COUNT: usize = 10;

/// One row of the uploaded activity file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "startTimeInSeconds")]
    pub start_time_seconds: i64,
    #[serde(rename = "durationInSeconds")]
    pub duration_seconds: i64,
    #[serde(rename = "distanceInMeters")]
    pub distance_m: f64,
    pub steps: i64,
    #[serde(rename = "averageSpeedInMetersPerSecond")]
    pub avg_speed_mps: f64,
    #[serde(rename = "averagePaceInMinutesPerKm")]
    pub avg_pace_min_per_km: f64,
    #[serde(rename = "totalElevationGainInMeters")]
    pub elevation_gain_m: f64,
    #[serde(rename = "averageHeartRateInBPM")]
    pub avg_heart_rate_bpm: i64,
}

/// Input columns, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    UserId,
    StartTime,
    Duration,
    Distance,
    Steps,
    AverageSpeed,
    AveragePace,
    ElevationGain,
    HeartRate,
}

impl Column {
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::UserId => "userId",
            Column::StartTime => "startTimeInSeconds",
            Column::Duration => "durationInSeconds",
            Column::Distance => "distanceInMeters",
            Column::Steps => "steps",
            Column::AverageSpeed => "averageSpeedInMetersPerSecond",
            Column::AveragePace => "averagePaceInMinutesPerKm",
            Column::ElevationGain => "totalElevationGainInMeters",
            Column::HeartRate => "averageHeartRateInBPM",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What the parser does with a field that is not a valid number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Substitute zero and keep the row. Lossy.
    #[default]
    Lenient,
    /// Fail the whole batch on the first bad field.
    Strict,
}

impl FieldPolicy {
    pub fn name(self) -> &'static str {
        match self {
            FieldPolicy::Lenient => "lenient",
            FieldPolicy::Strict => "strict",
        }
    }
}

impl std::str::FromStr for FieldPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "lenient" | "legacy" | "zero" => Ok(FieldPolicy::Lenient),
            "strict" => Ok(FieldPolicy::Strict),
            other => Err(format!("unknown field policy {:?}", other)),
        }
    }
}

/// Population summary the classifier compares each record against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStats {
    pub count: usize,
    pub mean_pace_min_per_km: f64,
    pub mean_duration_seconds: f64,
    pub mean_distance_m: f64,
    pub max_elevation_gain_m: f64,
}
