//! Rule-based sleep advice
//!
//! Advice is a fixed rule table evaluated in a fixed order: quality rules,
//! then duration rules, then bedtime rules. Every applicable rule fires.
//! Each item is a structured [`Advice`] value (category, polarity and a
//! parameterised [`AdviceKind`]) so presentation layers can restyle or
//! localise without re-deriving the rules. [`AdviceKind`]'s `Display` gives
//! the default English wording.
//!
//! The weekly trend variant aggregates a window of records supplied by the
//! caller; choosing the window is the caller's concern.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CalculationError, ValidationError};
use crate::models::{SleepQuality, SleepRecord};
use crate::stats::window_stats;

/// Highest quality rating treated as poor sleep
pub const LOW_QUALITY_MAX: u8 = 2;
/// Quality rating treated as ordinary sleep
pub const NORMAL_QUALITY: u8 = 3;

/// Nights shorter than this many hours are flagged as insufficient
pub const SHORT_SLEEP_HOURS: f64 = 6.0;
/// Nights longer than this many hours are flagged as oversleeping
pub const LONG_SLEEP_HOURS: f64 = 9.0;

/// Bedtime hours above this (extended past-midnight scale) are late
pub const LATE_BEDTIME_AFTER: u32 = 24;
/// Bedtime hours below this (early morning) are late
pub const EARLY_MORNING_BEFORE: u32 = 6;
/// First hour of the ideal bedtime band
pub const IDEAL_BEDTIME_FROM: u32 = 22;
/// Last hour of the ideal bedtime band (inclusive)
pub const IDEAL_BEDTIME_TO: u32 = 23;

/// Recommended nightly sleep range in hours
pub const RECOMMENDED_HOURS: (u8, u8) = (7, 9);

/// Weekly mean quality below this is a warning
pub const TREND_LOW_QUALITY: f64 = 3.0;
/// Weekly mean quality at or above this is praised
pub const TREND_GOOD_QUALITY: f64 = 4.0;
/// Weekly mean duration below this is a warning
pub const TREND_SHORT_HOURS: f64 = 7.0;
/// Weekly mean duration at or below this (and not short) is praised
pub const TREND_LONG_HOURS: f64 = 9.0;
/// Bedtime hour variance above this is inconsistent
pub const BEDTIME_VARIANCE_LIMIT: f64 = 2.0;

/// Aspect of sleep an advice item is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdviceCategory {
    Quality,
    Duration,
    Bedtime,
    Consistency,
}

/// Tone of an advice item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Reinforcement, nothing to change
    Positive,
    /// Suggestion or tip
    Neutral,
    /// Something to correct
    Warning,
}

/// Message template with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdviceKind {
    LowQuality,
    ScreenTimeCutoff { minutes_before_bed: u32 },
    BedroomTemperature { min_celsius: u8, max_celsius: u8 },
    CaffeineCutoff { after_hour: u32 },
    StretchingOrMeditation,
    NormalQuality,
    RegularSchedule,
    WindDownTime,
    GoodQuality,
    InsufficientSleep { min_hours: u8, max_hours: u8 },
    Oversleeping,
    LateBedtime { target_from: u32, target_to: u32 },
    IdealBedtime,
    WeeklyQualityLow { mean: f64 },
    WeeklyQualityGood { mean: f64 },
    WeeklyDurationShort { mean_hours: f64 },
    WeeklyDurationHealthy { mean_hours: f64 },
    BedtimeInconsistent { variance: f64 },
    BedtimeConsistent { variance: Option<f64> },
}

impl AdviceKind {
    /// True for the bullet tips that follow a quality header
    pub fn is_tip(&self) -> bool {
        matches!(
            self,
            AdviceKind::ScreenTimeCutoff { .. }
                | AdviceKind::BedroomTemperature { .. }
                | AdviceKind::CaffeineCutoff { .. }
                | AdviceKind::StretchingOrMeditation
                | AdviceKind::RegularSchedule
                | AdviceKind::WindDownTime
        )
    }
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdviceKind::LowQuality => {
                write!(f, "Your sleep quality looks low. Try these improvements:")
            }
            AdviceKind::ScreenTimeCutoff { minutes_before_bed } => write!(
                f,
                "Avoid smartphones and computers for {} minutes before bed",
                minutes_before_bed
            ),
            AdviceKind::BedroomTemperature {
                min_celsius,
                max_celsius,
            } => write!(
                f,
                "Keep the bedroom between {}-{}°C",
                min_celsius, max_celsius
            ),
            AdviceKind::CaffeineCutoff { after_hour } => {
                write!(f, "Avoid caffeine after {}:00", after_hour)
            }
            AdviceKind::StretchingOrMeditation => {
                write!(f, "Add light stretching or meditation to your evening")
            }
            AdviceKind::NormalQuality => {
                write!(f, "Your sleep quality is average. To improve further:")
            }
            AdviceKind::RegularSchedule => {
                write!(f, "Keep regular bedtimes and wake-up times")
            }
            AdviceKind::WindDownTime => write!(f, "Set aside time to relax before sleep"),
            AdviceKind::GoodQuality => {
                write!(f, "You are sleeping well! Keep it up")
            }
            AdviceKind::InsufficientSleep {
                min_hours,
                max_hours,
            } => write!(
                f,
                "You are not getting enough sleep. Aim for {}-{} hours",
                min_hours, max_hours
            ),
            AdviceKind::Oversleeping => write!(
                f,
                "You may be sleeping too long. Aim for a moderate amount of sleep"
            ),
            AdviceKind::LateBedtime {
                target_from,
                target_to,
            } => write!(
                f,
                "Your bedtime is late. Aim to go to bed around {}:00-{}:00",
                target_from, target_to
            ),
            AdviceKind::IdealBedtime => write!(f, "Ideal bedtime!"),
            AdviceKind::WeeklyQualityLow { .. } => write!(
                f,
                "Your sleep quality dropped this week. Review your daily habits"
            ),
            AdviceKind::WeeklyQualityGood { .. } => {
                write!(f, "You slept well all week!")
            }
            AdviceKind::WeeklyDurationShort { .. } => write!(
                f,
                "You have been short on sleep this week. Try going to bed earlier"
            ),
            AdviceKind::WeeklyDurationHealthy { .. } => {
                write!(f, "You are keeping a healthy amount of sleep!")
            }
            AdviceKind::BedtimeInconsistent { .. } => write!(
                f,
                "Your bedtime varies a lot. Try to keep a regular rhythm"
            ),
            AdviceKind::BedtimeConsistent { .. } => {
                write!(f, "You are keeping a regular bedtime!")
            }
        }
    }
}

/// One piece of advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub category: AdviceCategory,
    pub polarity: Polarity,
    #[serde(flatten)]
    pub kind: AdviceKind,
}

impl Advice {
    fn new(category: AdviceCategory, polarity: Polarity, kind: AdviceKind) -> Self {
        Advice {
            category,
            polarity,
            kind,
        }
    }

    /// Default English wording
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Advice for a single night
///
/// `bedtime_hour` is an hour of day; values above 24 denote past-midnight
/// bedtimes counted from the previous evening.
pub fn advise_for_record(
    quality: SleepQuality,
    duration_hours: f64,
    bedtime_hour: u32,
) -> Vec<Advice> {
    let mut advice = Vec::new();

    quality_advice(quality, &mut advice);
    duration_advice(duration_hours, &mut advice);
    bedtime_advice(bedtime_hour, &mut advice);

    advice
}

/// Advice for a stored record, using its wall-clock bedtime hour
pub fn advise_for(record: &SleepRecord) -> Vec<Advice> {
    advise_for_record(
        record.sleep_quality,
        record.sleep_duration_hours,
        record.bedtime_hour(),
    )
}

/// Validate raw inputs, then advise
pub fn checked_advice(
    quality: i64,
    duration_hours: f64,
    bedtime_hour: u32,
) -> Result<Vec<Advice>, ValidationError> {
    let quality = SleepQuality::new(quality)?;
    if duration_hours.is_nan() || duration_hours < 0.0 {
        return Err(ValidationError::NegativeDuration {
            hours: duration_hours,
        });
    }
    Ok(advise_for_record(quality, duration_hours, bedtime_hour))
}

fn quality_advice(quality: SleepQuality, advice: &mut Vec<Advice>) {
    use AdviceCategory::Quality;

    let q = quality.value();
    if q <= LOW_QUALITY_MAX {
        advice.push(Advice::new(Quality, Polarity::Warning, AdviceKind::LowQuality));
        for tip in [
            AdviceKind::ScreenTimeCutoff {
                minutes_before_bed: 60,
            },
            AdviceKind::BedroomTemperature {
                min_celsius: 18,
                max_celsius: 22,
            },
            AdviceKind::CaffeineCutoff { after_hour: 14 },
            AdviceKind::StretchingOrMeditation,
        ] {
            advice.push(Advice::new(Quality, Polarity::Neutral, tip));
        }
    } else if q == NORMAL_QUALITY {
        advice.push(Advice::new(Quality, Polarity::Neutral, AdviceKind::NormalQuality));
        advice.push(Advice::new(Quality, Polarity::Neutral, AdviceKind::RegularSchedule));
        advice.push(Advice::new(Quality, Polarity::Neutral, AdviceKind::WindDownTime));
    } else {
        advice.push(Advice::new(Quality, Polarity::Positive, AdviceKind::GoodQuality));
    }
}

fn duration_advice(duration_hours: f64, advice: &mut Vec<Advice>) {
    if duration_hours < SHORT_SLEEP_HOURS {
        advice.push(Advice::new(
            AdviceCategory::Duration,
            Polarity::Warning,
            AdviceKind::InsufficientSleep {
                min_hours: RECOMMENDED_HOURS.0,
                max_hours: RECOMMENDED_HOURS.1,
            },
        ));
    } else if duration_hours > LONG_SLEEP_HOURS {
        advice.push(Advice::new(
            AdviceCategory::Duration,
            Polarity::Warning,
            AdviceKind::Oversleeping,
        ));
    }
}

// Hour 24 and 6..=21 fall in neither band and produce nothing.
fn bedtime_advice(bedtime_hour: u32, advice: &mut Vec<Advice>) {
    if bedtime_hour > LATE_BEDTIME_AFTER || bedtime_hour < EARLY_MORNING_BEFORE {
        advice.push(Advice::new(
            AdviceCategory::Bedtime,
            Polarity::Warning,
            AdviceKind::LateBedtime {
                target_from: IDEAL_BEDTIME_FROM,
                target_to: IDEAL_BEDTIME_TO,
            },
        ));
    } else if (IDEAL_BEDTIME_FROM..=IDEAL_BEDTIME_TO).contains(&bedtime_hour) {
        advice.push(Advice::new(
            AdviceCategory::Bedtime,
            Polarity::Positive,
            AdviceKind::IdealBedtime,
        ));
    }
}

/// Trend advice over a window of recent records
///
/// The window must be non-empty. Returns quality, then duration, then
/// bedtime consistency items.
pub fn advise_for_trend(recent: &[SleepRecord]) -> Result<Vec<Advice>, CalculationError> {
    let stats = window_stats(recent)?;
    let mut advice = Vec::new();

    if stats.mean_quality < TREND_LOW_QUALITY {
        advice.push(Advice::new(
            AdviceCategory::Quality,
            Polarity::Warning,
            AdviceKind::WeeklyQualityLow {
                mean: stats.mean_quality,
            },
        ));
    } else if stats.mean_quality >= TREND_GOOD_QUALITY {
        advice.push(Advice::new(
            AdviceCategory::Quality,
            Polarity::Positive,
            AdviceKind::WeeklyQualityGood {
                mean: stats.mean_quality,
            },
        ));
    }

    if stats.mean_duration_hours < TREND_SHORT_HOURS {
        advice.push(Advice::new(
            AdviceCategory::Duration,
            Polarity::Warning,
            AdviceKind::WeeklyDurationShort {
                mean_hours: stats.mean_duration_hours,
            },
        ));
    } else if stats.mean_duration_hours <= TREND_LONG_HOURS {
        advice.push(Advice::new(
            AdviceCategory::Duration,
            Polarity::Positive,
            AdviceKind::WeeklyDurationHealthy {
                mean_hours: stats.mean_duration_hours,
            },
        ));
    }

    // An undefined variance (single record) counts as consistent
    match stats.bedtime_hour_variance {
        Some(variance) if variance > BEDTIME_VARIANCE_LIMIT => advice.push(Advice::new(
            AdviceCategory::Consistency,
            Polarity::Warning,
            AdviceKind::BedtimeInconsistent { variance },
        )),
        variance => advice.push(Advice::new(
            AdviceCategory::Consistency,
            Polarity::Positive,
            AdviceKind::BedtimeConsistent { variance },
        )),
    }

    tracing::debug!(
        window = recent.len(),
        mean_quality = stats.mean_quality,
        mean_duration = stats.mean_duration_hours,
        items = advice.len(),
        "Trend advice evaluated"
    );

    Ok(advice)
}
