// Re-check scheduling from the current stamina level.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

/// Which side of the threshold a sampled character is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Stamina is already at or above the threshold.
    AlreadyReached,
    /// The threshold will be crossed before the next top of the hour.
    ReachesThisHour,
    NotYetClose,
}

impl ScheduleOutcome {
    /// Outcomes that produce a notification.
    pub fn is_notable(self) -> bool {
        !matches!(self, Self::NotYetClose)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prediction {
    pub outcome: ScheduleOutcome,
    pub next_check: DateTime<Utc>,
    pub threshold_reached_at: Option<DateTime<Utc>>,
}

/// Milliseconds left until the next top of the hour in `now`'s time zone.
pub fn millis_until_next_hour<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let start_of_hour = now
        .clone()
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0));
    match start_of_hour {
        Some(start) => (start + Duration::hours(1) - now.clone()).num_milliseconds(),
        // ambiguous local time around a DST switch
        None => 0,
    }
}

/// Predict when a character should be sampled again.
///
/// `regen_per_unit` is the time needed to regenerate one stamina point.
pub fn predict<Tz: TimeZone>(
    now: &DateTime<Tz>,
    stamina: u8,
    threshold: u8,
    regen_per_unit: Duration,
) -> Prediction {
    let now_utc = now.with_timezone(&Utc);
    let after = |units: u32| now_utc + regen_per_unit * units as i32;
    let regen_millis = regen_per_unit.num_milliseconds().max(1);
    let gain_this_hour = millis_until_next_hour(now) / regen_millis;
    let stamina = u32::from(stamina);
    let threshold = u32::from(threshold);

    if stamina >= threshold {
        return Prediction {
            outcome: ScheduleOutcome::AlreadyReached,
            next_check: after(threshold),
            threshold_reached_at: None,
        };
    }

    let remaining = threshold - stamina;
    if i64::from(stamina) + gain_this_hour >= i64::from(threshold) {
        Prediction {
            outcome: ScheduleOutcome::ReachesThisHour,
            next_check: after(remaining + threshold),
            threshold_reached_at: Some(after(remaining)),
        }
    } else {
        Prediction {
            outcome: ScheduleOutcome::NotYetClose,
            next_check: after(remaining),
            threshold_reached_at: None,
        }
    }
}
