use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// Defines when the snapshot job should run. All times are UTC.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Run repeatedly with a fixed interval in seconds.
    Interval { every_secs: u64 },

    /// Run every day at the given hour and minute.
    Daily { hour: u8, minute: u8 },

    /// Run at HH:MM on days of month where `(day - 1) % every_days == 0`
    /// (cron `*/N` day-of-month semantics).
    EveryNDays {
        every_days: u8,
        hour: u8,
        minute: u8,
    },
}

impl Schedule {
    /// Reject definitions the recurrence math cannot honor.
    pub fn validate(&self) -> Result<()> {
        let check_time = |hour: u8, minute: u8| -> Result<()> {
            if hour > 23 {
                return Err(SchedulerError::InvalidSchedule(format!(
                    "hour {hour} out of range 0-23"
                )));
            }
            if minute > 59 {
                return Err(SchedulerError::InvalidSchedule(format!(
                    "minute {minute} out of range 0-59"
                )));
            }
            Ok(())
        };

        match *self {
            Schedule::Interval { every_secs } => {
                if every_secs == 0 {
                    return Err(SchedulerError::InvalidSchedule(
                        "interval of 0 seconds".to_string(),
                    ));
                }
                Ok(())
            }
            Schedule::Daily { hour, minute } => check_time(hour, minute),
            Schedule::EveryNDays {
                every_days,
                hour,
                minute,
            } => {
                if every_days == 0 {
                    return Err(SchedulerError::InvalidSchedule(
                        "every_days must be at least 1".to_string(),
                    ));
                }
                check_time(hour, minute)
            }
        }
    }
}

/// One fired occurrence, forwarded from the engine to the job consumer.
#[derive(Debug, Clone)]
pub struct Trigger {
    /// The instant the schedule aimed for.
    pub scheduled_for: DateTime<Utc>,
    /// When the engine actually fired (within one poll tick of the target).
    pub fired_at: DateTime<Utc>,
}
