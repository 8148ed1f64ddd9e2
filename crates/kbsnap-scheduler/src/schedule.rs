use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

use crate::types::Schedule;

/// Compute the next UTC execution time for `schedule` strictly after `from`.
///
/// Returns `None` only for definitions that fail [`Schedule::validate`].
pub fn compute_next_run(schedule: &Schedule, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
    match *schedule {
        Schedule::Interval { every_secs } => {
            if every_secs == 0 {
                return None;
            }
            Some(from + Duration::seconds(every_secs as i64))
        }

        Schedule::Daily { hour, minute } => {
            // Build today's candidate at HH:MM:00.
            let candidate = at_time(from, hour, minute)?;
            if candidate > from {
                Some(candidate)
            } else {
                // Today's window has passed — advance to tomorrow.
                Some(candidate + Duration::days(1))
            }
        }

        Schedule::EveryNDays {
            every_days,
            hour,
            minute,
        } => {
            if every_days == 0 {
                return None;
            }
            // Walk forward day by day; cron */N day-of-month semantics reset
            // at each month, so two months is always enough to find a match.
            let mut day = from;
            for _ in 0..63 {
                if (day.day() - 1) % every_days as u32 == 0 {
                    let candidate = at_time(day, hour, minute)?;
                    if candidate > from {
                        return Some(candidate);
                    }
                }
                day += Duration::days(1);
            }
            None
        }
    }
}

fn at_time(day: DateTime<Utc>, hour: u8, minute: u8) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(
        day.year(),
        day.month(),
        day.day(),
        hour as u32,
        minute as u32,
        0,
    )
    .single()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn interval_adds_seconds() {
        let from = utc(2024, 6, 10, 12, 0);
        let next = compute_next_run(&Schedule::Interval { every_secs: 90 }, from).unwrap();
        assert_eq!(next, from + Duration::seconds(90));
    }

    #[test]
    fn daily_today_when_still_ahead() {
        let next = compute_next_run(
            &Schedule::Daily { hour: 4, minute: 0 },
            utc(2024, 6, 10, 1, 30),
        )
        .unwrap();
        assert_eq!(next, utc(2024, 6, 10, 4, 0));
    }

    #[test]
    fn daily_tomorrow_when_passed() {
        let next = compute_next_run(
            &Schedule::Daily { hour: 4, minute: 0 },
            utc(2024, 6, 10, 4, 0),
        )
        .unwrap();
        assert_eq!(next, utc(2024, 6, 11, 4, 0));
    }

    const EVERY_3: Schedule = Schedule::EveryNDays {
        every_days: 3,
        hour: 4,
        minute: 0,
    };

    #[test]
    fn every_n_days_fires_same_day_before_strike() {
        // Day 10 qualifies: (10 - 1) % 3 == 0.
        let next = compute_next_run(&EVERY_3, utc(2024, 6, 10, 0, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 10, 4, 0));
    }

    #[test]
    fn every_n_days_skips_to_next_qualifying_day() {
        // 04:00 on day 10 already passed — next qualifying day is the 13th.
        let next = compute_next_run(&EVERY_3, utc(2024, 6, 10, 5, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 13, 4, 0));
    }

    #[test]
    fn every_n_days_non_qualifying_day() {
        // Day 11 does not qualify; the 13th is the next match.
        let next = compute_next_run(&EVERY_3, utc(2024, 6, 11, 12, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 13, 4, 0));
    }

    #[test]
    fn every_n_days_resets_at_month_boundary() {
        // June's last qualifying day (28th) has passed; cron resets on the 1st.
        let next = compute_next_run(&EVERY_3, utc(2024, 6, 30, 12, 0)).unwrap();
        assert_eq!(next, utc(2024, 7, 1, 4, 0));
    }

    #[test]
    fn every_n_days_back_to_back_over_31st() {
        // May 31 qualifies ((31-1) % 3 == 0) and so does June 1 — cron fires
        // on consecutive days across this boundary.
        let next = compute_next_run(&EVERY_3, utc(2024, 5, 31, 5, 0)).unwrap();
        assert_eq!(next, utc(2024, 6, 1, 4, 0));
    }

    #[test]
    fn every_n_days_strictly_after_from() {
        let strike = utc(2024, 6, 10, 4, 0);
        let next = compute_next_run(&EVERY_3, strike).unwrap();
        assert_eq!(next, utc(2024, 6, 13, 4, 0));
    }

    #[test]
    fn invalid_definitions_yield_none() {
        assert!(compute_next_run(&Schedule::Interval { every_secs: 0 }, Utc::now()).is_none());
        assert!(compute_next_run(
            &Schedule::EveryNDays {
                every_days: 0,
                hour: 4,
                minute: 0
            },
            Utc::now()
        )
        .is_none());
    }
}
