//! Forecast aggregation: day-bucketed summaries and hourly slices.
//!
//! The provider delivers a flat, chronological list of 3-hourly samples.
//! [`group_by_day`] rolls that list up into at most five daily summaries;
//! [`hourly_today`] and [`hourly_for_day`] slice out the samples belonging
//! to a single local calendar day.

use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;

use crate::model::ForecastSample;
use crate::timeutil;

/// Daily summaries are truncated to this many buckets (5-day forecast).
pub const FORECAST_DAYS: usize = 5;

/// Upper bound on the hourly-today slice.
pub const HOURLY_CAP: usize = 24;

/// Roll-up of all samples sharing one local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub day_name: String,
    pub high: i32,
    pub low: i32,
    pub icon: String,
    pub condition: String,
}

/// One forecast sample mapped for hourly display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySummary {
    pub time: String,
    pub hour: u32,
    pub temp: i32,
    pub icon: String,
    pub condition: String,
}

/// Group samples into daily summaries, in the observer's local calendar.
pub fn group_by_day(samples: &[ForecastSample]) -> Vec<DailySummary> {
    group_by_day_in(samples, &Local)
}

/// Buckets are keyed by local calendar date and kept in first-seen order,
/// matching the provider's chronological delivery. Each bucket reduces to
/// rounded min/max temperatures; the displayed icon and condition come from
/// the sample at the middle of the bucket's arrival order, a midday-ish
/// heuristic rather than a solar-noon lookup.
pub fn group_by_day_in<Tz>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailySummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut order: Vec<NaiveDate> = Vec::new();
    let mut buckets: HashMap<NaiveDate, Vec<&ForecastSample>> = HashMap::new();

    for sample in samples {
        let date = timeutil::local_date_in(sample.dt, tz);
        buckets
            .entry(date)
            .or_insert_with(|| {
                order.push(date);
                Vec::new()
            })
            .push(sample);
    }

    order
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|date| {
            let bucket = &buckets[&date];

            let mut high = f64::NEG_INFINITY;
            let mut low = f64::INFINITY;
            for sample in bucket {
                high = high.max(sample.temperature());
                low = low.min(sample.temperature());
            }

            // Buckets are non-empty by construction.
            let representative = bucket[bucket.len() / 2];

            DailySummary {
                date,
                day_name: timeutil::day_name_in(representative.dt, tz),
                high: high.round() as i32,
                low: low.round() as i32,
                icon: representative.icon_code().to_string(),
                condition: representative.condition_name().to_string(),
            }
        })
        .collect()
}

/// Samples falling on the current local calendar day, capped at 24 entries.
pub fn hourly_today(samples: &[ForecastSample]) -> Vec<HourlySummary> {
    hourly_today_in(samples, Utc::now().timestamp(), &Local)
}

pub fn hourly_today_in<Tz>(samples: &[ForecastSample], now_ts: i64, tz: &Tz) -> Vec<HourlySummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    samples
        .iter()
        .filter(|sample| timeutil::is_same_day_in(sample.dt, now_ts, tz))
        .take(HOURLY_CAP)
        .map(|sample| hourly_entry(sample, tz))
        .collect()
}

/// Samples sharing a calendar day with `reference_ts`, uncapped.
pub fn hourly_for_day(samples: &[ForecastSample], reference_ts: i64) -> Vec<HourlySummary> {
    hourly_for_day_in(samples, reference_ts, &Local)
}

pub fn hourly_for_day_in<Tz>(
    samples: &[ForecastSample],
    reference_ts: i64,
    tz: &Tz,
) -> Vec<HourlySummary>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    samples
        .iter()
        .filter(|sample| timeutil::is_same_day_in(sample.dt, reference_ts, tz))
        .map(|sample| hourly_entry(sample, tz))
        .collect()
}

fn hourly_entry<Tz>(sample: &ForecastSample, tz: &Tz) -> HourlySummary
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    HourlySummary {
        time: timeutil::time_of_day_in(sample.dt, tz),
        hour: timeutil::hour_of_day_in(sample.dt, tz),
        temp: sample.temperature().round() as i32,
        icon: sample.icon_code().to_string(),
        condition: sample.condition_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Measurements};
    use chrono::FixedOffset;

    // 2022-01-01 00:00:00 UTC.
    const DAY1: i64 = 1_640_995_200;
    const DAY2: i64 = DAY1 + 86_400;
    const HOUR: i64 = 3600;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("valid offset")
    }

    fn sample(dt: i64, temp: f64) -> ForecastSample {
        sample_with(dt, temp, "Clear", "01d")
    }

    fn sample_with(dt: i64, temp: f64, condition: &str, icon: &str) -> ForecastSample {
        ForecastSample {
            dt,
            main: Measurements { temp, feels_like: temp, humidity: 50, pressure: 1012.0 },
            weather: vec![Condition {
                id: 800,
                main: condition.to_string(),
                description: condition.to_lowercase(),
                icon: icon.to_string(),
            }],
        }
    }

    #[test]
    fn groups_two_days_with_min_max_reduction() {
        let samples = vec![
            sample(DAY1 + 9 * HOUR, 10.0),
            sample(DAY1 + 15 * HOUR, 20.0),
            sample(DAY2 + 9 * HOUR, 5.0),
        ];

        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].high, 20);
        assert_eq!(days[0].low, 10);
        assert_eq!(days[1].high, 5);
        assert_eq!(days[1].low, 5);
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert!(group_by_day_in(&[], &utc()).is_empty());
        assert!(hourly_today_in(&[], DAY1, &utc()).is_empty());
    }

    #[test]
    fn truncates_to_five_days() {
        let samples: Vec<_> = (0..8).map(|d| sample(DAY1 + d * 86_400, 10.0)).collect();
        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days.len(), FORECAST_DAYS);
    }

    #[test]
    fn preserves_first_seen_date_order() {
        // Out-of-order delivery: day2 first, then day1, then day2 again.
        let samples = vec![
            sample(DAY2 + 9 * HOUR, 5.0),
            sample(DAY1 + 9 * HOUR, 10.0),
            sample(DAY2 + 12 * HOUR, 7.0),
        ];

        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, timeutil::local_date_in(DAY2, &utc()));
        assert_eq!(days[0].high, 7);
        assert_eq!(days[0].low, 5);
        assert_eq!(days[1].date, timeutil::local_date_in(DAY1, &utc()));
    }

    #[test]
    fn single_sample_bucket_is_its_own_representative() {
        let samples = vec![sample_with(DAY1 + 9 * HOUR, 3.0, "Snow", "13d")];
        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days[0].condition, "Snow");
        assert_eq!(days[0].icon, "13d");
        assert_eq!(days[0].high, days[0].low);
    }

    #[test]
    fn representative_is_the_middle_sample_of_the_bucket() {
        let samples = vec![
            sample_with(DAY1 + 6 * HOUR, 4.0, "Fog", "50d"),
            sample_with(DAY1 + 12 * HOUR, 9.0, "Clouds", "03d"),
            sample_with(DAY1 + 18 * HOUR, 6.0, "Rain", "10d"),
        ];
        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days[0].condition, "Clouds");
        assert_eq!(days[0].icon, "03d");
        // Even-sized bucket picks the upper middle: floor(4 / 2) == index 2.
        let samples = vec![
            sample_with(DAY1 + 3 * HOUR, 1.0, "Fog", "50d"),
            sample_with(DAY1 + 9 * HOUR, 2.0, "Clouds", "03d"),
            sample_with(DAY1 + 15 * HOUR, 3.0, "Rain", "10d"),
            sample_with(DAY1 + 21 * HOUR, 4.0, "Snow", "13d"),
        ];
        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days[0].condition, "Rain");
    }

    #[test]
    fn low_never_exceeds_high() {
        let samples = vec![
            sample(DAY1 + HOUR, -3.4),
            sample(DAY1 + 2 * HOUR, -7.8),
            sample(DAY1 + 3 * HOUR, 1.2),
            sample(DAY2 + HOUR, 0.0),
        ];
        for day in group_by_day_in(&samples, &utc()) {
            assert!(day.low <= day.high);
        }
    }

    #[test]
    fn temperatures_are_rounded_to_nearest_integer() {
        let samples = vec![sample(DAY1 + HOUR, 10.6), sample(DAY1 + 2 * HOUR, 3.4)];
        let days = group_by_day_in(&samples, &utc());
        assert_eq!(days[0].high, 11);
        assert_eq!(days[0].low, 3);
    }

    #[test]
    fn grouping_key_is_the_local_date_not_the_utc_date() {
        // 23:00 and 23:30 UTC sit on the next calendar day at +02:00, in the
        // same bucket as a sample from 01:00 the next UTC day.
        let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");
        let samples = vec![
            sample(DAY1 + 23 * HOUR, 2.0),
            sample(DAY1 + 23 * HOUR + 1800, 4.0),
            sample(DAY2 + HOUR, 6.0),
        ];

        assert_eq!(group_by_day_in(&samples, &plus_two).len(), 1);
        assert_eq!(group_by_day_in(&samples, &utc()).len(), 2);
    }

    #[test]
    fn hourly_slice_filters_to_the_reference_day_in_order() {
        let samples = vec![
            sample(DAY1 + 6 * HOUR, 5.2),
            sample(DAY2 + 9 * HOUR, 7.0),
            sample(DAY1 + 12 * HOUR, 9.8),
        ];

        let hours = hourly_today_in(&samples, DAY1 + 10 * HOUR, &utc());
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].hour, 6);
        assert_eq!(hours[0].temp, 5);
        assert_eq!(hours[1].hour, 12);
        assert_eq!(hours[1].temp, 10);
        assert_eq!(hours[0].time, "06:00");
    }

    #[test]
    fn hourly_today_caps_at_twenty_four() {
        // Half-hourly samples: 48 fall on the reference day.
        let samples: Vec<_> = (0..48).map(|i| sample(DAY1 + i * 1800, 10.0)).collect();
        let hours = hourly_today_in(&samples, DAY1, &utc());
        assert_eq!(hours.len(), HOURLY_CAP);
    }

    #[test]
    fn hourly_for_day_is_uncapped() {
        let samples: Vec<_> = (0..48).map(|i| sample(DAY1 + i * 1800, 10.0)).collect();
        let hours = hourly_for_day_in(&samples, DAY1 + 5 * HOUR, &utc());
        assert_eq!(hours.len(), 48);
    }

    #[test]
    fn hourly_entry_carries_condition_and_icon() {
        let samples = vec![sample_with(DAY1 + 14 * HOUR, 11.0, "Rain", "10d")];
        let hours = hourly_for_day_in(&samples, DAY1, &utc());
        assert_eq!(hours[0].condition, "Rain");
        assert_eq!(hours[0].icon, "10d");
        assert_eq!(hours[0].time, "14:00");
    }
}
