// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
        .and_utc()
}

#[test]
fn default_is_daily_at_midnight() {
    assert_eq!(Schedule::default(), Schedule::Daily(NaiveTime::MIN));
}

#[test]
fn every_adds_interval() {
    let schedule = Schedule::hourly();
    let now = at(2026, 10, 16, 9, 30, 0);
    assert_eq!(schedule.next_after(now), at(2026, 10, 16, 10, 30, 0));
    assert_eq!(schedule.delay_after(now), Duration::from_secs(3600));
}

#[test]
fn daily_fires_later_today_when_time_not_reached() {
    let schedule = Schedule::Daily(NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    let now = at(2026, 10, 16, 9, 0, 0);
    assert_eq!(schedule.next_after(now), at(2026, 10, 16, 18, 0, 0));
}

#[test]
fn daily_rolls_to_tomorrow_when_time_passed() {
    let schedule = Schedule::midnight();
    let now = at(2026, 10, 16, 9, 0, 0);
    assert_eq!(schedule.next_after(now), at(2026, 10, 17, 0, 0, 0));
}

#[test]
fn daily_exactly_at_fire_time_waits_a_full_day() {
    let schedule = Schedule::midnight();
    let now = at(2026, 10, 17, 0, 0, 0);
    assert_eq!(schedule.next_after(now), at(2026, 10, 18, 0, 0, 0));
}

#[test]
fn zero_interval_is_invalid() {
    assert_eq!(
        Schedule::Every(Duration::ZERO).validate(),
        Err(ScheduleError::ZeroInterval)
    );
    assert_eq!(Schedule::hourly().validate(), Ok(()));
}

#[test]
fn parses_from_toml_shapes() {
    #[derive(Deserialize)]
    struct Wrapper {
        schedule: Schedule,
    }

    let every: Wrapper = toml::from_str(r#"schedule = { every = "15m" }"#).unwrap();
    assert_eq!(every.schedule, Schedule::Every(Duration::from_secs(900)));

    let daily: Wrapper = toml::from_str(r#"schedule = { daily = "02:30:00" }"#).unwrap();
    assert_eq!(
        daily.schedule,
        Schedule::Daily(NaiveTime::from_hms_opt(2, 30, 0).unwrap())
    );
}

#[test]
fn display_is_human_readable() {
    assert_eq!(Schedule::hourly().to_string(), "every 1h");
    assert_eq!(Schedule::midnight().to_string(), "daily at 00:00:00 UTC");
}
