use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use super::Level;
use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub teacher: String,
    pub level: Level,
    /// Length of the course in weeks.
    pub total_length: i64,
    /// Hours per week.
    pub week_length: i64,
    #[serde(with = "wire::datetime_list", default)]
    pub start_dates: Vec<NaiveDateTime>,
    pub course_fee_per_hour: i64,
}

impl Course {
    /// `None` when the service reports a length that does not fit.
    pub fn total_hours(&self) -> Option<i64> {
        self.total_length.checked_mul(self.week_length)
    }

    /// Unique start days in the order the service lists them.
    pub fn start_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = Vec::new();
        for slot in &self.start_dates {
            let day = slot.date();
            if !days.contains(&day) {
                days.push(day);
            }
        }
        days
    }

    pub fn start_times(&self, day: NaiveDate) -> Vec<NaiveTime> {
        let mut times: Vec<NaiveTime> = Vec::new();
        for slot in self.start_dates.iter().filter(|s| s.date() == day) {
            let time = slot.time();
            if !times.contains(&time) {
                times.push(time);
            }
        }
        times
    }

    pub fn end_date(&self, start: NaiveDate) -> Option<NaiveDate> {
        let span = self.total_length.checked_mul(7).and_then(TimeDelta::try_days)?;
        start.checked_add_signed(span)
    }

    pub fn offers_slot(&self, day: NaiveDate, time: NaiveTime) -> bool {
        self.start_dates
            .iter()
            .any(|s| s.date() == day && s.hour() == time.hour() && s.minute() == time.minute())
    }
}

/// Paid extras a student can pick for a course booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseExtras {
    pub supplementary: bool,
    pub personalized: bool,
    pub excursions: bool,
    pub assessment: bool,
    pub interactive: bool,
}

/// What a visitor has picked so far for a course: used both for live
/// quotation previews and for the final booking submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSelection {
    pub course_id: i64,
    #[serde(default, with = "wire::date_opt")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, with = "wire::hhmm_opt")]
    pub time_start: Option<NaiveTime>,
    #[serde(default = "default_persons")]
    pub persons: i64,
    #[serde(flatten)]
    pub extras: CourseExtras,
}

fn default_persons() -> i64 {
    1
}
