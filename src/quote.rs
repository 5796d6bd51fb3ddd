//! Booking price quotation.
//!
//! Course prices are built up step by step from the hourly fee. The order of
//! the steps matters because flat surcharges and percentage factors are
//! interleaved. Tutor prices are a plain product of rate, hours and persons.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Course, CourseSelection, OrderOptions, Tutor};

const WEEKEND_FACTOR: f64 = 1.5;
const MORNING_HOURS: std::ops::Range<u32> = 9..12;
const MORNING_SURCHARGE: f64 = 400.0;
const EVENING_HOURS: std::ops::Range<u32> = 18..20;
const EVENING_SURCHARGE: f64 = 1000.0;
const SUPPLEMENTARY_PER_PERSON: f64 = 2000.0;
const PERSONALIZED_PER_WEEK: f64 = 1500.0;
const EXCURSIONS_FACTOR: f64 = 1.25;
const ASSESSMENT_FEE: f64 = 300.0;
const INTERACTIVE_FACTOR: f64 = 1.5;

const EARLY_REGISTRATION_DAYS: i64 = 30;
const EARLY_REGISTRATION_FACTOR: f64 = 0.9;
const GROUP_MIN_PERSONS: i64 = 5;
const GROUP_FACTOR: f64 = 0.85;
const INTENSIVE_MIN_WEEK_HOURS: i64 = 5;
const INTENSIVE_FACTOR: f64 = 1.2;

/// Automatic discounts and surcharges reported back with a course quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum Adjustment {
    EarlyRegistration,
    GroupEnrollment,
    IntensiveCourse,
}

impl Adjustment {
    pub fn description(self) -> &'static str {
        match self {
            Adjustment::EarlyRegistration => "Discount for early registration: 10%",
            Adjustment::GroupEnrollment => "Discount for group enrollment: 15%",
            Adjustment::IntensiveCourse => "Surcharge for intensive course: 20%",
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<Adjustment> for String {
    fn from(adj: Adjustment) -> Self {
        adj.description().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quotation {
    pub total: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Adjustment>,
}

impl Quotation {
    pub fn applied(&self, adjustment: Adjustment) -> bool {
        self.adjustments.contains(&adjustment)
    }

    /// Flags stored on the order: the automatic adjustments that applied
    /// plus the extras the student picked.
    pub fn order_options(&self, selection: &CourseSelection) -> OrderOptions {
        OrderOptions {
            early_registration: self.applied(Adjustment::EarlyRegistration),
            group_enrollment: self.applied(Adjustment::GroupEnrollment),
            intensive_course: self.applied(Adjustment::IntensiveCourse),
            supplementary: selection.extras.supplementary,
            personalized: selection.extras.personalized,
            excursions: selection.extras.excursions,
            assessment: selection.extras.assessment,
            interactive: selection.extras.interactive,
        }
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn time_of_day_surcharge(time: NaiveTime) -> f64 {
    let hour = time.hour();
    if MORNING_HOURS.contains(&hour) {
        MORNING_SURCHARGE
    } else if EVENING_HOURS.contains(&hour) {
        EVENING_SURCHARGE
    } else {
        0.0
    }
}

/// True when the course starts at least 30 days after `now`.
pub fn is_early_registration(date: NaiveDate, now: DateTime<Utc>) -> bool {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    start - now >= Duration::days(EARLY_REGISTRATION_DAYS)
}

/// Quote a course booking.
///
/// Missing date or time skips the checks that depend on them, which is what
/// a live preview needs. Submissions must check for both beforehand.
pub fn quote_course(
    course: &Course,
    selection: &CourseSelection,
    now: DateTime<Utc>,
) -> Result<Quotation, AppError> {
    let persons = selection.persons;
    if persons < 1 {
        return Err(AppError::validation("persons must be at least 1"));
    }

    let base = course
        .course_fee_per_hour
        .checked_mul(course.total_length)
        .and_then(|v| v.checked_mul(course.week_length))
        .ok_or_else(|| AppError::validation("price is out of range"))?;
    let mut total = base as f64;

    if selection.date_start.is_some_and(is_weekend) {
        total *= WEEKEND_FACTOR;
    }
    if let Some(time) = selection.time_start {
        total += time_of_day_surcharge(time);
    }
    total *= persons as f64;

    let extras = &selection.extras;
    if extras.supplementary {
        total += SUPPLEMENTARY_PER_PERSON * persons as f64;
    }
    if extras.personalized {
        total += PERSONALIZED_PER_WEEK * course.total_length as f64;
    }
    if extras.excursions {
        total *= EXCURSIONS_FACTOR;
    }
    if extras.assessment {
        total += ASSESSMENT_FEE;
    }
    if extras.interactive {
        total *= INTERACTIVE_FACTOR;
    }

    let mut adjustments = Vec::new();
    if selection
        .date_start
        .is_some_and(|date| is_early_registration(date, now))
    {
        total *= EARLY_REGISTRATION_FACTOR;
        adjustments.push(Adjustment::EarlyRegistration);
    }
    if persons >= GROUP_MIN_PERSONS {
        total *= GROUP_FACTOR;
        adjustments.push(Adjustment::GroupEnrollment);
    }
    if course.week_length >= INTENSIVE_MIN_WEEK_HOURS {
        total *= INTENSIVE_FACTOR;
        adjustments.push(Adjustment::IntensiveCourse);
    }

    Ok(Quotation {
        total: total.round() as i64,
        adjustments,
    })
}

pub fn quote_tutor(tutor: &Tutor, duration: i64, persons: i64) -> Result<Quotation, AppError> {
    if duration < 1 {
        return Err(AppError::validation("duration must be at least 1 hour"));
    }
    if persons < 1 {
        return Err(AppError::validation("persons must be at least 1"));
    }

    let total = tutor
        .price_per_hour
        .checked_mul(duration)
        .and_then(|v| v.checked_mul(persons))
        .ok_or_else(|| AppError::validation("price is out of range"))?;

    Ok(Quotation {
        total,
        adjustments: Vec::new(),
    })
}
