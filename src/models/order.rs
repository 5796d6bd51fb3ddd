use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::wire;
use crate::error::AppError;
use crate::quote::Adjustment;

/// Written into whichever of `course_id` / `tutor_id` does not apply.
pub const NOT_APPLICABLE: i64 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderOptions {
    pub early_registration: bool,
    pub group_enrollment: bool,
    pub intensive_course: bool,
    pub supplementary: bool,
    pub personalized: bool,
    pub excursions: bool,
    pub assessment: bool,
    pub interactive: bool,
}

impl OrderOptions {
    /// One line per set flag, in display order.
    pub fn descriptions(&self) -> Vec<&'static str> {
        [
            (self.early_registration, Adjustment::EarlyRegistration.description()),
            (self.group_enrollment, Adjustment::GroupEnrollment.description()),
            (self.intensive_course, Adjustment::IntensiveCourse.description()),
            (self.supplementary, "Supplementary materials: +2000 per student"),
            (self.personalized, "Personalized lessons: +1500 per week"),
            (self.excursions, "Cultural excursions: +25%"),
            (self.assessment, "Level assessment: +300"),
            (self.interactive, "Interactive platform: +50%"),
        ]
        .into_iter()
        .filter_map(|(set, text)| set.then_some(text))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    #[serde(default)]
    pub course_id: i64,
    #[serde(default)]
    pub tutor_id: i64,
    pub date_start: NaiveDate,
    #[serde(with = "wire::hhmm")]
    pub time_start: NaiveTime,
    pub duration: i64,
    pub persons: i64,
    pub price: i64,
    #[serde(flatten)]
    pub options: OrderOptions,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderTarget {
    Course(i64),
    Tutor(i64),
    Unassigned,
}

impl Order {
    pub fn target(&self) -> OrderTarget {
        if self.course_id > NOT_APPLICABLE {
            OrderTarget::Course(self.course_id)
        } else if self.tutor_id > NOT_APPLICABLE {
            OrderTarget::Tutor(self.tutor_id)
        } else {
            OrderTarget::Unassigned
        }
    }
}

/// Body of a create call. Built only through the two constructors so that
/// exactly one of the offering ids is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub course_id: i64,
    pub tutor_id: i64,
    pub date_start: NaiveDate,
    #[serde(with = "wire::hhmm")]
    pub time_start: NaiveTime,
    pub duration: i64,
    pub persons: i64,
    pub price: i64,
    #[serde(flatten)]
    pub options: OrderOptions,
}

impl OrderDraft {
    pub fn for_course(
        course_id: i64,
        date_start: NaiveDate,
        time_start: NaiveTime,
        duration: i64,
        persons: i64,
        price: i64,
        options: OrderOptions,
    ) -> Self {
        Self {
            course_id,
            tutor_id: NOT_APPLICABLE,
            date_start,
            time_start,
            duration,
            persons,
            price,
            options,
        }
    }

    pub fn for_tutor(
        tutor_id: i64,
        date_start: NaiveDate,
        time_start: NaiveTime,
        duration: i64,
        persons: i64,
        price: i64,
    ) -> Self {
        Self {
            course_id: NOT_APPLICABLE,
            tutor_id,
            date_start,
            time_start,
            duration,
            persons,
            price,
            options: OrderOptions::default(),
        }
    }
}

/// Edit form as submitted. Every field is required; see [`UpdateOrderRequest::validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default, with = "wire::date_opt")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, with = "wire::hhmm_opt")]
    pub time_start: Option<NaiveTime>,
    #[serde(default)]
    pub persons: Option<i64>,
    #[serde(default)]
    pub duration: Option<i64>,
}

impl UpdateOrderRequest {
    pub fn validate(&self) -> Result<OrderPatch, AppError> {
        let (Some(date_start), Some(time_start), Some(persons), Some(duration)) =
            (self.date_start, self.time_start, self.persons, self.duration)
        else {
            return Err(AppError::validation("Fill in all fields"));
        };
        if persons < 1 {
            return Err(AppError::validation("persons must be at least 1"));
        }
        if duration < 1 {
            return Err(AppError::validation("duration must be at least 1"));
        }
        Ok(OrderPatch {
            date_start,
            time_start,
            persons,
            duration,
            price: None,
        })
    }
}

/// Body of an update call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
    pub date_start: NaiveDate,
    #[serde(with = "wire::hhmm")]
    pub time_start: NaiveTime,
    pub persons: i64,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Upcoming,
    Today,
    Completed,
}

impl OrderStatus {
    pub fn on(date_start: NaiveDate, today: NaiveDate) -> Self {
        if date_start > today {
            OrderStatus::Upcoming
        } else if date_start == today {
            OrderStatus::Today
        } else {
            OrderStatus::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tutor_draft_marks_course_not_applicable() {
        let draft = OrderDraft::for_tutor(
            7,
            date(2025, 6, 2),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            2,
            3,
            3000,
        );
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["course_id"], 0);
        assert_eq!(json["tutor_id"], 7);
        assert_eq!(json["time_start"], "10:00");
        assert_eq!(json["interactive"], false);
    }

    #[test]
    fn order_from_service_json() {
        let order: Order = serde_json::from_str(
            r#"{
                "id": 12, "course_id": 0, "tutor_id": 4,
                "date_start": "2025-06-02", "time_start": "10:00:00",
                "duration": 2, "persons": 1, "price": 1000,
                "early_registration": false, "supplementary": true,
                "created_at": "2025-05-01T12:00:00"
            }"#,
        )
        .unwrap();
        assert_eq!(order.target(), OrderTarget::Tutor(4));
        assert!(order.options.supplementary);
        assert!(!order.options.assessment);
    }

    #[test]
    fn status_relative_to_today() {
        let today = date(2025, 6, 2);
        assert_eq!(OrderStatus::on(date(2025, 6, 3), today), OrderStatus::Upcoming);
        assert_eq!(OrderStatus::on(today, today), OrderStatus::Today);
        assert_eq!(OrderStatus::on(date(2025, 6, 1), today), OrderStatus::Completed);
    }

    #[test]
    fn update_requires_every_field() {
        let partial = UpdateOrderRequest {
            date_start: Some(date(2025, 6, 2)),
            persons: Some(2),
            duration: Some(3),
            ..Default::default()
        };
        assert!(matches!(partial.validate(), Err(AppError::Validation(_))));

        let zero = UpdateOrderRequest {
            time_start: NaiveTime::from_hms_opt(9, 0, 0),
            persons: Some(0),
            ..partial.clone()
        };
        assert!(matches!(zero.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn option_descriptions_follow_display_order() {
        let options = OrderOptions {
            interactive: true,
            early_registration: true,
            ..Default::default()
        };
        assert_eq!(
            options.descriptions(),
            vec![
                "Discount for early registration: 10%",
                "Interactive platform: +50%"
            ]
        );
    }
}
