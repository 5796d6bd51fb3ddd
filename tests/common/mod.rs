#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tutorbook::config::AppConfig;
use tutorbook::gateway::MemoryGateway;
use tutorbook::models::{Course, Level, Tutor};
use tutorbook::state::AppState;

pub fn slot(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("bad slot literal")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("bad date literal")
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("bad time literal")
}

/// Monday 2025-03-03, noon UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 12, 0, 0).unwrap()
}

pub fn courses() -> Vec<Course> {
    vec![
        Course {
            id: 1,
            name: "English for Travel".to_string(),
            description: "Everyday phrases for trips abroad".to_string(),
            teacher: "Olga Petrova".to_string(),
            level: Level::Beginner,
            total_length: 4,
            week_length: 3,
            start_dates: vec![
                slot("2025-03-12T14:00:00"),
                slot("2025-03-15T09:00:00"),
                slot("2025-04-09T14:00:00"),
            ],
            course_fee_per_hour: 100,
        },
        Course {
            id: 2,
            name: "Intensive German".to_string(),
            description: "Five hours a week".to_string(),
            teacher: "Klaus Weber".to_string(),
            level: Level::Advanced,
            total_length: 2,
            week_length: 5,
            start_dates: vec![slot("2025-03-12T18:00:00")],
            course_fee_per_hour: 200,
        },
    ]
}

pub fn tutors() -> Vec<Tutor> {
    vec![
        Tutor {
            id: 1,
            name: "Anna".to_string(),
            work_experience: 6,
            languages_spoken: vec!["Russian".to_string(), "English".to_string()],
            languages_offered: vec!["English".to_string(), "German".to_string()],
            language_level: Level::Advanced,
            price_per_hour: 500,
        },
        Tutor {
            id: 2,
            name: "Boris".to_string(),
            work_experience: 2,
            languages_spoken: vec!["Russian".to_string(), "French".to_string()],
            languages_offered: vec!["French".to_string()],
            language_level: Level::Beginner,
            price_per_hour: 700,
        },
    ]
}

pub fn gateway() -> Arc<MemoryGateway> {
    Arc::new(MemoryGateway::new(courses(), tutors()))
}

/// App state over an in-memory gateway with the snapshot already loaded.
pub async fn loaded_state(gateway: Arc<MemoryGateway>, config: AppConfig) -> AppState {
    let state = AppState::new(gateway, config);
    state
        .refresh_service()
        .refresh_all()
        .await
        .expect("initial refresh");
    state
}
