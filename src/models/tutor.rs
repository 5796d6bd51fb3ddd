use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::Level;
use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tutor {
    pub id: i64,
    pub name: String,
    /// Years of teaching experience.
    #[serde(default)]
    pub work_experience: i64,
    #[serde(default)]
    pub languages_spoken: Vec<String>,
    #[serde(default)]
    pub languages_offered: Vec<String>,
    pub language_level: Level,
    pub price_per_hour: i64,
}

impl Tutor {
    pub fn offers(&self, language: &str) -> bool {
        self.languages_offered.iter().any(|l| l == language)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorSelection {
    pub tutor_id: i64,
    #[serde(default, with = "wire::date_opt")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, with = "wire::hhmm_opt")]
    pub time_start: Option<NaiveTime>,
    #[serde(default = "one")]
    pub duration: i64,
    #[serde(default = "one")]
    pub persons: i64,
}

fn one() -> i64 {
    1
}
