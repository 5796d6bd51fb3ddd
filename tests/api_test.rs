mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Datelike, Duration, Local, NaiveDate, Weekday};
use serde_json::{Value, json};
use tower::ServiceExt;
use tutorbook::api::router;
use tutorbook::config::AppConfig;
use tutorbook::models::{Course, Level};

async fn app() -> Router {
    router(common::loaded_state(common::gateway(), AppConfig::default()).await)
}

async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn ids(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn health_reports_snapshot_sizes() {
    let (status, body) = call(app().await, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "courses": 2, "tutors": 2, "orders": 0 }));
}

#[tokio::test]
async fn courses_are_filtered_and_paged() {
    let (status, body) = call(app().await, "GET", "/courses?name=GERMAN&level=", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["items"]), vec![2]);
    assert_eq!(body["total_pages"], 1);

    let (_, body) = call(app().await, "GET", "/courses?level=Beginner", None).await;
    assert_eq!(ids(&body["items"]), vec![1]);

    let (_, body) = call(app().await, "GET", "/courses?page=2", None).await;
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["total_items"], 2);
}

#[tokio::test]
async fn course_pages_follow_configured_size() {
    let mut courses = common::courses();
    for id in 3..=7 {
        courses.push(Course {
            id,
            name: format!("Course {}", id),
            level: Level::Intermediate,
            ..courses[0].clone()
        });
    }
    let gateway = std::sync::Arc::new(tutorbook::gateway::MemoryGateway::new(
        courses,
        common::tutors(),
    ));
    let app = router(common::loaded_state(gateway, AppConfig::default()).await);

    let (_, first) = call(app.clone(), "GET", "/courses", None).await;
    let (_, second) = call(app, "GET", "/courses?page=2", None).await;
    assert_eq!(first["total_pages"], 2);
    assert_eq!(ids(&first["items"]), vec![1, 2, 3, 4, 5]);
    assert_eq!(ids(&second["items"]), vec![6, 7]);
}

#[tokio::test]
async fn schedule_lists_days_times_and_end_dates() {
    let (status, body) = call(app().await, "GET", "/courses/1/schedule", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_hours"], 12);
    assert_eq!(body["days"][0]["date"], "2025-03-12");
    assert_eq!(body["days"][0]["times"], json!(["14:00"]));
    assert_eq!(body["days"][0]["end_date"], "2025-04-09");
    assert_eq!(body["days"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn unknown_course_is_not_found() {
    let (status, body) = call(app().await, "GET", "/courses/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "course 99 not found");
}

#[tokio::test]
async fn tutors_filter_by_offered_language_and_level() {
    let (_, body) = call(app().await, "GET", "/tutors?language=German", None).await;
    assert_eq!(ids(&body), vec![1]);

    let (_, body) = call(app().await, "GET", "/tutors?language=French&level=Advanced", None).await;
    assert!(body.as_array().unwrap().is_empty());

    let (_, body) = call(app().await, "GET", "/tutors/languages", None).await;
    assert_eq!(body, json!(["English", "German", "French"]));
}

#[tokio::test]
async fn tutor_quote_and_validation() {
    let payload = json!({ "tutor_id": 1, "duration": 2, "persons": 3 });
    let (status, body) = call(app().await, "POST", "/quotes/tutor", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "total": 3000 }));

    let payload = json!({ "tutor_id": 1, "duration": 2, "persons": 0 });
    let (status, _) = call(app().await, "POST", "/quotes/tutor", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn course_quote_preview_reports_adjustments() {
    // Far enough ahead for the early registration discount; pick a weekday.
    let mut start = Local::now().date_naive() + Duration::days(60);
    while matches!(start.weekday(), Weekday::Sat | Weekday::Sun) {
        start += Duration::days(1);
    }
    let payload = json!({
        "course_id": 2,
        "date_start": start.format("%Y-%m-%d").to_string(),
        "time_start": "14:00",
        "persons": 1
    });

    let (status, body) = call(app().await, "POST", "/quotes/course", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], (2000.0_f64 * 0.9 * 1.2).round() as i64);
    assert_eq!(
        body["adjustments"],
        json!([
            "Discount for early registration: 10%",
            "Surcharge for intensive course: 20%"
        ])
    );
}

#[tokio::test]
async fn order_lifecycle_through_the_api() {
    let app = app().await;
    let today: NaiveDate = Local::now().date_naive();
    let start = today + Duration::days(3);

    let payload = json!({
        "tutor_id": 1,
        "date_start": start.format("%Y-%m-%d").to_string(),
        "time_start": "10:00",
        "duration": 2,
        "persons": 3
    });
    let (status, created) = call(app.clone(), "POST", "/orders/tutor", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["price"], 3000);
    assert_eq!(created["course_id"], 0);
    let id = created["id"].as_i64().unwrap();

    let (_, page) = call(app.clone(), "GET", "/orders", None).await;
    assert_eq!(page["items"][0]["number"], 1);
    assert_eq!(page["items"][0]["label"], "Tutor: Anna");
    assert_eq!(page["items"][0]["status"], "upcoming");

    let (status, details) = call(app.clone(), "GET", &format!("/orders/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["offering"]["type"], "tutor");
    assert_eq!(details["offering"]["name"], "Anna");

    let patch = json!({
        "date_start": start.format("%Y-%m-%d").to_string(),
        "time_start": "12:15",
        "persons": 1,
        "duration": 4
    });
    let (status, updated) = call(app.clone(), "PUT", &format!("/orders/{}", id), Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["time_start"], "12:15");
    assert_eq!(updated["price"], 3000);

    let (status, _) = call(app.clone(), "DELETE", &format!("/orders/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(app, "DELETE", &format!("/orders/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incomplete_course_booking_is_a_bad_request() {
    let payload = json!({ "course_id": 1, "date_start": "2025-03-12", "persons": 2 });
    let (status, body) = call(app().await, "POST", "/orders/course", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Fill in the start date and time");

    let payload = json!({ "course_id": 1, "date_start": "", "time_start": "", "persons": 2 });
    let (status, body) = call(app().await, "POST", "/orders/course", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Fill in the start date and time");
}

#[tokio::test]
async fn blank_tutor_date_is_a_validation_error() {
    let payload = json!({ "tutor_id": 1, "date_start": "", "time_start": "10:00" });
    let (status, body) = call(app().await, "POST", "/orders/tutor", Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Fill in all required fields");
}

#[tokio::test]
async fn huge_order_page_is_empty_not_a_crash() {
    let (status, body) = call(
        app().await,
        "GET",
        "/orders?page=18446744073709551615",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());
    assert_eq!(body["page"], json!(u64::MAX));
}

#[tokio::test]
async fn oversized_course_length_is_rejected() {
    let mut courses = common::courses();
    courses[0].total_length = 10_000_000_000_000;
    let gateway = std::sync::Arc::new(tutorbook::gateway::MemoryGateway::new(
        courses,
        common::tutors(),
    ));
    let app = router(common::loaded_state(gateway, AppConfig::default()).await);

    let (status, body) = call(app, "GET", "/courses/1/schedule", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "course 1 length is out of range");
}

#[tokio::test]
async fn refresh_endpoint_returns_stats() {
    let (status, body) = call(app().await, "POST", "/refresh", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["courses"], 2);
    assert_eq!(body["stale_dropped"], 0);
}

#[tokio::test]
async fn resources_filter_and_bounds() {
    let (status, body) = call(app().await, "GET", "/resources?kinds=cafes,library", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["resources"]), vec![1, 4]);
    assert_eq!(body["resources"][1]["kind"], "cafe");
    assert_eq!(body["resources"][1]["color"], "#fd7e14");
    assert!(body["bounds"]["south_west"].is_array());

    let (_, body) = call(app().await, "GET", "/resources?q=nowhere", None).await;
    assert!(body["resources"].as_array().unwrap().is_empty());
    assert!(body["bounds"].is_null());

    let (status, _) = call(app().await, "GET", "/resources?kinds=museum", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
