use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::post;
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::{Local, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CourseFilter, OrderDetails, OrderRow, Page, TutorFilter};
use crate::error::AppError;
use crate::models::*;
use crate::quote::Quotation;
use crate::resources::{self, Bounds, RESOURCES, Resource};
use crate::services::RefreshStats;
use crate::state::AppState;

#[derive(Deserialize)]
struct CourseQueryParams {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    level: Option<Level>,
    #[serde(default)]
    page: Option<usize>,
}

#[derive(Deserialize)]
struct OrderQueryParams {
    #[serde(default)]
    page: Option<usize>,
}

#[derive(Deserialize)]
struct ResourceQueryParams {
    #[serde(default)]
    kinds: Option<String>,
    #[serde(default)]
    q: Option<String>,
}

#[derive(Serialize)]
struct Health {
    courses: usize,
    tutors: usize,
    orders: usize,
}

#[derive(Serialize)]
struct ScheduleDay {
    date: NaiveDate,
    end_date: NaiveDate,
    times: Vec<String>,
}

#[derive(Serialize)]
struct CourseSchedule {
    course_id: i64,
    total_hours: i64,
    days: Vec<ScheduleDay>,
}

#[derive(Serialize)]
struct ResourceView {
    #[serde(flatten)]
    resource: Resource,
    kind_name: &'static str,
    color: &'static str,
}

#[derive(Serialize)]
struct ResourceList {
    resources: Vec<ResourceView>,
    bounds: Option<Bounds>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(get_course))
        .route("/courses/{id}/schedule", get(course_schedule))
        .route("/tutors", get(list_tutors))
        .route("/tutors/languages", get(tutor_languages))
        .route("/tutors/{id}", get(get_tutor))
        .route("/quotes/course", post(quote_course))
        .route("/quotes/tutor", post(quote_tutor))
        .route("/orders", get(list_orders))
        .route("/orders/course", post(create_course_order))
        .route("/orders/tutor", post(create_tutor_order))
        .route("/orders/{id}", get(order_details).put(update_order).delete(delete_order))
        .route("/refresh", post(refresh_now))
        .route("/resources", get(list_resources))
        .with_state(state)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let store = state.store.read().await;
    Json(Health {
        courses: store.courses().len(),
        tutors: store.tutors().len(),
        orders: store.orders().len(),
    })
}

async fn list_courses(
    State(state): State<AppState>,
    Query(params): Query<CourseQueryParams>,
) -> Json<Page<Course>> {
    let filter = CourseFilter {
        name: params.name,
        level: params.level,
    };
    let store = state.store.read().await;
    let matching: Vec<Course> = store.filter_courses(&filter).into_iter().cloned().collect();
    Json(Page::of(
        &matching,
        params.page.unwrap_or(1),
        state.config.courses_per_page,
    ))
}

async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Course>, AppError> {
    if let Some(course) = state.store.read().await.course(id).cloned() {
        return Ok(Json(course));
    }
    Ok(Json(state.gateway.get_course(id).await?))
}

async fn course_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseSchedule>, AppError> {
    let cached = state.store.read().await.course(id).cloned();
    let course = match cached {
        Some(course) => course,
        None => state.gateway.get_course(id).await?,
    };

    let out_of_range = || AppError::validation(format!("course {} length is out of range", id));
    let days = course
        .start_days()
        .into_iter()
        .map(|date| -> Result<ScheduleDay, AppError> {
            Ok(ScheduleDay {
                date,
                end_date: course.end_date(date).ok_or_else(out_of_range)?,
                times: course
                    .start_times(date)
                    .iter()
                    .map(|t: &NaiveTime| t.format("%H:%M").to_string())
                    .collect(),
            })
        })
        .collect::<Result<_, _>>()?;
    let total_hours = course.total_hours().ok_or_else(out_of_range)?;

    Ok(Json(CourseSchedule {
        course_id: course.id,
        total_hours,
        days,
    }))
}

async fn list_tutors(
    State(state): State<AppState>,
    Query(filter): Query<TutorFilter>,
) -> Json<Vec<Tutor>> {
    let store = state.store.read().await;
    Json(store.filter_tutors(&filter).into_iter().cloned().collect())
}

async fn tutor_languages(State(state): State<AppState>) -> Json<Vec<String>> {
    let store = state.store.read().await;
    Json(store.offered_languages().into_iter().map(String::from).collect())
}

async fn get_tutor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Tutor>, AppError> {
    if let Some(tutor) = state.store.read().await.tutor(id).cloned() {
        return Ok(Json(tutor));
    }
    Ok(Json(state.gateway.get_tutor(id).await?))
}

async fn quote_course(
    State(state): State<AppState>,
    Json(selection): Json<CourseSelection>,
) -> Result<Json<Quotation>, AppError> {
    let quotation = state
        .booking_service()
        .quote_course(&selection, Utc::now())
        .await?;
    Ok(Json(quotation))
}

async fn quote_tutor(
    State(state): State<AppState>,
    Json(selection): Json<TutorSelection>,
) -> Result<Json<Quotation>, AppError> {
    let quotation = state.booking_service().quote_tutor(&selection).await?;
    Ok(Json(quotation))
}

async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderQueryParams>,
) -> Json<Page<OrderRow>> {
    let store = state.store.read().await;
    Json(store.order_rows(
        params.page.unwrap_or(1),
        state.config.orders_per_page,
        today(),
    ))
}

async fn order_details(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderDetails>, AppError> {
    let cached = state.store.read().await.order(id).cloned();
    let order = match cached {
        Some(order) => order,
        None => state.gateway.get_order(id).await?,
    };
    let store = state.store.read().await;
    Ok(Json(store.order_details(&order, today())))
}

async fn create_course_order(
    State(state): State<AppState>,
    Json(selection): Json<CourseSelection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state
        .booking_service()
        .submit_course(&selection, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn create_tutor_order(
    State(state): State<AppState>,
    Json(selection): Json<TutorSelection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.booking_service().submit_tutor(&selection).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Order>, AppError> {
    let order = state
        .booking_service()
        .update_order(id, &req, Utc::now())
        .await?;
    Ok(Json(order))
}

async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.booking_service().delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn refresh_now(State(state): State<AppState>) -> Result<Json<RefreshStats>, AppError> {
    let stats = state.refresh_service().refresh_all().await?;
    Ok(Json(stats))
}

async fn list_resources(
    Query(params): Query<ResourceQueryParams>,
) -> Result<Json<ResourceList>, AppError> {
    let kinds = resources::parse_kinds(params.kinds.as_deref())?;
    let matching = resources::filter_resources(RESOURCES, &kinds, params.q.as_deref());
    let bounds = resources::bounds(&matching);

    let resources = matching
        .into_iter()
        .map(|r| ResourceView {
            resource: r.clone(),
            kind_name: r.kind.display_name(),
            color: r.kind.marker_color(),
        })
        .collect();

    Ok(Json(ResourceList { resources, bounds }))
}
