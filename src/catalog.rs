//! In-memory snapshot of the course service plus the queries the UI runs on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Course, Level, Order, OrderStatus, OrderTarget, Tutor};

/// Slice `[(page-1)*page_size, page*page_size)` of `items`. Page numbers
/// start at 1; anything out of range yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    pub fn of(items: &[T], page: usize, page_size: usize) -> Self {
        Self {
            items: paginate(items, page, page_size).to_vec(),
            page,
            page_size,
            total_items: items.len(),
            total_pages: page_count(items.len(), page_size),
        }
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

fn non_empty_level(level: &Option<Level>) -> Option<&Level> {
    level.as_ref().filter(|l| !l.is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
}

impl CourseFilter {
    pub fn matches(&self, course: &Course) -> bool {
        let name_ok = non_empty(&self.name)
            .is_none_or(|needle| course.name.to_lowercase().contains(&needle.to_lowercase()));
        let level_ok = non_empty_level(&self.level).is_none_or(|level| &course.level == level);
        name_ok && level_ok
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TutorFilter {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub level: Option<Level>,
}

impl TutorFilter {
    pub fn matches(&self, tutor: &Tutor) -> bool {
        let language_ok = non_empty(&self.language).is_none_or(|lang| tutor.offers(lang));
        let level_ok =
            non_empty_level(&self.level).is_none_or(|level| &tutor.language_level == level);
        language_ok && level_ok
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Courses,
    Tutors,
    Orders,
}

/// Issued before a fetch starts and handed back with its response, so the
/// store can tell when responses land out of issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    collection: Collection,
    seq: u64,
}

impl FetchTicket {
    pub fn collection(&self) -> Collection {
        self.collection
    }
}

#[derive(Debug, Default)]
struct Sequence {
    issued: u64,
    applied: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub number: usize,
    pub label: String,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub order: Order,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Offering {
    Course(Course),
    Tutor(Tutor),
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub status: OrderStatus,
    pub offering: Option<Offering>,
    pub options: Vec<&'static str>,
}

/// Latest snapshot of courses, tutors and orders.
///
/// Queries never mutate the snapshot. Writes only happen through the
/// `apply_*` methods once a fetch has completed.
#[derive(Debug, Default)]
pub struct CatalogStore {
    courses: Vec<Course>,
    tutors: Vec<Tutor>,
    orders: Vec<Order>,
    course_seq: Sequence,
    tutor_seq: Sequence,
    order_seq: Sequence,
    fence_stale: bool,
}

impl CatalogStore {
    pub fn new(fence_stale: bool) -> Self {
        Self {
            fence_stale,
            ..Default::default()
        }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn tutors(&self) -> &[Tutor] {
        &self.tutors
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn course(&self, id: i64) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn tutor(&self, id: i64) -> Option<&Tutor> {
        self.tutors.iter().find(|t| t.id == id)
    }

    pub fn order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    fn sequence_mut(&mut self, collection: Collection) -> &mut Sequence {
        match collection {
            Collection::Courses => &mut self.course_seq,
            Collection::Tutors => &mut self.tutor_seq,
            Collection::Orders => &mut self.order_seq,
        }
    }

    pub fn begin_fetch(&mut self, collection: Collection) -> FetchTicket {
        let seq = self.sequence_mut(collection);
        seq.issued += 1;
        FetchTicket {
            collection,
            seq: seq.issued,
        }
    }

    /// Decide whether a completed fetch may replace the snapshot.
    fn admit(&mut self, ticket: FetchTicket, expected: Collection) -> bool {
        if ticket.collection != expected {
            warn!(
                "ticket for {:?} used to apply {:?}, ignoring",
                ticket.collection, expected
            );
            return false;
        }
        let fence = self.fence_stale;
        let seq = self.sequence_mut(expected);
        if ticket.seq < seq.applied {
            if fence {
                warn!(
                    "dropping stale {:?} response #{} (already applied #{})",
                    expected, ticket.seq, seq.applied
                );
                return false;
            }
            warn!(
                "stale {:?} response #{} overwrites newer #{}",
                expected, ticket.seq, seq.applied
            );
        }
        seq.applied = seq.applied.max(ticket.seq);
        true
    }

    pub fn apply_courses(&mut self, ticket: FetchTicket, courses: Vec<Course>) -> bool {
        if !self.admit(ticket, Collection::Courses) {
            return false;
        }
        debug!("snapshot now holds {} courses", courses.len());
        self.courses = courses;
        true
    }

    pub fn apply_tutors(&mut self, ticket: FetchTicket, tutors: Vec<Tutor>) -> bool {
        if !self.admit(ticket, Collection::Tutors) {
            return false;
        }
        debug!("snapshot now holds {} tutors", tutors.len());
        self.tutors = tutors;
        true
    }

    pub fn apply_orders(&mut self, ticket: FetchTicket, orders: Vec<Order>) -> bool {
        if !self.admit(ticket, Collection::Orders) {
            return false;
        }
        debug!("snapshot now holds {} orders", orders.len());
        self.orders = orders;
        true
    }

    pub fn filter_courses(&self, filter: &CourseFilter) -> Vec<&Course> {
        self.courses.iter().filter(|c| filter.matches(c)).collect()
    }

    pub fn filter_tutors(&self, filter: &TutorFilter) -> Vec<&Tutor> {
        self.tutors.iter().filter(|t| filter.matches(t)).collect()
    }

    /// Distinct offered languages across all tutors, first appearance first.
    pub fn offered_languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = Vec::new();
        for lang in self.tutors.iter().flat_map(|t| t.languages_offered.iter()) {
            if !languages.contains(&lang.as_str()) {
                languages.push(lang);
            }
        }
        languages
    }

    pub fn order_label(&self, order: &Order) -> String {
        match order.target() {
            OrderTarget::Course(id) => self.course(id).map(|c| format!("Course: {}", c.name)),
            OrderTarget::Tutor(id) => self.tutor(id).map(|t| format!("Tutor: {}", t.name)),
            OrderTarget::Unassigned => None,
        }
        .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn order_rows(&self, page: usize, page_size: usize, today: NaiveDate) -> Page<OrderRow> {
        let slice = paginate(&self.orders, page, page_size);
        let first = page.saturating_sub(1).saturating_mul(page_size);
        let items = slice
            .iter()
            .enumerate()
            .map(|(i, order)| OrderRow {
                number: first.saturating_add(i + 1),
                label: self.order_label(order),
                status: OrderStatus::on(order.date_start, today),
                order: order.clone(),
            })
            .collect();

        Page {
            items,
            page,
            page_size,
            total_items: self.orders.len(),
            total_pages: page_count(self.orders.len(), page_size),
        }
    }

    pub fn order_details(&self, order: &Order, today: NaiveDate) -> OrderDetails {
        let offering = match order.target() {
            OrderTarget::Course(id) => self.course(id).cloned().map(Offering::Course),
            OrderTarget::Tutor(id) => self.tutor(id).cloned().map(Offering::Tutor),
            OrderTarget::Unassigned => None,
        };
        OrderDetails {
            order: order.clone(),
            status: OrderStatus::on(order.date_start, today),
            offering,
            options: order.options.descriptions(),
        }
    }
}
