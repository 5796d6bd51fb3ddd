pub mod course;
pub mod level;
pub mod order;
pub mod tutor;
pub(crate) mod wire;

pub use course::{Course, CourseExtras, CourseSelection};
pub use level::Level;
pub use order::{
    NOT_APPLICABLE, Order, OrderDraft, OrderOptions, OrderPatch, OrderStatus, OrderTarget,
    UpdateOrderRequest,
};
pub use tutor::{Tutor, TutorSelection};
