pub mod booking;
pub mod refresh;
pub mod scheduler;

pub use booking::BookingService;
pub use refresh::{RefreshService, RefreshStats};
pub use scheduler::RefreshScheduler;
