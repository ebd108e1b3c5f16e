pub mod calendar;
pub mod completion;
pub mod interval;
pub mod rank;
pub mod reconcile;
pub mod urgency;

pub use calendar::DayClock;
pub use rank::{TaskView, rank, ranked_views};
pub use reconcile::{ReconcileOutcome, reconcile};
pub use urgency::UrgencyCalculator;
