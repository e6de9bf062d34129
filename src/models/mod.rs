mod visit;

pub use visit::{NewVisit, VisitEvent, VisitRow};
