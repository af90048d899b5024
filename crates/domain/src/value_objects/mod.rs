//! Value objects - validated, immutable building blocks of retrieval events

mod event_name;
mod phase;
mod retention_interval;
mod timestamps;

pub use event_name::EventName;
pub use phase::Phase;
pub use retention_interval::RetentionInterval;
pub use timestamps::{EventTime, PhaseStartTime};
