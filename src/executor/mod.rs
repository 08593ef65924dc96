pub mod plan;
pub mod status;
pub mod validator;
pub mod dispatcher;
pub mod tracker;

pub use dispatcher::{CommandDispatcher, DispatchResult};
pub use plan::{CommandSpec, TargetSet};
pub use status::{CommandStatus, ObservedStatus, Severity};
pub use tracker::{InstanceStatus, StatusTracker, StatusTransition, TrackOutcome, TrackerEvent, DEFAULT_POLL_INTERVAL};
pub use validator::TargetValidator;
