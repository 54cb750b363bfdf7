//! Outfitter core: pure domain model and decision logic.
mod credential;
mod describe;
mod locale;
mod status;
mod verdict;

pub use credential::CredentialStatus;
pub use describe::describe;
pub use locale::{Localize, StaticLocalizer};
pub use status::{JobState, JobStatus, TargetId};
pub use verdict::{classify, FlowOutcome, MonitorOutcome, PollVerdict};
