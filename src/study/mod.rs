//! Study sessions: the explicit session context and the operations on it.

pub mod context;
pub mod engine;

pub use context::{GradeOutcome, Presented, StudyContext};
pub use engine::{StartOptions, StudyEngine};
