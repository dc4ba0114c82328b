pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::http::RestBackend;
pub use crate::core::engine::{CycleOutcome, CycleTicket, ResolutionEngine, ResolutionStatus};
pub use crate::core::flow::{BookingFlow, FlowPhase};
pub use crate::core::selection::{Selection, SelectionInput};
pub use crate::core::validator::check_submit;
pub use crate::utils::error::{BookingError, PreconditionFailure, Result};
