use crate::domain::model::CafeId;
use thiserror::Error;

/// Local submission preconditions checked before any network call.
/// Each variant maps to one user-facing reason code.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreconditionFailure {
    #[error("no cafe")]
    NoCafe,

    #[error("no date")]
    NoDate,

    #[error("date in past")]
    DateInPast,

    #[error("table unavailable")]
    TableUnavailable,

    #[error("slot unavailable")]
    SlotUnavailable,
}

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Availability fetch failed: {message}")]
    AvailabilityError { message: String },

    #[error("Booking rejected by server: {reason}")]
    RejectedError { reason: String },

    #[error("Submission precondition failed: {0}")]
    PreconditionError(#[from] PreconditionFailure),

    #[error("Cafe {cafe_id} not found or inactive")]
    CafeNotFoundError { cafe_id: CafeId },

    #[error("A booking submission is already in flight")]
    SubmitInFlightError,

    #[error("Booking flow is already {phase}")]
    FlowClosedError { phase: &'static str },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Validation,
    Precondition,
    Config,
    State,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BookingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ApiError(_) | Self::SerializationError(_) | Self::AvailabilityError { .. } => {
                ErrorCategory::Transport
            }
            Self::RejectedError { .. } => ErrorCategory::Validation,
            Self::PreconditionError(_) => ErrorCategory::Precondition,
            Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
            Self::SubmitInFlightError | Self::FlowClosedError { .. } => ErrorCategory::State,
            Self::CafeNotFoundError { .. } => ErrorCategory::Fatal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::PreconditionError(_) | Self::SubmitInFlightError => ErrorSeverity::Low,
            Self::AvailabilityError { .. } | Self::RejectedError { .. } => ErrorSeverity::Medium,
            Self::ApiError(_)
            | Self::SerializationError(_)
            | Self::FlowClosedError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::CafeNotFoundError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ApiError(_) | Self::AvailabilityError { .. } => {
                "Check that the booking backend is reachable, then change any input to retry"
                    .to_string()
            }
            Self::SerializationError(_) => {
                "The backend returned an unexpected payload; verify the backend version".to_string()
            }
            Self::RejectedError { .. } => {
                "Pick another table, time slot or date and submit again".to_string()
            }
            Self::PreconditionError(reason) => match reason {
                PreconditionFailure::NoCafe => "Select a cafe before booking".to_string(),
                PreconditionFailure::NoDate => "Pick a booking date".to_string(),
                PreconditionFailure::DateInPast => "Pick today or a future date".to_string(),
                PreconditionFailure::TableUnavailable => {
                    "Pick one of the currently available tables".to_string()
                }
                PreconditionFailure::SlotUnavailable => {
                    "Pick one of the currently available time slots".to_string()
                }
            },
            Self::CafeNotFoundError { .. } => {
                "Go back to the cafe list and choose an active cafe".to_string()
            }
            Self::SubmitInFlightError => "Wait for the current submission to finish".to_string(),
            Self::FlowClosedError { .. } => "Start a new booking flow".to_string(),
            Self::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' configuration value and run again", field)
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ApiError(_) | Self::AvailabilityError { .. } => {
                "Could not load availability from the booking service".to_string()
            }
            Self::SerializationError(_) => {
                "The booking service returned an unreadable response".to_string()
            }
            Self::RejectedError { reason } => format!("Booking was rejected: {}", reason),
            Self::PreconditionError(reason) => format!("Cannot submit yet: {}", reason),
            Self::CafeNotFoundError { cafe_id } => {
                format!("Cafe {} does not exist or is closed", cafe_id)
            }
            Self::SubmitInFlightError => "A booking is already being submitted".to_string(),
            Self::FlowClosedError { phase } => format!("This booking flow is {}", phase),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration problem in '{}': {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
