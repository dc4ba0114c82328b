pub mod engine;
pub mod flow;
pub mod selection;
pub mod validator;

pub use crate::domain::model::{
    Booking, BookingDraft, BookingId, Cafe, CafeId, CandidateSet, Slot, SlotId, Table, TableId,
};
pub use crate::domain::ports::{AvailabilityProvider, BookingGateway};
pub use crate::utils::error::Result;
