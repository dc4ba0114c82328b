use crate::domain::model::{
    Booking, BookingDraft, BookingId, Cafe, CafeId, Slot, SlotId, Table, TableId,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Read side of the booking backend: the cafe itself plus the two
/// availability axes. Each axis query is filtered by the *other* axis's
/// currently selected value, so the two can run concurrently.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    async fn fetch_cafe(&self, cafe_id: CafeId) -> Result<Cafe>;

    async fn list_slots(
        &self,
        cafe_id: CafeId,
        date: Option<NaiveDate>,
        table_id: Option<TableId>,
        active_only: bool,
    ) -> Result<Vec<Slot>>;

    async fn list_tables(
        &self,
        cafe_id: CafeId,
        date: Option<NaiveDate>,
        slot_id: Option<SlotId>,
        active_only: bool,
    ) -> Result<Vec<Table>>;
}

/// Write side: booking creation and cancellation. The backend stays
/// authoritative; a conflict it reports is surfaced, never retried here.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn create_booking(&self, draft: &BookingDraft) -> Result<Booking>;

    async fn cancel_booking(&self, booking_id: BookingId) -> Result<()>;
}
