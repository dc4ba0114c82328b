use crate::core::engine::{ResolutionEngine, ResolutionStatus};
use crate::core::selection::{Selection, SelectionInput};
use crate::core::validator::check_submit;
use crate::domain::model::{
    Booking, BookingDraft, BookingId, Cafe, CafeId, CandidateSet, SlotId, TableId,
};
use crate::domain::ports::{AvailabilityProvider, BookingGateway};
use crate::utils::error::{BookingError, Result};
use chrono::{Local, NaiveDate};

/// Lifecycle of one booking flow. `Submitting` doubles as the in-flight
/// guard: a second submit attempt while a request is out is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    Selecting,
    Submitting,
    Submitted,
    Cancelled,
}

impl FlowPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Selecting => "selecting",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The surface the UI talks to: selection setters that each trigger at most
/// one resolution cycle, accessors for the current candidate sets and
/// status, and the submit/cancel pair.
pub struct BookingFlow<P: AvailabilityProvider, G: BookingGateway> {
    provider: P,
    gateway: G,
    cafe: Cafe,
    engine: ResolutionEngine,
    phase: FlowPhase,
}

impl<P: AvailabilityProvider, G: BookingGateway> BookingFlow<P, G> {
    /// Starts a flow for one cafe: fetches the cafe once, seeds the
    /// selection with today's local date and runs the initial resolution
    /// cycle, which picks default table and slot from the first candidates.
    ///
    /// A missing or inactive cafe is fatal. A failed initial availability
    /// fetch is not: the flow starts with empty candidates and status
    /// `Error`, and any input change retries.
    pub async fn start(provider: P, gateway: G, cafe_id: CafeId) -> Result<Self> {
        let cafe = provider.fetch_cafe(cafe_id).await?;
        if !cafe.active {
            return Err(BookingError::CafeNotFoundError { cafe_id });
        }
        tracing::info!(cafe = %cafe.id, name = %cafe.name, "booking flow started");

        let engine = ResolutionEngine::new(cafe_id, Selection::today());
        let mut flow = Self {
            provider,
            gateway,
            cafe,
            engine,
            phase: FlowPhase::Selecting,
        };

        if let Err(e) = flow.engine.resolve(&flow.provider).await {
            tracing::warn!(%e, "initial availability resolution failed");
        }
        Ok(flow)
    }

    pub fn cafe(&self) -> &Cafe {
        &self.cafe
    }

    pub fn selection(&self) -> &Selection {
        self.engine.selection()
    }

    pub fn candidates(&self) -> &CandidateSet {
        self.engine.candidates()
    }

    pub fn status(&self) -> ResolutionStatus {
        self.engine.status()
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub async fn set_date(&mut self, date: Option<NaiveDate>) -> Result<()> {
        self.apply(vec![SelectionInput::Date(date)]).await
    }

    pub async fn set_table(&mut self, table_id: Option<TableId>) -> Result<()> {
        self.apply(vec![SelectionInput::Table(table_id)]).await
    }

    pub async fn set_slot(&mut self, slot_id: Option<SlotId>) -> Result<()> {
        self.apply(vec![SelectionInput::Slot(slot_id)]).await
    }

    pub fn set_note(&mut self, note: Option<String>) {
        self.engine.selection_mut().set_note(note);
    }

    /// Applies a batch of inputs as one logical UI action: however many
    /// fields change, at most one resolution cycle runs.
    pub async fn apply(&mut self, inputs: Vec<SelectionInput>) -> Result<()> {
        self.ensure_selecting()?;
        if self.engine.selection_mut().apply_all(inputs) {
            self.engine.resolve(&self.provider).await?;
        }
        Ok(())
    }

    /// Validates the selection locally and, only if every precondition
    /// holds, posts the booking. A backend rejection (the pair was taken
    /// between resolution and submit) is surfaced verbatim and leaves the
    /// selection untouched so the user can adjust and retry.
    pub async fn submit(&mut self) -> Result<Booking> {
        let draft = self.begin_submit(Local::now().date_naive())?;
        tracing::info!(
            cafe = %draft.cafe_id,
            table = %draft.table_id,
            slot = %draft.slot_id,
            date = %draft.date,
            "submitting booking"
        );
        let result = self.gateway.create_booking(&draft).await;
        self.settle_submit(result)
    }

    /// First half of `submit`: checks the preconditions and takes the
    /// in-flight guard. While the guard is held, another attempt is
    /// rejected with `SubmitInFlightError` and has no side effects.
    pub fn begin_submit(&mut self, today: NaiveDate) -> Result<BookingDraft> {
        match self.phase {
            FlowPhase::Selecting => {}
            FlowPhase::Submitting => return Err(BookingError::SubmitInFlightError),
            closed => {
                return Err(BookingError::FlowClosedError {
                    phase: closed.name(),
                })
            }
        }

        let draft = check_submit(
            Some(self.cafe.id),
            self.engine.selection(),
            self.engine.candidates(),
            today,
        )?;
        self.phase = FlowPhase::Submitting;
        Ok(draft)
    }

    /// Second half of `submit`: records the backend's answer and releases
    /// the guard. Success is terminal; failure returns the flow to
    /// `Selecting` with the selection untouched.
    pub fn settle_submit(&mut self, result: Result<Booking>) -> Result<Booking> {
        match result {
            Ok(booking) => {
                self.phase = FlowPhase::Submitted;
                tracing::info!(booking = %booking.id, "booking created");
                Ok(booking)
            }
            Err(e) => {
                self.phase = FlowPhase::Selecting;
                tracing::warn!(%e, "booking submission failed");
                Err(e)
            }
        }
    }

    /// Abandons the in-progress selection. Terminal for this flow.
    pub fn cancel(&mut self) {
        tracing::info!(cafe = %self.cafe.id, "booking flow cancelled");
        self.phase = FlowPhase::Cancelled;
    }

    /// Cancellation of an existing booking, used by the booking list view.
    pub async fn cancel_booking(&self, booking_id: BookingId) -> Result<()> {
        self.gateway.cancel_booking(booking_id).await
    }

    fn ensure_selecting(&self) -> Result<()> {
        match self.phase {
            FlowPhase::Selecting => Ok(()),
            closed => Err(BookingError::FlowClosedError {
                phase: closed.name(),
            }),
        }
    }
}
