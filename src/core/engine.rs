use crate::core::selection::Selection;
use crate::domain::model::{CafeId, CandidateSet, Slot, SlotId, Table, TableId};
use crate::domain::ports::AvailabilityProvider;
use crate::utils::error::{BookingError, Result};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStatus {
    Idle,
    Loading,
    Error,
}

/// Handle for one resolution cycle. Carries the cycle sequence number and
/// a snapshot of the query inputs taken when the cycle started, so a
/// response arriving late can be recognized as stale and discarded.
#[derive(Debug, Clone, Copy)]
pub struct CycleTicket {
    seq: u64,
    pub date: Option<NaiveDate>,
    pub table_id: Option<TableId>,
    pub slot_id: Option<SlotId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Results were reconciled into the candidate sets.
    Applied,
    /// A newer cycle started first; these results were discarded.
    Superseded,
}

/// Keeps table and slot candidate sets, and the current selection,
/// mutually consistent with the chosen date.
///
/// All mutation happens through `begin_cycle` / `commit` / `fail` on one
/// logical thread of control; concurrency exists only at the I/O boundary
/// (the two availability queries of a cycle). Cycles are totally ordered
/// by their sequence number, and only the most recently issued cycle may
/// mutate state.
pub struct ResolutionEngine {
    cafe_id: CafeId,
    selection: Selection,
    candidates: CandidateSet,
    status: ResolutionStatus,
    cycle_seq: u64,
}

impl ResolutionEngine {
    pub fn new(cafe_id: CafeId, selection: Selection) -> Self {
        Self {
            cafe_id,
            selection,
            candidates: CandidateSet::default(),
            status: ResolutionStatus::Idle,
            cycle_seq: 0,
        }
    }

    pub fn cafe_id(&self) -> CafeId {
        self.cafe_id
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    /// Starts a new cycle, invalidating every cycle started before it.
    pub fn begin_cycle(&mut self) -> CycleTicket {
        self.cycle_seq += 1;
        self.status = ResolutionStatus::Loading;
        let ticket = CycleTicket {
            seq: self.cycle_seq,
            date: self.selection.date,
            table_id: self.selection.table_id,
            slot_id: self.selection.slot_id,
        };
        tracing::debug!(
            cycle = ticket.seq,
            date = ?ticket.date,
            table = ?ticket.table_id,
            slot = ?ticket.slot_id,
            "resolution cycle started"
        );
        ticket
    }

    /// Reconciles the results of a cycle: both candidate axes are replaced
    /// together, then the selection is repaired against them. Results from
    /// a superseded cycle are discarded without touching any state.
    pub fn commit(
        &mut self,
        ticket: CycleTicket,
        tables: Vec<Table>,
        slots: Vec<Slot>,
    ) -> CycleOutcome {
        if ticket.seq != self.cycle_seq {
            tracing::debug!(
                cycle = ticket.seq,
                current = self.cycle_seq,
                "discarding stale resolution results"
            );
            return CycleOutcome::Superseded;
        }

        self.candidates = CandidateSet { tables, slots };
        self.repair_selection();
        self.status = ResolutionStatus::Idle;
        tracing::debug!(
            cycle = ticket.seq,
            tables = self.candidates.tables.len(),
            slots = self.candidates.slots.len(),
            "resolution cycle committed"
        );
        CycleOutcome::Applied
    }

    /// Records a failed cycle. The previous candidate sets are retained and
    /// the selection is left alone: a transient fetch failure must not
    /// destroy a still-possibly-valid choice. Stale failures are ignored.
    pub fn fail(&mut self, ticket: CycleTicket, error: &BookingError) -> CycleOutcome {
        if ticket.seq != self.cycle_seq {
            tracing::debug!(
                cycle = ticket.seq,
                current = self.cycle_seq,
                "discarding stale resolution failure"
            );
            return CycleOutcome::Superseded;
        }

        tracing::warn!(cycle = ticket.seq, %error, "resolution cycle failed");
        self.status = ResolutionStatus::Error;
        CycleOutcome::Applied
    }

    /// One full fetch-and-reconcile pass for the current selection. The two
    /// availability queries run concurrently; each is filtered by the other
    /// axis's currently *selected* value, not by the other query's results.
    pub async fn resolve<P: AvailabilityProvider>(&mut self, provider: &P) -> Result<CycleOutcome> {
        let ticket = self.begin_cycle();

        let slots_fut = provider.list_slots(self.cafe_id, ticket.date, ticket.table_id, true);
        let tables_fut = provider.list_tables(self.cafe_id, ticket.date, ticket.slot_id, true);
        let (slots_res, tables_res) = tokio::join!(slots_fut, tables_fut);

        match (tables_res, slots_res) {
            (Ok(tables), Ok(slots)) => Ok(self.commit(ticket, tables, slots)),
            (Err(e), _) | (_, Err(e)) => {
                let error = BookingError::AvailabilityError {
                    message: e.to_string(),
                };
                self.fail(ticket, &error);
                Err(error)
            }
        }
    }

    /// First-element-deterministic repair: an id missing from its new
    /// candidate set falls back to the first candidate, or to none when the
    /// set is empty. A still-valid id is kept.
    fn repair_selection(&mut self) {
        let repaired_table = match self.selection.table_id {
            Some(id) if self.candidates.contains_table(id) => Some(id),
            _ => self.candidates.first_table(),
        };
        if self.selection.table_id != repaired_table {
            tracing::debug!(
                from = ?self.selection.table_id,
                to = ?repaired_table,
                "repaired table selection"
            );
            self.selection.table_id = repaired_table;
        }

        let repaired_slot = match self.selection.slot_id {
            Some(id) if self.candidates.contains_slot(id) => Some(id),
            _ => self.candidates.first_slot(),
        };
        if self.selection.slot_id != repaired_slot {
            tracing::debug!(
                from = ?self.selection.slot_id,
                to = ?repaired_slot,
                "repaired slot selection"
            );
            self.selection.slot_id = repaired_slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Cafe;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use chrono::NaiveTime;

    fn table(id: i64) -> Table {
        Table {
            id: TableId(id),
            cafe_id: CafeId(1),
            seats_count: 4,
            description: None,
            active: true,
        }
    }

    fn slot(id: i64, start: &str, end: &str) -> Slot {
        Slot {
            id: SlotId(id),
            cafe_id: CafeId(1),
            start_time: start.parse::<NaiveTime>().unwrap(),
            end_time: end.parse::<NaiveTime>().unwrap(),
            active: true,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn engine() -> ResolutionEngine {
        ResolutionEngine::new(CafeId(1), Selection::new(Some(date("2026-09-01"))))
    }

    #[test]
    fn test_commit_populates_defaults_from_first_candidates() {
        let mut engine = engine();
        let ticket = engine.begin_cycle();
        assert_eq!(engine.status(), ResolutionStatus::Loading);

        let outcome = engine.commit(
            ticket,
            vec![table(10), table(11)],
            vec![slot(20, "09:00:00", "10:00:00"), slot(21, "10:00:00", "11:00:00")],
        );

        assert_eq!(outcome, CycleOutcome::Applied);
        assert_eq!(engine.status(), ResolutionStatus::Idle);
        assert_eq!(engine.selection().table_id, Some(TableId(10)));
        assert_eq!(engine.selection().slot_id, Some(SlotId(20)));
    }

    #[test]
    fn test_valid_selection_survives_repair() {
        let mut engine = engine();
        let ticket = engine.begin_cycle();
        engine.commit(
            ticket,
            vec![table(10), table(11)],
            vec![slot(20, "09:00:00", "10:00:00"), slot(21, "10:00:00", "11:00:00")],
        );
        engine.selection_mut().set_table(Some(TableId(11)));
        engine.selection_mut().set_slot(Some(SlotId(21)));

        let ticket = engine.begin_cycle();
        engine.commit(
            ticket,
            vec![table(11)],
            vec![slot(21, "10:00:00", "11:00:00")],
        );

        assert_eq!(engine.selection().table_id, Some(TableId(11)));
        assert_eq!(engine.selection().slot_id, Some(SlotId(21)));
    }

    #[test]
    fn test_repair_resets_invalid_ids_deterministically() {
        let mut engine = engine();
        let ticket = engine.begin_cycle();
        engine.commit(
            ticket,
            vec![table(10)],
            vec![slot(20, "09:00:00", "10:00:00")],
        );

        // new date: previous table gone, previous slot gone, slots empty
        engine.selection_mut().set_date(Some(date("2026-09-02")));
        let ticket = engine.begin_cycle();
        engine.commit(ticket, vec![table(30), table(31)], vec![]);

        assert_eq!(engine.selection().table_id, Some(TableId(30)));
        assert_eq!(engine.selection().slot_id, None);
    }

    #[test]
    fn test_stale_commit_is_discarded() {
        let mut engine = engine();
        let ticket_a = engine.begin_cycle();
        let ticket_b = engine.begin_cycle();

        // A's responses arrive after B started: they must change nothing
        let outcome = engine.commit(
            ticket_a,
            vec![table(10)],
            vec![slot(20, "09:00:00", "10:00:00")],
        );
        assert_eq!(outcome, CycleOutcome::Superseded);
        assert!(engine.candidates().tables.is_empty());
        assert_eq!(engine.selection().table_id, None);
        assert_eq!(engine.status(), ResolutionStatus::Loading);

        // B's responses are current and win
        let outcome = engine.commit(
            ticket_b,
            vec![table(11)],
            vec![slot(21, "10:00:00", "11:00:00")],
        );
        assert_eq!(outcome, CycleOutcome::Applied);
        assert_eq!(engine.selection().table_id, Some(TableId(11)));
        assert_eq!(engine.selection().slot_id, Some(SlotId(21)));
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut engine = engine();
        let ticket_a = engine.begin_cycle();
        let ticket_b = engine.begin_cycle();

        let error = BookingError::AvailabilityError {
            message: "connection reset".to_string(),
        };
        assert_eq!(engine.fail(ticket_a, &error), CycleOutcome::Superseded);
        assert_eq!(engine.status(), ResolutionStatus::Loading);

        engine.commit(
            ticket_b,
            vec![table(11)],
            vec![slot(21, "10:00:00", "11:00:00")],
        );
        assert_eq!(engine.status(), ResolutionStatus::Idle);
    }

    #[test]
    fn test_failed_cycle_retains_previous_candidates() {
        let mut engine = engine();
        let ticket = engine.begin_cycle();
        engine.commit(
            ticket,
            vec![table(10)],
            vec![slot(20, "09:00:00", "10:00:00")],
        );

        let ticket = engine.begin_cycle();
        let error = BookingError::AvailabilityError {
            message: "503".to_string(),
        };
        assert_eq!(engine.fail(ticket, &error), CycleOutcome::Applied);

        assert_eq!(engine.status(), ResolutionStatus::Error);
        assert_eq!(engine.candidates().tables.len(), 1);
        assert_eq!(engine.selection().table_id, Some(TableId(10)));
        assert_eq!(engine.selection().slot_id, Some(SlotId(20)));
    }

    /// Provider that reports per-date availability and records the filters
    /// it was queried with.
    struct FixedProvider {
        tables: Vec<Table>,
        slots: Vec<Slot>,
    }

    #[async_trait]
    impl AvailabilityProvider for FixedProvider {
        async fn fetch_cafe(&self, cafe_id: CafeId) -> Result<Cafe> {
            Ok(Cafe {
                id: cafe_id,
                name: "Fixed".to_string(),
                address: None,
                description: None,
                work_start_time: None,
                work_end_time: None,
                slot_duration_minutes: None,
                active: true,
            })
        }

        async fn list_slots(
            &self,
            _cafe_id: CafeId,
            _date: Option<NaiveDate>,
            _table_id: Option<TableId>,
            _active_only: bool,
        ) -> Result<Vec<Slot>> {
            Ok(self.slots.clone())
        }

        async fn list_tables(
            &self,
            _cafe_id: CafeId,
            _date: Option<NaiveDate>,
            _slot_id: Option<SlotId>,
            _active_only: bool,
        ) -> Result<Vec<Table>> {
            Ok(self.tables.clone())
        }
    }

    #[tokio::test]
    async fn test_resolve_commits_both_axes_together() {
        let provider = FixedProvider {
            tables: vec![table(10), table(11)],
            slots: vec![slot(20, "09:00:00", "10:00:00")],
        };
        let mut engine = engine();

        let outcome = engine.resolve(&provider).await.unwrap();
        assert_eq!(outcome, CycleOutcome::Applied);
        assert_eq!(engine.candidates().tables.len(), 2);
        assert_eq!(engine.candidates().slots.len(), 1);
        assert_eq!(engine.selection().table_id, Some(TableId(10)));
        assert_eq!(engine.selection().slot_id, Some(SlotId(20)));
        assert_eq!(engine.status(), ResolutionStatus::Idle);
    }
}
