use crate::domain::model::{SlotId, TableId};
use chrono::{Local, NaiveDate};

/// The user's in-progress choice. Single source of truth for
/// { date, table, slot, note }; every mutation is a pure replacement of
/// one field, never a partial merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub date: Option<NaiveDate>,
    pub table_id: Option<TableId>,
    pub slot_id: Option<SlotId>,
    pub note: Option<String>,
}

/// One user input. Batching several inputs into a single `apply_all`
/// yields exactly one resolution cycle for the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    Date(Option<NaiveDate>),
    Table(Option<TableId>),
    Slot(Option<SlotId>),
    Note(Option<String>),
}

impl Selection {
    pub fn new(date: Option<NaiveDate>) -> Self {
        Self {
            date,
            table_id: None,
            slot_id: None,
            note: None,
        }
    }

    /// Fresh selection seeded with the current local date, no time component.
    pub fn today() -> Self {
        Self::new(Some(Local::now().date_naive()))
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) -> bool {
        let changed = self.date != date;
        self.date = date;
        changed
    }

    pub fn set_table(&mut self, table_id: Option<TableId>) -> bool {
        let changed = self.table_id != table_id;
        self.table_id = table_id;
        changed
    }

    pub fn set_slot(&mut self, slot_id: Option<SlotId>) -> bool {
        let changed = self.slot_id != slot_id;
        self.slot_id = slot_id;
        changed
    }

    pub fn set_note(&mut self, note: Option<String>) -> bool {
        let changed = self.note != note;
        self.note = note;
        changed
    }

    /// Applies one input and reports whether it affects availability.
    /// Note edits never do; unchanged values never do.
    pub fn apply(&mut self, input: SelectionInput) -> bool {
        match input {
            SelectionInput::Date(date) => self.set_date(date),
            SelectionInput::Table(table_id) => self.set_table(table_id),
            SelectionInput::Slot(slot_id) => self.set_slot(slot_id),
            SelectionInput::Note(note) => {
                self.set_note(note);
                false
            }
        }
    }

    /// Applies a batch of inputs; true if any of them requires a
    /// resolution cycle.
    pub fn apply_all<I>(&mut self, inputs: I) -> bool
    where
        I: IntoIterator<Item = SelectionInput>,
    {
        let mut needs_resolution = false;
        for input in inputs {
            needs_resolution |= self.apply(input);
        }
        needs_resolution
    }
}
