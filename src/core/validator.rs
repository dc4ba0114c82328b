use crate::core::selection::Selection;
use crate::domain::model::{BookingDraft, CafeId, CandidateSet};
use crate::utils::error::PreconditionFailure;
use chrono::NaiveDate;

/// Gate in front of the booking request. Pure: no I/O, and the selection
/// is never mutated, so the user can correct a failed precondition and
/// retry. Membership is checked against the latest *committed* candidate
/// sets, so a selection invalidated by a date change cannot slip through.
pub fn check_submit(
    cafe_id: Option<CafeId>,
    selection: &Selection,
    candidates: &CandidateSet,
    today: NaiveDate,
) -> Result<BookingDraft, PreconditionFailure> {
    let Some(cafe_id) = cafe_id else {
        return Err(PreconditionFailure::NoCafe);
    };
    let Some(date) = selection.date else {
        return Err(PreconditionFailure::NoDate);
    };
    if date < today {
        return Err(PreconditionFailure::DateInPast);
    }
    let table_id = match selection.table_id {
        Some(id) if candidates.contains_table(id) => id,
        _ => return Err(PreconditionFailure::TableUnavailable),
    };
    let slot_id = match selection.slot_id {
        Some(id) if candidates.contains_slot(id) => id,
        _ => return Err(PreconditionFailure::SlotUnavailable),
    };

    Ok(BookingDraft {
        cafe_id,
        table_id,
        slot_id,
        date,
        note: selection.note.clone(),
    })
}
