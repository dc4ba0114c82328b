use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

id_newtype!(CafeId);
id_newtype!(TableId);
id_newtype!(SlotId);
id_newtype!(BookingId);

fn default_active() -> bool {
    true
}

/// A cafe as served by the backend. Immutable for the duration of a
/// booking session; fetched once when the flow starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cafe {
    pub id: CafeId,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub work_start_time: Option<NaiveTime>,
    #[serde(default)]
    pub work_end_time: Option<NaiveTime>,
    #[serde(default)]
    pub slot_duration_minutes: Option<u32>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Cafe {
    /// The (start, end) pairs a fully slotted day would consist of, derived
    /// from the work window and slot duration. Empty when the cafe has no
    /// configured window. A trailing partial slot is dropped.
    pub fn slot_grid(&self) -> Vec<(NaiveTime, NaiveTime)> {
        let (Some(start), Some(end), Some(minutes)) = (
            self.work_start_time,
            self.work_end_time,
            self.slot_duration_minutes,
        ) else {
            return Vec::new();
        };
        if minutes == 0 || start >= end {
            return Vec::new();
        }

        let step = Duration::minutes(i64::from(minutes));
        let mut grid = Vec::new();
        let mut cursor = start;
        loop {
            let (slot_end, wrapped) = cursor.overflowing_add_signed(step);
            if wrapped != 0 || slot_end > end {
                break;
            }
            grid.push((cursor, slot_end));
            cursor = slot_end;
        }
        grid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub cafe_id: CafeId,
    pub seats_count: u32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A time-of-day interval offered by a cafe, independent of any date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub cafe_id: CafeId,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// The latest resolved availability for the current (date, selection)
/// combination. Replaced wholesale on every committed resolution cycle,
/// never patched in place.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub tables: Vec<Table>,
    pub slots: Vec<Slot>,
}

impl CandidateSet {
    pub fn contains_table(&self, id: TableId) -> bool {
        self.tables.iter().any(|t| t.id == id)
    }

    pub fn contains_slot(&self, id: SlotId) -> bool {
        self.slots.iter().any(|s| s.id == id)
    }

    pub fn first_table(&self) -> Option<TableId> {
        self.tables.first().map(|t| t.id)
    }

    pub fn first_slot(&self) -> Option<SlotId> {
        self.slots.first().map(|s| s.id)
    }
}

/// Request body for booking creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub cafe_id: CafeId,
    pub table_id: TableId,
    pub slot_id: SlotId,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

/// A booking as confirmed by the backend. Owned by the booking service
/// after creation; this client only reads it back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub cafe_id: CafeId,
    pub table_id: TableId,
    pub slot_id: SlotId,
    pub date: NaiveDate,
    pub status: BookingStatus,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cafe(start: &str, end: &str, minutes: u32) -> Cafe {
        Cafe {
            id: CafeId(1),
            name: "Test Cafe".to_string(),
            address: None,
            description: None,
            work_start_time: Some(start.parse().unwrap()),
            work_end_time: Some(end.parse().unwrap()),
            slot_duration_minutes: Some(minutes),
            active: true,
        }
    }

    #[test]
    fn test_slot_grid_full_day() {
        let grid = cafe("09:00:00", "22:00:00", 60).slot_grid();
        assert_eq!(grid.len(), 13);
        assert_eq!(grid[0].0, "09:00:00".parse::<NaiveTime>().unwrap());
        assert_eq!(grid[12].1, "22:00:00".parse::<NaiveTime>().unwrap());
    }

    #[test]
    fn test_slot_grid_drops_trailing_partial_slot() {
        // 09:00-10:10 with 30-minute slots fits only two full slots
        let grid = cafe("09:00:00", "10:10:00", 30).slot_grid();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1].1, "10:00:00".parse::<NaiveTime>().unwrap());
    }

    #[test]
    fn test_slot_grid_without_work_window() {
        let mut c = cafe("09:00:00", "22:00:00", 60);
        c.work_start_time = None;
        assert!(c.slot_grid().is_empty());

        let mut c = cafe("09:00:00", "22:00:00", 60);
        c.slot_duration_minutes = Some(0);
        assert!(c.slot_grid().is_empty());
    }

    #[test]
    fn test_booking_draft_skips_empty_note() {
        let draft = BookingDraft {
            cafe_id: CafeId(1),
            table_id: TableId(2),
            slot_id: SlotId(3),
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            note: None,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("note").is_none());
        assert_eq!(json["date"], "2026-09-01");
        assert_eq!(json["cafe_id"], 1);
    }
}
