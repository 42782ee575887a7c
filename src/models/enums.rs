//! Shared domain enums

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// ---------------------------------------------------------------------------
// BookInstanceStatus
// ---------------------------------------------------------------------------

/// Availability of a physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(i16)]
pub enum BookInstanceStatus {
    Available = 0,
    #[default]
    Maintenance = 1,
    Loaned = 2,
    Reserved = 3,
}

impl BookInstanceStatus {
    pub const ALL: [BookInstanceStatus; 4] = [
        BookInstanceStatus::Available,
        BookInstanceStatus::Maintenance,
        BookInstanceStatus::Loaned,
        BookInstanceStatus::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookInstanceStatus::Available => "Available",
            BookInstanceStatus::Maintenance => "Maintenance",
            BookInstanceStatus::Loaned => "Loaned",
            BookInstanceStatus::Reserved => "Reserved",
        }
    }
}

impl From<i16> for BookInstanceStatus {
    fn from(v: i16) -> Self {
        match v {
            0 => BookInstanceStatus::Available,
            2 => BookInstanceStatus::Loaned,
            3 => BookInstanceStatus::Reserved,
            _ => BookInstanceStatus::Maintenance,
        }
    }
}

impl From<BookInstanceStatus> for i16 {
    fn from(s: BookInstanceStatus) -> Self {
        s as i16
    }
}

impl FromStr for BookInstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookInstanceStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown status: {}", s))
    }
}

impl std::fmt::Display for BookInstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
