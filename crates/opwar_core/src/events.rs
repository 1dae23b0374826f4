//! Unit events and the notification sink they are flushed to.
//!
//! Mutating operations record a [`UnitEvent`] on the unit. Callers drain
//! them with [`crate::unit::Unit::flush_events`] into any
//! [`NotificationSink`]. Events are advisory only; the core never reads
//! them back for control flow.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::facility::OperationalCapacity;
use crate::ids::{LeaderId, UnitId};

/// Something that happened to a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitEvent {
    /// Facility damage increased.
    FacilityDamaged {
        /// The facility unit.
        unit: UnitId,
        /// Damage after the change.
        damage: i32,
        /// Capacity tier after the change.
        capacity: OperationalCapacity,
    },
    /// Facility damage decreased.
    FacilityRepaired {
        /// The facility unit.
        unit: UnitId,
        /// Damage after the change.
        damage: i32,
        /// Capacity tier after the change.
        capacity: OperationalCapacity,
    },
    /// A depot delivered supply.
    SupplyDelivered {
        /// The depot unit.
        depot: UnitId,
        /// Days of supply delivered (hundredths).
        delivered_centi: i64,
        /// Days remaining in the stockpile (hundredths).
        remaining_centi: i64,
    },
    /// A depot was upgraded to a larger size.
    DepotUpgraded {
        /// The depot unit.
        depot: UnitId,
        /// Size name after the upgrade.
        size: String,
    },
    /// An aircraft was attached to an airbase.
    AircraftAttached {
        /// The airbase.
        airbase: UnitId,
        /// The aircraft.
        aircraft: UnitId,
    },
    /// An aircraft was detached from an airbase.
    AircraftDetached {
        /// The airbase.
        airbase: UnitId,
        /// The aircraft.
        aircraft: UnitId,
    },
    /// A leader took command.
    LeaderAssigned {
        /// The unit.
        unit: UnitId,
        /// The leader.
        leader: LeaderId,
    },
    /// A leader left command.
    LeaderRemoved {
        /// The unit.
        unit: UnitId,
        /// The leader.
        leader: LeaderId,
    },
    /// The unit gained an experience level.
    ExperienceGained {
        /// The unit.
        unit: UnitId,
        /// Level name after the change.
        level: String,
    },
    /// A persisted reference could not be restored and was dropped.
    IntegrityWarning {
        /// The unit holding the reference.
        unit: UnitId,
        /// Human-readable explanation.
        detail: String,
    },
    /// An operation was rejected at the boundary.
    OperationRejected {
        /// The unit.
        unit: UnitId,
        /// Operation name.
        operation: String,
        /// Reason, from the error that was caught.
        reason: String,
    },
}

fn centi(value: i64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

impl fmt::Display for UnitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FacilityDamaged {
                unit,
                damage,
                capacity,
            } => write!(f, "{unit} damaged: {damage}% ({capacity:?})"),
            Self::FacilityRepaired {
                unit,
                damage,
                capacity,
            } => write!(f, "{unit} repaired: {damage}% damage ({capacity:?})"),
            Self::SupplyDelivered {
                depot,
                delivered_centi,
                remaining_centi,
            } => write!(
                f,
                "{depot} delivered {} days of supply, {} remaining",
                centi(*delivered_centi),
                centi(*remaining_centi)
            ),
            Self::DepotUpgraded { depot, size } => write!(f, "{depot} upgraded to {size}"),
            Self::AircraftAttached { airbase, aircraft } => {
                write!(f, "{aircraft} attached to {airbase}")
            }
            Self::AircraftDetached { airbase, aircraft } => {
                write!(f, "{aircraft} detached from {airbase}")
            }
            Self::LeaderAssigned { unit, leader } => write!(f, "{leader} took command of {unit}"),
            Self::LeaderRemoved { unit, leader } => write!(f, "{leader} left command of {unit}"),
            Self::ExperienceGained { unit, level } => write!(f, "{unit} is now {level}"),
            Self::IntegrityWarning { unit, detail } => write!(f, "{unit}: {detail}"),
            Self::OperationRejected {
                unit,
                operation,
                reason,
            } => write!(f, "{unit}: {operation} rejected: {reason}"),
        }
    }
}

/// Write-only receiver of human-readable notifications.
pub trait NotificationSink {
    /// Receive one message.
    fn notify(&mut self, message: &str);
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _message: &str) {}
}

/// Sink that keeps every message in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<String>,
}

impl MessageLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Check if any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl NotificationSink for MessageLog {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
