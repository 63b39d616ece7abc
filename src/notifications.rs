//! Driver notification feed.
//!
//! A small, bounded, newest-first list of messages shown next to the ride
//! status. The feed reacts to ride transitions: accepting a ride clears the
//! pending pickup request, and finishing a ride posts a payment receipt.

use heapless::Vec as HVec;
use serde::{Deserialize, Serialize};

use crate::config::TripConfig;
use crate::ride::{RideCommand, RideTransition};

/// Maximum number of notifications kept; older entries are evicted.
pub const FEED_CAPACITY: usize = 8;

/// Category of a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Ride request waiting for pickup.
    Pickup,
    /// Drop-off related.
    Dropoff,
    /// Payment received.
    Payment,
    /// Rider feedback.
    Rating,
    /// General information.
    Info,
}

/// One entry in the feed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique within the session.
    pub id: u32,
    /// Category.
    pub kind: NotificationKind,
    /// Headline.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Clock time when posted (ms).
    pub created_ms: u64,
    /// Whether the renderer should highlight it.
    pub urgent: bool,
}

/// Bounded, newest-first notification list.
#[derive(Clone, Debug)]
pub struct NotificationFeed {
    items: HVec<Notification, FEED_CAPACITY>,
    next_id: u32,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationFeed {
    /// An empty feed.
    pub fn new() -> Self {
        Self {
            items: HVec::new(),
            next_id: 1,
        }
    }

    /// The feed a driver sees when the console starts.
    pub fn with_defaults() -> Self {
        let mut feed = Self::new();
        feed.push(
            NotificationKind::Info,
            "Traffic Update",
            "Alternative route suggested",
            false,
            0,
        );
        feed.push(
            NotificationKind::Pickup,
            "New Ride Request",
            "Passenger waiting at Central Station",
            true,
            0,
        );
        feed
    }

    /// Post a notification at the front. Returns its id.
    pub fn push(
        &mut self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        urgent: bool,
        now_ms: u64,
    ) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);

        if self.items.is_full() {
            self.items.pop();
        }
        let notification = Notification {
            id,
            kind,
            title: title.into(),
            message: message.into(),
            created_ms: now_ms,
            urgent,
        };
        // Cannot fail: a slot was freed above if needed.
        let _ = self.items.insert(0, notification);
        id
    }

    /// Remove every notification of a kind. Returns how many were removed.
    pub fn remove_kind(&mut self, kind: NotificationKind) -> usize {
        let before = self.items.len();
        self.items.retain(|n| n.kind != kind);
        before - self.items.len()
    }

    /// Remove one notification by id.
    pub fn dismiss(&mut self, id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        before != self.items.len()
    }

    /// Apply the side effects of a ride transition.
    pub fn on_transition(&mut self, transition: &RideTransition, trip: &TripConfig, now_ms: u64) {
        match transition.command {
            RideCommand::AcceptRide => {
                self.remove_kind(NotificationKind::Pickup);
            }
            RideCommand::EndRide => {
                self.push(
                    NotificationKind::Payment,
                    "Ride Completed",
                    format!("Payment received: {}", trip.rider.fare),
                    false,
                    now_ms,
                );
            }
            RideCommand::StartRide | RideCommand::ToggleOnline => {}
        }
    }

    /// Newest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
