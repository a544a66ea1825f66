//! Collaborator seams: payment collection and notification dispatch.
//!
//! Both are external services as far as the core is concerned. Payment runs
//! before the reservation write and a failure aborts the booking;
//! notifications run after commit and a failure must never undo the write.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;

/// Charges a deposit through the configured payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Collects `amount_cents` in `currency`, returning the provider's
    /// transaction reference. The reference is bookkeeping only; it plays
    /// no part in conflict resolution.
    async fn charge(
        &self,
        amount_cents: i64,
        currency: &str,
        description: &str,
    ) -> Result<String>;
}

/// Structured booking data handed to the notification collaborator.
#[derive(Debug, Clone)]
pub struct BookingNotice {
    pub restaurant_name: String,
    pub guest_name: String,
    pub guest_email: String,
    pub date: NaiveDate,
    pub slot_time: NaiveTime,
    pub party_size: i32,
}

/// Sends confirmation and cancellation messages to owner and guest.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn reservation_confirmed(&self, notice: &BookingNotice) -> Result<()>;

    async fn reservation_cancelled(&self, notice: &BookingNotice) -> Result<()>;
}
