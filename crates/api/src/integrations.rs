//! Default collaborator implementations.
//!
//! Production deployments wire a real payment provider and mail sender into
//! [`ApiState`](crate::ApiState); these tracing-backed versions keep the
//! booking pipeline whole without external accounts. The payment gateway
//! approves every charge and mints a locally unique reference.

use async_trait::async_trait;
use eyre::Result;
use rand::Rng;
use tably_core::integrations::{BookingNotice, Notifier, PaymentGateway};

/// Payment gateway that records the charge in the log and approves it.
pub struct LogPaymentGateway;

#[async_trait]
impl PaymentGateway for LogPaymentGateway {
    async fn charge(&self, amount_cents: i64, currency: &str, description: &str) -> Result<String> {
        let reference = format!("log-{:012x}", rand::thread_rng().r#gen::<u64>() & 0xffff_ffff_ffff);
        tracing::info!(
            "Charging deposit: amount_cents={}, currency={}, reference={}, description={}",
            amount_cents,
            currency,
            reference,
            description
        );
        Ok(reference)
    }
}

/// Notifier that writes confirmations and cancellations to the log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn reservation_confirmed(&self, notice: &BookingNotice) -> Result<()> {
        tracing::info!(
            "Reservation confirmed: restaurant={}, guest={} <{}>, date={}, slot={}, party_size={}",
            notice.restaurant_name,
            notice.guest_name,
            notice.guest_email,
            notice.date,
            notice.slot_time,
            notice.party_size
        );
        Ok(())
    }

    async fn reservation_cancelled(&self, notice: &BookingNotice) -> Result<()> {
        tracing::info!(
            "Reservation cancelled: restaurant={}, guest={} <{}>, date={}, slot={}",
            notice.restaurant_name,
            notice.guest_name,
            notice.guest_email,
            notice.date,
            notice.slot_time
        );
        Ok(())
    }
}
