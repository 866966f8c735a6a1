use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

use super::fingerprint::{fingerprint, NotificationState, StockTransition};
use super::threshold;
use crate::db::services as db_services;
use crate::notifications::credentials::CredentialResolver;
use crate::notifications::dispatcher::{self, AlertDispatcher};

/// Work requests accepted by the monitor's queue. Mutation paths and the bot
/// publish these instead of touching the dedupe state themselves, keeping the
/// read-decide-write sequence inside a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockCheckRequest {
    /// Run a check-and-notify cycle now.
    Check,
    /// Clear the dedupe fingerprint first, then run a cycle.
    ResetAndCheck,
}

/// Background task that polls the inventory on a fixed period, evaluates
/// thresholds, and drives the dispatcher when the low-stock picture changes.
/// It is the sole owner of the `NotificationState`.
pub struct StockMonitor {
    db: DatabaseConnection,
    dispatcher: Arc<AlertDispatcher>,
    credentials: CredentialResolver,
    state: NotificationState,
    request_rx: mpsc::Receiver<StockCheckRequest>,
    // Held so `recv` can never observe a fully closed channel.
    _request_tx: mpsc::Sender<StockCheckRequest>,
}

impl StockMonitor {
    pub fn new(
        db: DatabaseConnection,
        dispatcher: Arc<AlertDispatcher>,
        credentials: CredentialResolver,
    ) -> (Self, mpsc::Sender<StockCheckRequest>) {
        let (request_tx, request_rx) = mpsc::channel(32);
        let monitor = Self {
            db,
            dispatcher,
            credentials,
            state: NotificationState::new(),
            request_rx,
            _request_tx: request_tx.clone(),
        };
        (monitor, request_tx)
    }

    /// Runs for the lifetime of the process. A failed cycle is logged and the
    /// loop continues with the next tick or request.
    pub async fn run(mut self, period: Duration) {
        info!(
            period_secs = period.as_secs(),
            "Low-stock monitor started."
        );
        let mut ticker = interval(period);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_check_cycle().await {
                        error!(error = %e, "Low-stock check cycle failed");
                    }
                }
                request = self.request_rx.recv() => {
                    if let Some(request) = request {
                        if request == StockCheckRequest::ResetAndCheck {
                            self.state.reset();
                        }
                        if let Err(e) = self.run_check_cycle().await {
                            error!(error = %e, "Requested low-stock check failed");
                        }
                    }
                }
            }
        }
    }

    async fn run_check_cycle(&mut self) -> Result<(), DbErr> {
        // No registered target is not an error; the monitor just idles.
        if self.credentials.chat_id().await?.is_none() {
            debug!("Low-stock check skipped: missing chat id");
            return Ok(());
        }

        let items = db_services::list_items(&self.db, None).await?;
        let low_items: Vec<_> = items
            .into_iter()
            .filter(|item| threshold::is_low(item))
            .collect();

        match self.state.observe(fingerprint(&low_items)) {
            StockTransition::Unchanged => {
                debug!("Low stock notification skipped - no change in inventory status");
            }
            StockTransition::AlertLow => {
                let message = dispatcher::format_low_stock_alert(&low_items);
                self.dispatcher.dispatch(&message).await;
                info!(
                    low_count = low_items.len(),
                    "Low stock notification sent - inventory status changed"
                );
            }
            StockTransition::AllClear => {
                self.dispatcher.dispatch(dispatcher::ALL_CLEAR_MESSAGE).await;
                info!("All-clear notification sent - no items below threshold");
            }
        }
        Ok(())
    }
}
