//! Single-writer driver.
//!
//! Moves an [`OrderTracker`] into its own task and feeds it commands from
//! any number of producers. Commands are applied strictly in arrival order,
//! so reconciliation and status passes never overlap.
//!
//! ```text
//! snapshot task ──┐
//! panel scraper ──┼──> mpsc::Sender<TrackerCommand> ──> TrackerDriver ──> OrderTracker
//! chat handler  ──┘
//! ```

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use super::ports::TrackerListener;
use super::tracker::OrderTracker;
use crate::domain::market::{MarketSnapshot, QueuePosition};
use crate::domain::order_protection::{OrderProposal, SubmissionDecision, ValidationResult};
use crate::domain::order_tracking::{
    ConfirmationEvent, FillEvent, OrderSide, OutstandingOrder, PanelOrderInfo, SyncResult,
    TrackedOrder, TrackedOrderId,
};
use crate::domain::shared::ProductCatalog;
use crate::error::{TrackerError, UnmatchedConfirmation, UnmatchedFill};

/// A request to the driver task. Every command carries its reply channel.
pub enum TrackerCommand {
    /// Register a listener.
    AddListener {
        /// Listener to register.
        listener: Box<dyn TrackerListener>,
        /// Reply.
        reply: oneshot::Sender<()>,
    },
    /// Replace the product catalog.
    SetCatalog {
        /// New catalog.
        catalog: ProductCatalog,
        /// Reply.
        reply: oneshot::Sender<()>,
    },
    /// Reconcile a panel scrape.
    SyncPanel {
        /// Full scrape.
        entries: Vec<PanelOrderInfo>,
        /// Reply.
        reply: oneshot::Sender<SyncResult>,
    },
    /// Apply a market snapshot.
    ApplySnapshot {
        /// New snapshot.
        snapshot: MarketSnapshot,
        /// Reply.
        reply: oneshot::Sender<()>,
    },
    /// Stage a placement.
    StageOutstanding {
        /// Placement.
        order: OutstandingOrder,
        /// Reply.
        reply: oneshot::Sender<()>,
    },
    /// Confirm a staged placement.
    ConfirmOutstanding {
        /// Parsed confirmation.
        event: ConfirmationEvent,
        /// Reply.
        reply: oneshot::Sender<Result<TrackedOrderId, UnmatchedConfirmation>>,
    },
    /// Remove a filled order.
    RemoveFilled {
        /// Parsed fill notice.
        event: FillEvent,
        /// Reply.
        reply: oneshot::Sender<Result<TrackedOrder, UnmatchedFill>>,
    },
    /// Validate a proposal.
    ValidateProposal {
        /// Proposal.
        proposal: OrderProposal,
        /// Reply.
        reply: oneshot::Sender<ValidationResult>,
    },
    /// Validate a proposal and apply the override.
    CheckSubmission {
        /// Proposal.
        proposal: OrderProposal,
        /// Whether the user is forcing submission.
        override_active: bool,
        /// Reply.
        reply: oneshot::Sender<SubmissionDecision>,
    },
    /// Queue position against the last applied snapshot.
    QueuePosition {
        /// Product display name.
        product_name: String,
        /// Side.
        side: OrderSide,
        /// Price to rank.
        price: f64,
        /// Reply.
        reply: oneshot::Sender<Option<QueuePosition>>,
    },
    /// Copy of the tracked orders.
    TrackedOrders {
        /// Reply.
        reply: oneshot::Sender<Vec<TrackedOrder>>,
    },
    /// Clear all state.
    Reset {
        /// Reply.
        reply: oneshot::Sender<()>,
    },
}

/// Task that owns the tracker.
pub struct TrackerDriver {
    rx: mpsc::Receiver<TrackerCommand>,
    tracker: OrderTracker,
}

impl TrackerDriver {
    /// Spawn the driver task and return a handle to it.
    ///
    /// The task stops once every handle has been dropped. Must be called
    /// from within a tokio runtime.
    #[must_use]
    pub fn spawn(tracker: OrderTracker, buffer: usize) -> TrackerHandle {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let driver = Self { rx, tracker };
        tokio::spawn(driver.run());
        TrackerHandle { tx }
    }

    /// Process commands until the channel closes.
    pub async fn run(mut self) {
        info!("Tracker driver started");
        let mut processed: u64 = 0;

        while let Some(command) = self.rx.recv().await {
            processed += 1;
            self.handle(command);
        }

        info!(processed, "Tracker driver stopped");
    }

    // A dropped reply receiver only means the caller stopped waiting.
    fn handle(&mut self, command: TrackerCommand) {
        let tracker = &mut self.tracker;
        match command {
            TrackerCommand::AddListener { listener, reply } => {
                tracker.add_boxed_listener(listener);
                let _ = reply.send(());
            }
            TrackerCommand::SetCatalog { catalog, reply } => {
                tracker.set_catalog(catalog);
                let _ = reply.send(());
            }
            TrackerCommand::SyncPanel { entries, reply } => {
                let _ = reply.send(tracker.sync_panel(entries));
            }
            TrackerCommand::ApplySnapshot { snapshot, reply } => {
                tracker.apply_snapshot(snapshot);
                let _ = reply.send(());
            }
            TrackerCommand::StageOutstanding { order, reply } => {
                tracker.stage_outstanding(order);
                let _ = reply.send(());
            }
            TrackerCommand::ConfirmOutstanding { event, reply } => {
                let _ = reply.send(tracker.confirm_outstanding(event));
            }
            TrackerCommand::RemoveFilled { event, reply } => {
                let _ = reply.send(tracker.remove_filled(event));
            }
            TrackerCommand::ValidateProposal { proposal, reply } => {
                let _ = reply.send(tracker.validate_proposal(&proposal));
            }
            TrackerCommand::CheckSubmission {
                proposal,
                override_active,
                reply,
            } => {
                let _ = reply.send(tracker.check_submission(&proposal, override_active));
            }
            TrackerCommand::QueuePosition {
                product_name,
                side,
                price,
                reply,
            } => {
                let position = tracker
                    .snapshot()
                    .and_then(|snap| tracker.queue_position(&product_name, side, price, snap));
                let _ = reply.send(position);
            }
            TrackerCommand::TrackedOrders { reply } => {
                let _ = reply.send(tracker.tracked_orders().to_vec());
            }
            TrackerCommand::Reset { reply } => {
                tracker.reset();
                let _ = reply.send(());
            }
        }
        debug!(tracked = tracker.tracked_orders().len(), "Command applied");
    }
}

/// Cloneable handle to a running [`TrackerDriver`].
#[derive(Debug, Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<TrackerCommand>,
}

impl TrackerHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> TrackerCommand,
    ) -> Result<T, TrackerError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(build(reply))
            .await
            .map_err(|_| TrackerError::DriverClosed)?;
        rx.await.map_err(|_| TrackerError::DriverClosed)
    }

    /// Register a listener.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn add_listener(
        &self,
        listener: impl TrackerListener + 'static,
    ) -> Result<(), TrackerError> {
        let listener: Box<dyn TrackerListener> = Box::new(listener);
        self.request(|reply| TrackerCommand::AddListener { listener, reply })
            .await
    }

    /// Replace the product catalog.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn set_catalog(&self, catalog: ProductCatalog) -> Result<(), TrackerError> {
        self.request(|reply| TrackerCommand::SetCatalog { catalog, reply })
            .await
    }

    /// Reconcile a panel scrape.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn sync_panel(
        &self,
        entries: Vec<PanelOrderInfo>,
    ) -> Result<SyncResult, TrackerError> {
        self.request(|reply| TrackerCommand::SyncPanel { entries, reply })
            .await
    }

    /// Apply a market snapshot.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn apply_snapshot(&self, snapshot: MarketSnapshot) -> Result<(), TrackerError> {
        self.request(|reply| TrackerCommand::ApplySnapshot { snapshot, reply })
            .await
    }

    /// Stage a placement.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn stage_outstanding(&self, order: OutstandingOrder) -> Result<(), TrackerError> {
        self.request(|reply| TrackerCommand::StageOutstanding { order, reply })
            .await
    }

    /// Confirm a staged placement.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnmatchedConfirmation` when nothing staged
    /// matches, or `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn confirm_outstanding(
        &self,
        event: ConfirmationEvent,
    ) -> Result<TrackedOrderId, TrackerError> {
        self.request(|reply| TrackerCommand::ConfirmOutstanding { event, reply })
            .await?
            .map_err(TrackerError::from)
    }

    /// Remove a filled order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::UnmatchedFill` when no tracked order fits, or
    /// `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn remove_filled(&self, event: FillEvent) -> Result<TrackedOrder, TrackerError> {
        self.request(|reply| TrackerCommand::RemoveFilled { event, reply })
            .await?
            .map_err(TrackerError::from)
    }

    /// Validate a proposal.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn validate_proposal(
        &self,
        proposal: OrderProposal,
    ) -> Result<ValidationResult, TrackerError> {
        self.request(|reply| TrackerCommand::ValidateProposal { proposal, reply })
            .await
    }

    /// Validate a proposal and apply the override.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn check_submission(
        &self,
        proposal: OrderProposal,
        override_active: bool,
    ) -> Result<SubmissionDecision, TrackerError> {
        self.request(|reply| TrackerCommand::CheckSubmission {
            proposal,
            override_active,
            reply,
        })
        .await
    }

    /// Queue position against the last applied snapshot.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn queue_position(
        &self,
        product_name: impl Into<String>,
        side: OrderSide,
        price: f64,
    ) -> Result<Option<QueuePosition>, TrackerError> {
        let product_name = product_name.into();
        self.request(|reply| TrackerCommand::QueuePosition {
            product_name,
            side,
            price,
            reply,
        })
        .await
    }

    /// Copy of the tracked orders.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn tracked_orders(&self) -> Result<Vec<TrackedOrder>, TrackerError> {
        self.request(|reply| TrackerCommand::TrackedOrders { reply })
            .await
    }

    /// Clear all state.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::DriverClosed` if the driver has stopped.
    pub async fn reset(&self) -> Result<(), TrackerError> {
        self.request(|reply| TrackerCommand::Reset { reply }).await
    }
}
