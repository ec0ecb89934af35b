//! Purpose: Own the enable toggle and the per-document observer lifecycle.
//! Exports: `Session`.
//! Role: Coordinator between host notifications and the tool tracker.
//! Invariants: At most one tracker exists at a time; enable detaches before
//! re-attaching and disable is a no-op when already detached.
//! Invariants: A failed capability probe leaves the toggle off and every
//! other piece of state untouched.

use tracing::info;

use crate::core::error::{Error, ErrorKind};
use crate::core::event::TransactionTag;
use crate::core::host::{HostDocument, TransactionSupport};
use crate::core::tracker::ToolTracker;

#[derive(Debug, Default)]
pub struct Session {
    tracker: Option<ToolTracker>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(&self) -> bool {
        self.tracker.is_some()
    }

    /// Flip automatic smoothing for the given document. Returns the new
    /// state; enabling probes the host for transaction support first.
    pub fn toggle<D: HostDocument>(&mut self, doc: &D) -> Result<bool, Error> {
        if self.enabled() {
            self.disable();
            Ok(false)
        } else {
            self.enable(doc)?;
            Ok(true)
        }
    }

    pub fn enable<D: HostDocument>(&mut self, doc: &D) -> Result<(), Error> {
        // Detach first so repeated enables can never stack observers.
        self.tracker = None;
        if doc.transaction_support() == TransactionSupport::Unsupported {
            return Err(Error::new(ErrorKind::Incompatible)
                .with_message("this host cannot group edits into undoable operations")
                .with_hint("Upgrade the host application to a release with undo transactions."));
        }
        self.tracker = Some(ToolTracker::new());
        info!("automatic smoothing enabled");
        Ok(())
    }

    pub fn disable(&mut self) {
        if self.tracker.take().is_some() {
            info!("automatic smoothing disabled");
        }
    }

    /// The host created a fresh document; observe it with a clean slate.
    pub fn on_new_document(&mut self) {
        self.reattach();
    }

    /// The host opened an existing document.
    pub fn on_document_opened(&mut self) {
        self.reattach();
    }

    fn reattach(&mut self) {
        if self.tracker.is_some() {
            // Edge snapshots never survive a document switch.
            self.tracker = Some(ToolTracker::new());
            info!("re-attached to the active document");
        }
    }

    pub fn on_active_tool_changed<D: HostDocument>(
        &mut self,
        doc: &D,
        tool_id: u32,
        tool_name: &str,
    ) {
        if let Some(tracker) = &mut self.tracker {
            tracker.on_active_tool_changed(doc, tool_id, tool_name);
        }
    }

    pub fn on_tool_state_changed<D: HostDocument>(
        &mut self,
        doc: &mut D,
        tool_id: u32,
        tool_name: &str,
        state: u32,
    ) {
        if let Some(tracker) = &mut self.tracker {
            tracker.on_tool_state_changed(doc, tool_id, tool_name, state);
        }
    }

    pub fn on_transaction<D: HostDocument>(&mut self, doc: &mut D, tag: TransactionTag) {
        if let Some(tracker) = &mut self.tracker {
            tracker.on_transaction(doc, tag);
        }
    }
}
