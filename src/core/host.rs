//! Purpose: Define the host-document contract consumed by the smoothing core.
//! Exports: `EdgeId`, `TransactionSupport`, `HostDocument`.
//! Role: Seam between the host application and the core; the replay simulator
//! and test doubles implement the same trait a real host adapter does.
//! Invariants: The core never creates or destroys edges through this trait.
//! Invariants: `boundary_edges` reports only edges of the active drawing
//! container, never nested group or component geometry.

use serde::{Deserialize, Serialize};

use crate::core::event::WatchedTool;

/// Identity-comparable handle for an edge owned by the host document.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u64);

/// Level of undoable-transaction support probed from the host.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionSupport {
    /// The host cannot group edits into a named undoable operation at all.
    Unsupported,
    /// Transactions work but cannot merge into the previous operation;
    /// smoothing appears as its own undo step after the tool's edit.
    Separate,
    /// Transactions can be made transparent to the preceding operation.
    Transparent,
}

pub trait HostDocument {
    fn transaction_support(&self) -> TransactionSupport;

    /// Edges currently present in the active drawing container.
    fn boundary_edges(&self) -> Vec<EdgeId>;

    /// Number of faces bordered by `edge` (0, 1, 2, or more).
    fn edge_face_count(&self, edge: EdgeId) -> usize;

    fn set_edge_soft(&mut self, edge: EdgeId, soft: bool);
    fn set_edge_smooth(&mut self, edge: EdgeId, smooth: bool);
    fn set_edge_casts_shadows(&mut self, edge: EdgeId, casts_shadows: bool);

    fn begin_transaction(&mut self, name: &str, transparent: bool);
    fn commit_transaction(&mut self);

    /// Localized label naming the undo entry for a tool's edits. Hosts with
    /// translation tables override this; the default is the English label.
    fn action_label(&self, tool: WatchedTool) -> String {
        tool.label().to_string()
    }
}
