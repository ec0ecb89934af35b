//! Purpose: Apply soft/smooth attributes to freshly auto-folded edges.
//! Exports: `smooth_edges`.
//! Role: The only mutating path in the core; one undoable transaction per call.
//! Invariants: Only edges bordered by exactly two faces are touched.
//! Invariants: No transaction is opened when nothing qualifies.

use tracing::debug;

use crate::core::event::WatchedTool;
use crate::core::host::{EdgeId, HostDocument, TransactionSupport};

/// Mark every qualifying edge in `edges` as a smoothed seam, inside a single
/// undoable transaction named after the originating tool. Returns false when
/// there was nothing to do.
pub fn smooth_edges<D: HostDocument>(doc: &mut D, edges: &[EdgeId], tool: WatchedTool) -> bool {
    if edges.is_empty() {
        return false;
    }
    let valid: Vec<EdgeId> = edges
        .iter()
        .copied()
        .filter(|edge| doc.edge_face_count(*edge) == 2)
        .collect();
    if valid.is_empty() {
        debug!(candidates = edges.len(), "no edges with exactly two faces");
        return false;
    }

    let action = doc.action_label(tool);
    // Hosts reporting Separate support still get a correct result; the
    // smoothing just shows up as its own undo step after the tool's edit.
    let transparent = doc.transaction_support() == TransactionSupport::Transparent;
    doc.begin_transaction(&action, transparent);
    for edge in &valid {
        doc.set_edge_soft(*edge, true);
        doc.set_edge_smooth(*edge, true);
        // Cleared so quad-based tooling keeps recognizing the seam.
        doc.set_edge_casts_shadows(*edge, false);
    }
    doc.commit_transaction();
    debug!(edges = valid.len(), action = %action, "smoothed auto-folded edges");
    true
}
