//! Purpose: Track the active edit tool and diff boundary edges across gestures.
//! Exports: `ToolTracker`.
//! Role: Primary driver; classifies tool notifications and runs smoothing.
//! Invariants: The edge snapshot is replaced wholesale on every capture and
//! after every detection, never merged.
//! Invariants: State changes for tools other than the recorded active one
//! are ignored.

use std::collections::HashSet;

use tracing::debug;

use crate::core::event::{ToolState, TransactionTag, WatchedTool};
use crate::core::host::{EdgeId, HostDocument};
use crate::core::smooth::smooth_edges;
use crate::core::vcb::VcbDetector;

#[derive(Debug, Default)]
pub struct ToolTracker {
    active_tool: Option<u32>,
    snapshot: HashSet<EdgeId>,
    vcb: Option<VcbDetector>,
}

impl ToolTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_active_tool_changed<D: HostDocument>(
        &mut self,
        doc: &D,
        tool_id: u32,
        tool_name: &str,
    ) {
        debug!(tool_id, tool_name, "active tool changed");

        // The host can deliver a state change for the previous tool after
        // the new one is already reported active. Recording the id first
        // lets those stale events be rejected; otherwise activating Move,
        // Rotate or Scale right after drawing and extruding a face would
        // smooth the freshly drawn edges.
        self.active_tool = Some(tool_id);

        // The transaction watcher stays attached only while Move is active,
        // keeping the number of standing observers at a minimum.
        self.vcb = None;

        match WatchedTool::from_id(tool_id) {
            Some(WatchedTool::Move) => {
                // Numeric adjustments on Move emit no state change, so
                // transaction events are the only way to catch them.
                self.vcb = Some(VcbDetector::new());
                self.snapshot.clear();
            }
            Some(WatchedTool::Rotate) => {
                // Rotate emits no state change on activation and never
                // reports state 1, so the baseline is captured here.
                self.capture(doc);
            }
            Some(WatchedTool::Scale) | None => {
                self.snapshot.clear();
            }
        }
    }

    pub fn on_tool_state_changed<D: HostDocument>(
        &mut self,
        doc: &mut D,
        tool_id: u32,
        tool_name: &str,
        state: u32,
    ) {
        debug!(tool_id, tool_name, state, "tool state changed");

        // A real state change means the VCB pattern is not in play for this
        // gesture.
        if let Some(vcb) = &mut self.vcb {
            vcb.reset();
        }

        if self.active_tool != Some(tool_id) {
            debug!(tool_id, "ignoring state change for inactive tool");
            return;
        }

        let Some(tool) = WatchedTool::from_id(tool_id) else {
            return;
        };

        match tool {
            WatchedTool::Move | WatchedTool::Scale => match ToolState::from_raw(state) {
                Some(ToolState::Ready) => {
                    if !self.snapshot.is_empty() {
                        self.detect_new_edges(doc, tool);
                    }
                }
                Some(ToolState::Action) => self.capture(doc),
                None => {}
            },
            WatchedTool::Rotate => {
                if self.snapshot.is_empty() {
                    self.capture(doc);
                } else {
                    self.detect_new_edges(doc, tool);
                }
            }
        }
    }

    /// Feed one transaction notification to the VCB watcher; when the
    /// adjustment pattern completes, run edge detection for Move.
    pub fn on_transaction<D: HostDocument>(&mut self, doc: &mut D, tag: TransactionTag) {
        let Some(vcb) = &mut self.vcb else {
            return;
        };
        if vcb.record(tag) {
            debug!("numeric adjustment detected");
            self.detect_new_edges(doc, WatchedTool::Move);
        }
    }

    fn capture<D: HostDocument>(&mut self, doc: &D) {
        self.snapshot = doc.boundary_edges().into_iter().collect();
        debug!(edges = self.snapshot.len(), "captured edge snapshot");
    }

    fn detect_new_edges<D: HostDocument>(&mut self, doc: &mut D, tool: WatchedTool) {
        let live: HashSet<EdgeId> = doc.boundary_edges().into_iter().collect();
        let mut new_edges: Vec<EdgeId> = live.difference(&self.snapshot).copied().collect();
        new_edges.sort_unstable();
        debug!(new_edges = new_edges.len(), "computed edge delta");
        smooth_edges(doc, &new_edges, tool);
        // Later gestures in the same tool session diff against the
        // post-smoothing state.
        self.snapshot = live;
    }
}

#[cfg(test)]
mod tests {
    use super::ToolTracker;
    use crate::core::event::{TOOL_MOVE, TOOL_ROTATE, TOOL_SCALE, TransactionTag};
    use crate::core::host::EdgeId;
    use crate::sim::SimDocument;

    const TOOL_SELECT: u32 = 21022;

    fn doc_with_edges(ids: &[u64]) -> SimDocument {
        let mut doc = SimDocument::new();
        for id in ids {
            doc.add_edge(EdgeId(*id), 2);
        }
        doc
    }

    #[test]
    fn move_gesture_smooths_only_new_edges() {
        let mut doc = doc_with_edges(&[1, 2]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_MOVE, "MoveTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        doc.add_edge(EdgeId(3), 2);
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 0);

        let transactions = doc.take_transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].edges, vec![EdgeId(3)]);
    }

    #[test]
    fn move_stop_with_empty_snapshot_is_a_no_op() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_MOVE, "MoveTool");
        // No Action state was seen, so there is nothing to diff against.
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 0);
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn removed_edges_are_not_reported_as_new() {
        let mut doc = doc_with_edges(&[1, 2, 3]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_SCALE, "ScaleTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_SCALE, "ScaleTool", 1);
        doc.remove_edge(EdgeId(2));
        tracker.on_tool_state_changed(&mut doc, TOOL_SCALE, "ScaleTool", 0);
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn stale_state_change_for_inactive_tool_is_ignored() {
        let mut doc = doc_with_edges(&[1, 2]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_ROTATE, "RotateTool");
        doc.add_edge(EdgeId(3), 2);
        // A late state change from the previous Move session must neither
        // trigger detection nor disturb the Rotate snapshot.
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        assert!(doc.take_transactions().is_empty());

        tracker.on_tool_state_changed(&mut doc, TOOL_ROTATE, "RotateTool", 0);
        let transactions = doc.take_transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].edges, vec![EdgeId(3)]);
    }

    #[test]
    fn rotate_captures_on_activation_and_detects_on_state_change() {
        let mut doc = doc_with_edges(&[1, 2]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_ROTATE, "RotateTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_ROTATE, "RotateTool", 0);
        // No new edges appeared, so no transaction is opened.
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn unknown_state_values_are_ignored_for_move() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_MOVE, "MoveTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        doc.add_edge(EdgeId(2), 2);
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 7);
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn switching_to_an_unwatched_tool_clears_the_snapshot() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_ROTATE, "RotateTool");
        tracker.on_active_tool_changed(&doc, TOOL_SELECT, "SelectionTool");
        doc.add_edge(EdgeId(2), 2);
        // Back on Rotate the old snapshot is gone; this capture replaces it
        // instead of diffing against stale state.
        tracker.on_active_tool_changed(&doc, TOOL_ROTATE, "RotateTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_ROTATE, "RotateTool", 0);
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn vcb_adjustment_triggers_detection_without_state_change() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_MOVE, "MoveTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        doc.add_edge(EdgeId(2), 2);

        tracker.on_transaction(&mut doc, TransactionTag::Undo);
        tracker.on_transaction(&mut doc, TransactionTag::Start);
        tracker.on_transaction(&mut doc, TransactionTag::Commit);

        let transactions = doc.take_transactions();
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].edges, vec![EdgeId(2)]);
        assert_eq!(transactions[0].name, "Move");
    }

    #[test]
    fn state_change_reset_blocks_vcb_false_positive() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_MOVE, "MoveTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        doc.add_edge(EdgeId(2), 2);

        // Move > Undo > Move again: the interposed state change resets the
        // watcher, so the following start/commit is not an adjustment.
        tracker.on_transaction(&mut doc, TransactionTag::Undo);
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        tracker.on_transaction(&mut doc, TransactionTag::Start);
        tracker.on_transaction(&mut doc, TransactionTag::Commit);
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn transactions_are_ignored_outside_move() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_SCALE, "ScaleTool");
        doc.add_edge(EdgeId(2), 2);
        tracker.on_transaction(&mut doc, TransactionTag::Undo);
        tracker.on_transaction(&mut doc, TransactionTag::Start);
        tracker.on_transaction(&mut doc, TransactionTag::Commit);
        assert!(doc.take_transactions().is_empty());
    }

    #[test]
    fn second_gesture_diffs_against_post_smoothing_state() {
        let mut doc = doc_with_edges(&[1]);
        let mut tracker = ToolTracker::new();

        tracker.on_active_tool_changed(&doc, TOOL_MOVE, "MoveTool");
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        doc.add_edge(EdgeId(2), 2);
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 0);
        assert_eq!(doc.take_transactions().len(), 1);

        // Edge 2 is now part of the baseline; a gesture creating nothing new
        // must not re-smooth it.
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 1);
        tracker.on_tool_state_changed(&mut doc, TOOL_MOVE, "MoveTool", 0);
        assert!(doc.take_transactions().is_empty());
    }
}
