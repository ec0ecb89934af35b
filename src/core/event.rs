//! Purpose: Shared vocabulary for host tool and transaction notifications.
//! Exports: `TOOL_MOVE`, `TOOL_ROTATE`, `TOOL_SCALE`, `WatchedTool`, `ToolState`, `TransactionTag`.
//! Role: Classifies raw notification payloads for the tracker and VCB detector.
//! Invariants: Tool ids match the host's built-in Move/Rotate/Scale tools.
//! Invariants: Transaction tags keep the host's numeric notification order.

use serde::{Deserialize, Serialize};

/// Host id of the built-in Move tool.
pub const TOOL_MOVE: u32 = 21048;
/// Host id of the built-in Rotate tool.
pub const TOOL_ROTATE: u32 = 21129;
/// Host id of the built-in Scale tool.
pub const TOOL_SCALE: u32 = 21236;

/// The three edit tools whose gestures can auto-fold faces.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum WatchedTool {
    Move,
    Rotate,
    Scale,
}

impl WatchedTool {
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            TOOL_MOVE => Some(WatchedTool::Move),
            TOOL_ROTATE => Some(WatchedTool::Rotate),
            TOOL_SCALE => Some(WatchedTool::Scale),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            WatchedTool::Move => TOOL_MOVE,
            WatchedTool::Rotate => TOOL_ROTATE,
            WatchedTool::Scale => TOOL_SCALE,
        }
    }

    /// Host-neutral English label, also the default undo-entry name.
    pub fn label(self) -> &'static str {
        match self {
            WatchedTool::Move => "Move",
            WatchedTool::Rotate => "Rotate",
            WatchedTool::Scale => "Scale",
        }
    }
}

/// Sub-state carried by a tool state-change notification. The host reports
/// 0 when a tool starts or stops and 1 while an action is in progress.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToolState {
    Ready,
    Action,
}

impl ToolState {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(ToolState::Ready),
            1 => Some(ToolState::Action),
            _ => None,
        }
    }
}

/// Transaction lifecycle notifications, in the host's numeric order (0..=5).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionTag {
    Abort,
    Commit,
    Empty,
    Redo,
    Start,
    Undo,
}

#[cfg(test)]
mod tests {
    use super::{ToolState, WatchedTool};

    #[test]
    fn watched_tool_ids_round_trip() {
        for tool in [WatchedTool::Move, WatchedTool::Rotate, WatchedTool::Scale] {
            assert_eq!(WatchedTool::from_id(tool.id()), Some(tool));
        }
    }

    #[test]
    fn unwatched_ids_are_rejected() {
        assert_eq!(WatchedTool::from_id(0), None);
        assert_eq!(WatchedTool::from_id(21022), None);
    }

    #[test]
    fn tool_state_parses_known_values_only() {
        assert_eq!(ToolState::from_raw(0), Some(ToolState::Ready));
        assert_eq!(ToolState::from_raw(1), Some(ToolState::Action));
        assert_eq!(ToolState::from_raw(2), None);
    }
}
