//! Purpose: Detect Move-tool numeric (VCB) adjustments from transaction tags.
//! Exports: `VcbDetector`.
//! Role: Auxiliary trigger for edits that emit no tool state change.
//! Invariants: Only the trailing three logged tags ever decide a match.
//! Invariants: A successful match leaves the log intact; only a non-matching
//! commit or an explicit reset clears it.

use crate::core::event::TransactionTag;

/// Tail produced when a value typed into the measurement box revises the
/// previous Move: the host undoes the old result, then starts and commits a
/// replacement without any tool state change in between. A genuine
/// Move > Undo > Move gesture interposes a state change, whose `reset`
/// breaks the pattern.
const ADJUSTMENT_TAIL: [TransactionTag; 3] = [
    TransactionTag::Undo,
    TransactionTag::Start,
    TransactionTag::Commit,
];

#[derive(Debug, Default)]
pub struct VcbDetector {
    log: Vec<TransactionTag>,
}

impl VcbDetector {
    pub fn new() -> Self {
        Self { log: Vec::new() }
    }

    /// Forget every tag seen so far. The owning tracker calls this on each
    /// genuine tool state change.
    pub fn reset(&mut self) {
        self.log.clear();
    }

    /// Record one transaction notification. Returns true when the trailing
    /// tags spell out a numeric adjustment.
    pub fn record(&mut self, tag: TransactionTag) -> bool {
        self.log.push(tag);
        if self.log.len() > ADJUSTMENT_TAIL.len() {
            self.log.remove(0);
        }
        if tag != TransactionTag::Commit {
            return false;
        }
        if self.log == ADJUSTMENT_TAIL {
            true
        } else {
            self.log.clear();
            false
        }
    }
}
