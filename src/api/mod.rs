//! Purpose: Define the stable public Rust API boundary for autosmooth.
//! Exports: Session, tracker, detector, host contract, and error types.
//! Role: Public surface consumed by host adapters, the CLI, and tests.
//! Invariants: This module is the only public path to the core modules.
//! Invariants: Internal modules remain private and are not directly exposed.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::event::{
    TOOL_MOVE, TOOL_ROTATE, TOOL_SCALE, ToolState, TransactionTag, WatchedTool,
};
pub use crate::core::host::{EdgeId, HostDocument, TransactionSupport};
pub use crate::core::session::Session;
pub use crate::core::smooth::smooth_edges;
pub use crate::core::tracker::ToolTracker;
pub use crate::core::vcb::VcbDetector;
