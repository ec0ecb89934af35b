//! Purpose: Deterministic in-memory host plus JSONL event scripts for replay.
//! Exports: `SimDocument`, `SimEdge`, `TransactionRecord`, `ScriptEvent`,
//! `ToolRef`, `ActionRecord`, `Replay`, `read_script`.
//! Role: Host double used by the CLI and tests; lets order-sensitive event
//! sequences be reproduced outside a live modeling session.
//! Invariants: Edge iteration order is deterministic (sorted by id).
//! Invariants: Replaying the same script yields the same action records.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, ErrorKind};
use crate::core::event::{TOOL_MOVE, TOOL_ROTATE, TOOL_SCALE, TransactionTag};
use crate::core::host::{EdgeId, HostDocument, TransactionSupport};
use crate::core::session::Session;

/// Flag state of one simulated edge. Host edges cast shadows until told
/// otherwise.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SimEdge {
    pub faces: usize,
    pub soft: bool,
    pub smooth: bool,
    pub casts_shadows: bool,
}

/// One committed undoable transaction and the edges it touched.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransactionRecord {
    pub name: String,
    pub transparent: bool,
    pub edges: Vec<EdgeId>,
}

#[derive(Debug)]
pub struct SimDocument {
    support: TransactionSupport,
    edges: BTreeMap<EdgeId, SimEdge>,
    open: Option<TransactionRecord>,
    committed: Vec<TransactionRecord>,
}

impl Default for SimDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDocument {
    pub fn new() -> Self {
        Self::with_support(TransactionSupport::Transparent)
    }

    pub fn with_support(support: TransactionSupport) -> Self {
        Self {
            support,
            edges: BTreeMap::new(),
            open: None,
            committed: Vec::new(),
        }
    }

    pub fn support(&self) -> TransactionSupport {
        self.support
    }

    pub fn set_support(&mut self, support: TransactionSupport) {
        self.support = support;
    }

    /// Simulate the host creating an edge with the given bordering-face
    /// count, e.g. as a side effect of auto-fold.
    pub fn add_edge(&mut self, id: EdgeId, faces: usize) {
        self.edges.insert(
            id,
            SimEdge {
                faces,
                soft: false,
                smooth: false,
                casts_shadows: true,
            },
        );
    }

    pub fn remove_edge(&mut self, id: EdgeId) {
        self.edges.remove(&id);
    }

    pub fn edge(&self, id: EdgeId) -> Option<&SimEdge> {
        self.edges.get(&id)
    }

    /// Drain the transactions committed since the last call.
    pub fn take_transactions(&mut self) -> Vec<TransactionRecord> {
        std::mem::take(&mut self.committed)
    }

    fn touch(&mut self, edge: EdgeId) {
        if let Some(open) = &mut self.open
            && !open.edges.contains(&edge)
        {
            open.edges.push(edge);
        }
    }
}

impl HostDocument for SimDocument {
    fn transaction_support(&self) -> TransactionSupport {
        self.support
    }

    fn boundary_edges(&self) -> Vec<EdgeId> {
        self.edges.keys().copied().collect()
    }

    fn edge_face_count(&self, edge: EdgeId) -> usize {
        self.edges.get(&edge).map(|e| e.faces).unwrap_or(0)
    }

    fn set_edge_soft(&mut self, edge: EdgeId, soft: bool) {
        let Some(e) = self.edges.get_mut(&edge) else {
            return;
        };
        e.soft = soft;
        self.touch(edge);
    }

    fn set_edge_smooth(&mut self, edge: EdgeId, smooth: bool) {
        let Some(e) = self.edges.get_mut(&edge) else {
            return;
        };
        e.smooth = smooth;
        self.touch(edge);
    }

    fn set_edge_casts_shadows(&mut self, edge: EdgeId, casts_shadows: bool) {
        let Some(e) = self.edges.get_mut(&edge) else {
            return;
        };
        e.casts_shadows = casts_shadows;
        self.touch(edge);
    }

    fn begin_transaction(&mut self, name: &str, transparent: bool) {
        self.open = Some(TransactionRecord {
            name: name.to_string(),
            transparent,
            edges: Vec::new(),
        });
    }

    fn commit_transaction(&mut self) {
        if let Some(record) = self.open.take() {
            self.committed.push(record);
        }
    }
}

/// One line of a replay script.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Enable,
    Disable,
    Toggle,
    NewDocument,
    OpenDocument,
    Support { level: TransactionSupport },
    ToolChanged { tool: ToolRef },
    ToolState { tool: ToolRef, state: u32 },
    Transaction { tag: TransactionTag },
    AddEdge { id: u64, faces: usize },
    RemoveEdge { id: u64 },
}

/// Tool reference in a script: the name of a watched tool, or a raw host id
/// for anything else.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ToolRef {
    Id(u32),
    Name(String),
}

impl ToolRef {
    fn resolve(&self) -> Result<(u32, String), Error> {
        match self {
            ToolRef::Id(id) => Ok((*id, format!("Tool#{id}"))),
            ToolRef::Name(name) => {
                let id = match name.as_str() {
                    "move" => TOOL_MOVE,
                    "rotate" => TOOL_ROTATE,
                    "scale" => TOOL_SCALE,
                    _ => {
                        return Err(Error::new(ErrorKind::Corrupt)
                            .with_message(format!("unknown tool name: {name}"))
                            .with_hint("Use move, rotate, scale, or a numeric host tool id."));
                    }
                };
                Ok((id, name.clone()))
            }
        }
    }
}

/// One observable consequence of a replayed event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRecord {
    Enabled,
    Disabled,
    Refused {
        message: String,
    },
    Smooth {
        operation: String,
        transparent: bool,
        edges: Vec<EdgeId>,
    },
}

/// Drives a session and a simulated document from script events.
#[derive(Debug, Default)]
pub struct Replay {
    session: Session,
    doc: SimDocument,
}

impl Replay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doc(&self) -> &SimDocument {
        &self.doc
    }

    pub fn apply(&mut self, event: &ScriptEvent) -> Result<Vec<ActionRecord>, Error> {
        let mut actions = Vec::new();
        match event {
            ScriptEvent::Enable => match self.session.enable(&self.doc) {
                Ok(()) => actions.push(ActionRecord::Enabled),
                Err(err) => actions.push(refusal(&err)),
            },
            ScriptEvent::Disable => {
                if self.session.enabled() {
                    self.session.disable();
                    actions.push(ActionRecord::Disabled);
                }
            }
            ScriptEvent::Toggle => match self.session.toggle(&self.doc) {
                Ok(true) => actions.push(ActionRecord::Enabled),
                Ok(false) => actions.push(ActionRecord::Disabled),
                Err(err) => actions.push(refusal(&err)),
            },
            ScriptEvent::NewDocument => {
                self.doc = SimDocument::with_support(self.doc.support());
                self.session.on_new_document();
            }
            ScriptEvent::OpenDocument => {
                self.doc = SimDocument::with_support(self.doc.support());
                self.session.on_document_opened();
            }
            ScriptEvent::Support { level } => self.doc.set_support(*level),
            ScriptEvent::ToolChanged { tool } => {
                let (id, name) = tool.resolve()?;
                self.session.on_active_tool_changed(&self.doc, id, &name);
            }
            ScriptEvent::ToolState { tool, state } => {
                let (id, name) = tool.resolve()?;
                self.session
                    .on_tool_state_changed(&mut self.doc, id, &name, *state);
            }
            ScriptEvent::Transaction { tag } => {
                self.session.on_transaction(&mut self.doc, *tag);
            }
            ScriptEvent::AddEdge { id, faces } => self.doc.add_edge(EdgeId(*id), *faces),
            ScriptEvent::RemoveEdge { id } => self.doc.remove_edge(EdgeId(*id)),
        }
        for record in self.doc.take_transactions() {
            actions.push(ActionRecord::Smooth {
                operation: record.name,
                transparent: record.transparent,
                edges: record.edges,
            });
        }
        Ok(actions)
    }
}

fn refusal(err: &Error) -> ActionRecord {
    ActionRecord::Refused {
        message: err.message().unwrap_or("incompatible host").to_string(),
    }
}

/// Read a JSONL script: one event per line, blank lines skipped.
pub fn read_script<R: BufRead>(reader: R) -> Result<Vec<ScriptEvent>, Error> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read script")
                .with_source(err)
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|err| {
            Error::new(ErrorKind::Corrupt)
                .with_message(format!("unrecognized event: {err}"))
                .with_line(index as u64 + 1)
                .with_hint("Each script line must be one JSON event object.")
        })?;
        events.push(event);
    }
    Ok(events)
}
