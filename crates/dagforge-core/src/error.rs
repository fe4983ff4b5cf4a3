use std::fmt;

use thiserror::Error;

use crate::model::NodeId;

/// Machine-readable error codes for agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    AlreadyInitialized,
    EmptyLabel,
    NodeNotFound,
    EdgeNotFound,
    UnknownNode,
    SelfLoop,
    DuplicateEdge,
    CycleDetected,
    NonFinitePosition,
    MalformedSnapshot,
    SnapshotWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::AlreadyInitialized => "E1003",
            Self::EmptyLabel => "E2001",
            Self::NodeNotFound => "E2002",
            Self::EdgeNotFound => "E2003",
            Self::UnknownNode => "E2004",
            Self::SelfLoop => "E2005",
            Self::DuplicateEdge => "E2006",
            Self::CycleDetected => "E2007",
            Self::NonFinitePosition => "E2008",
            Self::MalformedSnapshot => "E3001",
            Self::SnapshotWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::AlreadyInitialized => "Project already initialized",
            Self::EmptyLabel => "Node label is empty",
            Self::NodeNotFound => "Node not found",
            Self::EdgeNotFound => "Edge not found",
            Self::UnknownNode => "Edge endpoint names an unknown node",
            Self::SelfLoop => "Edge would connect a node to itself",
            Self::DuplicateEdge => "Edge already exists",
            Self::CycleDetected => "Cycle would be created",
            Self::NonFinitePosition => "Position is not finite",
            Self::MalformedSnapshot => "Malformed graph snapshot",
            Self::SnapshotWriteFailed => "Snapshot file write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators and agents.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `dagf init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .dagforge/config.toml and retry."),
            Self::AlreadyInitialized => {
                Some("Use the existing project, or pass `--force` to reset its graph.")
            }
            Self::EmptyLabel => Some("Provide a label with at least one non-whitespace character."),
            Self::NodeNotFound | Self::UnknownNode => {
                Some("Run `dagf show` to list the node ids in this graph.")
            }
            Self::EdgeNotFound => None,
            Self::SelfLoop => Some("Connect two different nodes."),
            Self::DuplicateEdge => None,
            Self::CycleDetected => Some("Remove or reverse an edge on the path to keep the graph acyclic."),
            Self::NonFinitePosition => Some("Use finite numbers for both coordinates."),
            Self::MalformedSnapshot => {
                Some("Check the file against the {nodes, edges} exchange format.")
            }
            Self::SnapshotWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `dagf` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A rejected graph operation.
///
/// Every variant is recoverable: the store is left exactly as it was before
/// the call that produced it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("label must not be empty")]
    EmptyLabel,

    #[error("{0} not found")]
    NotFound(Missing),

    #[error("unknown node '{id}'")]
    UnknownNode { id: NodeId },

    #[error("edge {id} -> {id} would be a self-loop")]
    SelfLoop { id: NodeId },

    #[error("edge {from} -> {to} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} would create a cycle")]
    WouldCreateCycle { from: NodeId, to: NodeId },

    #[error("position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },

    #[error("malformed snapshot: {reason}")]
    Malformed { reason: String },
}

/// What a [`GraphError::NotFound`] failed to find.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    Node(NodeId),
    Edge { from: NodeId, to: NodeId },
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Node(id) => write!(f, "node '{id}'"),
            Self::Edge { from, to } => write!(f, "edge {from} -> {to}"),
        }
    }
}

impl GraphError {
    pub(crate) fn malformed(reason: impl fmt::Display) -> Self {
        Self::Malformed {
            reason: reason.to_string(),
        }
    }

    /// Machine-readable code associated with this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyLabel => ErrorCode::EmptyLabel,
            Self::NotFound(Missing::Node(_)) => ErrorCode::NodeNotFound,
            Self::NotFound(Missing::Edge { .. }) => ErrorCode::EdgeNotFound,
            Self::UnknownNode { .. } => ErrorCode::UnknownNode,
            Self::SelfLoop { .. } => ErrorCode::SelfLoop,
            Self::DuplicateEdge { .. } => ErrorCode::DuplicateEdge,
            Self::WouldCreateCycle { .. } => ErrorCode::CycleDetected,
            Self::NonFinitePosition { .. } => ErrorCode::NonFinitePosition,
            Self::Malformed { .. } => ErrorCode::MalformedSnapshot,
        }
    }

    /// Optional remediation hint for operators and agents.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }
}
