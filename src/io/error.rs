//! Error types for adjacency validation, reconstruction and file handling

use std::fmt;
use std::path::PathBuf;

use crate::graph::Vertex;
use crate::spatial::Coordinate;

/// Ways an adjacency model can fail validation before reconstruction starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    /// The model declares no vertices
    Empty,
    /// A vertex key is zero or negative
    NonPositiveVertex(i64),
    /// The same vertex key appears twice
    DuplicateVertex(Vertex),
    /// Vertex ids do not cover `1..=N`
    MissingVertex(Vertex),
    /// A neighbour id names no vertex of the model
    UnknownNeighbor {
        /// Vertex whose list holds the bad entry
        vertex: Vertex,
        /// The out-of-range neighbour id
        neighbor: i64,
    },
    /// A vertex lists itself
    SelfLoop(Vertex),
    /// `vertex` lists `neighbor` but not the other way round
    Asymmetric {
        /// Vertex that declares the contact
        vertex: Vertex,
        /// Vertex that omits it
        neighbor: Vertex,
    },
    /// More neighbours than a square lattice cell has sides
    ExcessDegree {
        /// Offending vertex
        vertex: Vertex,
        /// Declared degree
        degree: usize,
    },
    /// The vertex cannot be reached from vertex 1
    Disconnected(Vertex),
    /// A lattice array holds the same label in two cells
    RepeatedLabel(Vertex),
    /// A lattice array holds a label above the model size
    UnknownLabel(Vertex),
}

impl fmt::Display for Malformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "model has no vertices"),
            Self::NonPositiveVertex(id) => write!(f, "vertex id {id} is not positive"),
            Self::DuplicateVertex(v) => write!(f, "vertex {v} is declared twice"),
            Self::MissingVertex(v) => write!(f, "vertex {v} is missing from 1..=N"),
            Self::UnknownNeighbor { vertex, neighbor } => {
                write!(f, "vertex {vertex} lists unknown neighbour {neighbor}")
            }
            Self::SelfLoop(v) => write!(f, "vertex {v} lists itself"),
            Self::Asymmetric { vertex, neighbor } => {
                write!(f, "vertex {vertex} lists {neighbor} but not vice versa")
            }
            Self::ExcessDegree { vertex, degree } => {
                write!(f, "vertex {vertex} has degree {degree}, lattice cells allow 4")
            }
            Self::Disconnected(v) => write!(f, "vertex {v} is not connected to vertex 1"),
            Self::RepeatedLabel(v) => write!(f, "label {v} occupies more than one cell"),
            Self::UnknownLabel(v) => write!(f, "label {v} is not a vertex of the model"),
        }
    }
}

/// Local evidence that the partial embedding cannot be completed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// No empty cell borders every placed neighbour
    NoCommonCell,
    /// The vertex has a placed neighbour but no admissible cell beside it
    NoAdmissibleCell,
    /// The cell touches a placed vertex that is not a declared neighbour
    UnexpectedContact(Vertex),
    /// A placed declared neighbour is not orthogonally adjacent
    DetachedNeighbor(Vertex),
    /// A placed vertex has fewer empty sides than unplaced neighbours
    Crowded(Vertex),
    /// Lattice distance to a placed vertex disagrees with graph distance
    Unreachable(Vertex),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCommonCell => write!(f, "no empty cell borders all placed neighbours"),
            Self::NoAdmissibleCell => write!(f, "no admissible cell remains"),
            Self::UnexpectedContact(v) => write!(f, "would touch non-neighbour {v}"),
            Self::DetachedNeighbor(v) => write!(f, "would not touch placed neighbour {v}"),
            Self::Crowded(v) => write!(f, "vertex {v} has no room for its neighbours"),
            Self::Unreachable(v) => write!(f, "lattice distance to {v} exceeds chain distance"),
        }
    }
}

/// Why a search stopped without placing every vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stall {
    /// Neither deduction nor pairwise search could place anything
    NoProgress,
    /// The control loop ran for `max_passes` passes
    PassBudget,
    /// Branching tried `max_branches` alternatives
    BranchBudget,
}

impl fmt::Display for Stall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProgress => write!(f, "no placement could be made"),
            Self::PassBudget => write!(f, "pass budget exhausted"),
            Self::BranchBudget => write!(f, "branch budget exhausted"),
        }
    }
}

/// Main error type for all reconstruction operations
#[derive(Debug)]
pub enum ReconstructionError {
    /// Adjacency model rejected before reconstruction
    MalformedInput {
        /// What is wrong with the model
        reason: Malformation,
    },

    /// The placements made so far cannot be extended to `vertex`
    ContradictoryEmbedding {
        /// Vertex that could not be placed consistently
        vertex: Vertex,
        /// Which check failed
        conflict: Conflict,
    },

    /// Several cells satisfy a deduction and guessing is disabled
    AmbiguousDeduction {
        /// Vertex with more than one admissible cell
        vertex: Vertex,
        /// The admissible cells
        candidates: Vec<Coordinate>,
    },

    /// The search made no progress or ran out of budget
    StalledSearch {
        /// Vertices placed when the search stopped
        placed: usize,
        /// Vertices in the model
        total: usize,
        /// Why the search stopped
        reason: Stall,
    },

    /// A finished grid does not reproduce the adjacency model
    EmbeddingMismatch {
        /// Declared edges without a lattice contact
        missing: Vec<(Vertex, Vertex)>,
        /// Lattice contacts without a declared edge
        spurious: Vec<(Vertex, Vertex)>,
    },

    /// Text input could not be parsed
    Parse {
        /// 1-based line number
        line: usize,
        /// Description of the problem
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl ReconstructionError {
    /// Whether a search branch may discard this error and try a sibling
    ///
    /// Budget exhaustion and everything outside the engine abort the whole run.
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::ContradictoryEmbedding { .. } | Self::AmbiguousDeduction { .. } => true,
            Self::StalledSearch { reason, .. } => matches!(reason, Stall::NoProgress),
            _ => false,
        }
    }
}

impl fmt::Display for ReconstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedInput { reason } => write!(f, "Malformed adjacency model: {reason}"),
            Self::ContradictoryEmbedding { vertex, conflict } => {
                write!(f, "Contradictory embedding at vertex {vertex}: {conflict}")
            }
            Self::AmbiguousDeduction { vertex, candidates } => {
                write!(
                    f,
                    "Ambiguous deduction for vertex {vertex}: {} candidate cells",
                    candidates.len()
                )
            }
            Self::StalledSearch {
                placed,
                total,
                reason,
            } => {
                write!(f, "Search stalled with {placed}/{total} vertices placed: {reason}")
            }
            Self::EmbeddingMismatch { missing, spurious } => {
                write!(
                    f,
                    "Embedding mismatch: {} missing contacts, {} spurious contacts",
                    missing.len(),
                    spurious.len()
                )
            }
            Self::Parse { line, reason } => write!(f, "Parse error on line {line}: {reason}"),
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for ReconstructionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for reconstruction results
pub type Result<T> = std::result::Result<T, ReconstructionError>;

impl From<Malformation> for ReconstructionError {
    fn from(reason: Malformation) -> Self {
        Self::MalformedInput { reason }
    }
}

impl From<std::io::Error> for ReconstructionError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ReconstructionError {
    ReconstructionError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Attach a path and operation to an I/O failure
pub fn file_system_error(
    path: &std::path::Path,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> ReconstructionError {
    let path = path.to_path_buf();
    move |source| ReconstructionError::FileSystem {
        path,
        operation,
        source,
    }
}
