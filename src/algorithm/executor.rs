use ndarray::Array2;
use tracing::{debug, trace};

use crate::algorithm::deduction::{Deduction, common_cells, deduce};
use crate::algorithm::discovery::DiscoveryTracker;
use crate::algorithm::pairwise::{PairPlacement, find_pair};
use crate::graph::{AdjacencyModel, Vertex};
use crate::io::configuration::{DEFAULT_MAX_BRANCHES, DEFAULT_MAX_PASSES, MIN_DEDUCTION_DEGREE};
use crate::io::error::{Conflict, ReconstructionError, Result, Stall, invalid_parameter};
use crate::spatial::crop::{crop, verify_embedding};
use crate::spatial::grid::{are_orthogonal, manhattan_distance};
use crate::spatial::{Coordinate, Fringe, LatticeGrid};

/// Search budgets for a reconstruction run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconstructionConfig {
    /// Guesses the search may try when nothing is forced; `0` disables
    /// branching and commits the first pairwise move outright
    pub max_branches: usize,
    /// Control-loop passes allowed across the whole search
    pub max_passes: usize,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            max_branches: DEFAULT_MAX_BRANCHES,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl ReconstructionConfig {
    /// Configuration without branching
    pub fn greedy() -> Self {
        Self {
            max_branches: 0,
            ..Self::default()
        }
    }

    /// Check that the budgets allow a run to start
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `max_passes` is zero
    pub fn validate(&self) -> Result<()> {
        if self.max_passes == 0 {
            return Err(invalid_parameter(
                "max_passes",
                &self.max_passes,
                &"at least one pass is required",
            ));
        }
        Ok(())
    }

    /// Whether the search may guess and backtrack
    pub const fn is_branching(&self) -> bool {
        self.max_branches > 0
    }
}

/// Counters describing how a reconstruction was reached
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconstructionStats {
    /// Vertices committed by deduction
    pub deduced: usize,
    /// Vertices committed by pairwise moves
    pub paired: usize,
    /// Vertices committed by trying one of several cells
    pub guessed: usize,
    /// Guesses attempted
    pub branches: usize,
    /// Guesses and exhausted branching points discarded after failing
    pub backtracks: usize,
    /// Control-loop passes
    pub passes: usize,
}

/// Cropped embedding together with search statistics
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reconstruction {
    /// Minimal grid, vertex labels with 0 for empty
    pub grid: Array2<Vertex>,
    /// How the embedding was found
    pub stats: ReconstructionStats,
}

/// A vertex bound to a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Vertex being placed
    pub vertex: Vertex,
    /// Target cell
    pub cell: Coordinate,
}

/// All mutable state of one reconstruction attempt
///
/// Grid, position index, discovery tracker and fringe only change together
/// through [`ReconstructionSession::commit`] and
/// [`ReconstructionSession::rollback`]. Every committed vertex is recorded on
/// a trail, so a failed alternative is undone in place rather than copied.
#[derive(Debug)]
pub struct ReconstructionSession<'a> {
    model: &'a AdjacencyModel,
    grid: LatticeGrid,
    discovery: DiscoveryTracker,
    fringe: Fringe,
    /// Placed vertices in commit order
    trail: Vec<Vertex>,
}

impl<'a> ReconstructionSession<'a> {
    /// Empty session on a grid sized for the model
    pub fn new(model: &'a AdjacencyModel) -> Self {
        Self {
            model,
            grid: LatticeGrid::for_chain(model.len()),
            discovery: DiscoveryTracker::new(model),
            fringe: Fringe::new(),
            trail: Vec::with_capacity(model.len()),
        }
    }

    /// Place vertex 1 at the centre and its lowest neighbour to the right
    ///
    /// # Errors
    ///
    /// Returns `ContradictoryEmbedding` if the seed placements already
    /// violate a check
    pub fn seed(&mut self) -> Result<()> {
        let center = self.grid.center();
        self.commit(1, center)?;

        if let Some(&partner) = self.model.neighbors(1).first() {
            self.commit(partner, [center[0], center[1] + 1])?;
        }
        Ok(())
    }

    /// Adjacency model being embedded
    pub const fn model(&self) -> &'a AdjacencyModel {
        self.model
    }

    /// Current grid
    pub const fn grid(&self) -> &LatticeGrid {
        &self.grid
    }

    /// Discovery state of unplaced vertices
    pub const fn discovery(&self) -> &DiscoveryTracker {
        &self.discovery
    }

    /// Current fringe
    pub const fn fringe(&self) -> &Fringe {
        &self.fringe
    }

    /// Check whether every vertex holds a cell
    pub fn is_complete(&self) -> bool {
        self.grid.is_complete()
    }

    /// First check that placing `vertex` at `cell` would violate
    ///
    /// `pending` is a placement decided together with this one but not yet
    /// committed; it counts as occupying its cell. The checks are: the cell is
    /// free, every contact is a declared neighbour, every placed neighbour is a
    /// contact, and lattice distances to placed vertices are reachable along
    /// the graph with matching parity.
    pub fn conflict_at(
        &self,
        vertex: Vertex,
        cell: Coordinate,
        pending: Option<Placement>,
    ) -> Option<Conflict> {
        if !self.grid.is_vacant(cell) || pending.is_some_and(|p| p.cell == cell) {
            return Some(Conflict::NoAdmissibleCell);
        }

        let pending_contact = pending
            .filter(|p| are_orthogonal(p.cell, cell))
            .map(|p| (p.cell, p.vertex));
        for (_, other) in self.grid.occupied_neighbors(cell).chain(pending_contact) {
            if !self.model.are_adjacent(vertex, other) {
                return Some(Conflict::UnexpectedContact(other));
            }
        }

        let placed = self
            .discovery
            .placed()
            .iter()
            .filter_map(|other| self.grid.position(other).map(|position| (other, position)))
            .chain(pending.map(|p| (p.vertex, p.cell)));
        for (other, position) in placed {
            if self.model.are_adjacent(vertex, other) && !are_orthogonal(position, cell) {
                return Some(Conflict::DetachedNeighbor(other));
            }
            let lattice = manhattan_distance(position, cell);
            match self.model.distance(vertex, other) {
                Some(chain) if lattice <= chain && (chain - lattice).is_multiple_of(2) => {}
                _ => return Some(Conflict::Unreachable(other)),
            }
        }

        None
    }

    /// Check whether `vertex` may occupy `cell`, see [`Self::conflict_at`]
    pub fn admits(&self, vertex: Vertex, cell: Coordinate, pending: Option<Placement>) -> bool {
        self.conflict_at(vertex, cell, pending).is_none()
    }

    /// Commit a placement and run the post-commit updates
    ///
    /// # Errors
    ///
    /// Returns `ContradictoryEmbedding` if the placement is inadmissible, or if
    /// afterwards the vertex or a touching vertex has fewer free sides than
    /// unplaced neighbours. In the latter case the placement stays on the trail
    /// and is undone by the next [`Self::rollback`].
    pub fn commit(&mut self, vertex: Vertex, cell: Coordinate) -> Result<()> {
        if let Some(conflict) = self.conflict_at(vertex, cell, None) {
            return Err(ReconstructionError::ContradictoryEmbedding { vertex, conflict });
        }

        self.grid.place(vertex, cell)?;
        self.trail.push(vertex);
        self.discovery.notify_placed(vertex, self.model);
        self.fringe.refresh_around(cell, &self.grid, self.model);
        trace!(vertex, row = cell[0], col = cell[1], "placed");

        let touched = std::iter::once((cell, vertex)).chain(self.grid.occupied_neighbors(cell));
        for (position, other) in touched {
            let open = self
                .model
                .neighbors(other)
                .iter()
                .filter(|&&neighbor| !self.discovery.is_placed(neighbor))
                .count();
            if open > self.grid.vacant_neighbors(position).count() {
                return Err(ReconstructionError::ContradictoryEmbedding {
                    vertex,
                    conflict: Conflict::Crowded(other),
                });
            }
        }
        Ok(())
    }

    /// Admissible cells beside the placed neighbours of `vertex`
    ///
    /// With a single placed neighbour the cell continuing that neighbour's
    /// line comes first, the rest follow in ascending order.
    pub fn candidate_cells(&self, vertex: Vertex) -> Vec<Coordinate> {
        let discovered = self.discovery.discovered(vertex);
        let anchors: Vec<Coordinate> = discovered
            .iter()
            .filter_map(|&neighbor| self.grid.position(neighbor))
            .collect();

        let mut cells: Vec<Coordinate> = common_cells(&self.grid, &anchors)
            .into_iter()
            .filter(|&cell| self.admits(vertex, cell, None))
            .collect();

        if let (&[anchor], &[neighbor]) = (anchors.as_slice(), discovered)
            && let Some(straight) = self.straight_continuation(neighbor, anchor)
            && let Some(index) = cells.iter().position(|&cell| cell == straight)
        {
            cells.swap(0, index);
            if let Some(rest) = cells.get_mut(1..) {
                rest.sort_unstable();
            }
        }
        cells
    }

    /// Cell beyond `anchor` on the line from its lowest placed neighbour
    fn straight_continuation(&self, vertex: Vertex, anchor: Coordinate) -> Option<Coordinate> {
        let behind = self
            .model
            .neighbors(vertex)
            .iter()
            .find_map(|&neighbor| self.grid.position(neighbor))?;
        let row = (2 * anchor[0]).checked_sub(behind[0])?;
        let col = (2 * anchor[1]).checked_sub(behind[1])?;
        Some([row, col])
    }

    /// Trail length to hand back to [`Self::rollback`]
    pub const fn checkpoint(&self) -> usize {
        self.trail.len()
    }

    /// Undo placements, latest first, until only `mark` remain
    pub fn rollback(&mut self, mark: usize) {
        while self.trail.len() > mark {
            let Some(vertex) = self.trail.pop() else {
                break;
            };
            let Some(cell) = self.grid.remove(vertex) else {
                continue;
            };
            self.discovery.notify_removed(vertex, self.model);
            self.fringe.refresh_around(cell, &self.grid, self.model);
            trace!(vertex, row = cell[0], col = cell[1], "removed");
        }
    }
}

/// Result of one deduction pass
enum Pass {
    /// A vertex was committed
    Placed,
    /// Nothing was forced; the first ambiguous vertex, if any, with its cells
    Blocked(Option<(Vertex, Vec<Coordinate>)>),
}

/// Where the control loop handed back
enum Outcome {
    /// Every vertex holds a cell
    Complete,
    /// Nothing is forced; the vertex to guess for and its cells
    Choice(Vertex, Vec<Coordinate>),
}

/// Open branching point: the trail mark to restore and the cells left to try
#[derive(Debug)]
struct Frame {
    mark: usize,
    vertex: Vertex,
    candidates: Vec<Coordinate>,
    next: usize,
    first_failure: Option<ReconstructionError>,
}

impl Frame {
    const fn new(mark: usize, vertex: Vertex, candidates: Vec<Coordinate>) -> Self {
        Self {
            mark,
            vertex,
            candidates,
            next: 0,
            first_failure: None,
        }
    }

    fn next_cell(&mut self) -> Option<Coordinate> {
        let cell = self.candidates.get(self.next).copied()?;
        self.next += 1;
        Some(cell)
    }

    /// Error reported once every cell has failed
    fn into_failure(self) -> ReconstructionError {
        self.first_failure
            .unwrap_or(ReconstructionError::AmbiguousDeduction {
                vertex: self.vertex,
                candidates: self.candidates,
            })
    }
}

/// Drives reconstruction: deduction first, pairwise and branching fallback
///
/// Holds the configuration and the counters of the run in progress.
#[derive(Debug)]
pub struct Reconstructor {
    config: ReconstructionConfig,
    stats: ReconstructionStats,
}

impl Reconstructor {
    /// Create a reconstructor with validated budgets
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the configuration is invalid
    pub fn new(config: ReconstructionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            stats: ReconstructionStats::default(),
        })
    }

    /// Configured budgets
    pub const fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Embed `model` on the lattice and return the cropped grid
    ///
    /// # Errors
    ///
    /// Returns `ContradictoryEmbedding`, `AmbiguousDeduction` or
    /// `StalledSearch` when no embedding is found, and `EmbeddingMismatch` if
    /// the finished grid does not reproduce the model.
    pub fn reconstruct(&mut self, model: &AdjacencyModel) -> Result<Reconstruction> {
        self.stats = ReconstructionStats::default();

        let mut session = ReconstructionSession::new(model);
        session.seed()?;
        self.solve(&mut session)?;

        let grid = crop(session.grid().cells());
        verify_embedding(model, &grid)?;
        debug!(
            vertices = model.len(),
            rows = grid.nrows(),
            cols = grid.ncols(),
            passes = self.stats.passes,
            branches = self.stats.branches,
            "reconstructed"
        );

        Ok(Reconstruction {
            grid,
            stats: self.stats,
        })
    }

    /// Depth-first search over guesses, undoing failed ones through the trail
    ///
    /// Each frame holds the cells of one guessed vertex. Failures that only
    /// condemn the current guess roll the session back to the frame's mark and
    /// move on to its next cell; an exhausted frame fails its parent with its
    /// first failure.
    fn solve(&mut self, session: &mut ReconstructionSession<'_>) -> Result<()> {
        let mut frames: Vec<Frame> = Vec::new();
        let mut outcome = self.run_passes(session);

        loop {
            match outcome {
                Ok(Outcome::Complete) => return Ok(()),
                Ok(Outcome::Choice(vertex, candidates)) => {
                    debug!(
                        placed = session.grid().placed_count(),
                        vertex,
                        alternatives = candidates.len(),
                        "branching"
                    );
                    frames.push(Frame::new(session.checkpoint(), vertex, candidates));
                }
                Err(error) => match frames.last_mut() {
                    Some(top) if error.is_recoverable() => {
                        self.stats.backtracks += 1;
                        debug!(%error, "backtracking");
                        session.rollback(top.mark);
                        top.first_failure.get_or_insert(error);
                    }
                    _ => return Err(error),
                },
            }

            let Some(top) = frames.last_mut() else {
                return Err(stalled(session, Stall::NoProgress));
            };
            let vertex = top.vertex;
            outcome = match top.next_cell() {
                Some(cell) => {
                    self.stats.branches += 1;
                    if self.stats.branches > self.config.max_branches {
                        return Err(stalled(session, Stall::BranchBudget));
                    }
                    trace!(vertex, row = cell[0], col = cell[1], "guessing");
                    self.guess(session, vertex, cell)
                        .and_then(|()| self.run_passes(session))
                }
                None => match frames.pop() {
                    Some(exhausted) => {
                        session.rollback(exhausted.mark);
                        Err(exhausted.into_failure())
                    }
                    None => Err(stalled(session, Stall::NoProgress)),
                },
            };
        }
    }

    /// Run deduction passes until the session is complete or needs a guess
    ///
    /// In greedy mode a blocked pass commits the first pairwise move instead
    /// and never hands back a choice.
    fn run_passes(&mut self, session: &mut ReconstructionSession<'_>) -> Result<Outcome> {
        loop {
            if session.is_complete() {
                return Ok(Outcome::Complete);
            }

            self.stats.passes += 1;
            if self.stats.passes > self.config.max_passes {
                return Err(stalled(session, Stall::PassBudget));
            }

            let ambiguous = match self.deduce_pass(session)? {
                Pass::Placed => continue,
                Pass::Blocked(ambiguous) => ambiguous,
            };

            if self.config.is_branching() {
                let frontier = match ambiguous {
                    Some(choice) => Some(choice),
                    None => pick_frontier(session)?,
                };
                return match frontier {
                    Some((vertex, candidates)) => Ok(Outcome::Choice(vertex, candidates)),
                    None => Err(stalled(session, Stall::NoProgress)),
                };
            }

            match (find_pair(session), ambiguous) {
                (Some(pair), _) => self.apply_pair(session, pair)?,
                (None, Some((vertex, candidates))) => {
                    return Err(ReconstructionError::AmbiguousDeduction { vertex, candidates });
                }
                (None, None) => return Err(stalled(session, Stall::NoProgress)),
            }
        }
    }

    /// Commit the first uniquely deducible vertex
    ///
    /// Ready vertices are tried by discovery count 4, 3, 2, then lowest id.
    fn deduce_pass(&mut self, session: &mut ReconstructionSession<'_>) -> Result<Pass> {
        let mut ambiguous = None;

        for vertex in session.discovery().ready_vertices(MIN_DEDUCTION_DEGREE) {
            match deduce(session, vertex) {
                Deduction::Unique(cell) => {
                    session.commit(vertex, cell)?;
                    self.stats.deduced += 1;
                    return Ok(Pass::Placed);
                }
                Deduction::Ambiguous(candidates) => {
                    ambiguous.get_or_insert((vertex, candidates));
                }
                Deduction::Contradiction(conflict) => {
                    return Err(ReconstructionError::ContradictoryEmbedding { vertex, conflict });
                }
            }
        }

        Ok(Pass::Blocked(ambiguous))
    }

    fn apply_pair(
        &mut self,
        session: &mut ReconstructionSession<'_>,
        pair: PairPlacement,
    ) -> Result<()> {
        session.commit(pair.first.vertex, pair.first.cell)?;
        session.commit(pair.second.vertex, pair.second.cell)?;
        self.stats.paired += 2;
        Ok(())
    }

    fn guess(
        &mut self,
        session: &mut ReconstructionSession<'_>,
        vertex: Vertex,
        cell: Coordinate,
    ) -> Result<()> {
        session.commit(vertex, cell)?;
        self.stats.guessed += 1;
        Ok(())
    }
}

/// Vertex with one placed neighbour and the fewest admissible cells
///
/// Ties go to the lowest id. `Ok(None)` when no vertex has exactly one placed
/// neighbour.
///
/// # Errors
///
/// Returns `ContradictoryEmbedding` if such a vertex has no admissible cell.
fn pick_frontier(
    session: &ReconstructionSession<'_>,
) -> Result<Option<(Vertex, Vec<Coordinate>)>> {
    let mut best: Option<(Vertex, Vec<Coordinate>)> = None;

    for vertex in session.discovery().bucket(1) {
        let cells = session.candidate_cells(vertex);
        if cells.is_empty() {
            return Err(ReconstructionError::ContradictoryEmbedding {
                vertex,
                conflict: Conflict::NoAdmissibleCell,
            });
        }
        if best.as_ref().is_none_or(|(_, fewest)| cells.len() < fewest.len()) {
            best = Some((vertex, cells));
        }
    }

    Ok(best)
}

fn stalled(session: &ReconstructionSession<'_>, reason: Stall) -> ReconstructionError {
    ReconstructionError::StalledSearch {
        placed: session.grid().placed_count(),
        total: session.model().len(),
        reason,
    }
}

/// Reconstruct with default budgets, returning only the cropped grid
///
/// # Errors
///
/// See [`Reconstructor::reconstruct`]
pub fn reconstruct(model: &AdjacencyModel) -> Result<Array2<Vertex>> {
    reconstruct_with(model, &ReconstructionConfig::default()).map(|done| done.grid)
}

/// Reconstruct with explicit budgets
///
/// # Errors
///
/// Returns `InvalidParameter` for an invalid configuration, otherwise see
/// [`Reconstructor::reconstruct`]
pub fn reconstruct_with(
    model: &AdjacencyModel,
    config: &ReconstructionConfig,
) -> Result<Reconstruction> {
    Reconstructor::new(*config)?.reconstruct(model)
}
