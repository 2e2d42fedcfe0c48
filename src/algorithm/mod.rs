/// Placed-neighbour tracking with degree buckets
pub mod discovery;
/// Single-vertex placement by intersecting neighbour sides
pub mod deduction;
/// Reconstruction session, control loop and branching search
pub mod executor;
/// Pairwise placement into adjacent fringe cells
pub mod pairwise;
