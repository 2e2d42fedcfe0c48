//! Tests for the lattice grid and its position index

#[cfg(test)]
mod tests {
    use latticefold::io::error::ReconstructionError;
    use latticefold::spatial::grid::{
        LatticeGrid, are_orthogonal, manhattan_distance, orthogonal_neighbors,
    };

    // Tests grid sizing covers a chain radiating from the centre
    // Verified by sizing the grid at N x N
    #[test]
    fn test_for_chain_dimensions() {
        let grid = LatticeGrid::for_chain(4);
        assert_eq!(grid.dimensions(), (7, 7));
        assert_eq!(grid.center(), [3, 3]);

        let single = LatticeGrid::for_chain(1);
        assert_eq!(single.dimensions(), (1, 1));
        assert_eq!(single.center(), [0, 0]);
    }

    // Tests placement updates both directions of the index
    // Verified by skipping the position write
    #[test]
    fn test_place_updates_both_directions() {
        let mut grid = LatticeGrid::for_chain(3);

        assert!(grid.place(2, [1, 3]).is_ok());
        assert_eq!(grid.occupant([1, 3]), Some(2));
        assert_eq!(grid.position(2), Some([1, 3]));
        assert_eq!(grid.position(1), None);
        assert_eq!(grid.placed_count(), 1);
        assert!(!grid.is_vacant([1, 3]));
        assert!(!grid.is_complete());
    }

    // Tests occupied cells and placed vertices cannot be reused
    // Verified by allowing overwrites in place
    #[test]
    fn test_place_preconditions() {
        let mut grid = LatticeGrid::for_chain(2);

        assert!(grid.place(1, [1, 1]).is_ok());
        assert!(matches!(
            grid.place(2, [1, 1]),
            Err(ReconstructionError::InvalidParameter {
                parameter: "cell",
                ..
            })
        ));
        assert!(matches!(
            grid.place(1, [0, 1]),
            Err(ReconstructionError::InvalidParameter {
                parameter: "vertex",
                ..
            })
        ));
        assert!(grid.place(3, [0, 1]).is_err());
        assert!(grid.place(2, [9, 9]).is_err());
        assert_eq!(grid.placed_count(), 1);
    }

    // Tests neighbourhood order and clipping at the border
    // Verified by reordering the offset table
    #[test]
    fn test_orthogonal_neighbors() {
        let inner: Vec<_> = orthogonal_neighbors([1, 1], (3, 3)).collect();
        assert_eq!(inner, vec![[0, 1], [1, 0], [1, 2], [2, 1]]);

        let corner: Vec<_> = orthogonal_neighbors([0, 0], (3, 3)).collect();
        assert_eq!(corner, vec![[0, 1], [1, 0]]);

        let far: Vec<_> = orthogonal_neighbors([2, 2], (3, 3)).collect();
        assert_eq!(far, vec![[1, 2], [2, 1]]);
    }

    // Tests occupied and vacant neighbour views
    // Verified by returning diagonal cells
    #[test]
    fn test_neighbor_views() {
        let mut grid = LatticeGrid::for_chain(3);
        assert!(grid.place(1, [2, 2]).is_ok());
        assert!(grid.place(2, [2, 3]).is_ok());
        assert!(grid.place(3, [1, 1]).is_ok());

        let occupied: Vec<_> = grid.occupied_neighbors([2, 2]).collect();
        assert_eq!(occupied, vec![([2, 3], 2)]);

        let vacant: Vec<_> = grid.vacant_neighbors([2, 2]).collect();
        assert_eq!(vacant, vec![[1, 2], [2, 1], [3, 2]]);
    }

    // Tests distance helpers
    // Verified by using Chebyshev distance
    #[test]
    fn test_distance_helpers() {
        assert_eq!(manhattan_distance([1, 4], [3, 1]), 5);
        assert!(are_orthogonal([2, 2], [2, 3]));
        assert!(!are_orthogonal([2, 2], [3, 3]));
        assert!(!are_orthogonal([2, 2], [2, 2]));
    }

    // Tests completion after every vertex is placed
    // Verified by comparing against the cell count
    #[test]
    fn test_is_complete() {
        let mut grid = LatticeGrid::for_chain(2);
        assert!(grid.place(1, [1, 1]).is_ok());
        assert!(grid.place(2, [1, 2]).is_ok());

        assert!(grid.is_complete());
        assert_eq!(grid.cells().iter().filter(|&&v| v != 0).count(), 2);
    }

    // Tests removal clears both directions and frees the cell again
    // Verified by clearing only the position index
    #[test]
    fn test_remove() {
        let mut grid = LatticeGrid::for_chain(3);
        assert!(grid.place(1, [2, 2]).is_ok());
        assert!(grid.place(2, [2, 3]).is_ok());

        assert_eq!(grid.remove(2), Some([2, 3]));
        assert_eq!(grid.remove(2), None);
        assert_eq!(grid.remove(9), None);
        assert_eq!(grid.position(2), None);
        assert!(grid.is_vacant([2, 3]));
        assert_eq!(grid.placed_count(), 1);
        assert!(grid.place(2, [1, 2]).is_ok());
        assert_eq!(grid.occupant([1, 2]), Some(2));
    }
}
