//! Tests for cropping and embedding verification

#[cfg(test)]
mod tests {
    use latticefold::graph::AdjacencyModel;
    use latticefold::io::error::{Malformation, ReconstructionError};
    use latticefold::spatial::crop::{
        BoundingBox, bounding_box, crop, embedding_edges, verify_embedding,
    };
    use ndarray::{Array2, array};

    // Tests the bounding box of scattered occupied cells
    // Verified by folding with max for the minimum corner
    #[test]
    fn test_bounding_box() {
        let cells = array![[0, 0, 0, 0], [0, 0, 3, 0], [0, 1, 2, 0], [0, 0, 0, 0]];
        let bounds = bounding_box(&cells);

        assert_eq!(
            bounds,
            Some(BoundingBox {
                min: [1, 1],
                max: [2, 2]
            })
        );
        assert!(bounds.is_some_and(|b| b.dimensions() == (2, 2)));
    }

    // Tests cropping keeps only the occupied span and is idempotent
    // Verified by slicing with exclusive upper bounds
    #[test]
    fn test_crop_minimal_and_idempotent() {
        let cells = array![[0, 0, 0, 0], [0, 0, 3, 0], [0, 1, 2, 0], [0, 0, 0, 0]];
        let cropped = crop(&cells);

        assert_eq!(cropped, array![[0, 3], [1, 2]]);
        assert_eq!(crop(&cropped), cropped);
    }

    // Tests an off-centre rectangular span keeps its interior gaps
    // Verified by swapping row and column offsets in the copy
    #[test]
    fn test_crop_rectangular_span() {
        let cells = array![[0, 0, 0, 0, 0], [0, 1, 0, 2, 0], [0, 0, 0, 3, 0]];

        assert_eq!(crop(&cells), array![[1, 0, 2], [0, 0, 3]]);
    }

    // Tests an empty grid crops to nothing
    // Verified by returning the input unchanged
    #[test]
    fn test_crop_empty() {
        let cells: Array2<usize> = Array2::zeros((3, 3));

        assert_eq!(bounding_box(&cells), None);
        assert_eq!(crop(&cells).dim(), (0, 0));
    }

    // Tests contacts are listed once each in sorted order
    // Verified by also scanning upward and leftward
    #[test]
    fn test_embedding_edges() {
        let cells = array![[1, 2], [4, 3]];

        assert_eq!(
            embedding_edges(&cells),
            vec![(1, 2), (1, 4), (2, 3), (3, 4)]
        );
    }

    // Tests a matching grid verifies and a mismatching one lists differences
    // Verified by comparing only the declared-to-embedded direction
    #[test]
    fn test_verify_embedding() {
        let Ok(model) = AdjacencyModel::from_rows(vec![(1, vec![2]), (2, vec![1, 3]), (3, vec![2])])
        else {
            return;
        };

        assert!(verify_embedding(&model, &array![[1, 2, 3]]).is_ok());
        assert!(verify_embedding(&model, &array![[0, 3], [1, 2]]).is_ok());

        let folded = verify_embedding(&model, &array![[1, 2], [0, 3]]);
        assert!(folded.is_ok());

        let wrong = verify_embedding(&model, &array![[2, 1, 3]]);
        assert!(matches!(
            wrong,
            Err(ReconstructionError::EmbeddingMismatch { ref missing, ref spurious })
                if missing == &vec![(2, 3)] && spurious == &vec![(1, 3)]
        ));
    }

    // Tests label problems are reported before contacts are compared
    // Verified by skipping the repeated label check
    #[test]
    fn test_verify_embedding_labels() {
        let Ok(model) = AdjacencyModel::from_rows(vec![(1, vec![2]), (2, vec![1])]) else {
            return;
        };

        assert!(matches!(
            verify_embedding(&model, &array![[1, 2, 1]]),
            Err(ReconstructionError::MalformedInput {
                reason: Malformation::RepeatedLabel(1)
            })
        ));
        assert!(matches!(
            verify_embedding(&model, &array![[1, 5]]),
            Err(ReconstructionError::MalformedInput {
                reason: Malformation::UnknownLabel(5)
            })
        ));
        assert!(matches!(
            verify_embedding(&model, &array![[1, 0]]),
            Err(ReconstructionError::MalformedInput {
                reason: Malformation::MissingVertex(2)
            })
        ));
    }
}
