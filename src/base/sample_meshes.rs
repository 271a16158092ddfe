use gemlab::mesh::{Cell, Mesh, Point};
use gemlab::shapes::GeoKind;

/// Holds small hand-made meshes for tests and examples
pub struct SampleMeshes {}

impl SampleMeshes {
    /// Returns a column made of two stacked Qua4 cells
    ///
    /// ```text
    /// 2.0  5-----------4
    ///      |           |
    ///      |    [1]    |
    ///      |    (1)    |
    /// 1.0  3-----------2
    ///      |           |
    ///      |    [0]    |
    ///      |    (1)    |
    /// 0.0  0-----------1
    ///     0.0         1.0
    /// ```
    #[rustfmt::skip]
    pub fn column_two_qua4() -> Mesh {
        Mesh {
            ndim: 2,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![1.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![1.0, 1.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 1.0] },
                Point { id: 4, marker: 0, coords: vec![1.0, 2.0] },
                Point { id: 5, marker: 0, coords: vec![0.0, 2.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Qua4, points: vec![0, 1, 2, 3] },
                Cell { id: 1, attribute: 1, kind: GeoKind::Qua4, points: vec![3, 2, 4, 5] },
            ],
        }
    }

    /// Returns a column of two Qua4 cells separated by a zero-thickness joint
    ///
    /// The interface nodes are duplicated: points 3,2 belong to the bottom
    /// cell and points 4,5 (same coordinates) to the top cell. The joint
    /// cell (attribute 2) connects both sides with the node ordering
    /// `[3, 2, 5, 4]` so that node m pairs with node (nnode-1-m).
    ///
    /// ```text
    /// 2.0  7-----------6
    ///      |    [1]    |
    ///      |    (1)    |
    /// 1.0  4-----------5   (top side of the joint)
    /// 1.0  3-----------2   (bottom side of the joint, same coordinates)
    ///      |    [0]    |
    ///      |    (1)    |
    /// 0.0  0-----------1
    ///     0.0         1.0
    /// ```
    #[rustfmt::skip]
    pub fn column_with_joint() -> Mesh {
        Mesh {
            ndim: 2,
            points: vec![
                Point { id: 0, marker: 0, coords: vec![0.0, 0.0] },
                Point { id: 1, marker: 0, coords: vec![1.0, 0.0] },
                Point { id: 2, marker: 0, coords: vec![1.0, 1.0] },
                Point { id: 3, marker: 0, coords: vec![0.0, 1.0] },
                Point { id: 4, marker: 0, coords: vec![0.0, 1.0] },
                Point { id: 5, marker: 0, coords: vec![1.0, 1.0] },
                Point { id: 6, marker: 0, coords: vec![1.0, 2.0] },
                Point { id: 7, marker: 0, coords: vec![0.0, 2.0] },
            ],
            cells: vec![
                Cell { id: 0, attribute: 1, kind: GeoKind::Qua4, points: vec![0, 1, 2, 3] },
                Cell { id: 1, attribute: 1, kind: GeoKind::Qua4, points: vec![4, 5, 6, 7] },
                Cell { id: 2, attribute: 2, kind: GeoKind::Qua4, points: vec![3, 2, 5, 4] },
            ],
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
