//! Fixed tetrahedron vertex-splitting tables.
//!
//! Quad type `k` separates the vertex pairs listed in `VERTEX_SPLIT_DEFN[k]`;
//! the same index names the pair of opposite edges the quad does not meet,
//! and the octagon type that crosses those edges twice.

/// Quad type separating `{i, j}` from the other two vertices; -1 on the diagonal.
pub const VERTEX_SPLIT: [[i8; 4]; 4] = [[-1, 0, 1, 2], [0, -1, 2, 1], [1, 2, -1, 0], [2, 1, 0, -1]];

/// The two quad types meeting edge `{i, j}`; -1 on the diagonal.
pub const VERTEX_SPLIT_MEETING: [[[i8; 2]; 4]; 4] = [
    [[-1, -1], [1, 2], [0, 2], [0, 1]],
    [[1, 2], [-1, -1], [0, 1], [0, 2]],
    [[0, 2], [0, 1], [-1, -1], [1, 2]],
    [[0, 1], [0, 2], [1, 2], [-1, -1]],
];

/// Vertex pairs `(a, b, c, d)` for quad type `k`: `{a, b}` versus `{c, d}`.
pub const VERTEX_SPLIT_DEFN: [[usize; 4]; 3] = [[0, 1, 2, 3], [0, 2, 1, 3], [0, 3, 1, 2]];

/// `VERTEX_SPLIT[i][j]` as an index, for `i != j`.
#[inline]
pub fn vertex_split(i: usize, j: usize) -> usize {
    debug_assert!(i != j && i < 4 && j < 4);
    VERTEX_SPLIT[i][j] as usize
}

/// `VERTEX_SPLIT_MEETING[i][j]` as indices, for `i != j`.
#[inline]
pub fn vertex_split_meeting(i: usize, j: usize) -> [usize; 2] {
    debug_assert!(i != j && i < 4 && j < 4);
    let [a, b] = VERTEX_SPLIT_MEETING[i][j];
    [a as usize, b as usize]
}
