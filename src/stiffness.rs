//! Direct-stiffness assembly and reduction.
//!
//! The global matrix is first gathered as an `(n, n, 2, 2)` grid of nodal
//! blocks and then flattened with each node's `(u, v)` pair kept adjacent.

use nalgebra::{Cholesky, DMatrix, DVector, Dyn, Matrix4};
use ndarray::{Array2, Array4};

use crate::errors::AnalysisError;
use crate::profile::DofLayout;

/// Smallest accepted ratio between the extreme Cholesky pivots, squared.
const PIVOT_TOLERANCE: f64 = 1.0e-12;

/// Scatter-add element matrices into the `(n, n, 2, 2)` block tensor.
///
/// Each element is given as `(i, j, k)` with `i`, `j` positional node indices.
#[must_use]
pub fn assemble_blocks<'a, I>(node_count: usize, elements: I) -> Array4<f64>
where
    I: IntoIterator<Item = (usize, usize, &'a Matrix4<f64>)>,
{
    let mut blocks = Array4::<f64>::zeros((node_count, node_count, 2, 2));
    for (i, j, k) in elements {
        let ends = [(i, 0), (j, 2)];
        for &(row_node, row_offset) in &ends {
            for &(col_node, col_offset) in &ends {
                for r in 0..2 {
                    for c in 0..2 {
                        blocks[[row_node, col_node, r, c]] += k[(row_offset + r, col_offset + c)];
                    }
                }
            }
        }
    }
    blocks
}

/// Flatten the block tensor into a `2n x 2n` matrix ordered `u0, v0, u1, v1, ...`.
#[must_use]
pub fn flatten_blocks(blocks: &Array4<f64>) -> Array2<f64> {
    let n = blocks.shape()[0];
    Array2::from_shape_fn((2 * n, 2 * n), |(r, c)| blocks[[r / 2, c / 2, r % 2, c % 2]])
}

/// Drop the rows and columns of fixed degrees of freedom.
#[must_use]
pub fn reduce(global: &Array2<f64>, layout: &DofLayout) -> DMatrix<f64> {
    let free = layout.free_dofs();
    DMatrix::from_fn(free.len(), free.len(), |r, c| global[[free[r], free[c]]])
}

/// Reduced stiffness matrix together with its factorisation.
#[derive(Clone, Debug)]
pub struct ReducedStiffness {
    /// Reduced matrix.
    matrix: DMatrix<f64>,
    /// Cholesky factor reused for every load position.
    factor: Cholesky<f64, Dyn>,
}

impl ReducedStiffness {
    /// Factorise a reduced stiffness matrix.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::StructuralSingularity`] when the matrix is not
    /// positive definite, which happens when the structure is a mechanism or a
    /// node is disconnected.
    pub fn new(matrix: DMatrix<f64>) -> Result<Self, AnalysisError> {
        if matrix.is_empty() {
            return Err(AnalysisError::StructuralSingularity);
        }
        let factor = matrix
            .clone()
            .cholesky()
            .ok_or(AnalysisError::StructuralSingularity)?;
        let pivots = factor.l_dirty().diagonal();
        let (min, max) = (pivots.min(), pivots.max());
        if !(min > 0.0) || (min / max).powi(2) < PIVOT_TOLERANCE {
            return Err(AnalysisError::StructuralSingularity);
        }
        Ok(Self { matrix, factor })
    }

    /// The reduced matrix.
    #[must_use]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Number of unknowns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrix.nrows()
    }

    /// Whether the system has no unknowns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Solve `K d = f` for the nodal displacements.
    #[must_use]
    pub fn solve(&self, load: &DVector<f64>) -> DVector<f64> {
        self.factor.solve(load)
    }
}
