//! Procrustes superimposition of coordinate matrices.

use nalgebra::DMatrix;

/// Result of fitting one matrix onto another.
#[derive(Debug, Clone)]
pub struct ProcrustesFit {
    /// The reference, centered and scaled to unit Frobenius norm.
    pub reference: DMatrix<f64>,
    /// The target, standardized then rotated and scaled onto the reference.
    pub fitted: DMatrix<f64>,
    /// Sum of squared differences after the fit.
    pub disparity: f64,
}

/// Center each column on zero and scale the matrix to unit Frobenius norm.
fn standardize(m: &DMatrix<f64>) -> Option<DMatrix<f64>> {
    let mut out = m.clone();
    for mut column in out.column_iter_mut() {
        let mean = column.mean();
        column.add_scalar_mut(-mean);
    }
    let norm = out.norm();
    if norm == 0.0 || !norm.is_finite() {
        return None;
    }
    out /= norm;
    Some(out)
}

/// Fit `target` onto `reference` with translation, uniform scaling and rotation.
///
/// Both matrices must have the same shape with rows in the same sample
/// order. Returns `None` when either matrix has no spread.
pub fn procrustes(reference: &DMatrix<f64>, target: &DMatrix<f64>) -> Option<ProcrustesFit> {
    if reference.shape() != target.shape() {
        return None;
    }

    let a = standardize(reference)?;
    let b = standardize(target)?;

    // Orthogonal Procrustes: R = U V^T from the SVD of A^T B.
    let svd = (a.transpose() * &b).svd(true, true);
    let scale: f64 = svd.singular_values.iter().sum();
    let rotation = svd.u.as_ref()? * svd.v_t.as_ref()?;

    let fitted = &b * rotation.transpose() * scale;
    let disparity = (&a - &fitted).norm_squared();

    Some(ProcrustesFit {
        reference: a,
        fitted,
        disparity,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn square() -> DMatrix<f64> {
        DMatrix::from_row_slice(4, 2, &[1.0, 1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0])
    }

    #[test]
    fn test_identical_matrices_have_zero_disparity() {
        let fit = procrustes(&square(), &square()).unwrap();
        assert!(fit.disparity < 1e-12);
        assert!((fit.reference.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotated_scaled_translated_copy_fits() {
        // rotate 90 degrees, scale by 3, shift by (10, -4)
        let target = DMatrix::from_fn(4, 2, |r, c| {
            let (x, y) = (square()[(r, 0)], square()[(r, 1)]);
            let rotated = if c == 0 { -y } else { x };
            rotated * 3.0 + if c == 0 { 10.0 } else { -4.0 }
        });
        let fit = procrustes(&square(), &target).unwrap();
        assert!(fit.disparity < 1e-10);
        assert!((&fit.reference - &fit.fitted).amax() < 1e-6);
    }

    #[test]
    fn test_reflected_and_scaled_copy_fits() {
        let reference = DMatrix::from_row_slice(
            5,
            3,
            &[
                0.3, -1.2, 0.5, //
                1.1, 0.4, -0.7, //
                -0.8, 0.9, 0.2, //
                0.0, -0.3, 1.4, //
                -0.6, 0.2, -1.4,
            ],
        );
        // mirror the second axis, scale by 2.5, shift the first axis
        let target = DMatrix::from_fn(5, 3, |r, c| {
            let sign = if c == 1 { -1.0 } else { 1.0 };
            let shift = if c == 0 { 7.0 } else { 0.0 };
            reference[(r, c)] * sign * 2.5 + shift
        });

        let fit = procrustes(&reference, &target).unwrap();
        assert!(fit.disparity < 1e-10);
        assert!((&fit.reference - &fit.fitted).amax() < 1e-6);
        assert!((fit.fitted.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_input() {
        let flat = DMatrix::from_element(4, 2, 2.0);
        assert!(procrustes(&square(), &flat).is_none());
        assert!(procrustes(&square(), &DMatrix::zeros(3, 2)).is_none());
    }
}
