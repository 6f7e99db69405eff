use nalgebra::{DMatrix, DVector, Matrix3};
use pano_core::{Match, Point};
use crate::error::{HomographyError, HomographyResult};

/// Correspondences needed to pin down the 8 free parameters
pub const MIN_CORRESPONDENCES: usize = 4;

const PROJECTION_EPS: f64 = 1e-12;
const RANK_TOLERANCE: f64 = 1e-10;

/// Projective transform in homogeneous pixel coordinates.
///
/// Always holds nine finite entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(Matrix3<f64>);

impl Homography {
    pub fn from_matrix(m: Matrix3<f64>) -> HomographyResult<Self> {
        if m.iter().all(|v| v.is_finite()) {
            Ok(Self(m))
        } else {
            Err(HomographyError::NonFinite)
        }
    }

    pub fn identity() -> Self {
        Self(Matrix3::identity())
    }

    /// Pure shift by `(dx, dy)`
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self(Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0))
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.0
    }

    /// Map `p` through the transform. `None` when the homogeneous weight
    /// vanishes or the result overflows.
    pub fn project(&self, p: Point) -> Option<Point> {
        let h = &self.0;
        let (x, y) = (p.x as f64, p.y as f64);
        let u = h[(0, 0)] * x + h[(0, 1)] * y + h[(0, 2)];
        let v = h[(1, 0)] * x + h[(1, 1)] * y + h[(1, 2)];
        let w = h[(2, 0)] * x + h[(2, 1)] * y + h[(2, 2)];
        if w.abs() < PROJECTION_EPS {
            return None;
        }
        let projected = Point::new((u / w) as f32, (v / w) as f32);
        (projected.x.is_finite() && projected.y.is_finite()).then_some(projected)
    }

    pub fn inverse(&self) -> Option<Homography> {
        self.0
            .try_inverse()
            .and_then(|m| Homography::from_matrix(m).ok())
    }

    /// Scaled so the bottom-right entry is 1 (unchanged if that entry is ~0)
    pub fn normalized(&self) -> Homography {
        let scale = self.0[(2, 2)];
        if scale.abs() < PROJECTION_EPS {
            *self
        } else {
            Homography(self.0 / scale)
        }
    }
}

/// Least-squares DLT fit with `h22` fixed to 1.
///
/// Every correspondence contributes an x row and a y row to a `2n × 8`
/// system solved through SVD.
pub fn compute_homography(matches: &[Match]) -> HomographyResult<Homography> {
    let n = matches.len();
    if n < MIN_CORRESPONDENCES {
        return Err(HomographyError::TooFewCorrespondences {
            needed: MIN_CORRESPONDENCES,
            got: n,
        });
    }

    let mut m = DMatrix::<f64>::zeros(2 * n, 8);
    let mut b = DVector::<f64>::zeros(2 * n);
    for (i, mt) in matches.iter().enumerate() {
        let (x, y) = (mt.point_a.x as f64, mt.point_a.y as f64);
        let (xp, yp) = (mt.point_b.x as f64, mt.point_b.y as f64);
        let (rx, ry) = (2 * i, 2 * i + 1);

        m[(rx, 0)] = x;
        m[(rx, 1)] = y;
        m[(rx, 2)] = 1.0;
        m[(rx, 6)] = -x * xp;
        m[(rx, 7)] = -y * xp;
        b[rx] = xp;

        m[(ry, 3)] = x;
        m[(ry, 4)] = y;
        m[(ry, 5)] = 1.0;
        m[(ry, 6)] = -x * yp;
        m[(ry, 7)] = -y * yp;
        b[ry] = yp;
    }

    let svd = m.svd(true, true);
    let largest = svd.singular_values.max();
    if !largest.is_finite() || largest <= 0.0 {
        return Err(HomographyError::NonFinite);
    }
    let eps = largest * RANK_TOLERANCE;
    if svd.rank(eps) < 8 {
        return Err(HomographyError::Singular);
    }
    let a = svd.solve(&b, eps).map_err(|_| HomographyError::Singular)?;

    #[rustfmt::skip]
    let h = Matrix3::new(
        a[0], a[1], a[2],
        a[3], a[4], a[5],
        a[6], a[7], 1.0,
    );
    Homography::from_matrix(h)
}
