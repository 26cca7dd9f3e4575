use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Relative difference `|a - b| / max(|reference|, floor)`.
pub fn relative_difference(a: Real, b: Real, reference: Real, floor: Real) -> Real {
    (a - b).abs() / reference.abs().max(floor)
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::NonPositive { what, value: v })
    }
}

/// Geometric mean of two positive values, computed in log space.
pub fn geometric_mean(a: Real, b: Real) -> Real {
    (0.5 * (a.ln() + b.ln())).exp()
}

/// `n` logarithmically spaced points from `start` to `end` inclusive.
///
/// Both endpoints must be positive. Returns an empty vector for `n == 0`
/// and `[start]` for `n == 1`.
pub fn logspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let (l0, l1) = (start.ln(), end.ln());
            let step = (l1 - l0) / (n - 1) as Real;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        end
                    } else {
                        (l0 + step * i as Real).exp()
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_names_field() {
        let err = ensure_positive(0.0, "volume").unwrap_err();
        assert_eq!(err.field(), "volume");
        assert!(matches!(err, CoreError::NonPositive { .. }));
        assert!(ensure_positive(-1.0, "x").is_err());
        assert!(ensure_positive(Real::INFINITY, "x").is_err());
        assert_eq!(ensure_positive(2.5, "x").unwrap(), 2.5);
    }

    #[test]
    fn geometric_mean_spans_decades() {
        let mid = geometric_mean(1e-12, 1e-4);
        assert!(nearly_equal(mid, 1e-8, Tolerances { abs: 0.0, rel: 1e-9 }));
    }

    #[test]
    fn logspace_endpoints() {
        let pts = logspace(1e-6, 1e-3, 4);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[3], 1e-3);
        let tol = Tolerances { abs: 0.0, rel: 1e-9 };
        assert!(nearly_equal(pts[0], 1e-6, tol));
        assert!(nearly_equal(pts[1], 1e-5, tol));
        assert!(nearly_equal(pts[2], 1e-4, tol));
        assert!(logspace(1.0, 2.0, 0).is_empty());
        assert_eq!(logspace(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn relative_difference_uses_floor() {
        assert_eq!(relative_difference(1.0, 1.0, 0.0, 1e-12), 0.0);
        assert!(nearly_equal(
            relative_difference(110.0, 100.0, 100.0, 1e-12),
            0.1,
            Tolerances::default()
        ));
    }
}
