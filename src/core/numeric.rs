//! Pure numeric kernels: discrete gradient and least-squares line fitting.
//!
//! These are the two primitives behind loading-phase isolation and moduli
//! estimation. The gradient uses the conventional finite-difference scheme
//! (centered at interior points, one-sided at the two ends); the loading
//! filter's strict `> 0` threshold is sensitive to the boundary treatment,
//! so the scheme must not be approximated.

use thiserror::Error;

/// Errors that can occur during a line fit.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FitError {
    #[error("need at least 2 points for a line fit, got {0}")]
    TooFewPoints(usize),

    #[error("length mismatch: {x_len} x values, {y_len} y values")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("degenerate fit: zero variance in x values")]
    Degenerate,
}

/// A fitted first-degree polynomial `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Discrete gradient of a sequence with unit spacing.
///
/// Centered differences at interior points, one-sided differences at the
/// two ends. Sequences shorter than 2 have no defined derivative and yield
/// an all-zero gradient, which downstream filters treat as "no loading
/// phase".
///
/// # Example
///
/// ```
/// use rheo_pipeline::core::numeric::gradient;
///
/// let g = gradient(&[0.0, 1.0, 4.0]);
/// assert_eq!(g, vec![1.0, 2.0, 3.0]);
/// ```
pub fn gradient(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n < 2 {
        return vec![0.0; n];
    }

    let mut grad = Vec::with_capacity(n);
    grad.push(values[1] - values[0]);
    for i in 1..n - 1 {
        grad.push((values[i + 1] - values[i - 1]) / 2.0);
    }
    grad.push(values[n - 1] - values[n - 2]);
    grad
}

/// Ordinary least-squares fit of a line through (x, y) points.
///
/// Minimizes the sum of squared residuals of `y` against `x`, equivalent to
/// a degree-1 polynomial fit. Uses mean-centered accumulation for numeric
/// stability.
///
/// # Errors
///
/// Returns an error if the slices differ in length, contain fewer than 2
/// points, or all x values are identical (zero-variance abscissa).
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LineFit, FitError> {
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < 2 {
        return Err(FitError::TooFewPoints(x.len()));
    }

    let n = x.len() as f64;
    let mean_x: f64 = x.iter().sum::<f64>() / n;
    let mean_y: f64 = y.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        sxx += dx * dx;
        sxy += dx * (yi - mean_y);
    }

    if sxx == 0.0 {
        return Err(FitError::Degenerate);
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    Ok(LineFit { slope, intercept })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_linear_sequence() {
        // A linear ramp has a constant gradient everywhere, ends included.
        let g = gradient(&[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(g, vec![2.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_gradient_boundary_scheme() {
        let g = gradient(&[1.0, 2.0, 4.0, 7.0]);

        // One-sided at the ends, centered in the interior.
        assert_eq!(g[0], 1.0); // 2 - 1
        assert_eq!(g[1], 1.5); // (4 - 1) / 2
        assert_eq!(g[2], 2.5); // (7 - 2) / 2
        assert_eq!(g[3], 3.0); // 7 - 4
    }

    #[test]
    fn test_gradient_peak_is_zero() {
        // Symmetric peak: the centered difference at the apex is exactly zero.
        let g = gradient(&[0.0, 1.0, 2.0, 1.0, 0.0]);
        assert_eq!(g[2], 0.0);
    }

    #[test]
    fn test_gradient_short_sequences() {
        assert!(gradient(&[]).is_empty());
        assert_eq!(gradient(&[5.0]), vec![0.0]);
        assert_eq!(gradient(&[1.0, 3.0]), vec![2.0, 2.0]);
    }

    #[test]
    fn test_fit_line_exact() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 4.0 * v - 1.5).collect();

        let fit = fit_line(&x, &y).unwrap();

        assert!((fit.slope - 4.0).abs() < 1e-12);
        assert!((fit.intercept + 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_fit_line_two_points() {
        let fit = fit_line(&[0.0, 2.0], &[1.0, 5.0]).unwrap();
        assert!((fit.slope - 2.0).abs() < 1e-12);
        assert!((fit.intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fit_line_least_squares_residuals() {
        // Points off the line: slope must match the closed-form OLS solution.
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 0.0, 3.0];

        let fit = fit_line(&x, &y).unwrap();

        assert!((fit.slope - 1.5).abs() < 1e-12);
        assert!((fit.intercept + 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_fit_line_too_few_points() {
        assert_eq!(fit_line(&[1.0], &[2.0]), Err(FitError::TooFewPoints(1)));
        assert_eq!(fit_line(&[], &[]), Err(FitError::TooFewPoints(0)));
    }

    #[test]
    fn test_fit_line_length_mismatch() {
        assert_eq!(
            fit_line(&[1.0, 2.0], &[1.0]),
            Err(FitError::LengthMismatch { x_len: 2, y_len: 1 })
        );
    }

    #[test]
    fn test_fit_line_degenerate() {
        assert_eq!(
            fit_line(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(FitError::Degenerate)
        );
    }
}
