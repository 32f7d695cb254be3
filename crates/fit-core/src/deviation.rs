//! Alignment error measures. These are means of squared deviations over
//! coordinate components; no square root is applied anywhere.

/// Mean squared deviation over all 3N coordinate components of two
/// index-aligned position arrays.
pub fn mean_squared_deviation(a: &[[f64; 3]], b: &[[f64; 3]]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let mut sum = 0.0f64;
    for i in 0..n {
        let dx = a[i][0] - b[i][0];
        let dy = a[i][1] - b[i][1];
        let dz = a[i][2] - b[i][2];
        sum += dx * dx + dy * dy + dz * dz;
    }
    sum / (3.0 * n as f64)
}

/// Per-point mean of the three squared component deviations.
pub fn per_point_squared_deviation(a: &[[f64; 3]], b: &[[f64; 3]]) -> Vec<f64> {
    let n = a.len().min(b.len());
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let dx = a[i][0] - b[i][0];
        let dy = a[i][1] - b[i][1];
        let dz = a[i][2] - b[i][2];
        out.push((dx * dx + dy * dy + dz * dz) / 3.0);
    }
    out
}
