//! Horizontal reductions

/// `sum(a[i] * b[i])`
pub fn h_dotp(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| acc + x * y)
}

/// `sum(a[i]^2 * b[i]^2)`
pub fn h_sqr_dotp(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| acc + (x * x) * (y * y))
}

/// `sum(|a[i]| * |b[i]|)`
pub fn h_abs_dotp(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| acc + x.abs() * y.abs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_products() {
        let a = [1.0f32, -2.0, 3.0];
        let b = [4.0f32, 5.0, -6.0];
        assert_eq!(h_dotp(&a, &b), 4.0 - 10.0 - 18.0);
        assert_eq!(h_sqr_dotp(&a, &b), 16.0 + 100.0 + 324.0);
        assert_eq!(h_abs_dotp(&a, &b), 4.0 + 10.0 + 18.0);
        assert_eq!(h_dotp(&[], &[]), 0.0);
    }
}
