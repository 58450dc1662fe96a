//! Element-wise vector primitives.
//!
//! All mutating operations work in place on the destination slice. Binary
//! operations require `other` to be at least as long as the destination;
//! the checks are debug assertions, and a shorter `other` fails fast via
//! slice indexing.

use crate::types::VectorElement;

/// Add `other` into `dst`, element-wise.
#[inline]
pub fn add_assign<F: VectorElement>(dst: &mut [F], other: &[F]) {
    debug_assert!(other.len() >= dst.len(), "length mismatch");
    for (d, &x) in dst.iter_mut().zip(other) {
        *d += x;
    }
}

/// Subtract `other` from `dst`, element-wise.
#[inline]
pub fn sub_assign<F: VectorElement>(dst: &mut [F], other: &[F]) {
    debug_assert!(other.len() >= dst.len(), "length mismatch");
    for (d, &x) in dst.iter_mut().zip(other) {
        *d -= x;
    }
}

/// Add the squared values of `other` into `dst`, element-wise.
#[inline]
pub fn add_squares<F: VectorElement>(dst: &mut [F], other: &[F]) {
    debug_assert!(other.len() >= dst.len(), "length mismatch");
    for (d, &x) in dst.iter_mut().zip(other) {
        *d += x * x;
    }
}

/// Divide every element of `dst` by `x`.
#[inline]
pub fn div_scalar<F: VectorElement>(dst: &mut [F], x: F) {
    for d in dst.iter_mut() {
        *d /= x;
    }
}

/// Square every element of `dst` in place.
#[inline]
pub fn square<F: VectorElement>(dst: &mut [F]) {
    for d in dst.iter_mut() {
        *d = *d * *d;
    }
}

/// Dot product between `a` and `b`.
#[inline]
pub fn dot<F: VectorElement>(a: &[F], b: &[F]) -> F {
    debug_assert!(b.len() >= a.len(), "length mismatch");
    let mut acc = F::zero();
    for (&x, &y) in a.iter().zip(b) {
        acc += x * y;
    }
    acc
}

/// Index of the minimum value in `v`.
///
/// If the identical minimum value occurs more than once, the lowest index
/// is returned.
#[inline]
pub fn argmin<F: VectorElement>(v: &[F]) -> usize {
    let mut best = 0;
    for (i, &x) in v.iter().enumerate().skip(1) {
        if x < v[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_add<F: VectorElement>() {
        let mut v = [F::from_usize(1), F::from_usize(2), F::from_usize(3)];
        add_assign(&mut v, &[F::from_usize(4), F::from_usize(5), F::from_usize(6)]);
        assert_eq!(v, [F::from_usize(5), F::from_usize(7), F::from_usize(9)]);
        add_assign(&mut v, &[F::from_usize(7), F::from_usize(8), F::from_usize(9)]);
        assert_eq!(v, [F::from_usize(12), F::from_usize(15), F::from_usize(18)]);
    }

    #[test]
    fn test_add_assign() {
        check_add::<f32>();
        check_add::<f64>();
    }

    #[test]
    fn test_sub_assign() {
        let mut v = [12.0f32, 15.0, 18.0];
        sub_assign(&mut v, &[7.0, 8.0, 9.0]);
        assert_eq!(v, [5.0, 7.0, 9.0]);
        sub_assign(&mut v, &[4.0, 5.0, 6.0]);
        assert_eq!(v, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_add_squares() {
        let mut v = [1.0f64, 2.0, 3.0];
        add_squares(&mut v, &[4.0, 5.0, 6.0]);
        assert_eq!(v, [17.0, 27.0, 39.0]);
        add_squares(&mut v, &[7.0, 8.0, 9.0]);
        assert_eq!(v, [66.0, 91.0, 120.0]);
    }

    #[test]
    fn test_div_scalar() {
        let mut v = [100.0f32, 200.0, 300.0];
        div_scalar(&mut v, 10.0);
        assert_eq!(v, [10.0, 20.0, 30.0]);
        div_scalar(&mut v, 2.0);
        assert_eq!(v, [5.0, 10.0, 15.0]);
    }

    #[test]
    fn test_square() {
        let mut v = [1.0f32, 2.0, 3.0];
        square(&mut v);
        assert_eq!(v, [1.0, 4.0, 9.0]);
        square(&mut v);
        assert_eq!(v, [1.0, 16.0, 81.0]);
    }

    #[test]
    fn test_dot() {
        assert_eq!(dot(&[1.0f32, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
        assert_eq!(dot(&[1.0f64, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn test_argmin() {
        assert_eq!(argmin(&[3.0f32, 2.0, 1.0, 4.0]), 2);
        // Ties resolve to the lowest index.
        assert_eq!(argmin(&[2.0f32, 1.0, 1.0, 4.0]), 1);
        assert_eq!(argmin(&[7.0f64]), 0);
    }
}
