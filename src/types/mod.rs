//! Core type definitions for the MADDNESS pipeline.
//!
//! The whole training and query pipeline is generic over the floating-point
//! element type. `VectorElement` abstracts over `f32` and `f64`, so every
//! hot loop monomorphises to either precision without code duplication.

use num_traits::{Float, NumAssignOps};
use std::fmt::Debug;

/// Trait for types that can be used as vector elements.
///
/// This trait abstracts over the numeric types a trained model can hold:
/// `f32` and `f64`. All arithmetic goes through the `num_traits::Float`
/// bound; the methods below cover the few places where the pipeline needs
/// explicit conversions or ULP stepping.
pub trait VectorElement: Float + NumAssignOps + Debug + Send + Sync + 'static {
    /// Convert to f32, possibly losing precision.
    fn as_f32(self) -> f32;

    /// Create from f32.
    fn from_f32(v: f32) -> Self;

    /// Create from a count (row or column cardinality).
    fn from_usize(n: usize) -> Self;

    /// Truncate toward zero to a byte, saturating at the bounds.
    fn as_u8(self) -> u8;

    /// The next representable value toward positive infinity.
    ///
    /// The step is taken at f32 granularity for both element widths; for
    /// f64 this overshoots the true successor by design of the trained
    /// model format, which perturbs repaired rows by one f32 ULP.
    #[inline]
    fn next_up32(self) -> Self {
        Self::from_f32(self.as_f32().next_up())
    }

    /// The next representable value toward negative infinity, stepped at
    /// f32 granularity like [`next_up32`](Self::next_up32).
    #[inline]
    fn next_down32(self) -> Self {
        Self::from_f32(self.as_f32().next_down())
    }
}

impl VectorElement for f32 {
    #[inline(always)]
    fn as_f32(self) -> f32 {
        self
    }

    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        v
    }

    #[inline(always)]
    fn from_usize(n: usize) -> Self {
        n as f32
    }

    #[inline(always)]
    fn as_u8(self) -> u8 {
        self as u8
    }
}

impl VectorElement for f64 {
    #[inline(always)]
    fn as_f32(self) -> f32 {
        self as f32
    }

    #[inline(always)]
    fn from_f32(v: f32) -> Self {
        v as f64
    }

    #[inline(always)]
    fn from_usize(n: usize) -> Self {
        n as f64
    }

    #[inline(always)]
    fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_up32_steps_one_f32_ulp() {
        let x = 1.0f32;
        assert!(x.next_up32() > x);
        assert_eq!(x.next_up32(), f32::from_bits(x.to_bits() + 1));
        assert_eq!(x.next_up32().next_down32(), x);
    }

    #[test]
    fn test_next_down32_is_lossy_for_f64() {
        // One f32 ULP spans many f64 ULPs.
        let x = 1.0f64;
        let down = x.next_down32();
        assert!(down < x);
        assert!(x - down > f64::EPSILON);
    }

    #[test]
    fn test_from_usize() {
        assert_eq!(<f32 as VectorElement>::from_usize(16), 16.0);
        assert_eq!(<f64 as VectorElement>::from_usize(255), 255.0);
    }

    #[test]
    fn test_as_u8_truncates_and_saturates() {
        assert_eq!(254.9f32.as_u8(), 254);
        assert_eq!(255.0f64.as_u8(), 255);
        assert_eq!(300.0f32.as_u8(), 255);
        assert_eq!((-1.0f64).as_u8(), 0);
    }
}
