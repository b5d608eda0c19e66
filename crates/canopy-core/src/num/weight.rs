// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! # Tree Weight Trait
//!
//! Unified numeric bounds for edge lengths, path distances, and radii.
//! `TreeWeight` collects the capabilities the distance precomputation and the
//! feasibility test rely on into a single alias, so that generic signatures
//! across the workspace stay short.
//!
//! ## Highlights
//!
//! - Requires `num_traits::Signed`, which brings `Zero`, `One`, addition,
//!   subtraction, and negation. The feasibility test subtracts root
//!   distances, so unsigned types are intentionally excluded.
//! - Only `PartialOrd` is required, which admits `f32` and `f64`. The helpers
//!   `compare_weights` and `is_admissible_weight` turn this into a usable total
//!   order once NaN has been rejected at construction time.
//! - Requires `num_traits::Bounded`, so that a tree can reject edge lists
//!   whose path sums would leave the range of the type. For floats the upper
//!   bound is the largest finite value, which keeps infinity out as well.
//! - `Send + Sync` so that a precomputed metric can be shared between threads.

use num_traits::{Bounded, Signed};
use std::cmp::Ordering;

/// A trait alias for numeric types that can be used as tree edge weights.
/// These are usually the signed integer types `i8`, `i16`, `i32`, `i64`,
/// `i128` and `isize`, as well as `f32` and `f64`.
pub trait TreeWeight:
    Signed + Bounded + Copy + PartialOrd + std::fmt::Debug + std::fmt::Display + Send + Sync
{
}

impl<T> TreeWeight for T where
    T: Signed + Bounded + Copy + PartialOrd + std::fmt::Debug + std::fmt::Display + Send + Sync
{
}

/// Compares two weights, treating incomparable values as equal.
///
/// Weights entering the solver are validated to be non-negative, which
/// excludes NaN, so every pair reaching this function is comparable.
///
/// # Examples
///
/// ```rust
/// # use canopy_core::num::weight::compare_weights;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_weights(&1.5_f64, &2.0), Ordering::Less);
/// assert_eq!(compare_weights(&3_i64, &3), Ordering::Equal);
/// ```
#[inline]
pub fn compare_weights<W>(a: &W, b: &W) -> Ordering
where
    W: TreeWeight,
{
    a.partial_cmp(b).unwrap_or(Ordering::Equal)
}

/// Returns `true` if `weight` may be used as an edge length, i.e. it is
/// greater than or equal to zero. NaN is never admissible.
///
/// # Examples
///
/// ```rust
/// # use canopy_core::num::weight::is_admissible_weight;
///
/// assert!(is_admissible_weight(0_i32));
/// assert!(!is_admissible_weight(-1_i32));
/// assert!(!is_admissible_weight(f64::NAN));
/// ```
#[inline]
pub fn is_admissible_weight<W>(weight: W) -> bool
where
    W: TreeWeight,
{
    weight >= W::zero()
}

/// Adds the admissible weight `weight` to the non-negative running total
/// `total`, returning `None` if the sum would exceed `W::max_value()`.
///
/// # Examples
///
/// ```rust
/// # use canopy_core::num::weight::accumulate_weight;
///
/// assert_eq!(accumulate_weight(1_000_000_000_i32, 1_000_000_000), Some(2_000_000_000));
/// assert_eq!(accumulate_weight(1_500_000_000_i32, 1_500_000_000), None);
/// assert_eq!(accumulate_weight(0.0_f64, f64::INFINITY), None);
/// ```
#[inline]
pub fn accumulate_weight<W>(total: W, weight: W) -> Option<W>
where
    W: TreeWeight,
{
    if weight > W::max_value() - total {
        return None;
    }
    Some(total + weight)
}

/// Sorts a slice of weights ascending.
#[inline]
pub fn sort_weights<W>(weights: &mut [W])
where
    W: TreeWeight,
{
    weights.sort_unstable_by(compare_weights);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tree_weight<W: TreeWeight>() {}

    #[test]
    fn test_common_types_are_tree_weights() {
        assert_tree_weight::<i32>();
        assert_tree_weight::<i64>();
        assert_tree_weight::<isize>();
        assert_tree_weight::<f32>();
        assert_tree_weight::<f64>();
    }

    #[test]
    fn test_compare_weights_orders_integers() {
        assert_eq!(compare_weights(&-3_i64, &4), Ordering::Less);
        assert_eq!(compare_weights(&7_i64, &4), Ordering::Greater);
        assert_eq!(compare_weights(&4_i64, &4), Ordering::Equal);
    }

    #[test]
    fn test_compare_weights_treats_nan_as_equal() {
        assert_eq!(compare_weights(&f64::NAN, &1.0), Ordering::Equal);
    }

    #[test]
    fn test_admissible_weights() {
        assert!(is_admissible_weight(0_i64));
        assert!(is_admissible_weight(12_i64));
        assert!(!is_admissible_weight(-12_i64));
        assert!(is_admissible_weight(0.0_f64));
        assert!(is_admissible_weight(f64::INFINITY));
        assert!(!is_admissible_weight(-0.5_f64));
        assert!(!is_admissible_weight(f64::NAN));
    }

    #[test]
    fn test_accumulate_weight_stays_in_range() {
        assert_eq!(accumulate_weight(0_i32, i32::MAX), Some(i32::MAX));
        assert_eq!(accumulate_weight(i32::MAX - 1, 1), Some(i32::MAX));
        assert_eq!(accumulate_weight(i32::MAX, 1), None);
        assert_eq!(accumulate_weight(1_500_000_000_i32, 1_500_000_000), None);

        assert_eq!(accumulate_weight(1.5_f64, 2.0), Some(3.5));
        assert_eq!(accumulate_weight(0.0_f64, f64::INFINITY), None);
        assert_eq!(accumulate_weight(f64::MAX, f64::MAX), None);
    }

    #[test]
    fn test_sort_weights_ascending() {
        let mut weights = vec![4.0_f64, 1.0, 3.5, 1.0, 0.0];
        sort_weights(&mut weights);
        assert_eq!(weights, vec![0.0, 1.0, 1.0, 3.5, 4.0]);

        let mut ints = vec![5_i32, -1, 3];
        sort_weights(&mut ints);
        assert_eq!(ints, vec![-1, 3, 5]);
    }
}
