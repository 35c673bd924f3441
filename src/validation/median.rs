//! Median-of-trailing-window timestamp rule.
//!
//! A block's timestamp must strictly exceed the median of the timestamps
//! of the trailing window of up to `MEDIAN_WINDOW` preceding blocks. This
//! mirrors Bitcoin's median-time-past rule and exists for the same
//! reason: a single validator with a fast clock can't backdate or
//! fast-forward the chain's apparent time on its own.
//!
//! For an even-sized window the median is the average of the two middle
//! elements at indices `n/2 - 1` and `n/2` of the sorted window — not
//! `n/2` and `n/2 + 1`, which would silently drop the true lower-middle
//! element and skew the median upward.

use crate::error::MedianError;

/// Maximum number of preceding blocks considered by the median rule.
pub const MEDIAN_WINDOW: usize = 11;

/// Computes the median of `window`, a slice of block timestamps.
pub fn median_timestamp(window: &[u64]) -> Result<u64, MedianError> {
    if window.is_empty() {
        return Err(MedianError::EmptyWindow);
    }

    let mut sorted = window.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();

    if n % 2 == 1 {
        Ok(sorted[n / 2])
    } else {
        let hi = n / 2;
        let lo = hi - 1;
        Ok((sorted[lo] + sorted[hi]) / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window_is_an_error() {
        assert_eq!(median_timestamp(&[]).unwrap_err(), MedianError::EmptyWindow);
    }

    #[test]
    fn odd_window_is_the_middle_element() {
        assert_eq!(median_timestamp(&[5, 1, 3]).unwrap(), 3);
    }

    #[test]
    fn even_window_averages_the_two_middle_elements() {
        // sorted: [1, 2, 3, 4] — middle elements are at indices 1 and 2
        // (values 2 and 3), median = 2 (integer division of 5/2), not the
        // 3/4 average an off-by-one window slice would produce.
        assert_eq!(median_timestamp(&[4, 1, 3, 2]).unwrap(), 2);
    }

    #[test]
    fn single_element_window_is_that_element() {
        assert_eq!(median_timestamp(&[42]).unwrap(), 42);
    }

    #[test]
    fn window_longer_than_median_window_constant_still_works() {
        let window: Vec<u64> = (0..20).collect();
        assert_eq!(median_timestamp(&window).unwrap(), 9);
    }
}
