// THEORY:
// Local-maxima detection over a 1-D signal with no height or prominence constraint.
//
// Rules:
// 1.  A sample is a candidate only if its left neighbour is strictly lower.
// 2.  Walking right over samples equal to the candidate forms a plateau. The candidate
//     is a peak only if the first differing sample to the right is strictly lower.
// 3.  A plateau peak is reported at its middle sample, rounding down for even widths.
// 4.  The first and last samples have a missing neighbour and are never peaks.

pub mod peak_detector {
    /// Returns the indices of all local maxima of `signal`, in ascending order.
    pub fn find_peaks(signal: &[u32]) -> Vec<usize> {
        let mut peaks = Vec::new();
        if signal.len() < 3 {
            return peaks;
        }

        let last = signal.len() - 1;
        let mut i = 1;
        while i < last {
            if signal[i - 1] < signal[i] {
                let mut ahead = i + 1;
                while ahead < last && signal[ahead] == signal[i] {
                    ahead += 1;
                }
                if signal[ahead] < signal[i] {
                    peaks.push((i + ahead - 1) / 2);
                    i = ahead;
                }
            }
            i += 1;
        }

        peaks
    }
}

#[cfg(test)]
mod tests {
    use super::peak_detector::find_peaks;

    #[test]
    fn short_signals_have_no_peaks() {
        assert!(find_peaks(&[]).is_empty());
        assert!(find_peaks(&[5]).is_empty());
        assert!(find_peaks(&[1, 5]).is_empty());
    }

    #[test]
    fn strict_interior_maximum() {
        assert_eq!(find_peaks(&[0, 3, 0]), vec![1]);
        assert_eq!(find_peaks(&[0, 1, 4, 2, 5, 1]), vec![2, 4]);
    }

    #[test]
    fn edges_are_never_peaks() {
        assert!(find_peaks(&[9, 0, 0, 0]).is_empty());
        assert!(find_peaks(&[0, 0, 0, 9]).is_empty());
        assert_eq!(find_peaks(&[9, 0, 4, 0, 9]), vec![2]);
    }

    #[test]
    fn plateau_reports_middle_rounded_down() {
        assert_eq!(find_peaks(&[0, 5, 5, 0]), vec![1]);
        assert_eq!(find_peaks(&[0, 5, 5, 5, 0]), vec![2]);
        assert_eq!(find_peaks(&[0, 2, 7, 7, 7, 7, 1]), vec![3]);
    }

    #[test]
    fn plateau_running_into_the_edge_is_not_a_peak() {
        assert!(find_peaks(&[0, 5, 5, 5]).is_empty());
    }

    #[test]
    fn shoulders_are_not_peaks() {
        assert!(find_peaks(&[0, 2, 2, 5, 0]).len() == 1);
        assert_eq!(find_peaks(&[0, 2, 2, 5, 0]), vec![3]);
        assert!(find_peaks(&[1, 1, 1, 1]).is_empty());
    }
}
