use crate::error::AppError;

/// Check that every sequence length in `lengths` equals `expected`.
///
/// This is the single funnel point for shape validation: it runs once
/// before any array is indexed, and code downstream assumes uniform
/// lengths without re-checking.
///
/// On failure the error names the first disagreeing sequence (its position
/// in `lengths`) and how many sequences disagree in total.
pub fn check_sizes(expected: usize, lengths: &[usize]) -> Result<(), AppError> {
    let mut mismatched = lengths
        .iter()
        .enumerate()
        .filter(|&(_, &len)| len != expected);

    match mismatched.next() {
        None => Ok(()),
        Some((position, &found)) => Err(AppError::ShapeMismatch {
            expected,
            position,
            found,
            mismatches: 1 + mismatched.count(),
        }),
    }
}

/// Status-code form of [`check_sizes`]: `0` when all lengths match,
/// otherwise the number of disagreeing sequences.
pub fn size_status(expected: usize, lengths: &[usize]) -> usize {
    lengths.iter().filter(|&&len| len != expected).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_uniform_lengths() {
        assert!(check_sizes(3, &[3, 3, 3]).is_ok());
        assert_eq!(size_status(3, &[3, 3, 3]), 0);
    }

    #[test]
    fn accepts_empty_list_of_lengths() {
        assert!(check_sizes(7, &[]).is_ok());
        assert!(check_sizes(0, &[0, 0]).is_ok());
    }

    #[test]
    fn reports_first_mismatch_and_count() {
        match check_sizes(3, &[3, 2, 3, 5]) {
            Err(AppError::ShapeMismatch {
                expected,
                position,
                found,
                mismatches,
            }) => {
                assert_eq!(expected, 3);
                assert_eq!(position, 1);
                assert_eq!(found, 2);
                assert_eq!(mismatches, 2);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(size_status(3, &[3, 2, 3, 5]), 2);
    }
}
