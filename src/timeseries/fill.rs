use crate::na::NA;

/// Forward fill: propagate the last present value into later gaps
pub fn forward_fill(values: &mut [NA<f64>]) {
    let mut last_valid = NA::NA;
    for v in values.iter_mut() {
        if v.is_value() {
            last_valid = *v;
        } else {
            *v = last_valid;
        }
    }
}

/// Backward fill: use the next present value to fill earlier gaps
pub fn backward_fill(values: &mut [NA<f64>]) {
    let mut next_valid = NA::NA;
    for v in values.iter_mut().rev() {
        if v.is_value() {
            next_valid = *v;
        } else {
            *v = next_valid;
        }
    }
}

/// Forward fill then backward fill.
///
/// Interior and trailing gaps take the preceding value, leading gaps the
/// first present value. Returns `None` only when nothing was present.
pub fn fill_gaps(values: &[NA<f64>]) -> Option<Vec<f64>> {
    let mut filled = values.to_vec();
    forward_fill(&mut filled);
    backward_fill(&mut filled);
    filled.iter().map(|v| v.value().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_fill() {
        let mut values = vec![NA::Value(1.0), NA::NA, NA::NA, NA::Value(4.0), NA::NA];
        forward_fill(&mut values);
        assert_eq!(
            values,
            vec![NA::Value(1.0), NA::Value(1.0), NA::Value(1.0), NA::Value(4.0), NA::Value(4.0)]
        );
    }

    #[test]
    fn test_backward_fill_leaves_trailing_gap() {
        let mut values = vec![NA::NA, NA::Value(2.0), NA::NA];
        backward_fill(&mut values);
        assert_eq!(values, vec![NA::Value(2.0), NA::Value(2.0), NA::NA]);
    }

    #[test]
    fn test_fill_gaps_forward_before_backward() {
        let values = vec![NA::NA, NA::NA, NA::Value(3.0), NA::NA, NA::Value(5.0), NA::NA];
        assert_eq!(
            fill_gaps(&values).unwrap(),
            vec![3.0, 3.0, 3.0, 3.0, 5.0, 5.0]
        );
    }

    #[test]
    fn test_fill_gaps_is_idempotent() {
        let values = vec![NA::Value(1.0), NA::NA, NA::Value(2.5)];
        let once = fill_gaps(&values).unwrap();
        let as_na: Vec<NA<f64>> = once.iter().copied().map(NA::Value).collect();
        assert_eq!(fill_gaps(&as_na).unwrap(), once);
    }

    #[test]
    fn test_all_missing_cannot_be_filled() {
        assert!(fill_gaps(&[NA::NA, NA::NA]).is_none());
        assert_eq!(fill_gaps(&[]), Some(vec![]));
    }
}
