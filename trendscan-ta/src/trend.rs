/// Mean of the successive differences of `values`, that is the average per-step change.
///
/// Requires at least two values.
pub fn average_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let total = values
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .sum::<f64>();
    Some(total / (values.len() - 1) as f64)
}

/// Percentage distance of `value` from `reference`.
///
/// Undefined for a zero or non-finite reference.
pub fn percent_deviation(value: f64, reference: f64) -> Option<f64> {
    if !reference.is_finite() || reference == 0.0 {
        return None;
    }
    Some((value - reference) / reference * 100.0)
}

/// Returns true when the average is rising and `deviation_pct` lies within the symmetric
/// `±near_pct` band.
pub fn is_near_rising_average(slope: Option<f64>, deviation_pct: Option<f64>, near_pct: f64) -> bool {
    let rising = slope.is_some_and(|slope| slope.is_finite() && slope > 0.0);
    let near = deviation_pct.is_some_and(|pct| pct.is_finite() && pct.abs() <= near_pct);
    rising && near
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_slope() {
        struct TestCase {
            input: Vec<f64>,
            expected: Option<f64>,
        }

        let tests = vec![
            TestCase {
                // TC0: empty
                input: vec![],
                expected: None,
            },
            TestCase {
                // TC1: single value
                input: vec![1.0],
                expected: None,
            },
            TestCase {
                // TC2: rising
                input: vec![1.0, 2.0, 4.0],
                expected: Some(1.5),
            },
            TestCase {
                // TC3: falling
                input: vec![4.0, 3.0],
                expected: Some(-1.0),
            },
            TestCase {
                // TC4: flat
                input: vec![2.0, 2.0, 2.0],
                expected: Some(0.0),
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = average_slope(&test.input);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_percent_deviation() {
        assert_eq!(percent_deviation(101.0, 100.0), Some(1.0));
        assert_eq!(percent_deviation(99.0, 100.0), Some(-1.0));
        assert_eq!(percent_deviation(100.0, 100.0), Some(0.0));
        assert_eq!(percent_deviation(1.0, 0.0), None);
        assert_eq!(percent_deviation(1.0, f64::NAN), None);
    }

    #[test]
    fn test_is_near_rising_average() {
        struct TestCase {
            slope: Option<f64>,
            deviation_pct: Option<f64>,
            near_pct: f64,
            expected: bool,
        }

        let tests = vec![
            TestCase {
                // TC0: rising & within band
                slope: Some(0.1),
                deviation_pct: Some(-0.5),
                near_pct: 1.0,
                expected: true,
            },
            TestCase {
                // TC1: band edge is inclusive
                slope: Some(0.1),
                deviation_pct: Some(1.0),
                near_pct: 1.0,
                expected: true,
            },
            TestCase {
                // TC2: flat average at zero deviation
                slope: Some(0.0),
                deviation_pct: Some(0.0),
                near_pct: 1.0,
                expected: false,
            },
            TestCase {
                // TC3: falling average
                slope: Some(-0.1),
                deviation_pct: Some(0.0),
                near_pct: 1.0,
                expected: false,
            },
            TestCase {
                // TC4: rising but outside band
                slope: Some(0.1),
                deviation_pct: Some(1.01),
                near_pct: 1.0,
                expected: false,
            },
            TestCase {
                // TC5: undefined slope
                slope: None,
                deviation_pct: Some(0.0),
                near_pct: 1.0,
                expected: false,
            },
            TestCase {
                // TC6: undefined deviation
                slope: Some(0.1),
                deviation_pct: None,
                near_pct: 1.0,
                expected: false,
            },
            TestCase {
                // TC7: zero deviation sits inside an empty band
                slope: Some(0.1),
                deviation_pct: Some(0.0),
                near_pct: 0.0,
                expected: true,
            },
            TestCase {
                // TC8: any deviation is outside an empty band
                slope: Some(0.1),
                deviation_pct: Some(0.01),
                near_pct: 0.0,
                expected: false,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            let actual = is_near_rising_average(test.slope, test.deviation_pct, test.near_pct);
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }
}
