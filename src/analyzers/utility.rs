/// Complaints per this many residents.
pub const RATE_DENOMINATOR: f64 = 10_000.0;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle value of the sorted input, or the mean of the two middle values
/// for even lengths. Returns 0.0 for empty input.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// `count * 10000 / population`, or 0.0 when the population is zero or unknown.
pub fn per_capita(count: f64, population: f64) -> f64 {
    if !population.is_finite() || population <= 0.0 {
        return 0.0;
    }
    count * RATE_DENOMINATOR / population
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[10.0, 20.0, 30.0]), 20.0);
        assert_eq!(median(&[10.0, 20.0, 30.0, 40.0]), 25.0);
        assert_eq!(median(&[30.0, 10.0, 20.0]), 20.0);
        assert_eq!(median(&[7.5]), 7.5);
    }

    #[test]
    fn test_median_empty_is_zero() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_per_capita() {
        assert_eq!(per_capita(300.0, 20_000.0), 150.0);
    }

    #[test]
    fn test_per_capita_zero_population_is_zero() {
        let r = per_capita(300.0, 0.0);
        assert_eq!(r, 0.0);
        assert!(r.is_finite());
        assert_eq!(per_capita(300.0, f64::NAN), 0.0);
        assert_eq!(per_capita(300.0, -5.0), 0.0);
    }
}
