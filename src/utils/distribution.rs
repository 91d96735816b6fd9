//! Helpers over per-class weight vectors.

pub fn sum(distribution: &[f64]) -> f64 {
    distribution.iter().sum()
}

/// Index of the first maximal entry; 0 for an empty slice.
pub fn max_index(distribution: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in distribution.iter().enumerate() {
        if v > distribution[best] {
            best = i;
        }
    }
    best
}

/// Scales the entries to sum to one. A zero distribution becomes uniform.
pub fn normalize(distribution: &mut [f64]) {
    let total = sum(distribution);
    if total > 0.0 {
        distribution.iter_mut().for_each(|v| *v /= total);
    } else if !distribution.is_empty() {
        let uniform = 1.0 / distribution.len() as f64;
        distribution.iter_mut().for_each(|v| *v = uniform);
    }
}

pub fn add_scaled(dst: &mut [f64], src: &[f64], factor: f64) {
    debug_assert_eq!(dst.len(), src.len(), "class_distribution length mismatch");
    for (d, s) in dst.iter_mut().zip(src) {
        *d += s * factor;
    }
}

/// Number of classes carrying positive weight.
pub fn num_non_zero_entries(distribution: &[f64]) -> usize {
    distribution.iter().filter(|&&v| v > 0.0).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_index_prefers_first_of_ties() {
        assert_eq!(max_index(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(max_index(&[]), 0);
    }

    #[test]
    fn normalize_handles_zero_distribution() {
        let mut d = vec![0.0, 0.0, 0.0, 0.0];
        normalize(&mut d);
        assert_eq!(d, vec![0.25; 4]);

        let mut d = vec![1.0, 3.0];
        normalize(&mut d);
        assert_eq!(d, vec![0.25, 0.75]);
    }

    #[test]
    fn add_scaled_accumulates() {
        let mut d = vec![1.0, 0.0];
        add_scaled(&mut d, &[2.0, 4.0], 0.5);
        assert_eq!(d, vec![2.0, 2.0]);
        assert_eq!(num_non_zero_entries(&d), 2);
    }
}
