/// Floor applied to the temperature before dividing by it.
const MIN_TEMPERATURE: f32 = 1e-6;

/// Temperature-weighted softmax over the positive entries of `scores`.
///
/// Entries that are not finite and positive get probability exactly `0`; the rest sum to `1`.
/// Returns all zeros when nothing is eligible. The maximum eligible score is subtracted before
/// exponentiating, so large scores cannot overflow. A NaN temperature is treated as `1`; tiny or
/// negative temperatures collapse onto the best score, and `+inf` gives a uniform distribution.
pub fn softmax(scores: &[f32], temperature: f32) -> Vec<f32> {
    let eligible = |s: f32| s.is_finite() && s > 0.0;
    let Some(max) = scores
        .iter()
        .copied()
        .filter(|s| eligible(*s))
        .reduce(f32::max)
    else {
        return vec![0.0; scores.len()];
    };

    let temperature = if temperature.is_nan() {
        1.0
    } else {
        temperature.max(MIN_TEMPERATURE)
    };

    let mut weights: Vec<f32> = scores
        .iter()
        .map(|&s| {
            if eligible(s) {
                ((s - max) / temperature).exp()
            } else {
                0.0
            }
        })
        .collect();

    // The max entry contributes exp(0) = 1, so the sum is at least 1.
    let total: f32 = weights.iter().sum();
    for w in weights.iter_mut() {
        *w /= total;
    }
    weights
}
