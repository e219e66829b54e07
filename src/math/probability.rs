/// Shannon entropy of the distribution obtained by normalising `weights`
///
/// Uses the identity `H = ln(W) - (Σ w·ln w) / W` where `W = Σ w`, which needs
/// a single pass and no intermediate probabilities. Non-positive weights
/// contribute nothing; an empty or all-zero input has zero entropy.
pub fn weighted_entropy<I>(weights: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut total = 0.0;
    let mut weighted_log_sum = 0.0;
    for weight in weights {
        if weight > 0.0 {
            total += weight;
            weighted_log_sum += weight * weight.ln();
        }
    }

    if total <= 0.0 {
        return 0.0;
    }

    // Rounding can leave a tiny negative residue for a single option
    (total.ln() - weighted_log_sum / total).max(0.0)
}
