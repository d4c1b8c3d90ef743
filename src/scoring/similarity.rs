use super::config::ClampMode;

/// Cosine similarity in `[-1, 1]`; `0.0` for empty, mismatched or zero-norm inputs.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) = a
        .iter()
        .zip(b.iter())
        .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
            (dot + av * bv, na + av * av, nb + bv * bv)
        });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Divides `cosine` by `threshold` and bounds the ratio according to `mode`.
#[inline]
pub fn rescale(cosine: f32, threshold: f32, mode: ClampMode) -> f32 {
    let ratio = cosine / threshold;
    match mode {
        ClampMode::Literal => ratio.max(1.0),
        ClampMode::Corrected => ratio.clamp(0.0, 1.0),
    }
}
