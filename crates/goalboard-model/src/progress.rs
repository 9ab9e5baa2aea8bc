//! Progress percentage for a goal

/// Percentage of the way from `initial` to `end` that `current` has reached
///
/// Total for every input: a zero-width range or a non-finite intermediate
/// result counts as no progress, and the rounded result is clamped to
/// `[0, 100]`. Works for decreasing goals (`end < initial`) as well.
#[must_use]
pub fn progress_percent(initial: f64, current: f64, end: f64) -> u8 {
    let raw = (current - initial) * 100.0 / (end - initial);
    let raw = if raw.is_finite() { raw } else { 0.0 };

    // clamp first so the cast is lossless
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = raw.round().clamp(0.0, 100.0) as u8;
    pct
}
