use rand::Rng;

use crate::error::DrillError;

pub const MIN_COMBO_LEN: usize = 2;
pub const MAX_COMBO_LEN: usize = 5;
pub const DEFAULT_SEQUENCE_LEN: usize = 150;

/// Build a practice sequence of space-separated combos, each combo a run
/// of 2-5 characters drawn uniformly (with replacement) from `allowed`.
///
/// The remaining-length counter only tracks combo characters, and the
/// final combo is never truncated, so the non-space character count of
/// the output lands in `[target_len, target_len + MAX_COMBO_LEN)`.
/// `target_len == 0` yields an empty sequence.
pub fn generate_sequence<R: Rng>(
    rng: &mut R,
    allowed: &[char],
    target_len: usize,
) -> Result<String, DrillError> {
    if allowed.is_empty() {
        return Err(DrillError::InvalidConfiguration(
            "allowed character set is empty",
        ));
    }

    let mut sequence = String::new();
    let mut remaining = target_len as i64;
    while remaining > 0 {
        let combo_len = rng.gen_range(MIN_COMBO_LEN..=MAX_COMBO_LEN);
        if !sequence.is_empty() {
            sequence.push(' ');
        }
        for _ in 0..combo_len {
            sequence.push(allowed[rng.gen_range(0..allowed.len())]);
        }
        remaining -= combo_len as i64;
    }
    Ok(sequence)
}
