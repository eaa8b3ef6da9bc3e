//! Quorum arithmetic.
//!
//! Ratios are carried as basis points so the threshold is computed exactly:
//! `ceil(0.70 * 10)` is 7, not the 8 a binary float would produce.

/// Basis-point denominator (10 000 bps = 100%).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Minimum number of "yes" ballots needed for a vote to pass.
///
/// Electorates of two or fewer require unanimity. Larger electorates need
/// `ceil(ratio * (total + 1))`, which can exceed `total` for ratios close to
/// 100%; such a vote can then only fail.
pub fn pass_threshold(total: usize, pass_bps: u32) -> usize {
    if total <= 2 {
        return total;
    }
    let scaled = u64::from(pass_bps).saturating_mul(total as u64 + 1);
    usize::try_from(scaled.div_ceil(BPS_DENOMINATOR)).unwrap_or(usize::MAX)
}

/// `round(ok * 100 / total)`, halves rounded up; 0 for an empty electorate.
pub fn display_percent(ok: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let ok = ok as u64;
    let total = total as u64;
    let pct = (ok * 200 + total) / (2 * total);
    u32::try_from(pct).unwrap_or(u32::MAX)
}
