// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BPS FIXED-POINT ARITHMETIC
//
// Every rate in this workspace — emission share, burn fraction, distribution
// weight — is an integer in [0, BPS_DENOMINATOR]. Floating point is banned
// from this module on purpose: two validators on different CPUs must
// compute byte-identical results or the chain forks.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use crate::error::{CoreError, CoreResult};

/// Denominator for all basis-point fractions: 10 000 bps == 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

fn check_bps(value: u64, field: &'static str) -> CoreResult<()> {
    if value > BPS_DENOMINATOR {
        return Err(CoreError::InvalidInput {
            field,
            reason: format!("{value} exceeds BPS_DENOMINATOR ({BPS_DENOMINATOR})"),
        });
    }
    Ok(())
}

/// `amount * rate_bps / BPS_DENOMINATOR`, computed multiply-before-divide
/// in u128 to avoid truncation loss and overflow on realistic token amounts.
pub fn proportional_share(amount: u128, rate_bps: u64) -> CoreResult<u128> {
    check_bps(rate_bps, "rate_bps")?;
    Ok(amount
        .saturating_mul(rate_bps as u128)
        / BPS_DENOMINATOR as u128)
}

/// Converts a percentage (0.0..=100.0) to BPS, rejecting out-of-range and
/// non-finite input. Only used at config-load boundaries — never inside
/// the deterministic hot path.
pub fn percent_to_bps(percent: f64) -> CoreResult<u64> {
    if !percent.is_finite() || percent < 0.0 || percent > 100.0 {
        return Err(CoreError::InvalidInput {
            field: "percent",
            reason: format!("{percent} is not in [0, 100]"),
        });
    }
    Ok((percent * 100.0).round() as u64)
}

/// Inverse of [`percent_to_bps`], for human-readable config dumps only.
pub fn bps_to_percent(bps: u64) -> CoreResult<f64> {
    check_bps(bps, "bps")?;
    Ok(bps as f64 / 100.0)
}

/// Converts a unit fraction (0.0..=1.0) to BPS, rejecting out-of-range and
/// non-finite input. Distinct from [`percent_to_bps`]: the caller already
/// has a fraction, not a percentage.
pub fn float_to_bps(value: f64) -> CoreResult<u64> {
    if !value.is_finite() || value < 0.0 || value > 1.0 {
        return Err(CoreError::InvalidInput {
            field: "value",
            reason: format!("{value} is not in [0, 1]"),
        });
    }
    Ok((value * BPS_DENOMINATOR as f64).round() as u64)
}

/// Inverse of [`float_to_bps`].
pub fn bps_to_float(bps: u64) -> CoreResult<f64> {
    check_bps(bps, "bps")?;
    Ok(bps as f64 / BPS_DENOMINATOR as f64)
}

/// Splits `total` across `scores` (parallel to the caller's address list)
/// proportionally to each score, preserving the full sum: whatever `total`
/// is lost to integer truncation is handed back out one unit at a time to
/// whichever indices truncated away the largest fraction, breaking ties by
/// ascending index (the largest-remainder method). This replaces lossy
/// `total * share` truncation that silently burns dust every epoch.
///
/// Returns shares in the same order as `scores`. All-zero scores split
/// `total` evenly: `total / n` to everyone, remainder to the first
/// `total % n` indices.
pub fn distribute_by_scores(total: u128, scores: &[u64]) -> CoreResult<Vec<u128>> {
    let n = scores.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let sum: u128 = scores.iter().map(|&s| s as u128).sum();

    if sum == 0 {
        let base = total / n as u128;
        let remainder = (total % n as u128) as usize;
        return Ok((0..n)
            .map(|i| base + if i < remainder { 1 } else { 0 })
            .collect());
    }

    let products: Vec<u128> = scores.iter().map(|&s| total.saturating_mul(s as u128)).collect();
    let mut shares: Vec<u128> = products.iter().map(|p| p / sum).collect();
    let remainders: Vec<u128> = products.iter().map(|p| p % sum).collect();

    let distributed: u128 = shares.iter().sum();
    let mut leftover = total - distributed;

    // Largest-remainder method: the index with the biggest truncated
    // fraction gets the next +1, ties broken by ascending index.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| remainders[b].cmp(&remainders[a]).then(a.cmp(&b)));

    for &idx in order.iter() {
        if leftover == 0 {
            break;
        }
        shares[idx] += 1;
        leftover -= 1;
    }

    Ok(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_share_basic() {
        assert_eq!(proportional_share(1_000_000, 2_500).unwrap(), 250_000);
        assert_eq!(proportional_share(1_000_000, 10_000).unwrap(), 1_000_000);
        assert_eq!(proportional_share(1_000_000, 0).unwrap(), 0);
    }

    #[test]
    fn proportional_share_rejects_over_denominator() {
        assert!(proportional_share(100, 10_001).is_err());
    }

    #[test]
    fn distribute_by_scores_conserves_total() {
        let scores = vec![10, 20, 30, 40];
        let shares = distribute_by_scores(1_000_000_001, &scores).unwrap();
        assert_eq!(shares.iter().sum::<u128>(), 1_000_000_001);
    }

    #[test]
    fn distribute_by_scores_zero_sum_splits_evenly() {
        let scores = vec![0, 0, 0];
        let shares = distribute_by_scores(10, &scores).unwrap();
        assert_eq!(shares, vec![4, 3, 3]);
        assert_eq!(shares.iter().sum::<u128>(), 10);
    }

    #[test]
    fn distribute_by_scores_empty() {
        assert_eq!(distribute_by_scores(100, &[]).unwrap(), Vec::<u128>::new());
    }

    #[test]
    fn distribute_by_scores_remainder_tie_breaks_by_index() {
        // 3 recipients, scores equal: remainder order falls back to index order.
        let scores = vec![5, 5, 5];
        let shares = distribute_by_scores(10, &scores).unwrap();
        assert_eq!(shares.iter().sum::<u128>(), 10);
        assert_eq!(shares[0], 4); // first tie-break winner
    }

    #[test]
    fn distribute_by_scores_largest_remainder_wins_not_highest_score() {
        // 241 split 8000/6000/4000: floors are 107/80/53 (sums to 240); the
        // dropped fraction is largest for the lowest scorer here, so it
        // gets the spare unit even though it isn't the highest score.
        let scores = vec![8000u64, 6000, 4000];
        let shares = distribute_by_scores(241, &scores).unwrap();
        assert_eq!(shares, vec![107, 80, 54]);
    }

    #[test]
    fn percent_round_trip() {
        let bps = percent_to_bps(12.34).unwrap();
        assert_eq!(bps, 1234);
        assert_eq!(bps_to_percent(bps).unwrap(), 12.34);
    }

    #[test]
    fn percent_to_bps_rejects_out_of_range() {
        assert!(percent_to_bps(-1.0).is_err());
        assert!(percent_to_bps(100.1).is_err());
        assert!(percent_to_bps(f64::NAN).is_err());
    }

    #[test]
    fn float_round_trip() {
        let bps = float_to_bps(0.1234).unwrap();
        assert_eq!(bps, 1234);
        assert_eq!(bps_to_float(bps).unwrap(), 0.1234);
    }

    #[test]
    fn float_to_bps_rejects_out_of_range() {
        assert!(float_to_bps(-0.01).is_err());
        assert!(float_to_bps(1.01).is_err());
        assert!(float_to_bps(f64::NAN).is_err());
    }
}
