//! Generic tier resolution over sorted threshold tables
//!
//! Two shapes are supported: linear interpolation between bend points, and
//! cumulative walking of contribution brackets where each bracket carries its
//! own ratio. Tables reaching this module have already been validated, so an
//! empty or unsorted table cannot get here.

use crate::tables::{BendPointTable, MatchTier};

/// Where a service value fell relative to the table thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// At or below the first threshold: base factor
    AtOrBelowFirst,
    /// Strictly between row `lower` and row `lower + 1`
    Between { lower: usize },
    /// At or beyond the last threshold: full factor
    AtOrAboveLast,
}

/// Resolved factor for a service value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub factor_pct: f64,
    pub segment: Segment,
}

/// Resolve a factor with linear interpolation between adjacent rows.
///
/// Between two rows the factor moves by a fixed step per unit of service:
/// `lower.factor + (value - lower.threshold) * step`.
pub fn resolve_linear(table: &BendPointTable, value: f64) -> Resolution {
    let rows = table.rows();
    let first = rows[0];
    let last = rows[rows.len() - 1];

    if value <= first.threshold_years {
        return Resolution {
            factor_pct: first.factor_pct,
            segment: Segment::AtOrBelowFirst,
        };
    }
    if value >= last.threshold_years {
        return Resolution {
            factor_pct: last.factor_pct,
            segment: Segment::AtOrAboveLast,
        };
    }

    // value lies strictly inside (first, last), so some window brackets it
    let lower = rows
        .windows(2)
        .position(|pair| value < pair[1].threshold_years)
        .unwrap_or(rows.len() - 2);
    let (lo, hi) = (rows[lower], rows[lower + 1]);
    let step = (hi.factor_pct - lo.factor_pct) / (hi.threshold_years - lo.threshold_years);

    Resolution {
        factor_pct: lo.factor_pct + (value - lo.threshold_years) * step,
        segment: Segment::Between { lower },
    }
}

/// Portion of a contribution that falls in one match bracket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BracketShare {
    pub tier: usize,
    /// Percentage points of the contribution inside this bracket
    pub covered_pct: f64,
    pub match_ratio: f64,
    pub matched_pct: f64,
}

/// Walk brackets in order, stopping once the contribution is exhausted
pub fn walk_brackets(tiers: &[MatchTier], contribution_pct: f64) -> Vec<BracketShare> {
    let mut shares = Vec::with_capacity(tiers.len());
    let mut remaining = contribution_pct.max(0.0);
    let mut lower = 0.0;

    for (tier, bracket) in tiers.iter().enumerate() {
        if remaining <= 0.0 {
            break;
        }
        let width = bracket.contribution_pct_up_to - lower;
        let covered = remaining.min(width);
        shares.push(BracketShare {
            tier,
            covered_pct: covered,
            match_ratio: bracket.match_ratio,
            matched_pct: covered * bracket.match_ratio,
        });
        remaining -= covered;
        lower = bracket.contribution_pct_up_to;
    }
    shares
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::BendPointRow;

    fn three_row_table() -> BendPointTable {
        BendPointTable::new(
            "test",
            vec![
                BendPointRow::new(10.0, 0.0),
                BendPointRow::new(20.0, 50.0),
                BendPointRow::new(40.0, 100.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_clamps_at_ends() {
        let table = BendPointTable::wep_standard();
        assert_eq!(resolve_linear(&table, 0.0).factor_pct, 40.0);
        assert_eq!(resolve_linear(&table, 20.0).segment, Segment::AtOrBelowFirst);
        assert_eq!(resolve_linear(&table, 30.0).factor_pct, 90.0);
        assert_eq!(resolve_linear(&table, 45.0).segment, Segment::AtOrAboveLast);
    }

    #[test]
    fn test_wep_step_per_year() {
        let table = BendPointTable::wep_standard();
        for years in 20..=30 {
            let expected = 40.0 + (years as f64 - 20.0) * 5.0;
            assert_eq!(resolve_linear(&table, years as f64).factor_pct, expected);
        }
    }

    #[test]
    fn test_interior_segments() {
        let table = three_row_table();
        let r = resolve_linear(&table, 15.0);
        assert_eq!(r.factor_pct, 25.0);
        assert_eq!(r.segment, Segment::Between { lower: 0 });

        let r = resolve_linear(&table, 30.0);
        assert_eq!(r.factor_pct, 75.0);
        assert_eq!(r.segment, Segment::Between { lower: 1 });

        // Exactly on an interior threshold takes that row's factor
        assert_eq!(resolve_linear(&table, 20.0).factor_pct, 50.0);
    }

    #[test]
    fn test_walk_stops_when_exhausted() {
        let tiers = [MatchTier::new(3.0, 1.0), MatchTier::new(5.0, 0.5)];

        let shares = walk_brackets(&tiers, 2.0);
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].matched_pct, 2.0);

        let shares = walk_brackets(&tiers, 4.0);
        assert_eq!(shares.len(), 2);
        assert_eq!(shares[1].covered_pct, 1.0);
        assert_eq!(shares[1].matched_pct, 0.5);

        let shares = walk_brackets(&tiers, 10.0);
        let total: f64 = shares.iter().map(|s| s.matched_pct).sum();
        assert_eq!(total, 4.0);

        assert!(walk_brackets(&tiers, 0.0).is_empty());
    }
}
