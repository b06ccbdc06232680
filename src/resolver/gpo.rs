//! Government Pension Offset

/// Result of offsetting a spousal or survivor benefit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpoComputation {
    /// Offset implied by the pension, before limiting to the benefit
    pub offset: f64,
    /// Portion of the offset that actually reduced the benefit
    pub applied_offset: f64,
    pub reduced_benefit: f64,
    pub fully_offset: bool,
}

/// Offset `offset_fraction` of the non-covered pension against the spousal benefit.
/// The benefit never goes below zero.
pub fn gpo_offset(
    spousal_monthly_benefit: f64,
    non_covered_monthly_pension: f64,
    offset_fraction: f64,
) -> GpoComputation {
    let offset = offset_fraction * non_covered_monthly_pension;
    let applied_offset = offset.min(spousal_monthly_benefit);
    let reduced_benefit = (spousal_monthly_benefit - offset).max(0.0);

    GpoComputation {
        offset,
        applied_offset,
        reduced_benefit,
        fully_offset: offset >= spousal_monthly_benefit,
    }
}
