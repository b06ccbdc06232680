//! Balance state tracking for a growth simulation

use super::trace::YearRow;

/// State of the account at a point in the simulation
#[derive(Debug, Clone)]
pub struct GrowthState {
    /// Completed simulation years
    pub year: u32,

    /// Attained age at the current point
    pub age: u32,

    /// Current balance
    pub balance: f64,

    /// Contributions added so far
    pub total_contributions: f64,

    /// Investment growth earned so far (may be negative)
    pub total_growth: f64,
}

impl GrowthState {
    /// Initialize state at simulation start
    pub fn new(starting_balance: f64, starting_age: u32) -> Self {
        Self {
            year: 0,
            age: starting_age,
            balance: starting_balance,
            total_contributions: 0.0,
            total_growth: 0.0,
        }
    }

    /// Advance one year: grow the balance, then add the year's contribution
    pub fn advance_year(&mut self, return_rate: f64, annual_contribution: f64) -> YearRow {
        let bop_balance = self.balance;
        let growth = bop_balance * return_rate;

        self.balance = bop_balance * (1.0 + return_rate) + annual_contribution;
        self.year += 1;
        self.age = self.age.saturating_add(1);
        self.total_contributions += annual_contribution;
        self.total_growth += growth;

        YearRow {
            year: self.year,
            age: self.age,
            bop_balance,
            growth,
            contribution: annual_contribution,
            eop_balance: self.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_year() {
        let mut state = GrowthState::new(1_000.0, 30);
        let row = state.advance_year(0.10, 500.0);

        assert_eq!(row.year, 1);
        assert_eq!(row.age, 31);
        assert_eq!(row.bop_balance, 1_000.0);
        assert_eq!(row.eop_balance, 1_000.0 * 1.1 + 500.0);
        assert_eq!(state.total_contributions, 500.0);
        assert_eq!(state.balance, row.eop_balance);
    }
}
