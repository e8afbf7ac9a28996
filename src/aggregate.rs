//! Cross-statement rollups for the overview dashboard

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::{MonetaryAmount, MONETARY_SCALE};
use crate::schema::SchemaVariant;
use crate::types::NormalizedStatement;

/// Statement count and movement for one bank
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BankBreakdown {
    pub count: usize,
    /// Credits plus debits across the bank's statements
    pub total_volume: MonetaryAmount,
}

impl BankBreakdown {
    fn merge(&mut self, other: BankBreakdown) {
        self.count += other.count;
        self.total_volume = &self.total_volume + &other.total_volume;
    }

    /// Mean volume per statement of this bank
    pub fn average_volume(&self) -> MonetaryAmount {
        average(&self.total_volume, self.count)
    }
}

/// Rollup statistics over a collection of normalized statements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub count: usize,
    pub total_credits: MonetaryAmount,
    pub total_debits: MonetaryAmount,
    /// Total credits minus total debits
    pub balance: MonetaryAmount,
    /// Keyed by trimmed bank name
    pub per_bank_breakdown: BTreeMap<String, BankBreakdown>,
    pub statements_with_risk: usize,
    pub statements_with_crimes: usize,
    pub total_locations: usize,
    /// Zero for an empty collection
    pub average_locations_per_statement: BigDecimal,
    /// Declared income plus declared revenue
    pub total_declared_income: MonetaryAmount,
    pub total_cash_deposits: MonetaryAmount,
    pub total_segment_volume: MonetaryAmount,
}

impl AggregateSummary {
    /// Contribution of a single statement
    pub fn from_statement(statement: &NormalizedStatement) -> Self {
        let mut per_bank_breakdown = BTreeMap::new();
        per_bank_breakdown.insert(
            statement.bank.trim().to_string(),
            BankBreakdown {
                count: 1,
                total_volume: statement.total_volume(),
            },
        );

        let mut summary = Self {
            count: 1,
            total_credits: statement.credits.total.clone(),
            total_debits: statement.debits.total.clone(),
            per_bank_breakdown,
            statements_with_risk: usize::from(statement.has_risk()),
            statements_with_crimes: usize::from(statement.has_crimes()),
            total_locations: statement.location_count(),
            total_declared_income: statement.declared_earnings(),
            total_cash_deposits: statement.credits.deposits.cash.amount.clone(),
            total_segment_volume: statement.segment_volume(),
            ..Self::default()
        };
        summary.refresh_derived();
        summary
    }

    /// Combine two partial summaries. Associative and commutative, with
    /// `AggregateSummary::default()` as identity.
    pub fn merge(mut self, other: AggregateSummary) -> Self {
        self.count += other.count;
        self.total_credits = &self.total_credits + &other.total_credits;
        self.total_debits = &self.total_debits + &other.total_debits;
        self.statements_with_risk += other.statements_with_risk;
        self.statements_with_crimes += other.statements_with_crimes;
        self.total_locations += other.total_locations;
        self.total_declared_income = &self.total_declared_income + &other.total_declared_income;
        self.total_cash_deposits = &self.total_cash_deposits + &other.total_cash_deposits;
        self.total_segment_volume = &self.total_segment_volume + &other.total_segment_volume;

        for (bank, breakdown) in other.per_bank_breakdown {
            self.per_bank_breakdown.entry(bank).or_default().merge(breakdown);
        }

        self.refresh_derived();
        self
    }

    pub fn total_volume(&self) -> MonetaryAmount {
        &self.total_credits + &self.total_debits
    }

    /// Share of statements carrying risk indicators, in percent
    pub fn risk_percentage(&self) -> BigDecimal {
        percentage(self.statements_with_risk, self.count)
    }

    /// Share of statements listing suspected crimes, in percent
    pub fn crime_percentage(&self) -> BigDecimal {
        percentage(self.statements_with_crimes, self.count)
    }

    /// Mean volume (credits plus debits) per statement
    pub fn average_volume_per_statement(&self) -> MonetaryAmount {
        average(&self.total_volume(), self.count)
    }

    /// Share of the total volume moved through `bank`, in percent
    pub fn bank_share(&self, bank: &str) -> BigDecimal {
        match self.per_bank_breakdown.get(bank.trim()) {
            Some(breakdown) => percentage_of(&breakdown.total_volume, &self.total_volume()),
            None => percentage(0, self.count),
        }
    }

    fn refresh_derived(&mut self) {
        self.balance = &self.total_credits - &self.total_debits;
        self.average_locations_per_statement = if self.count == 0 {
            BigDecimal::from(0).with_scale(MONETARY_SCALE)
        } else {
            (BigDecimal::from(self.total_locations as u64) / BigDecimal::from(self.count as u64))
                .with_scale_round(MONETARY_SCALE, RoundingMode::HalfUp)
        };
    }
}

/// `part / whole * 100` rounded to two places; zero when `whole` is zero
pub fn percentage(part: usize, whole: usize) -> BigDecimal {
    if whole == 0 {
        return BigDecimal::from(0).with_scale(MONETARY_SCALE);
    }
    (BigDecimal::from(part as u64) * BigDecimal::from(100) / BigDecimal::from(whole as u64))
        .with_scale_round(MONETARY_SCALE, RoundingMode::HalfUp)
}

/// `part / whole * 100` over amounts, rounded to two places; zero when
/// `whole` is zero
pub fn percentage_of(part: &MonetaryAmount, whole: &MonetaryAmount) -> BigDecimal {
    if whole.is_zero() {
        return BigDecimal::from(0).with_scale(MONETARY_SCALE);
    }
    (part.as_decimal() * BigDecimal::from(100) / whole.as_decimal())
        .with_scale_round(MONETARY_SCALE, RoundingMode::HalfUp)
}

fn average(total: &MonetaryAmount, count: usize) -> MonetaryAmount {
    if count == 0 {
        return MonetaryAmount::zero();
    }
    MonetaryAmount::new(total.as_decimal() / BigDecimal::from(count as u64))
}

fn summarize<'a>(statements: impl Iterator<Item = &'a NormalizedStatement>) -> AggregateSummary {
    statements
        .map(AggregateSummary::from_statement)
        .fold(AggregateSummary::default(), AggregateSummary::merge)
}

/// Folds normalized statements into an [`AggregateSummary`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregateEngine;

impl AggregateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Summarize a collection in a single pass
    pub fn aggregate(&self, statements: &[NormalizedStatement]) -> AggregateSummary {
        let summary = summarize(statements.iter());
        log::debug!(
            "Aggregated {} statements across {} banks",
            summary.count,
            summary.per_bank_breakdown.len()
        );
        summary
    }

    /// Summarize only the statements of one schema variant
    pub fn aggregate_variant(
        &self,
        statements: &[NormalizedStatement],
        variant: SchemaVariant,
    ) -> AggregateSummary {
        summarize(statements.iter().filter(|statement| statement.variant == variant))
    }

    /// Summarize the statements whose bank name contains `needle`,
    /// ignoring case, whatever their segment code
    pub fn aggregate_bank(&self, statements: &[NormalizedStatement], needle: &str) -> AggregateSummary {
        let needle = needle.trim().to_lowercase();
        summarize(
            statements
                .iter()
                .filter(|statement| statement.bank.to_lowercase().contains(&needle)),
        )
    }
}
