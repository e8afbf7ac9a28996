//! Schema variant classification for raw statement payloads
//!
//! Payload layout depends on who issued the statement and on its segment code.
//! Classification is an ordered decision table: the first rule that matches
//! wins, and anything unmatched falls back to [`SchemaVariant::Unclassified`].
//! Segment-code rules sit above bank-name rules because the segment code is
//! the stronger structural signal when both are present.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment code of the detailed Bradesco narrative layout
pub const BRADESCO_SEGMENT: &str = "41";

/// Segment code of the generic `campo_a`..`campo_e` layout
pub const GENERIC_SEGMENT: &str = "42";

/// Known payload layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SchemaVariant {
    /// Banco do Brasil layout with typed credit/debit breakdowns
    BancoDoBrasil,
    /// Bradesco segment 41 layout with deposit channels, transfers and risk lists
    BradescoSegment41,
    /// Segment-coded layout carrying amounts in generically named fields
    GenericSegmented,
    /// No rule matched; read with the generic credits/debits layout
    #[default]
    Unclassified,
}

impl SchemaVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVariant::BancoDoBrasil => "banco_do_brasil",
            SchemaVariant::BradescoSegment41 => "bradesco_segment_41",
            SchemaVariant::GenericSegmented => "generic_segmented",
            SchemaVariant::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized inputs the decision table looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSignals<'a> {
    /// Lower-cased bank identifier
    pub bank: String,
    /// Trimmed segment code, `None` when absent or blank
    pub segment: Option<&'a str>,
}

impl<'a> SchemaSignals<'a> {
    pub fn new(bank_identifier: &str, segment_code: Option<&'a str>) -> Self {
        Self {
            bank: bank_identifier.to_lowercase(),
            segment: normalize_segment(segment_code),
        }
    }
}

/// One row of the classification table
#[derive(Debug, Clone, Copy)]
pub struct ResolutionRule {
    pub name: &'static str,
    pub variant: SchemaVariant,
    pub matches: fn(&SchemaSignals<'_>) -> bool,
}

fn is_bradesco_segment_41(s: &SchemaSignals<'_>) -> bool {
    s.bank.contains("bradesco") && s.segment == Some(BRADESCO_SEGMENT)
}

fn is_segment_coded(s: &SchemaSignals<'_>) -> bool {
    s.segment == Some(GENERIC_SEGMENT) || s.segment.is_some_and(|code| code != BRADESCO_SEGMENT)
}

fn is_banco_do_brasil(s: &SchemaSignals<'_>) -> bool {
    s.bank.contains("banco do brasil") || s.bank.contains("bb")
}

/// Classification rules in priority order
pub static RESOLUTION_RULES: [ResolutionRule; 3] = [
    ResolutionRule {
        name: "bradesco-segment-41",
        variant: SchemaVariant::BradescoSegment41,
        matches: is_bradesco_segment_41,
    },
    ResolutionRule {
        name: "segment-coded",
        variant: SchemaVariant::GenericSegmented,
        matches: is_segment_coded,
    },
    ResolutionRule {
        name: "banco-do-brasil",
        variant: SchemaVariant::BancoDoBrasil,
        matches: is_banco_do_brasil,
    },
];

/// Trim a segment code, treating blank codes as absent
pub fn normalize_segment(segment_code: Option<&str>) -> Option<&str> {
    segment_code.map(str::trim).filter(|code| !code.is_empty())
}

/// Find the first rule matching the given bank and segment
pub fn matching_rule(bank_identifier: &str, segment_code: Option<&str>) -> Option<&'static ResolutionRule> {
    let signals = SchemaSignals::new(bank_identifier, segment_code);
    RESOLUTION_RULES.iter().find(|rule| (rule.matches)(&signals))
}

/// Classify a statement by bank identifier and segment code. Total: unknown
/// combinations resolve to [`SchemaVariant::Unclassified`].
pub fn resolve(bank_identifier: &str, segment_code: Option<&str>) -> SchemaVariant {
    match matching_rule(bank_identifier, segment_code) {
        Some(rule) => {
            log::debug!(
                "Resolved bank {:?} segment {:?} to {} via rule {}",
                bank_identifier,
                segment_code,
                rule.variant,
                rule.name
            );
            rule.variant
        }
        None => {
            log::debug!(
                "No schema rule for bank {:?} segment {:?}, using unclassified layout",
                bank_identifier,
                segment_code
            );
            SchemaVariant::Unclassified
        }
    }
}
