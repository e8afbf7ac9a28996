//! # Statement Core
//!
//! Normalization and aggregation of extracted bank statements.
//!
//! Upstream extraction delivers each statement as a loosely structured JSON
//! document whose layout depends on the issuing bank and a segment code. This
//! crate classifies those documents, projects them into one uniform view
//! model and rolls collections of them up into dashboard statistics.
//!
//! ## Features
//!
//! - **Exact money**: lenient parsing of `50.000,00` / `1234.56` notations into two-decimal amounts
//! - **Schema classification**: ordered decision table over bank name and segment code
//! - **View models**: total, fault-isolated projection of every known layout
//! - **Rankings**: bounded counterparty lists with a configurable ordering policy
//! - **Aggregation**: mergeable rollups with per-bank breakdowns and risk shares
//! - **Source abstraction**: async trait for whatever stores the raw records
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use statement_core::{AggregateEngine, RawStatement, SchemaVariant, ViewModelBuilder};
//!
//! let raw = RawStatement::new(
//!     "stmt-1".to_string(),
//!     "Banco do Brasil".to_string(),
//!     None,
//!     json!({"creditos": {"total": "50.000,00"}, "debitos": {"total": "1234.56"}}),
//! );
//!
//! let statement = ViewModelBuilder::default().build(&raw);
//! assert_eq!(statement.variant, SchemaVariant::BancoDoBrasil);
//! assert_eq!(statement.balance.to_string(), "48765.44");
//!
//! let summary = AggregateEngine::new().aggregate(&[statement]);
//! assert_eq!(summary.count, 1);
//! ```

pub mod aggregate;
pub mod amount;
pub mod config;
pub mod normalize;
pub mod schema;
pub mod service;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use aggregate::*;
pub use amount::*;
pub use config::*;
pub use normalize::*;
pub use schema::*;
pub use service::*;
pub use traits::*;
pub use types::*;
pub use utils::MemoryStatementSource;
