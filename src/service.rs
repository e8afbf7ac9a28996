//! Orchestrator that fetches raw statements and drives the engine

use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregateEngine, AggregateSummary};
use crate::amount::MonetaryAmount;
use crate::config::EngineConfig;
use crate::normalize::builder::{declared_value, ViewModelBuilder};
use crate::schema::SchemaVariant;
use crate::traits::StatementSource;
use crate::types::*;

/// One row of the statement listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementListing {
    pub id: String,
    pub title_holder: String,
    pub tax_id: String,
    pub bank: String,
    pub period: Period,
    pub declared_value: MonetaryAmount,
}

/// Statement service over any [`StatementSource`]
pub struct StatementService<S: StatementSource> {
    source: S,
    builder: ViewModelBuilder,
    engine: AggregateEngine,
}

impl<S: StatementSource> StatementService<S> {
    /// Create a service with default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, &EngineConfig::default())
    }

    /// Create a service with custom ranking and segment labels
    pub fn with_config(source: S, config: &EngineConfig) -> Self {
        Self {
            source,
            builder: ViewModelBuilder::new(config),
            engine: AggregateEngine::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn builder(&self) -> &ViewModelBuilder {
        &self.builder
    }

    /// Normalized detail view of one statement
    pub async fn statement_detail(&self, statement_id: &str) -> SourceResult<NormalizedStatement> {
        let raw = self
            .source
            .get_statement(statement_id)
            .await?
            .ok_or_else(|| SourceError::NotFound(statement_id.to_string()))?;
        Ok(self.builder.build(&raw))
    }

    /// Listing rows for every statement in the source
    pub async fn statement_listing(&self) -> SourceResult<Vec<StatementListing>> {
        let raws = self.source.list_statements().await?;
        Ok(raws
            .iter()
            .map(|raw| {
                let statement = self.builder.build(raw);
                StatementListing {
                    declared_value: declared_value(raw),
                    id: statement.id,
                    title_holder: statement.title_holder,
                    tax_id: statement.tax_id,
                    bank: statement.bank,
                    period: statement.period,
                }
            })
            .collect())
    }

    /// Summary across every statement in the source
    pub async fn overview(&self) -> SourceResult<AggregateSummary> {
        let statements = self.normalized_statements().await?;
        let summary = self.engine.aggregate(&statements);
        log::info!(
            "Overview over {} statements: credits {} debits {}, {} with risk indicators",
            summary.count,
            summary.total_credits,
            summary.total_debits,
            summary.statements_with_risk
        );
        Ok(summary)
    }

    /// Summary restricted to one schema variant
    pub async fn variant_overview(&self, variant: SchemaVariant) -> SourceResult<AggregateSummary> {
        let statements = self.normalized_statements().await?;
        let summary = self.engine.aggregate_variant(&statements, variant);
        log::info!("Overview for {}: {} statements", variant, summary.count);
        Ok(summary)
    }

    /// Summary over every statement whose bank name contains `bank`,
    /// ignoring case and segment code
    pub async fn bank_overview(&self, bank: &str) -> SourceResult<AggregateSummary> {
        let statements = self.normalized_statements().await?;
        let summary = self.engine.aggregate_bank(&statements, bank);
        log::info!(
            "Overview for bank {:?}: {} statements, volume {}",
            bank,
            summary.count,
            summary.total_volume()
        );
        Ok(summary)
    }

    async fn normalized_statements(&self) -> SourceResult<Vec<NormalizedStatement>> {
        let raws = self.source.list_statements().await?;
        Ok(self.builder.build_all(&raws))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStatementSource;
    use serde_json::json;

    fn service() -> StatementService<MemoryStatementSource> {
        let source = MemoryStatementSource::new();
        source
            .insert(
                RawStatement::new(
                    "s1".to_string(),
                    "Bradesco".to_string(),
                    Some("42".to_string()),
                    json!({"titular": "ANA", "campo_a": "2.500,00"}),
                )
                .with_tax_id("111".to_string()),
            )
            .unwrap();
        StatementService::new(source)
    }

    #[tokio::test]
    async fn test_detail_not_found() {
        let err = service().statement_detail("nope").await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound(id) if id == "nope"));
    }

    #[tokio::test]
    async fn test_listing_row() {
        let rows = service().statement_listing().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title_holder, "ANA");
        assert_eq!(rows[0].tax_id, "111");
        assert_eq!(rows[0].declared_value, MonetaryAmount::parse("2500"));
    }

    #[tokio::test]
    async fn test_variant_overview() {
        let service = service();
        let generic = service.variant_overview(SchemaVariant::GenericSegmented).await.unwrap();
        let bb = service.variant_overview(SchemaVariant::BancoDoBrasil).await.unwrap();

        assert_eq!(generic.count, 1);
        assert_eq!(generic.total_segment_volume, MonetaryAmount::parse("2500"));
        assert_eq!(bb.count, 0);
    }

    #[tokio::test]
    async fn test_bank_overview_spans_segments() {
        let service = service();
        service
            .source()
            .insert(RawStatement::new(
                "s2".to_string(),
                "BANCO BRADESCO S.A.".to_string(),
                Some("41".to_string()),
                json!({"creditos": {"total": "100,00"}}),
            ))
            .unwrap();
        service
            .source()
            .insert(RawStatement::new(
                "s3".to_string(),
                "Banco do Brasil".to_string(),
                None,
                json!({"creditos": {"total": "50,00"}}),
            ))
            .unwrap();

        let bradesco = service.bank_overview("Bradesco").await.unwrap();
        assert_eq!(bradesco.count, 2);
        assert_eq!(bradesco.total_segment_volume, MonetaryAmount::parse("2500"));
        assert_eq!(bradesco.total_credits, MonetaryAmount::parse("100"));

        let segment_41 = service.variant_overview(SchemaVariant::BradescoSegment41).await.unwrap();
        assert_eq!(segment_41.count, 1);
    }
}
