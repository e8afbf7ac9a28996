//! In-memory statement source for testing

use async_trait::async_trait;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;

/// In-memory statement source for testing and development
///
/// Statements are kept in insertion order so listings are deterministic.
#[derive(Debug, Clone, Default)]
pub struct MemoryStatementSource {
    statements: Arc<RwLock<Vec<RawStatement>>>,
}

impl MemoryStatementSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding the given statements
    pub fn with_statements(statements: Vec<RawStatement>) -> SourceResult<Self> {
        let source = Self::new();
        for statement in statements {
            source.insert(statement)?;
        }
        Ok(source)
    }

    /// Store a statement, replacing any entry with the same ID. A statement
    /// without an ID is assigned a fresh one, which is returned.
    pub fn insert(&self, mut statement: RawStatement) -> SourceResult<String> {
        if statement.id.trim().is_empty() {
            statement.id = Uuid::new_v4().to_string();
        }
        let id = statement.id.clone();

        let mut statements = self.statements.write().map_err(poisoned)?;
        match statements.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = statement,
            None => statements.push(statement),
        }
        Ok(id)
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> SourceResult<()> {
        self.statements.write().map_err(poisoned)?.clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.statements.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> SourceError {
    SourceError::Unavailable("in-memory statement store lock poisoned".to_string())
}

#[async_trait]
impl StatementSource for MemoryStatementSource {
    async fn get_statement(&self, statement_id: &str) -> SourceResult<Option<RawStatement>> {
        let statements = self.statements.read().map_err(poisoned)?;
        Ok(statements
            .iter()
            .find(|statement| statement.id == statement_id)
            .cloned())
    }

    async fn list_statements(&self) -> SourceResult<Vec<RawStatement>> {
        Ok(self.statements.read().map_err(poisoned)?.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: &str, bank: &str) -> RawStatement {
        RawStatement::new(id.to_string(), bank.to_string(), None, json!({}))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let source = MemoryStatementSource::new();
        source.insert(raw("a", "Bradesco")).unwrap();

        let found = source.get_statement("a").await.unwrap();
        assert_eq!(found.map(|s| s.bank), Some("Bradesco".to_string()));
        assert!(source.get_statement("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let source = MemoryStatementSource::new();
        source.insert(raw("a", "Bradesco")).unwrap();
        source.insert(raw("b", "BB")).unwrap();
        source.insert(raw("a", "Itau")).unwrap();

        let listed = source.list_statements().await.unwrap();
        let banks: Vec<_> = listed.iter().map(|s| s.bank.as_str()).collect();
        assert_eq!(banks, ["Itau", "BB"]);
    }

    #[tokio::test]
    async fn test_generated_ids() {
        let source = MemoryStatementSource::new();
        let first = source.insert(raw("", "Bradesco")).unwrap();
        let second = source.insert(raw("  ", "Bradesco")).unwrap();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(source.len(), 2);
        assert!(source.get_statement(&second).await.unwrap().is_some());
    }

    #[test]
    fn test_clear() {
        let source = MemoryStatementSource::with_statements(vec![raw("a", "X"), raw("b", "Y")]).unwrap();
        assert_eq!(source.len(), 2);

        source.clear().unwrap();
        assert!(source.is_empty());
    }
}
