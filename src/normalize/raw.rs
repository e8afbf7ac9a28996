//! Total navigation over untyped statement payloads
//!
//! Every accessor resolves a missing or wrongly-typed value to its documented
//! default, so code past this boundary never handles optionality.

use serde_json::Value;

use crate::amount::MonetaryAmount;

/// Cursor at a (possibly absent) position inside a payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a>(Option<&'a Value>);

impl<'a> Field<'a> {
    pub fn root(value: &'a Value) -> Self {
        Self(Some(value))
    }

    pub fn missing() -> Self {
        Self(None)
    }

    /// Step into an object member; missing on any other shape
    pub fn get(self, key: &str) -> Field<'a> {
        Field(self.0.and_then(|value| value.get(key)))
    }

    /// First of several member names that is present
    pub fn first_of(self, keys: &[&str]) -> Field<'a> {
        keys.iter()
            .map(|key| self.get(key))
            .find(|field| field.is_present())
            .unwrap_or_else(Field::missing)
    }

    /// Present and not JSON `null`
    pub fn is_present(self) -> bool {
        matches!(self.0, Some(value) if !value.is_null())
    }

    pub fn amount(self) -> MonetaryAmount {
        self.0.map(MonetaryAmount::from_value).unwrap_or_default()
    }

    /// Transaction count; accepts integers, floats and zero-padded strings
    pub fn count(self) -> u64 {
        match self.0 {
            Some(Value::Number(n)) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Non-blank text, trimmed; numbers are rendered as text
    pub fn text(self) -> Option<String> {
        match self.0 {
            Some(Value::String(s)) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn text_or_default(self) -> String {
        self.text().unwrap_or_default()
    }

    /// Textual elements of an array, in order; blank and non-text elements are skipped
    pub fn strings(self) -> Vec<String> {
        self.items().filter_map(Field::text).collect()
    }

    /// Elements of an array; empty for any other shape
    pub fn items(self) -> impl Iterator<Item = Field<'a>> {
        self.0
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .map(|value| Field(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_navigation_through_missing_objects() {
        let payload = json!({"creditos": {"total": "1.000,00"}});
        let root = Field::root(&payload);

        assert_eq!(root.get("creditos").get("total").amount(), MonetaryAmount::parse("1000"));
        assert!(root.get("debitos").get("total").amount().is_zero());
        assert!(!root.get("creditos").get("total").get("deeper").is_present());
    }

    #[test]
    fn test_wrong_shapes_degrade_to_defaults() {
        let payload = json!({"creditos": "not an object", "notas": {"a": 1}, "quantidade": [1]});
        let root = Field::root(&payload);

        assert!(root.get("creditos").get("total").amount().is_zero());
        assert!(root.get("notas").strings().is_empty());
        assert_eq!(root.get("quantidade").count(), 0);
    }

    #[test]
    fn test_counts() {
        let payload = json!({"a": 7, "b": "02", "c": 3.0, "d": -1, "e": "x", "f": null});
        let root = Field::root(&payload);

        assert_eq!(root.get("a").count(), 7);
        assert_eq!(root.get("b").count(), 2);
        assert_eq!(root.get("c").count(), 3);
        assert_eq!(root.get("d").count(), 0);
        assert_eq!(root.get("e").count(), 0);
        assert_eq!(root.get("f").count(), 0);
    }

    #[test]
    fn test_text_and_strings() {
        let payload = json!({"nome": "  Maria  ", "vazio": " ", "lista": ["a", " ", 3, null, "b"]});
        let root = Field::root(&payload);

        assert_eq!(root.get("nome").text(), Some("Maria".to_string()));
        assert_eq!(root.get("vazio").text(), None);
        assert_eq!(root.get("lista").strings(), vec!["a", "3", "b"]);
    }

    #[test]
    fn test_first_of_skips_null() {
        let payload = json!({"principais_destinatarios": null, "principais_favorecidos": [1]});
        let root = Field::root(&payload);

        let list = root.first_of(&["principais_destinatarios", "principais_favorecidos"]);
        assert_eq!(list.items().count(), 1);
        assert!(!root.first_of(&["x", "y"]).is_present());
    }
}
