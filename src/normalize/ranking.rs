//! Bounded counterparty rankings
//!
//! Upstream extraction lists counterparties largest first. By default that
//! order is trusted and kept as-is; a list that is not ranked by amount is
//! reported, not reordered, because reordering could break ties differently
//! from the source document.

use serde::{Deserialize, Serialize};

use crate::types::Counterparty;

/// Default size of every ranked list
pub const DEFAULT_TOP_N: usize = 5;

/// How ranked lists treat source order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Keep the source order and truncate
    #[default]
    Preserve,
    /// Stable-sort by amount descending, then truncate
    SortDescending,
}

/// First `n` entries of `list`, in the order given
pub fn select_top(list: &[Counterparty], n: usize) -> Vec<Counterparty> {
    list.iter().take(n).cloned().collect()
}

/// Whether amounts never increase along the list
pub fn is_ranked_descending(list: &[Counterparty]) -> bool {
    list.windows(2).all(|pair| pair[0].amount >= pair[1].amount)
}

/// Applies the configured size and policy to counterparty lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopNSelector {
    limit: usize,
    policy: RankingPolicy,
}

impl TopNSelector {
    pub fn new(limit: usize, policy: RankingPolicy) -> Self {
        Self { limit, policy }
    }

    /// Rank and truncate a list; `role` only labels log output
    pub fn select(&self, mut list: Vec<Counterparty>, role: &str) -> Vec<Counterparty> {
        match self.policy {
            RankingPolicy::Preserve => {
                if !is_ranked_descending(&list) {
                    log::warn!(
                        "{} list of {} entries is not ranked by amount; keeping source order",
                        role,
                        list.len()
                    );
                }
                list.truncate(self.limit);
                list
            }
            RankingPolicy::SortDescending => {
                list.sort_by(|a, b| b.amount.cmp(&a.amount));
                list.truncate(self.limit);
                list
            }
        }
    }
}

impl Default for TopNSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N, RankingPolicy::Preserve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::MonetaryAmount;

    fn party(name: &str, amount: &str) -> Counterparty {
        Counterparty::new(
            name.to_string(),
            String::new(),
            MonetaryAmount::parse(amount),
            1,
        )
    }

    fn names(list: &[Counterparty]) -> Vec<&str> {
        list.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_select_top_bounds() {
        let list: Vec<_> = (0..8).map(|i| party(&format!("p{}", i), "10")).collect();

        assert_eq!(select_top(&list, 5).len(), 5);
        assert_eq!(select_top(&list[..3], 5).len(), 3);
        assert!(select_top(&[], 5).is_empty());
        assert!(select_top(&list, 0).is_empty());
    }

    #[test]
    fn test_select_top_preserves_order() {
        let list = vec![party("a", "1"), party("b", "300"), party("c", "20")];
        assert_eq!(names(&select_top(&list, 2)), ["a", "b"]);
    }

    #[test]
    fn test_ranked_detection() {
        assert!(is_ranked_descending(&[]));
        assert!(is_ranked_descending(&[party("a", "5"), party("b", "5"), party("c", "1")]));
        assert!(!is_ranked_descending(&[party("a", "1"), party("b", "2")]));
    }

    #[test]
    fn test_preserve_policy_keeps_unranked_order() {
        let selector = TopNSelector::default();
        let list = vec![party("a", "1"), party("b", "300"), party("c", "20")];
        assert_eq!(names(&selector.select(list, "depositor")), ["a", "b", "c"]);
    }

    #[test]
    fn test_sort_policy_is_stable() {
        let selector = TopNSelector::new(3, RankingPolicy::SortDescending);
        let list = vec![
            party("low", "1"),
            party("tie-first", "50"),
            party("high", "900"),
            party("tie-second", "50"),
        ];
        assert_eq!(
            names(&selector.select(list, "payee")),
            ["high", "tie-first", "tie-second"]
        );
    }
}
