//! Grouping of signatures by digest.
//!
//! Batch input usually repeats the same statement shape with different
//! literals. Grouping by digest shows which shapes dominate.

use indexmap::IndexMap;
use serde::Serialize;

use crate::{signature::Signature, statements::StatementType};

/// Signatures sharing one digest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestGroup {
    pub digest:          String,
    pub count:           usize,
    pub statement_types: Vec<StatementType>,
    /// Source text of the first input with this digest
    pub example:         String,
    /// Sum of extracted parameters over the group
    pub total_params:    usize
}

/// Group `(source, signature)` pairs by digest in first-seen order
pub fn aggregate<'a, I>(signed: I) -> Vec<DigestGroup>
where
    I: IntoIterator<Item = (&'a str, &'a Signature)>
{
    let mut groups: IndexMap<&str, DigestGroup> = IndexMap::new();

    for (sql, sig) in signed {
        let group = groups
            .entry(sig.digest.as_str())
            .or_insert_with(|| DigestGroup {
                digest:          sig.digest.clone(),
                count:           0,
                statement_types: sig.statement_types.clone(),
                example:         sql.to_string(),
                total_params:    0
            });
        group.count += 1;
        group.total_params += sig.params.len();
    }

    groups.into_values().collect()
}

/// The `n` largest groups, most frequent first; ties keep first-seen order
pub fn top(mut groups: Vec<DigestGroup>, n: usize) -> Vec<DigestGroup> {
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups.truncate(n);
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dialect::Options, signature::signature};

    fn signed(sqls: &[&'static str]) -> Vec<(&'static str, Signature)> {
        let opts = Options::default();
        sqls.iter().map(|s| (*s, signature(s, &opts))).collect()
    }

    #[test]
    fn test_groups_by_digest() {
        let pairs = signed(&[
            "SELECT * FROM t WHERE id = 1",
            "UPDATE t SET a = 2",
            "SELECT * FROM t WHERE id = 42"
        ]);
        let groups = aggregate(pairs.iter().map(|(s, g)| (*s, g)));

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].digest, "SELECT * FROM T WHERE ID = ?");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].total_params, 2);
        assert_eq!(groups[0].example, "SELECT * FROM t WHERE id = 1");
        assert_eq!(groups[1].statement_types, vec![StatementType::Update]);
    }

    #[test]
    fn test_top_sorts_by_count() {
        let pairs = signed(&["DELETE FROM t", "SELECT 1", "SELECT 2", "SELECT 3"]);
        let groups = aggregate(pairs.iter().map(|(s, g)| (*s, g)));
        let best = top(groups, 1);

        assert_eq!(best.len(), 1);
        assert_eq!(best[0].digest, "SELECT ?");
        assert_eq!(best[0].count, 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate(std::iter::empty()).is_empty());
    }
}
