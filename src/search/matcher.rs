//! Matcher - evaluates a parsed query against the index / 匹配器
//!
//! Groups are OR-ed, sub-terms within a group are AND-ed with their polarity.
//! Matching is plain substring containment on case-folded text: no tokenization,
//! no word boundaries (`cat` matches `concatenate`). Results keep index order.

use crate::error::{Result, SearchError};
use crate::loader::IndexLoader;

use super::index::{fold_case, RecordId, SearchIndex};
use super::query::{ParsedQuery, SubTerm};

/// Matched record ids in index order / 匹配结果（按索引顺序）
pub type MatchList = Vec<RecordId>;

/// Query with its sub-terms folded once up front / 预先统一小写的查询
struct FoldedQuery {
    groups: Vec<Vec<SubTerm>>,
}

impl FoldedQuery {
    fn new(query: &ParsedQuery) -> Self {
        let groups = query
            .groups()
            .map(|group| {
                group
                    .sub_terms
                    .iter()
                    .map(|sub| SubTerm { text: fold_case(&sub.text), include: sub.include })
                    .collect()
            })
            .collect();
        Self { groups }
    }

    /// Any group satisfied; each group fails fast on its first violated sub-term
    fn matches(&self, text: &str) -> bool {
        self.groups
            .iter()
            .any(|group| group.iter().all(|sub| text.contains(sub.text.as_str()) == sub.include))
    }
}

/// Match a query against a loaded index / 在已加载的索引上执行匹配
///
/// An empty query matches nothing.
pub fn match_query(query: &ParsedQuery, index: &SearchIndex) -> MatchList {
    if query.is_empty() {
        return Vec::new();
    }

    let folded = FoldedQuery::new(query);
    let matches: MatchList = index
        .iter()
        .filter(|(_, text)| folded.matches(text))
        .map(|(id, _)| id.to_string())
        .collect();

    tracing::debug!(
        "Matched {} of {} records against {} term group(s)",
        matches.len(),
        index.len(),
        query.len()
    );
    matches
}

/// Match against the loader's cached index without triggering a load
/// / 使用已缓存的索引匹配，不触发加载
pub fn match_cached(query: &ParsedQuery, loader: &IndexLoader) -> Result<MatchList> {
    let index = loader
        .cached()
        .ok_or_else(|| SearchError::IndexUnavailable("index has not been loaded".to_string()))?;
    Ok(match_query(query, &index))
}
