//! Query parser / 查询解析器
//!
//! Query language / 查询语法：
//! - Space separates top-level terms, terms are OR-ed / 空格分隔的词之间为"或"
//! - `"..."` keeps spaces inside a phrase / 双引号内为精确短语
//! - `a+b` requires both, `a-b` requires `a` and forbids `b` / 加号为"且"，减号为"排除"
//!
//! Parsing never fails: unterminated quotes and stray operators are absorbed.
//! Case is preserved here, folding happens in the matcher.

use serde::Serialize;

/// Signed sub-term / 带符号的子词
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubTerm {
    pub text: String,
    /// false = must be absent / false 表示必须不包含
    pub include: bool,
}

impl SubTerm {
    pub fn include(text: impl Into<String>) -> Self {
        Self { text: text.into(), include: true }
    }

    pub fn exclude(text: impl Into<String>) -> Self {
        Self { text: text.into(), include: false }
    }
}

/// Sub-terms of one top-level term, AND-ed / 同一词组内的子词为"且"关系
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TermGroup {
    pub sub_terms: Vec<SubTerm>,
}

impl TermGroup {
    /// Split one top-level term on `+` / `-` / 按 +/- 拆分子词
    pub fn from_term(term: &str) -> Self {
        let mut sub_terms = Vec::new();
        let mut current = String::new();
        let mut exclude = false;

        for c in term.chars() {
            if c == '+' || c == '-' {
                if !current.is_empty() {
                    sub_terms.push(SubTerm {
                        text: std::mem::take(&mut current),
                        include: !exclude,
                    });
                }
                exclude = c == '-';
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            sub_terms.push(SubTerm { text: current, include: !exclude });
        }

        Self { sub_terms }
    }

    pub fn len(&self) -> usize {
        self.sub_terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_terms.is_empty()
    }
}

/// Parsed query: distinct term groups keyed by their raw top-level text
/// / 解析结果，按原始词文本去重
///
/// Group order carries no meaning since groups are OR-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    groups: Vec<(String, TermGroup)>,
}

impl ParsedQuery {
    /// Insert or overwrite the group for `key` / 插入或覆盖
    fn insert(&mut self, key: String, group: TermGroup) {
        match self.groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = group,
            None => self.groups.push((key, group)),
        }
    }

    /// Empty means "no search performed" / 为空表示不执行搜索
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn get(&self, key: &str) -> Option<&TermGroup> {
        self.groups.iter().find(|(k, _)| k == key).map(|(_, g)| g)
    }

    pub fn groups(&self) -> impl Iterator<Item = &TermGroup> {
        self.groups.iter().map(|(_, g)| g)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(k, _)| k.as_str())
    }
}

/// Split the raw query into top-level terms, honoring phrases / 拆分顶层词（支持短语）
fn split_terms(raw: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut term = String::new();
    let mut phrase = false;

    for c in raw.chars() {
        match c {
            '"' => phrase = !phrase,
            ' ' if !phrase => {
                if !term.is_empty() {
                    terms.push(std::mem::take(&mut term));
                }
            }
            _ => term.push(c),
        }
    }
    if !term.is_empty() {
        terms.push(term);
    }

    terms
}

/// Parse a raw query string / 解析查询字符串
pub fn parse(raw: &str) -> ParsedQuery {
    let mut query = ParsedQuery::default();
    for term in split_terms(raw) {
        let group = TermGroup::from_term(&term);
        query.insert(term, group);
    }
    query
}
