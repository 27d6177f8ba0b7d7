//! Search record schema and index builder / 搜索记录与索引构建

use serde::{Deserialize, Serialize};

use super::index::{RawIndex, RecordId};

/// Record type / 记录类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Page,
    Post,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Page => "page",
            RecordKind::Post => "post",
        }
    }
}

/// Content record used for building the index / 用于构建索引的内容记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub kind: RecordKind,
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// Raw body text, markup already stripped / 正文原始文本
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SearchRecord {
    pub fn page(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Page,
            id: id.into(),
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
        }
    }

    pub fn post(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Post,
            id: id.into(),
            title: title.into(),
            body: body.into(),
            tags: Vec::new(),
        }
    }

    /// Add tags, skipping ones already present / 添加标签（去重）
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for tag in tags {
            let tag = tag.into();
            if !self.tags.contains(&tag) {
                self.tags.push(tag);
            }
        }
        self
    }

    /// `"{type}/{id}"` / 生成记录标识
    pub fn record_id(&self) -> RecordId {
        format!("{}/{}", self.kind.as_str(), self.id)
    }

    /// Title + body (+ tags for posts) / 可搜索文本
    pub fn searchable_text(&self) -> String {
        let title = self.title.to_lowercase();
        match self.kind {
            RecordKind::Page => format!("{} {}", title, self.body),
            RecordKind::Post => format!(
                "{} {} {}",
                title,
                self.body,
                self.tags.join(" ").to_lowercase()
            ),
        }
    }
}

/// Collects records into an index blob / 索引构建器
#[derive(Debug, Default)]
pub struct IndexBuilder {
    raw: RawIndex,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &SearchRecord) -> &mut Self {
        self.raw.push(record.record_id(), record.searchable_text());
        self
    }

    pub fn extend<'a, I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a SearchRecord>,
    {
        for record in records {
            self.add(record);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn build(self) -> RawIndex {
        self.raw
    }

    /// Serialize as `search.json` content / 生成 search.json 内容
    pub fn to_json(&self) -> crate::error::Result<String> {
        self.raw.to_json()
    }
}
