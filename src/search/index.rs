//! Search index - record id -> searchable text, in insertion order / 搜索索引
//!
//! The index blob is a single JSON object (`search.json`). Object order is the
//! order matches are reported in, so both codecs below keep it.

use std::collections::HashMap;
use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Opaque `"{type}/{id}"` key, only compared for equality / 记录标识
pub type RecordId = String;

/// Fold text to its case-insensitive comparable form / 统一大小写
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Ordered (id, text) pairs as delivered by an index source / 原始索引
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIndex {
    entries: Vec<(RecordId, String)>,
}

impl RawIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, duplicates are resolved by `SearchIndex::from_raw`
    pub fn push(&mut self, id: impl Into<RecordId>, text: impl Into<String>) {
        self.entries.push((id.into(), text.into()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, text)| (id.as_str(), text.as_str()))
    }

    /// Decode a JSON object blob / 解析 JSON 对象
    pub fn from_json(blob: &str) -> crate::error::Result<Self> {
        serde_json::from_str(blob)
            .map_err(|e| crate::error::SearchError::IndexFormat(e.to_string()))
    }

    /// Encode as a JSON object in insertion order / 按插入顺序编码
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<I, T> FromIterator<(I, T)> for RawIndex
where
    I: Into<RecordId>,
    T: Into<String>,
{
    fn from_iter<It: IntoIterator<Item = (I, T)>>(iter: It) -> Self {
        let mut raw = RawIndex::new();
        for (id, text) in iter {
            raw.push(id, text);
        }
        raw
    }
}

struct RawIndexVisitor;

impl<'de> Visitor<'de> for RawIndexVisitor {
    type Value = RawIndex;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping record ids to text")
    }

    fn visit_map<M>(self, mut access: M) -> std::result::Result<RawIndex, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut raw = RawIndex {
            entries: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((id, text)) = access.next_entry::<String, String>()? {
            raw.entries.push((id, text));
        }
        Ok(raw)
    }
}

impl<'de> Deserialize<'de> for RawIndex {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RawIndexVisitor)
    }
}

impl Serialize for RawIndex {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, text) in &self.entries {
            map.serialize_entry(id, text)?;
        }
        map.end()
    }
}

/// Immutable, case-folded search index / 只读的搜索索引（已统一小写）
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: Vec<(RecordId, String)>,
    positions: HashMap<RecordId, usize>,
}

impl SearchIndex {
    /// Build from raw entries: fold case, one entry per id
    /// / 构建索引：统一小写，重复 id 覆盖旧值但保留原位置
    pub fn from_raw(raw: RawIndex) -> Self {
        let mut entries: Vec<(RecordId, String)> = Vec::with_capacity(raw.entries.len());
        let mut positions: HashMap<RecordId, usize> = HashMap::with_capacity(raw.entries.len());

        for (id, text) in raw.entries {
            let folded = fold_case(&text);
            match positions.get(&id) {
                Some(&pos) => entries[pos].1 = folded,
                None => {
                    positions.insert(id.clone(), entries.len());
                    entries.push((id, folded));
                }
            }
        }

        Self { entries, positions }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Folded text for a record / 获取记录的可搜索文本
    pub fn get(&self, id: &str) -> Option<&str> {
        self.positions.get(id).map(|&pos| self.entries[pos].1.as_str())
    }

    /// Entries in index order / 按索引顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, text)| (id.as_str(), text.as_str()))
    }
}

impl Serialize for SearchIndex {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, text) in &self.entries {
            map.serialize_entry(id, text)?;
        }
        map.end()
    }
}
