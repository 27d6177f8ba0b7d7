//! Search module - query parsing, matching and pagination / 搜索模块
//!
//! Architecture principles / 架构原则：
//! - Parser and matcher are pure functions, no I/O / 解析与匹配为纯函数
//! - The index is loaded once per session and read-only afterwards / 索引每个会话只加载一次
//! - Pagination is a single-use cursor over the match list / 分页为一次性游标
//!
//! Control flow: raw query -> `parse` -> `match_query` -> `ResultPaginator`.

pub mod help;
pub mod index;
pub mod matcher;
pub mod paginator;
pub mod query;
pub mod schema;

pub use help::{search_permalink, HelpEntry, HELP_ENTRIES};
pub use index::{fold_case, RawIndex, RecordId, SearchIndex};
pub use matcher::{match_cached, match_query, MatchList};
pub use paginator::{PaginatorState, ResultPaginator, SearchPage};
pub use query::{parse, ParsedQuery, SubTerm, TermGroup};
pub use schema::{IndexBuilder, RecordKind, SearchRecord};
