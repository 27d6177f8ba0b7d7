//! Result paginator - single-use cursor over a match list / 结果分页器
//!
//! Pages are removed from the front of the remaining matches. There is no rewind:
//! a served page is gone, and `init` discards whatever was left of the old list.

use std::collections::VecDeque;

use serde::Serialize;

use super::index::RecordId;
use super::matcher::MatchList;

/// Paginator state / 分页器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginatorState {
    /// Never initialized / 未初始化
    Idle,
    /// Matches loaded, nothing served yet / 已就绪
    Ready,
    /// Pages are being served / 分页中
    Draining,
    /// Nothing left / 已耗尽
    Exhausted,
}

/// One page of record ids / 一页结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub ids: Vec<RecordId>,
    pub has_more: bool,
}

#[derive(Debug)]
pub struct ResultPaginator {
    remaining: VecDeque<RecordId>,
    page_size: usize,
    state: PaginatorState,
}

impl ResultPaginator {
    pub fn new() -> Self {
        Self {
            remaining: VecDeque::new(),
            page_size: 1,
            state: PaginatorState::Idle,
        }
    }

    /// Start over with a new match list / 用新的匹配结果重置
    ///
    /// A page size of 0 is treated as 1.
    pub fn init(&mut self, matches: MatchList, page_size: usize) {
        self.page_size = page_size.max(1);
        self.remaining = matches.into();
        self.state = if self.remaining.is_empty() {
            PaginatorState::Exhausted
        } else {
            PaginatorState::Ready
        };
    }

    /// Take up to `page_size` ids from the front / 取下一页
    ///
    /// Idle and Exhausted both yield an empty page with `has_more = false`.
    pub fn next_page(&mut self) -> SearchPage {
        if matches!(self.state, PaginatorState::Idle | PaginatorState::Exhausted) {
            return SearchPage::default();
        }

        let take = self.page_size.min(self.remaining.len());
        let ids: Vec<RecordId> = self.remaining.drain(..take).collect();
        let has_more = !self.remaining.is_empty();
        self.state = if has_more {
            PaginatorState::Draining
        } else {
            PaginatorState::Exhausted
        };

        SearchPage { ids, has_more }
    }

    /// Drop any active list and go back to Idle / 清空并回到初始状态
    pub fn clear(&mut self) {
        self.remaining.clear();
        self.state = PaginatorState::Idle;
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Default for ResultPaginator {
    fn default() -> Self {
        Self::new()
    }
}
