//! Query language help / 查询语法帮助

use serde::Serialize;

/// One help line, optionally with an example query / 帮助条目
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HelpEntry {
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<&'static str>,
}

const fn rule(text: &'static str) -> HelpEntry {
    HelpEntry { text, example: None }
}

const fn example(example: &'static str, text: &'static str) -> HelpEntry {
    HelpEntry { text, example: Some(example) }
}

pub const HELP_ENTRIES: &[HelpEntry] = &[
    rule("search is case-insensitive and unicode-friendly"),
    rule("returns records matching any / at least one of the search terms"),
    rule("individual search terms are separated by spaces"),
    rule("a search term is a single word or multiple words enclosed in double quotes"),
    example("term1+term2", "find records matching both term1 and term2"),
    example("term1-term2", "find records matching term1, but not matching term2"),
    example("food restaurant", "records matching either food or restaurant"),
    example(
        "\"terraforming mars\"",
        "records matching terraforming mars exactly (both words in the given order)",
    ),
    example("cooking+\"tom yum\"", "records matching both cooking and tom yum"),
    example("cycling-zwift", "records matching cycling, but not matching zwift"),
    example(
        "\"bike ride\" strava+segment",
        "records with either an exact bike ride match or matching both strava and segment",
    ),
];

/// Shareable link to the search page for a query / 生成可分享的搜索链接
pub fn search_permalink(query: &str) -> String {
    format!("/search.html?q={}", urlencoding::encode(query))
}
