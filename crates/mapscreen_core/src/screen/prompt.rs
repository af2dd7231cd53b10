//! City search prompt: one text field plus cancel/confirm actions.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Static description of the prompt for the host to present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPrompt {
    pub title: String,
    pub placeholder: String,
    pub cancel_title: String,
    pub confirm_title: String,
}

impl Default for SearchPrompt {
    fn default() -> Self {
        Self {
            title: "Enter city".to_string(),
            placeholder: "City".to_string(),
            cancel_title: "Cancel".to_string(),
            confirm_title: "Search".to_string(),
        }
    }
}

/// How the user dismissed the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "text")]
pub enum SearchPromptResponse {
    Cancel,
    Search(String),
}

/// Trims the query and collapses inner whitespace runs to one space.
///
/// Returns `None` when nothing but whitespace was entered.
pub fn normalize_city_query(raw: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}
