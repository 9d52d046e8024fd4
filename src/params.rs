//! Task configuration extraction
//!
//! The task launcher leaves YAML-ish config files next to the recordings;
//! the report carries a few of their values (target count, radii). Values are
//! taken verbatim as written and echoed into reports without numeric
//! interpretation.

use serde::{Deserialize, Serialize};

/// Task configuration values echoed into a day's report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskParams {
    /// Number of targets, as written in the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_targets: Option<String>,
    /// Target radius, as written in the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_radius: Option<String>,
    /// Cursor radius, as written in the config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_radius: Option<String>,
}

impl TaskParams {
    /// Extract the standard report parameters from config texts.
    ///
    /// Texts are scanned in order; the first one holding a given key
    /// sequence wins for that parameter.
    pub fn from_config_texts<'a, I>(texts: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut params = TaskParams::default();
        for text in texts {
            if params.n_targets.is_none() {
                params.n_targets = find_param(text, &["n_targets"]);
            }
            if params.target_radius.is_none() {
                params.target_radius = find_param(text, &["target", "radius"]);
            }
            if params.cursor_radius.is_none() {
                params.cursor_radius = find_param(text, &["cursor", "radius"]);
            }
        }
        params
    }
}

/// Find the value following a key sequence in config text.
///
/// Keys match whole whitespace-separated tokens with a trailing colon, so
/// `["target", "radius"]` matches
/// ```text
/// target:
///   radius: 0.08
/// ```
/// and returns `"0.08"`. Returns `None` when the sequence never occurs, or
/// occurs at the end of the text with nothing after it.
pub fn find_param(text: &str, keys: &[&str]) -> Option<String> {
    if keys.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let needle: Vec<String> = keys.iter().map(|key| format!("{}:", key)).collect();

    let mut index = 0;
    while index + needle.len() < tokens.len() {
        let matches = tokens[index..index + needle.len()]
            .iter()
            .zip(&needle)
            .all(|(token, key)| token == key);
        if matches {
            return Some(tokens[index + needle.len()].to_string());
        }
        index += 1;
    }
    None
}
