//! Response parsing for agent output.
//!
//! The agent is instructed to return one fenced ```sql block followed by a
//! short explanation. A response without a fence is kept as a distinct
//! variant so callers can tell "the agent produced prose" from "the agent
//! followed the format", while rendering stays permissive: bare text is still
//! wrapped as SQL.

use regex::Regex;
use std::sync::LazyLock;

static SQL_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```sql\n(.*?)\n```").expect("static pattern compiles"));

/// The result of parsing one agent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlResponse {
    /// The response carried a fenced SQL block; `explanation` is whatever
    /// text remained around it (possibly empty).
    Fenced { sql: String, explanation: String },
    /// No fence was found; the whole response is treated as SQL.
    Bare { sql: String },
}

impl SqlResponse {
    /// Parse raw agent text. Applied once per response.
    pub fn parse(text: &str) -> Self {
        match SQL_FENCE.captures(text) {
            Some(caps) => {
                let full = caps.get(0).expect("group 0 always present");
                let sql = caps
                    .get(1)
                    .expect("pattern has one capture group")
                    .as_str()
                    .trim()
                    .to_string();
                let mut explanation = String::with_capacity(text.len() - full.len());
                explanation.push_str(&text[..full.start()]);
                explanation.push_str(&text[full.end()..]);
                Self::Fenced {
                    sql,
                    explanation: explanation.trim().to_string(),
                }
            }
            None => Self::Bare {
                sql: text.to_string(),
            },
        }
    }

    /// The extracted (or assumed) SQL text.
    pub fn sql(&self) -> &str {
        match self {
            Self::Fenced { sql, .. } => sql,
            Self::Bare { sql } => sql,
        }
    }

    /// The explanation, when the response carried a fence.
    pub fn explanation(&self) -> Option<&str> {
        match self {
            Self::Fenced { explanation, .. } => Some(explanation),
            Self::Bare { .. } => None,
        }
    }

    /// True when no fence was found and the SQL is assumed.
    pub fn is_bare(&self) -> bool {
        matches!(self, Self::Bare { .. })
    }

    /// Render for display: the SQL re-wrapped in a fenced block, followed by
    /// a blank line and the explanation when one is present.
    pub fn render(&self) -> String {
        match self {
            Self::Fenced { sql, explanation } if !explanation.is_empty() => {
                format!("```sql\n{}\n```\n\n{}", sql, explanation)
            }
            _ => format!("```sql\n{}\n```", self.sql()),
        }
    }
}
