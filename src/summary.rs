//! Meeting summary payload model and rendering.

use serde_json::Value;

/// A summary returned by the service: plain text, or a structured object
/// with optional agenda and action-item lists. No schema is enforced
/// beyond optional-field checks; unknown shapes degrade to their JSON
/// text.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Text(String),
    Structured {
        summary: String,
        agendas: Vec<String>,
        action_items: Vec<String>,
    },
}

impl Summary {
    pub fn from_payload(value: &Value) -> Summary {
        match value {
            Value::String(s) => Summary::Text(s.clone()),
            Value::Object(map) => Summary::Structured {
                summary: map
                    .get("summary")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                agendas: string_list(map.get("agendas")),
                action_items: string_list(map.get("action_items")),
            },
            other => Summary::Text(other.to_string()),
        }
    }

    /// Plain-text rendering: summary paragraph, then agenda and action
    /// item bullets when present.
    pub fn render(&self) -> String {
        let (text, agendas, action_items) = match self {
            Summary::Text(text) => (text.as_str(), &[][..], &[][..]),
            Summary::Structured {
                summary,
                agendas,
                action_items,
            } => (summary.as_str(), agendas.as_slice(), action_items.as_slice()),
        };

        let mut out = String::new();
        if text.trim().is_empty() {
            out.push_str("No summary available yet.");
        } else {
            out.push_str(text);
        }

        if !agendas.is_empty() {
            out.push_str("\n\nAgendas:");
            for item in agendas {
                out.push_str("\n- ");
                out.push_str(item);
            }
        }

        if !action_items.is_empty() {
            out.push_str("\n\nAction Items:");
            for item in action_items {
                out.push_str("\n- ");
                out.push_str(item);
            }
        }

        out
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// Coerce an optional array into display strings; non-string entries
/// render as their JSON text, non-arrays as empty.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}
