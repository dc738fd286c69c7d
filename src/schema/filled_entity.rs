use serde::{Deserialize, Serialize};

/// One captured value for an entity slot.
///
/// `display_text`, when present and non-empty, overrides `user_text` for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryValue {
    #[serde(default)]
    pub user_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl MemoryValue {
    /// A value captured verbatim from the user.
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: Some(user_text.into()),
            display_text: None,
        }
    }

    /// A value whose rendered form differs from what the user typed.
    pub fn with_display(user_text: impl Into<String>, display_text: impl Into<String>) -> Self {
        Self {
            user_text: Some(user_text.into()),
            display_text: Some(display_text.into()),
        }
    }

    /// The text used when rendering this value.
    pub fn text(&self) -> &str {
        match self.display_text.as_deref() {
            Some(display) if !display.is_empty() => display,
            _ => self.user_text.as_deref().unwrap_or_default(),
        }
    }
}

/// A resolved entity: every value captured for one slot, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledEntity {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub values: Vec<MemoryValue>,
}

impl FilledEntity {
    pub fn new(entity_id: Option<String>, values: Vec<MemoryValue>) -> Self {
        Self { entity_id, values }
    }

    /// Build an entity from plain user texts.
    pub fn from_texts<I, S>(entity_id: Option<String>, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entity_id,
            values: texts.into_iter().map(MemoryValue::new).collect(),
        }
    }

    /// All values as one phrase: "A", "A and B", "A, B and C".
    pub fn value_as_string(&self) -> String {
        format_list(self.values.iter().map(MemoryValue::text))
    }
}

/// Join items as prose. Items are separated by `", "` except the last,
/// which is preceded by `" and "`. There is no serial comma.
pub fn format_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    I::IntoIter: ExactSizeIterator,
    S: AsRef<str>,
{
    let items = items.into_iter();
    let last = items.len().saturating_sub(1);
    let mut group = String::new();

    for (index, item) in items.enumerate() {
        if index > 0 {
            group.push_str(if index == last { " and " } else { ", " });
        }
        group.push_str(item.as_ref());
    }

    group
}
