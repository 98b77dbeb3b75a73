use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Current shelf stock: item name → counted quantity.
///
/// Backed by a `BTreeMap` so iteration order (and therefore every prompt and
/// rendered document built from it) is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockSnapshot {
    items: BTreeMap<String, u32>,
}

impl StockSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed demo snapshot used when model output fails validation.
    pub fn demo() -> Self {
        let mut snapshot = Self::new();
        snapshot.set("Croissants", 4);
        snapshot.set("Red Bull 8-pack", 6);
        snapshot.set("2% Milk Gallon", 12);
        snapshot.set("Doritos", 8);
        snapshot
    }

    pub fn set(&mut self, item: impl Into<String>, qty: u32) {
        self.items.insert(item.into(), qty);
    }

    pub fn get(&self, item: &str) -> Option<u32> {
        self.items.get(item).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.items.iter().map(|(name, qty)| (name.as_str(), *qty))
    }
}

/// Target stock quantities per item. Used only while building prompts; never
/// enforced against the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParLevels {
    targets: BTreeMap<String, u32>,
}

impl ParLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed demo par levels.
    pub fn demo() -> Self {
        let mut levels = Self::new();
        levels.set("Croissants", 20);
        levels.set("Red Bull 8-pack", 24);
        levels.set("2% Milk Gallon", 30);
        levels.set("Doritos", 30);
        levels
    }

    pub fn set(&mut self, item: impl Into<String>, target: u32) {
        self.targets.insert(item.into(), target);
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.targets.iter().map(|(name, qty)| (name.as_str(), *qty))
    }
}

/// Output channel a draft is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Json,
    Pdf,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Whatsapp, Channel::Json, Channel::Pdf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "whatsapp",
            Channel::Json => "json",
            Channel::Pdf => "pdf",
        }
    }

    /// Parse a channel from its wire name.
    pub fn parse(s: &str) -> Option<Channel> {
        match s {
            "whatsapp" => Some(Channel::Whatsapp),
            "json" => Some(Channel::Json),
            "pdf" => Some(Channel::Pdf),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reorder draft per channel. All three payloads are always present and
/// non-empty — generation falls back to the fixed demo drafts rather than
/// producing a partial set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSet {
    pub whatsapp: String,
    pub json: String,
    pub pdf: String,
}

impl DraftSet {
    /// The fixed demo drafts used when model output fails validation.
    pub fn fallback() -> Self {
        Self {
            whatsapp: "Hey Mike! Running low on Red Bull (only 6 left). Can you send 3 cases \
                       for Thursday? Thanks! – Alex @ Store #142"
                .to_string(),
            json: r#"{"items": [{"name": "Red Bull 8-pack", "qty": 36, "date": "2025-11-21"}]}"#
                .to_string(),
            pdf: "URGENT REORDER\nRed Bull 8-pack × 36 units\nDelivery: Nov 21\nStore: #142"
                .to_string(),
        }
    }

    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Whatsapp => &self.whatsapp,
            Channel::Json => &self.json,
            Channel::Pdf => &self.pdf,
        }
    }

    /// Whether every channel carries a non-empty payload.
    pub fn is_complete(&self) -> bool {
        Channel::ALL
            .iter()
            .all(|c| !self.get(*c).trim().is_empty())
    }
}

/// Where a generated artifact came from: validated model output, or the
/// fixed demo fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftSource {
    Model,
    Fallback,
}

/// A draft set plus its provenance. Overwritten wholesale by each new
/// generation run; there is no versioning or audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub set: DraftSet,
    pub source: DraftSource,
}

/// Who said a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One (role, content) pair in the Q&A transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Append-only Q&A transcript. Grows unbounded for the life of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_iterates_in_name_order() {
        let mut snapshot = StockSnapshot::new();
        snapshot.set("Zucchini", 1);
        snapshot.set("Apples", 2);
        let names: Vec<&str> = snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Apples", "Zucchini"]);
    }

    #[test]
    fn demo_snapshot_is_non_empty() {
        let snapshot = StockSnapshot::demo();
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.get("Croissants"), Some(4));
    }

    #[test]
    fn fallback_drafts_are_complete() {
        assert!(DraftSet::fallback().is_complete());
    }

    #[test]
    fn channel_parse_round_trips() {
        for channel in Channel::ALL {
            assert_eq!(Channel::parse(channel.as_str()), Some(channel));
        }
        assert_eq!(Channel::parse("email"), None);
    }

    #[test]
    fn chat_history_appends_in_order() {
        let mut history = ChatHistory::new();
        history.push_user("what sold least?");
        history.push_assistant("Croissants.");
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].role, ChatRole::User);
        assert_eq!(history.turns()[1].role, ChatRole::Assistant);
    }

    #[test]
    fn draft_set_serializes_by_channel_key() {
        let set = DraftSet::fallback();
        let json = serde_json::to_value(&set).unwrap();
        assert!(json.get("whatsapp").is_some());
        assert!(json.get("json").is_some());
        assert!(json.get("pdf").is_some());
    }
}
