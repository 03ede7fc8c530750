use serde::{Deserialize, Serialize};

use crate::state::game::{DEFAULT_ROUNDS, DEFAULT_TIMER_SECONDS};

/// Color of a team as stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamColorEntity {
    /// CSS hex notation.
    pub hex: String,
    /// Human readable label.
    pub name: String,
}

/// Representation of a team stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Display name chosen for the team.
    pub name: String,
    /// Current score for the team.
    pub score: u32,
    /// Palette entry assigned to the team.
    pub color: TeamColorEntity,
}

/// Origin of the prompt deck stored in a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PromptModeEntity {
    /// Static image deck.
    #[default]
    Images,
    /// Generated word list.
    Words {
        /// Category the words were generated for.
        category: String,
    },
}

/// Whole-session snapshot persisted after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshotEntity {
    /// Roster in turn order.
    pub teams: Vec<TeamEntity>,
    /// Cursor inside [`GameSnapshotEntity::prompts`].
    pub current_prompt_index: usize,
    /// Whether a game is running.
    pub is_active: bool,
    /// One-based round counter.
    pub current_round: u32,
    /// Position of the acting team.
    pub current_team_index: usize,
    /// Turn duration in seconds.
    #[serde(default = "default_timer_duration")]
    pub timer_duration: u32,
    /// Points of the acting team during its current turn.
    pub round_score: u32,
    /// Number of rounds of the game.
    #[serde(default = "default_rounds")]
    pub number_of_rounds: u32,
    /// Whether the final turn already ended.
    pub is_over: bool,
    /// Winner copy, set at game over.
    pub winning_team: Option<TeamEntity>,
    /// Deck order, shuffled once per game.
    #[serde(default)]
    pub prompts: Vec<String>,
    /// Origin of the deck.
    #[serde(default)]
    pub prompt_mode: PromptModeEntity,
    /// Whether the game waits for the next team to get ready.
    #[serde(default)]
    pub awaiting_next_team: bool,
    /// RFC 3339 timestamp of the save, filled in by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,
}

fn default_timer_duration() -> u32 {
    DEFAULT_TIMER_SECONDS
}

fn default_rounds() -> u32 {
    DEFAULT_ROUNDS
}

impl GameSnapshotEntity {
    /// Serialize the snapshot into its JSON storage form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot from its JSON storage form.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
