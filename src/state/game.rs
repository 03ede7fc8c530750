use rand::{rng, seq::SliceRandom};
use thiserror::Error;

use crate::dao::models::{
    GameSnapshotEntity, PromptModeEntity, TeamColorEntity, TeamEntity,
};

/// Maximum number of teams a roster can hold.
pub const MAX_TEAMS: usize = 6;
/// Lowest configurable number of rounds.
pub const MIN_ROUNDS: u32 = 2;
/// Highest configurable number of rounds.
pub const MAX_ROUNDS: u32 = 10;
/// Number of rounds used when nothing else is configured.
pub const DEFAULT_ROUNDS: u32 = 3;
/// Turn duration (seconds) used when nothing else is configured.
pub const DEFAULT_TIMER_SECONDS: u32 = 60;

/// Palette entry assigned to a team when it joins the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamColor {
    /// CSS hex notation, e.g. `#8b5cf6`.
    pub hex: String,
    /// Human readable label shown next to the swatch.
    pub name: String,
}

/// A team taking part in the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Display name, trimmed and unique within the roster.
    pub name: String,
    /// Cumulative score, never negative.
    pub score: u32,
    /// Color picked from the palette at insertion time.
    pub color: TeamColor,
}

/// Where the prompts of the deck come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptMode {
    /// Static images listed from the result directory.
    #[default]
    Images,
    /// Words generated for a category by the content provider.
    Words {
        /// Category requested by the players.
        category: String,
    },
}

/// Validation failures raised by roster operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    /// The trimmed team name is empty.
    #[error("team name must not be empty")]
    EmptyName,
    /// The roster already holds [`MAX_TEAMS`] teams.
    #[error("a game supports at most {max} teams")]
    RosterFull {
        /// Roster capacity.
        max: usize,
    },
    /// Another team already uses this name.
    #[error("team `{0}` already exists")]
    DuplicateName(String),
    /// Teams cannot join once the game started.
    #[error("teams cannot be added while a game is active")]
    GameActive,
    /// No team lives at the requested position.
    #[error("no team at index {0}")]
    UnknownTeam(usize),
}

/// Shuffled, restartable sequence of prompts with a wrapping cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromptDeck {
    items: Vec<String>,
    cursor: usize,
}

impl PromptDeck {
    /// Build a deck from `items` shuffled once.
    pub fn shuffled(mut items: Vec<String>) -> Self {
        if items.len() > 1 {
            items.shuffle(&mut rng());
        }
        Self { items, cursor: 0 }
    }

    /// Build a deck keeping the given order (restored snapshots and tests).
    pub fn ordered(items: Vec<String>, cursor: usize) -> Self {
        let cursor = if items.is_empty() {
            0
        } else {
            cursor.min(items.len() - 1)
        };
        Self { items, cursor }
    }

    /// Prompts in deck order.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Number of prompts in the deck.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no prompt is available.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the prompt currently shown.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Prompt currently shown, if the deck is not empty.
    pub fn current(&self) -> Option<&str> {
        self.items.get(self.cursor).map(String::as_str)
    }

    /// Move forward one prompt, wrapping to the start of the same order.
    pub fn advance(&mut self) {
        if self.items.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % self.items.len();
    }

    /// Move back one prompt, wrapping to the last one.
    pub fn back(&mut self) {
        if self.items.is_empty() {
            self.cursor = 0;
            return;
        }
        self.cursor = if self.cursor == 0 {
            self.items.len() - 1
        } else {
            self.cursor - 1
        };
    }

    /// Put the cursor back on the first prompt.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Shuffle the deck again and rewind.
    pub fn reshuffle(&mut self) {
        let items = std::mem::take(&mut self.items);
        *self = Self::shuffled(items);
    }
}

/// Authoritative data of a charades session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    /// Roster in turn order.
    pub teams: Vec<Team>,
    /// Deck of prompts shown to the acting team.
    pub prompts: PromptDeck,
    /// Origin of the deck.
    pub prompt_mode: PromptMode,
    /// One-based round counter.
    pub current_round: u32,
    /// Number of rounds played before the game ends.
    pub number_of_rounds: u32,
    /// Position of the acting team in [`GameState::teams`].
    pub current_team_index: usize,
    /// Points scored by the acting team during its current turn.
    pub round_score: u32,
    /// True from start until restart / play again.
    pub is_active: bool,
    /// True once the last turn of the last round ended.
    pub is_over: bool,
    /// Copy of the winning team, set at game over.
    pub winning_team: Option<Team>,
    /// Turn duration in seconds.
    pub timer_duration: u32,
    /// True while the game waits for the next team to get ready.
    pub awaiting_next_team: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_settings(DEFAULT_ROUNDS, DEFAULT_TIMER_SECONDS)
    }
}

impl GameState {
    /// Fresh setup state using the given default settings.
    pub fn with_settings(number_of_rounds: u32, timer_duration: u32) -> Self {
        Self {
            teams: Vec::new(),
            prompts: PromptDeck::default(),
            prompt_mode: PromptMode::default(),
            current_round: 1,
            number_of_rounds: clamp_rounds(number_of_rounds),
            current_team_index: 0,
            round_score: 0,
            is_active: false,
            is_over: false,
            winning_team: None,
            timer_duration: timer_duration.max(1),
            awaiting_next_team: false,
        }
    }

    /// Register a new team, picking its color from `palette` by insertion position.
    pub fn add_team(&mut self, name: &str, palette: &[TeamColor]) -> Result<&Team, RosterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RosterError::EmptyName);
        }
        if self.is_active {
            return Err(RosterError::GameActive);
        }
        if self.teams.len() >= MAX_TEAMS {
            return Err(RosterError::RosterFull { max: MAX_TEAMS });
        }
        if self.teams.iter().any(|team| team.name == name) {
            return Err(RosterError::DuplicateName(name.to_string()));
        }

        let color = palette_color(palette, self.teams.len());
        self.teams.push(Team {
            name: name.to_string(),
            score: 0,
            color,
        });
        Ok(&self.teams[self.teams.len() - 1])
    }

    /// Remove the team at `index`, keeping the current-team pointer on a sensible team.
    pub fn remove_team(&mut self, index: usize) -> Result<Team, RosterError> {
        if index >= self.teams.len() {
            return Err(RosterError::UnknownTeam(index));
        }

        let removed = self.teams.remove(index);
        if index <= self.current_team_index {
            self.current_team_index = self.current_team_index.saturating_sub(1);
        }
        self.clamp_current_team();
        Ok(removed)
    }

    /// Apply `delta` to a team score, flooring at zero.
    ///
    /// The round score follows along only when the adjusted team is the one currently acting.
    pub fn adjust_score(&mut self, index: usize, delta: i32) -> Result<&Team, RosterError> {
        let is_current = self.is_active && index == self.current_team_index;
        let team = self
            .teams
            .get_mut(index)
            .ok_or(RosterError::UnknownTeam(index))?;
        team.score = apply_delta(team.score, delta);
        if is_current {
            self.round_score = apply_delta(self.round_score, delta);
        }
        Ok(&self.teams[index])
    }

    /// Team currently acting, if any.
    pub fn current_team(&self) -> Option<&Team> {
        self.teams.get(self.current_team_index)
    }

    /// Team that plays after the current one.
    pub fn next_team(&self) -> Option<&Team> {
        if self.teams.is_empty() {
            return None;
        }
        self.teams
            .get((self.current_team_index + 1) % self.teams.len())
    }

    /// True when the acting team is the last one of the final round.
    pub fn is_final_turn(&self) -> bool {
        !self.teams.is_empty()
            && self.current_round >= self.number_of_rounds
            && self.current_team_index == self.teams.len() - 1
    }

    /// Pass the turn to the next team, rolling into a new round after the last one.
    pub fn rotate_team(&mut self) {
        if self.current_team_index + 1 < self.teams.len() {
            self.current_team_index += 1;
        } else {
            self.current_team_index = 0;
            self.current_round += 1;
        }
        self.round_score = 0;
    }

    /// Team holding the highest score; the first one in roster order wins ties.
    pub fn leader(&self) -> Option<&Team> {
        self.teams.iter().fold(None, |best: Option<&Team>, team| match best {
            Some(current) if current.score >= team.score => Some(current),
            _ => Some(team),
        })
    }

    /// Keep the number of rounds within bounds.
    pub fn set_number_of_rounds(&mut self, rounds: u32) -> u32 {
        self.number_of_rounds = clamp_rounds(rounds);
        self.number_of_rounds
    }

    /// Reset the pointers of a finished game while keeping roster and scores.
    pub fn reset_for_rematch(&mut self) {
        self.current_round = 1;
        self.current_team_index = 0;
        self.round_score = 0;
        self.is_active = false;
        self.is_over = false;
        self.winning_team = None;
        self.awaiting_next_team = false;
        self.prompts.rewind();
    }

    fn clamp_current_team(&mut self) {
        if self.teams.is_empty() {
            self.current_team_index = 0;
        } else if self.current_team_index >= self.teams.len() {
            self.current_team_index = self.teams.len() - 1;
        }
    }

    /// Rebuild a state from a persisted snapshot, clamping every pointer into range.
    pub fn from_snapshot(entity: GameSnapshotEntity) -> Self {
        let mut state = Self {
            teams: entity.teams.into_iter().map(Into::into).collect(),
            prompts: PromptDeck::ordered(entity.prompts, entity.current_prompt_index),
            prompt_mode: entity.prompt_mode.into(),
            current_round: entity.current_round.max(1),
            number_of_rounds: clamp_rounds(entity.number_of_rounds),
            current_team_index: entity.current_team_index,
            round_score: entity.round_score,
            is_active: entity.is_active,
            is_over: entity.is_over,
            winning_team: entity.winning_team.map(Into::into),
            timer_duration: entity.timer_duration.max(1),
            awaiting_next_team: entity.awaiting_next_team,
        };
        state.clamp_current_team();
        state
    }
}

fn apply_delta(value: u32, delta: i32) -> u32 {
    value.saturating_add_signed(delta)
}

fn clamp_rounds(rounds: u32) -> u32 {
    rounds.clamp(MIN_ROUNDS, MAX_ROUNDS)
}

fn palette_color(palette: &[TeamColor], position: usize) -> TeamColor {
    if palette.is_empty() {
        return TeamColor {
            hex: "#ffffff".into(),
            name: "White".into(),
        };
    }
    palette[position % palette.len()].clone()
}

impl From<TeamColorEntity> for TeamColor {
    fn from(value: TeamColorEntity) -> Self {
        Self {
            hex: value.hex,
            name: value.name,
        }
    }
}

impl From<TeamColor> for TeamColorEntity {
    fn from(value: TeamColor) -> Self {
        Self {
            hex: value.hex,
            name: value.name,
        }
    }
}

impl From<TeamEntity> for Team {
    fn from(value: TeamEntity) -> Self {
        Self {
            name: value.name,
            score: value.score,
            color: value.color.into(),
        }
    }
}

impl From<Team> for TeamEntity {
    fn from(value: Team) -> Self {
        Self {
            name: value.name,
            score: value.score,
            color: value.color.into(),
        }
    }
}

impl From<PromptModeEntity> for PromptMode {
    fn from(value: PromptModeEntity) -> Self {
        match value {
            PromptModeEntity::Images => PromptMode::Images,
            PromptModeEntity::Words { category } => PromptMode::Words { category },
        }
    }
}

impl From<PromptMode> for PromptModeEntity {
    fn from(value: PromptMode) -> Self {
        match value {
            PromptMode::Images => PromptModeEntity::Images,
            PromptMode::Words { category } => PromptModeEntity::Words { category },
        }
    }
}

impl From<&GameState> for GameSnapshotEntity {
    fn from(state: &GameState) -> Self {
        Self {
            teams: state.teams.iter().cloned().map(Into::into).collect(),
            current_prompt_index: state.prompts.cursor(),
            is_active: state.is_active,
            current_round: state.current_round,
            current_team_index: state.current_team_index,
            timer_duration: state.timer_duration,
            round_score: state.round_score,
            number_of_rounds: state.number_of_rounds,
            is_over: state.is_over,
            winning_team: state.winning_team.clone().map(Into::into),
            prompts: state.prompts.items().to_vec(),
            prompt_mode: state.prompt_mode.clone().into(),
            awaiting_next_team: state.awaiting_next_team,
            saved_at: None,
        }
    }
}
