use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{
        phase::VisibleGamePhase,
        validation::{validate_category, validate_team_name},
    },
    state::{
        controller::GameController,
        game::{PromptMode, Team, TeamColor},
    },
};

/// Palette entry of a team.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct TeamColorDto {
    /// CSS hex notation.
    pub hex: String,
    /// Human readable label.
    pub name: String,
}

impl From<&TeamColor> for TeamColorDto {
    fn from(value: &TeamColor) -> Self {
        Self {
            hex: value.hex.clone(),
            name: value.name.clone(),
        }
    }
}

/// Team as shown on the scoreboard.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct TeamSummary {
    /// Position in the roster (turn order).
    pub index: usize,
    pub name: String,
    pub score: u32,
    pub color: TeamColorDto,
}

impl TeamSummary {
    /// Summarise `team` sitting at `index`.
    pub fn new(index: usize, team: &Team) -> Self {
        Self {
            index,
            name: team.name.clone(),
            score: team.score,
            color: (&team.color).into(),
        }
    }
}

/// Origin of the prompt deck.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PromptModeDto {
    /// Image deck.
    Images,
    /// Generated words.
    Words {
        /// Requested category.
        category: String,
    },
}

impl From<&PromptMode> for PromptModeDto {
    fn from(value: &PromptMode) -> Self {
        match value {
            PromptMode::Images => PromptModeDto::Images,
            PromptMode::Words { category } => PromptModeDto::Words {
                category: category.clone(),
            },
        }
    }
}

/// Everything the front-end renders, sent after each command and on the SSE stream.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameSummary {
    pub phase: VisibleGamePhase,
    pub teams: Vec<TeamSummary>,
    pub current_team: Option<TeamSummary>,
    pub next_team: Option<TeamSummary>,
    pub current_round: u32,
    pub number_of_rounds: u32,
    pub round_score: u32,
    pub is_active: bool,
    pub is_over: bool,
    pub winning_team: Option<TeamSummary>,
    /// Turn duration in seconds.
    pub timer_duration: u32,
    /// Prompt to act out, `None` on an empty deck.
    pub current_prompt: Option<String>,
    pub current_prompt_index: usize,
    pub prompt_count: usize,
    pub prompt_mode: PromptModeDto,
    /// True while a word list is being generated.
    pub loading: bool,
    /// Number of phase transitions applied since startup.
    pub version: usize,
}

impl From<&GameController> for GameSummary {
    fn from(controller: &GameController) -> Self {
        let state = controller.state();
        let snapshot = controller.snapshot();
        let team_at = |index: usize| state.teams.get(index).map(|team| TeamSummary::new(index, team));
        let next_index = if state.teams.is_empty() {
            None
        } else {
            Some((state.current_team_index + 1) % state.teams.len())
        };

        Self {
            phase: snapshot.phase.into(),
            teams: state
                .teams
                .iter()
                .enumerate()
                .map(|(index, team)| TeamSummary::new(index, team))
                .collect(),
            current_team: team_at(state.current_team_index),
            next_team: next_index.and_then(team_at),
            current_round: state.current_round,
            number_of_rounds: state.number_of_rounds,
            round_score: state.round_score,
            is_active: state.is_active,
            is_over: state.is_over,
            winning_team: state.winning_team.as_ref().and_then(|winner| {
                state
                    .teams
                    .iter()
                    .position(|team| team.name == winner.name)
                    .map(|index| TeamSummary::new(index, winner))
            }),
            timer_duration: state.timer_duration,
            current_prompt: controller.current_prompt().map(str::to_string),
            current_prompt_index: state.prompts.cursor(),
            prompt_count: state.prompts.len(),
            prompt_mode: (&state.prompt_mode).into(),
            loading: controller.is_loading(),
            version: snapshot.version,
        }
    }
}

/// Payload registering a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddTeamRequest {
    #[validate(custom(function = "validate_team_name"))]
    pub name: String,
}

/// Payload correcting a team score.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustScoreRequest {
    /// Points to add (negative to remove); the score never drops below zero.
    #[validate(range(min = -100, max = 100))]
    pub delta: i32,
}

/// Payload of a skip.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct SkipRequest {
    /// Points applied to the acting team, 0 for a free skip.
    #[serde(default)]
    #[validate(range(min = -10, max = 0))]
    pub delta: i32,
}

/// Payload setting the number of rounds; out of range values are clamped.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RoundsRequest {
    #[validate(range(min = 1, max = 100))]
    pub rounds: u32,
}

/// Payload setting the turn duration.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TimerRequest {
    #[validate(range(min = 5, max = 600))]
    pub seconds: u32,
    /// Restart the countdown of the turn in progress with the new duration.
    #[serde(default)]
    pub apply_now: bool,
}

/// Payload requesting a generated word deck.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct WordsRequest {
    #[validate(length(min = 1, max = 80), custom(function = "validate_category"))]
    pub category: String,
}
