use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Charades Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::stream,
        crate::routes::game::get_game,
        crate::routes::game::start_game,
        crate::routes::game::mark_correct,
        crate::routes::game::skip,
        crate::routes::game::previous_prompt,
        crate::routes::game::pause,
        crate::routes::game::resume,
        crate::routes::game::ready,
        crate::routes::game::next_team,
        crate::routes::game::restart,
        crate::routes::game::play_again,
        crate::routes::teams::add_team,
        crate::routes::teams::remove_team,
        crate::routes::teams::adjust_score,
        crate::routes::settings::set_rounds,
        crate::routes::settings::set_timer,
        crate::routes::prompts::load_words,
        crate::routes::prompts::use_images,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::GameSummary,
            crate::dto::game::TeamSummary,
            crate::dto::game::TeamColorDto,
            crate::dto::game::PromptModeDto,
            crate::dto::game::AddTeamRequest,
            crate::dto::game::AdjustScoreRequest,
            crate::dto::game::SkipRequest,
            crate::dto::game::RoundsRequest,
            crate::dto::game::TimerRequest,
            crate::dto::game::WordsRequest,
            crate::dto::phase::VisibleGamePhase,
            crate::dto::sse::Handshake,
            crate::dto::sse::PhaseChangedEvent,
            crate::dto::sse::TimerTickEvent,
            crate::dto::sse::ReadyCountdownEvent,
            crate::dto::sse::PromptsLoadingEvent,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events stream"),
        (name = "game", description = "Turn and round flow"),
        (name = "teams", description = "Roster and scores"),
        (name = "settings", description = "Rounds and timer settings"),
        (name = "prompts", description = "Prompt deck selection"),
    )
)]
pub struct ApiDoc;
