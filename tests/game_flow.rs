use std::{sync::Arc, time::Duration};

use charades_back::{
    content::{ContentProvider, DisabledProvider, StaticProvider},
    dao::{
        prompts::StaticPrompts,
        snapshot_store::{MemorySnapshotStore, SnapshotStore},
    },
    dto::{game::PromptModeDto, phase::VisibleGamePhase},
    error::ServiceError,
    services::{
        game_service::{self, READY_COUNTDOWN_SECONDS},
        sse_events::EVENT_GAME_STATE,
    },
    state::{
        AppState, GameController, SharedState, controller::ControllerSettings, game::TeamColor,
        timer::ManualTimer,
    },
};

fn settings() -> ControllerSettings {
    ControllerSettings {
        palette: vec![
            TeamColor {
                hex: "#8b5cf6".into(),
                name: "Purple Haze".into(),
            },
            TeamColor {
                hex: "#06b6d4".into(),
                name: "Ocean Blue".into(),
            },
        ],
        default_rounds: 2,
        default_timer_seconds: 30,
    }
}

fn app_with(store: Arc<dyn SnapshotStore>, content: Arc<dyn ContentProvider>) -> SharedState {
    let images = StaticPrompts(vec!["/images/a.png".into(), "/images/b.png".into()]);
    let controller =
        GameController::restore(store, Arc::new(ManualTimer), Arc::new(images), settings());
    AppState::new(controller, content)
}

fn app() -> SharedState {
    app_with(Arc::new(MemorySnapshotStore::new()), Arc::new(DisabledProvider))
}

async fn expire_turn(state: &SharedState) {
    let turn = state.read_game(|game| game.turn_token()).await;
    game_service::handle_time_up(state, turn).await;
}

#[tokio::test]
async fn two_teams_play_two_rounds() {
    let state = app();
    game_service::add_team(&state, "Owls".into()).await.unwrap();
    game_service::add_team(&state, "Foxes".into()).await.unwrap();

    let summary = game_service::start_game(&state).await.unwrap();
    assert_eq!(summary.phase, VisibleGamePhase::Playing);
    assert_eq!(summary.current_round, 1);
    assert_eq!(summary.current_team.as_ref().unwrap().name, "Owls");

    game_service::mark_correct(&state).await.unwrap();
    game_service::mark_correct(&state).await.unwrap();
    expire_turn(&state).await;
    assert_eq!(
        game_service::get_game(&state).await.phase,
        VisibleGamePhase::RoundEnd
    );

    game_service::next_team(&state).await.unwrap();
    game_service::mark_correct(&state).await.unwrap();
    expire_turn(&state).await;

    let summary = game_service::next_team(&state).await.unwrap();
    assert_eq!(summary.current_round, 2);
    assert_eq!(summary.current_team.as_ref().unwrap().name, "Owls");
    expire_turn(&state).await;

    game_service::next_team(&state).await.unwrap();
    game_service::mark_correct(&state).await.unwrap();
    expire_turn(&state).await;

    let summary = game_service::get_game(&state).await;
    assert_eq!(summary.phase, VisibleGamePhase::GameOver);
    assert!(summary.is_over);
    // Tie at two points: the first team in roster order wins.
    assert_eq!(summary.winning_team.unwrap().name, "Owls");
}

#[tokio::test]
async fn commands_are_rejected_outside_their_phase() {
    let state = app();
    assert!(matches!(
        game_service::start_game(&state).await,
        Err(ServiceError::NoTeams)
    ));
    assert!(matches!(
        game_service::mark_correct(&state).await,
        Err(ServiceError::InvalidState(_))
    ));
    assert!(matches!(
        game_service::ready(&state).await,
        Err(ServiceError::InvalidState(_))
    ));
}

#[tokio::test]
async fn mutations_are_broadcast() {
    let state = app();
    let mut events = state.sse().subscribe();

    game_service::add_team(&state, "Owls".into()).await.unwrap();

    let event = events.recv().await.unwrap();
    assert_eq!(event.event.as_deref(), Some(EVENT_GAME_STATE));
    assert!(event.data.contains("\"Owls\""));
}

#[tokio::test(start_paused = true)]
async fn ready_countdown_hands_the_turn_over() {
    let state = app();
    game_service::add_team(&state, "Owls".into()).await.unwrap();
    game_service::add_team(&state, "Foxes".into()).await.unwrap();
    game_service::start_game(&state).await.unwrap();
    expire_turn(&state).await;

    game_service::ready(&state).await.unwrap();
    assert!(matches!(
        game_service::ready(&state).await,
        Err(ServiceError::InvalidState(_))
    ));

    tokio::time::sleep(Duration::from_secs(READY_COUNTDOWN_SECONDS + 1)).await;

    let summary = game_service::get_game(&state).await;
    assert_eq!(summary.phase, VisibleGamePhase::Playing);
    assert_eq!(summary.current_team.unwrap().name, "Foxes");
    assert!(state.ready_session().lock().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn skipping_the_countdown_cancels_it() {
    let state = app();
    game_service::add_team(&state, "Owls".into()).await.unwrap();
    game_service::add_team(&state, "Foxes".into()).await.unwrap();
    game_service::start_game(&state).await.unwrap();
    expire_turn(&state).await;

    game_service::ready(&state).await.unwrap();
    let summary = game_service::next_team(&state).await.unwrap();
    assert_eq!(summary.current_team.as_ref().unwrap().name, "Foxes");

    tokio::time::sleep(Duration::from_secs(READY_COUNTDOWN_SECONDS + 1)).await;

    // The cancelled countdown must not hand the turn over a second time.
    let summary = game_service::get_game(&state).await;
    assert_eq!(summary.current_team.unwrap().name, "Foxes");
    assert_eq!(summary.current_round, 1);
}

#[tokio::test]
async fn generated_words_replace_the_image_deck() {
    let provider = StaticProvider(vec!["guitar".into(), "drums".into(), "bass".into()]);
    let state = app_with(Arc::new(MemorySnapshotStore::new()), Arc::new(provider));

    let summary = game_service::load_words(&state, "  instruments ".into())
        .await
        .unwrap();
    assert!(!summary.loading);
    assert_eq!(summary.prompt_count, 3);
    assert_eq!(
        summary.prompt_mode,
        PromptModeDto::Words {
            category: "instruments".into()
        }
    );

    let summary = game_service::use_image_prompts(&state).await.unwrap();
    assert_eq!(summary.prompt_mode, PromptModeDto::Images);
    assert_eq!(summary.prompt_count, 2);
}

#[tokio::test]
async fn failed_generation_leaves_an_empty_deck() {
    let state = app();
    let summary = game_service::load_words(&state, "animals".into())
        .await
        .unwrap();
    assert!(!summary.loading);
    assert_eq!(summary.prompt_count, 0);
    assert_eq!(summary.current_prompt, None);
}

#[tokio::test]
async fn roster_survives_a_restart_of_the_process() {
    let store = Arc::new(MemorySnapshotStore::new());
    let state = app_with(store.clone(), Arc::new(DisabledProvider));
    game_service::add_team(&state, "Owls".into()).await.unwrap();
    game_service::add_team(&state, "Foxes".into()).await.unwrap();
    game_service::set_number_of_rounds(&state, 3).await.unwrap();
    game_service::start_game(&state).await.unwrap();
    game_service::mark_correct(&state).await.unwrap();
    drop(state);

    let state = app_with(store.clone(), Arc::new(DisabledProvider));
    let summary = game_service::get_game(&state).await;
    assert_eq!(summary.phase, VisibleGamePhase::Paused);
    assert_eq!(summary.teams.len(), 2);
    assert_eq!(summary.teams[0].score, 1);
    assert_eq!(summary.number_of_rounds, 3);

    game_service::restart(&state).await.unwrap();
    assert!(store.raw().is_none());
    let state = app_with(store, Arc::new(DisabledProvider));
    assert!(game_service::get_game(&state).await.teams.is_empty());
}
