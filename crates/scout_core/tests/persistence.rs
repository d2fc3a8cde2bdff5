use scout_core::{
    normalize, update, AppState, Msg, RawRecord, SearchOutcome, SearchPhase, SessionSnapshot,
};

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn resolved_state() -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::SearchSubmitted {
            query: "tech reviews".to_string(),
            max_results_text: "4".to_string(),
        },
    );
    let (state, _) = update(
        state,
        Msg::SearchResolved {
            generation: 1,
            outcome: SearchOutcome::Success {
                records: vec![RawRecord {
                    channel_url: "https://www.youtube.com/@linus".to_string(),
                    ..RawRecord::default()
                }],
            },
        },
    );
    state
}

#[test]
fn resolved_session_can_be_restored_for_resume() {
    init_logging();
    let snapshot = resolved_state().session_snapshot().expect("snapshot");
    assert_eq!(snapshot.query, "tech reviews");
    assert_eq!(snapshot.max_results, 4);
    assert_eq!(snapshot.records.len(), 1);

    let (restored, effects) = update(AppState::new(), Msg::RestoreSession(snapshot));
    let view = restored.view();
    assert!(effects.is_empty());
    assert_eq!(view.phase, SearchPhase::Idle);
    assert_eq!(view.query, "tech reviews");
    assert_eq!(view.max_results, Some(4));
    assert_eq!(view.result_count, 1);
    assert_eq!(view.selected.map(|r| r.name), Some("linus".to_string()));
}

#[test]
fn empty_state_has_no_snapshot() {
    init_logging();
    assert_eq!(AppState::new().session_snapshot(), None);
}

#[test]
fn restore_is_ignored_while_searching() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::SearchSubmitted {
            query: "news".to_string(),
            max_results_text: "2".to_string(),
        },
    );
    let snapshot = SessionSnapshot {
        query: "old".to_string(),
        max_results: 3,
        records: vec![normalize(&RawRecord {
            channel_url: "https://www.youtube.com/@old".to_string(),
            ..RawRecord::default()
        })],
    };

    let (state, _) = update(state, Msg::RestoreSession(snapshot));
    let view = state.view();
    assert!(view.searching);
    assert_eq!(view.query, "news");
    assert!(view.records.is_empty());
}
