//! End-to-end tests driving sessions through the gateway with wire JSON.

use pickban::builder::SessionBuilder;
use pickban::core::{ActionKind, Playlist, SongStatus};
use pickban::gateway::ConflictReason;
use pickban::{flow, GatewayError, PbState, PickBanService, SessionConfig, StateGateway};
use serde_json::json;
use std::sync::Arc;
use std::thread;

const PLAYLIST: &str = r#"{
    "playlist_title": "Grand Finals",
    "songs": [
        {"hash": "A", "bsr": "1a", "song_name": "Alpha", "song_artist": "X", "song_mapper": "M", "date_uploaded": "2023-05-01"},
        {"hash": "B", "bsr": "2b", "song_name": "Bravo", "song_artist": "Y", "song_mapper": "M", "date_uploaded": "2023-06-01"},
        {"hash": "C", "bsr": "3c", "song_name": "Charlie", "song_artist": "Z", "song_mapper": "N", "date_uploaded": "2023-07-01"}
    ]
}"#;

fn gateway() -> StateGateway {
    SessionBuilder::new()
        .playlist(Playlist::from_json(PLAYLIST).unwrap())
        .unwrap()
        .flow(flow! { 0 => ban, 1 => pick, 0 => pick })
        .build_gateway()
        .unwrap()
}

fn untouched() -> serde_json::Value {
    json!({"status": "untouched", "player": null, "step": null})
}

fn request(value: serde_json::Value) -> PbState {
    serde_json::from_value(value).unwrap()
}

#[test]
fn initial_state_serializes_to_wire_shape() {
    let gateway = gateway();
    let state = serde_json::to_value(gateway.get_current_state().unwrap()).unwrap();

    assert_eq!(
        state,
        json!({
            "songStates": {"1a": untouched(), "2b": untouched(), "3c": untouched()},
            "currentFlowStep": 0
        })
    );
}

#[test]
fn full_negotiation_over_the_wire() {
    let gateway = gateway();

    assert!(gateway.update_state(&request(json!({
        "songStates": {
            "1a": {"status": "banned", "player": 0, "step": 0},
            "2b": untouched(),
            "3c": untouched()
        },
        "currentFlowStep": 0
    }))));

    assert!(gateway.update_state(&request(json!({
        "songStates": {
            "1a": {"status": "banned", "player": 0, "step": 0},
            "2b": {"status": "picked", "player": 1, "step": 1},
            "3c": untouched()
        },
        "currentFlowStep": 1
    }))));

    // A stale client resubmitting step one is refused.
    assert!(!gateway.update_state(&request(json!({
        "songStates": {
            "1a": {"status": "banned", "player": 0, "step": 0},
            "2b": untouched(),
            "3c": {"status": "picked", "player": 1, "step": 1}
        },
        "currentFlowStep": 1
    }))));

    assert!(gateway.update_state(&request(json!({
        "songStates": {
            "1a": {"status": "banned", "player": 0, "step": 0},
            "2b": {"status": "picked", "player": 1, "step": 1},
            "3c": {"status": "picked", "player": 0, "step": 2}
        },
        "currentFlowStep": 2
    }))));

    let state = gateway.get_current_state().unwrap();
    assert_eq!(state.current_flow_step, 3);
    assert_eq!(state.song_states["1a"].status, SongStatus::Banned);
    assert_eq!(state.song_states["2b"].status, SongStatus::Picked);
    assert_eq!(state.song_states["3c"].status, SongStatus::Picked);
    assert!(gateway.session().with_machine(|m| m.is_complete()));

    assert!(gateway.reset_state());
    let state = gateway.get_current_state().unwrap();
    assert_eq!(state.current_flow_step, 0);
    assert!(state
        .song_states
        .values()
        .all(|s| s.status == SongStatus::Untouched));
}

#[test]
fn missing_share_code_is_a_conflict() {
    let gateway = gateway();

    let result = gateway.try_update(&request(json!({
        "songStates": {
            "1a": {"status": "banned", "player": 0, "step": 0},
            "2b": untouched()
        },
        "currentFlowStep": 0
    })));

    assert!(matches!(
        result,
        Err(GatewayError::Conflict(ConflictReason::KeySet(_)))
    ));
    assert_eq!(gateway.get_current_state().unwrap().current_flow_step, 0);
}

#[test]
fn picking_on_a_ban_turn_is_a_conflict() {
    let gateway = gateway();

    let result = gateway.try_update(&request(json!({
        "songStates": {
            "1a": {"status": "picked", "player": 0, "step": 0},
            "2b": untouched(),
            "3c": untouched()
        },
        "currentFlowStep": 0
    })));

    assert_eq!(
        result,
        Err(GatewayError::Conflict(ConflictReason::WrongAction {
            share_code: "1a".to_string(),
            expected: ActionKind::Ban,
            submitted: SongStatus::Picked,
        }))
    );
}

#[test]
fn three_participant_flow() {
    let gateway = SessionBuilder::new()
        .playlist(Playlist::from_json(PLAYLIST).unwrap())
        .unwrap()
        .config(SessionConfig::default().with_participants(3))
        .flow(flow! { 0 => ban, 1 => ban, 2 => pick("Decider") })
        .build_gateway()
        .unwrap();

    for (step, (code, status, player)) in [("1a", "banned", 0), ("2b", "banned", 1), ("3c", "picked", 2)]
        .into_iter()
        .enumerate()
    {
        let mut current = serde_json::to_value(gateway.get_current_state().unwrap()).unwrap();
        current["songStates"][code] = json!({"status": status, "player": player, "step": step});
        assert!(gateway.update_state(&request(current)), "step {step} rejected");
    }

    let labels: Vec<String> = gateway
        .session()
        .with_machine(|m| m.flow().steps().iter().map(|s| s.label.clone()).collect());
    assert_eq!(labels, ["Player 1 Ban", "Player 2 Ban", "Decider"]);
}

#[test]
fn racing_clients_advance_the_cursor_once() {
    let gateway = Arc::new(gateway());
    let start = gateway.get_current_state().unwrap();

    let handles: Vec<_> = ["1a", "2b", "3c"]
        .into_iter()
        .map(|code| {
            let gateway = Arc::clone(&gateway);
            let mut submitted = start.clone();
            thread::spawn(move || {
                submitted
                    .song_states
                    .insert(code.to_string(), serde_json::from_value(json!({
                        "status": "banned", "player": 0, "step": 0
                    })).unwrap());
                gateway.update_state(&submitted)
            })
        })
        .collect();

    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(accepted, 1);
    let state = gateway.get_current_state().unwrap();
    assert_eq!(state.current_flow_step, 1);
    assert_eq!(
        state
            .song_states
            .values()
            .filter(|s| s.status == SongStatus::Banned)
            .count(),
        1
    );
}

#[test]
fn readers_never_see_a_partial_update() {
    let gateway = Arc::new(gateway());

    let reader = {
        let gateway = Arc::clone(&gateway);
        thread::spawn(move || {
            for _ in 0..500 {
                let state = gateway.get_current_state().unwrap();
                let resolved = state
                    .song_states
                    .values()
                    .filter(|s| s.status != SongStatus::Untouched)
                    .count();
                assert_eq!(resolved, state.current_flow_step);
            }
        })
    };

    for _ in 0..50 {
        let mut submitted = gateway.get_current_state().unwrap();
        submitted.song_states.insert(
            "1a".to_string(),
            serde_json::from_value(json!({"status": "banned", "player": 0, "step": 0})).unwrap(),
        );
        assert!(gateway.update_state(&submitted));
        assert!(gateway.reset_state());
    }

    reader.join().unwrap();
}

#[test]
fn checkpoint_survives_a_restart() {
    let gateway = gateway();
    let mut submitted = gateway.get_current_state().unwrap();
    submitted.song_states.insert(
        "2b".to_string(),
        serde_json::from_value(json!({"status": "banned", "player": 0, "step": 0})).unwrap(),
    );
    assert!(gateway.update_state(&submitted));

    let saved = gateway.session().checkpoint().to_json().unwrap();

    let restarted = self::gateway();
    let checkpoint = pickban::SessionCheckpoint::from_json(&saved).unwrap();
    let state = restarted.session().restore(&checkpoint).unwrap();

    assert_eq!(state.current_flow_step, 1);
    assert_eq!(
        restarted.get_current_state().unwrap(),
        gateway.get_current_state().unwrap()
    );
}

#[test]
fn checkpoint_with_edited_history_is_refused() {
    let gateway = gateway();
    let mut submitted = gateway.get_current_state().unwrap();
    submitted.song_states.insert(
        "1a".to_string(),
        serde_json::from_value(json!({"status": "banned", "player": 0, "step": 0})).unwrap(),
    );
    assert!(gateway.update_state(&submitted));

    let mut saved: serde_json::Value =
        serde_json::from_str(&gateway.session().checkpoint().to_json().unwrap()).unwrap();
    saved["history"]["records"][0]["participant"] = json!(1);
    saved["history"]["records"][0]["action"] = json!("pick");
    let checkpoint = pickban::SessionCheckpoint::from_json(&saved.to_string()).unwrap();

    let restarted = self::gateway();
    assert!(matches!(
        restarted.session().restore(&checkpoint),
        Err(pickban::CheckpointError::ValidationFailed(_))
    ));
    assert_eq!(restarted.get_current_state().unwrap().current_flow_step, 0);
    assert!(restarted.session().with_machine(|m| m.history().is_empty()));
}
