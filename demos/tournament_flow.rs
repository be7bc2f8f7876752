//! Tournament Flow
//!
//! This example walks a best-of-one finals negotiation end to end.
//!
//! Key concepts:
//! - Loading a playlist from a playlist source
//! - Declaring the turn order with the flow builder
//! - Driving the session through the gateway as stillwater effects
//! - Saving and restoring a checkpoint
//!
//! Run with: cargo run --example tournament_flow

use pickban::builder::{FlowBuilder, SessionBuilder};
use pickban::core::{Playlist, PlaylistSource, SongState, StaticPlaylists};
use pickban::effects;
use pickban::{ActionKind, PbState, SessionCheckpoint, StateGateway};
use stillwater::effect::Effect;

const FINALS: &str = r#"{
    "playlist_title": "Finals Pool",
    "songs": [
        {"hash": "f1e2", "bsr": "1a2b", "song_name": "Overkill", "song_artist": "RIOT", "song_mapper": "Nuketime", "date_uploaded": "2019-05-12"},
        {"hash": "a9c3", "bsr": "3c4d", "song_name": "Ghost", "song_artist": "Camellia", "song_mapper": "Joetastic", "date_uploaded": "2020-11-02"},
        {"hash": "77d0", "bsr": "5e6f", "song_name": "Reality Check", "song_artist": "Kobaryo", "song_mapper": "Fvrwvrd", "date_uploaded": "2021-03-19"},
        {"hash": "0b4e", "bsr": "7a8b", "song_name": "Milk Crown", "song_artist": "Camellia", "song_mapper": "Rustic", "date_uploaded": "2022-08-27"},
        {"hash": "c5f8", "bsr": "9c0d", "song_name": "Ov Sacrament", "song_artist": "Camellia", "song_mapper": "Hexagonial", "date_uploaded": "2023-01-15"}
    ]
}"#;

/// Resolve `share_code` according to the gateway's current step.
async fn take_turn(gateway: &StateGateway, share_code: &str) -> bool {
    let Some(mut request) = effects::get_current_state()
        .run(gateway)
        .await
        .unwrap_or_default()
    else {
        return false;
    };

    let step_index = request.current_flow_step;
    let Some(step) = gateway
        .session()
        .with_machine(|m| m.expected_step().cloned())
    else {
        println!("  flow is already complete");
        return false;
    };

    println!("  {} -> {}", step.label, share_code);
    request.song_states.insert(
        share_code.to_string(),
        SongState::resolved(step.action, step.participant, step_index),
    );

    effects::update_state(request)
        .run(gateway)
        .await
        .unwrap_or(false)
}

fn print_state(state: &PbState) {
    for (code, song) in &state.song_states {
        println!("  {code}: {}", song.status.name());
    }
    println!("  cursor: {}", state.current_flow_step);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Tournament Flow ===\n");

    let source = StaticPlaylists::new(vec![Playlist::from_json(FINALS)?]);
    let playlist = source.playlist("Finals Pool")?;

    let steps = FlowBuilder::new()
        .ban(0)
        .ban(1)
        .ban(0)
        .ban(1)
        .step("Decider", 0, ActionKind::Pick)
        .into_steps();

    let gateway = SessionBuilder::new()
        .playlist(playlist)?
        .flow(steps)
        .build_gateway()?;

    println!("Bans:");
    for code in ["1a2b", "5e6f"] {
        take_turn(&gateway, code).await;
    }

    println!("\nA client replays an old step:");
    let mut stale = gateway.session().wire_snapshot();
    stale.current_flow_step = 0;
    println!("  accepted: {}", gateway.update(&stale));

    println!("\nSaving checkpoint");
    let saved = gateway.session().checkpoint().to_json()?;

    for code in ["9c0d", "3c4d", "7a8b"] {
        take_turn(&gateway, code).await;
    }

    println!("\nFinal state:");
    print_state(&gateway.session().wire_snapshot());

    println!("\nRestoring checkpoint");
    gateway
        .session()
        .restore(&SessionCheckpoint::from_json(&saved)?)?;
    print_state(&gateway.session().wire_snapshot());

    println!("\nResetting");
    effects::reset_state().run(&gateway).await.unwrap_or(false);
    print_state(&gateway.session().wire_snapshot());

    Ok(())
}
