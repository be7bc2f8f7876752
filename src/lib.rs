//! Pickban: a turn-based pick/ban state machine
//!
//! Two or more participants take turns banning and picking songs from a
//! shared playlist. Pickban keeps the authoritative record of whose turn it
//! is, what action is expected, and which songs are still eligible.
//!
//! # Core Concepts
//!
//! - **Catalog**: the immutable set of songs for a session
//! - **Flow**: the validated, fixed turn order
//! - **Machine**: applies one action per step, checked against the caller's
//!   view of the cursor
//! - **Session**: shares one machine between readers and writers
//! - **Gateway**: the update/reset/query surface external callers use
//!
//! # Example
//!
//! ```rust
//! use pickban::builder::SessionBuilder;
//! use pickban::core::{Difficulty, Playlist, Song, SongKey, SongStatus};
//! use pickban::flow;
//!
//! let song = |key: &str| Song {
//!     key: SongKey::new(key),
//!     share_code: format!("{key}-code"),
//!     title: key.to_uppercase(),
//!     artist: "Artist".to_string(),
//!     mapper: "Mapper".to_string(),
//!     uploaded_at: "2024-01-01".to_string(),
//!     difficulties: vec![Difficulty {
//!         name: "Expert".to_string(),
//!         characteristic: "Standard".to_string(),
//!     }],
//! };
//!
//! let session = SessionBuilder::new()
//!     .playlist(Playlist {
//!         title: "Finals".to_string(),
//!         songs: vec![song("a"), song("b"), song("c")],
//!     })
//!     .unwrap()
//!     .flow(flow! { 0 => ban, 1 => pick, 0 => pick })
//!     .build()
//!     .unwrap();
//!
//! let state = session.apply_action(&SongKey::new("a"), 0).unwrap();
//! assert_eq!(state.current_flow_step, 1);
//! assert_eq!(state.get(&SongKey::new("a")).unwrap().status, SongStatus::Banned);
//!
//! // A caller that missed the update is told its step is stale.
//! assert!(session.apply_action(&SongKey::new("b"), 0).is_err());
//! ```

pub mod builder;
pub mod checkpoint;
pub mod config;
pub mod core;
pub mod effects;
pub mod gateway;
pub mod machine;
pub mod session;

// Re-export commonly used types
pub use crate::checkpoint::{CheckpointError, SessionCheckpoint};
pub use crate::config::SessionConfig;
pub use crate::core::{
    ActionKind, FlowDefinition, FlowStep, PbState, SessionState, SongKey, SongStatus,
};
pub use crate::gateway::{GatewayError, PickBanService, StateGateway};
pub use crate::machine::{ActionError, PickBanMachine};
pub use crate::session::{Session, SessionId};
