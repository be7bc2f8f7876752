//! Song catalog loaded once per session from a playlist source.
//!
//! The catalog is immutable after construction. It indexes songs by their
//! content hash ([`SongKey`]) and by their share code, since the wire
//! mapping exchanged with callers is keyed by the latter.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Stable unique identifier of a song (its content hash).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongKey(String);

impl SongKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SongKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SongKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A playable difficulty variant of a song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difficulty {
    pub name: String,
    pub characteristic: String,
}

/// A song as delivered by the playlist source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "hash")]
    pub key: SongKey,
    /// Short human-shareable code
    #[serde(rename = "bsr")]
    pub share_code: String,
    #[serde(rename = "song_name")]
    pub title: String,
    #[serde(rename = "song_artist")]
    pub artist: String,
    #[serde(rename = "song_mapper")]
    pub mapper: String,
    #[serde(rename = "date_uploaded")]
    pub uploaded_at: String,
    #[serde(default)]
    pub difficulties: Vec<Difficulty>,
}

/// A titled, ordered list of songs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "playlist_title")]
    pub title: String,
    pub songs: Vec<Song>,
}

impl Playlist {
    /// Parse a playlist from the collaborator's JSON shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

/// Errors raised while loading a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("duplicate song key '{0}'")]
    DuplicateKey(SongKey),

    #[error("duplicate share code '{0}'")]
    DuplicateShareCode(String),

    #[error("playlist could not be parsed: {0}")]
    Parse(String),

    #[error("playlist source failed: {0}")]
    Source(String),

    #[error("no playlist titled '{0}'")]
    PlaylistNotFound(String),
}

/// External collaborator that supplies playlists.
pub trait PlaylistSource {
    fn playlists(&self) -> Result<Vec<Playlist>, CatalogError>;

    /// Find a playlist by title.
    fn playlist(&self, title: &str) -> Result<Playlist, CatalogError> {
        self.playlists()?
            .into_iter()
            .find(|p| p.title == title)
            .ok_or_else(|| CatalogError::PlaylistNotFound(title.to_string()))
    }
}

/// In-memory playlist source.
#[derive(Clone, Debug, Default)]
pub struct StaticPlaylists {
    playlists: Vec<Playlist>,
}

impl StaticPlaylists {
    pub fn new(playlists: Vec<Playlist>) -> Self {
        Self { playlists }
    }
}

impl PlaylistSource for StaticPlaylists {
    fn playlists(&self) -> Result<Vec<Playlist>, CatalogError> {
        Ok(self.playlists.clone())
    }
}

/// Immutable set of songs for one session.
#[derive(Clone, Debug, Default)]
pub struct SongCatalog {
    title: String,
    songs: Vec<Song>,
    by_key: HashMap<SongKey, usize>,
    by_share_code: HashMap<String, usize>,
}

impl SongCatalog {
    /// Build a catalog from a playlist.
    ///
    /// Only key uniqueness is checked: both the content hash and the share
    /// code must be unique across the playlist.
    pub fn from_playlist(playlist: Playlist) -> Result<Self, CatalogError> {
        let mut by_key = HashMap::with_capacity(playlist.songs.len());
        let mut by_share_code = HashMap::with_capacity(playlist.songs.len());

        for (index, song) in playlist.songs.iter().enumerate() {
            if by_key.insert(song.key.clone(), index).is_some() {
                return Err(CatalogError::DuplicateKey(song.key.clone()));
            }
            if by_share_code
                .insert(song.share_code.clone(), index)
                .is_some()
            {
                return Err(CatalogError::DuplicateShareCode(song.share_code.clone()));
            }
        }

        Ok(Self {
            title: playlist.title,
            songs: playlist.songs,
            by_key,
            by_share_code,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    /// Songs in playlist order.
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn keys(&self) -> impl Iterator<Item = &SongKey> {
        self.songs.iter().map(|s| &s.key)
    }

    pub fn contains(&self, key: &SongKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn get(&self, key: &SongKey) -> Option<&Song> {
        self.by_key.get(key).map(|&i| &self.songs[i])
    }

    pub fn by_share_code(&self, share_code: &str) -> Option<&Song> {
        self.by_share_code.get(share_code).map(|&i| &self.songs[i])
    }
}
