//! Catalog records handled by the downloader.
//!
//! These are read-only views of what the catalog returns: tracks and videos
//! (the things that end up as files) and the albums, artists and playlists
//! that group them.

pub mod collection;
pub mod item;

pub use collection::{Album, Artist, Playlist};
pub use item::{AlbumRef, Track, Video};
