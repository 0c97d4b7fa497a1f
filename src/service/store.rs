//! Track storage
//!
//! Uploaded audio lives here between an upload and any number of process
//! calls. The service only talks to the [`TrackStore`] trait, so a persistent
//! backend can replace the in-memory map.

use std::sync::Arc;

use dashmap::DashMap;

use crate::engine::AudioBuffer;

/// Keyed storage for uploaded tracks
pub trait TrackStore: Send + Sync {
    /// Store a track, replacing any previous track under the same id
    fn insert(&self, id: String, track: AudioBuffer);

    /// Shared handle to a stored track
    fn get(&self, id: &str) -> Option<Arc<AudioBuffer>>;

    fn remove(&self, id: &str) -> Option<Arc<AudioBuffer>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store backed by a concurrent map. Clones share the map.
#[derive(Clone, Default)]
pub struct InMemoryTrackStore {
    tracks: Arc<DashMap<String, Arc<AudioBuffer>>>,
}

impl InMemoryTrackStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TrackStore for InMemoryTrackStore {
    fn insert(&self, id: String, track: AudioBuffer) {
        self.tracks.insert(id, Arc::new(track));
    }

    fn get(&self, id: &str) -> Option<Arc<AudioBuffer>> {
        self.tracks.get(id).map(|entry| Arc::clone(entry.value()))
    }

    fn remove(&self, id: &str) -> Option<Arc<AudioBuffer>> {
        self.tracks.remove(id).map(|(_, track)| track)
    }

    fn len(&self) -> usize {
        self.tracks.len()
    }
}
