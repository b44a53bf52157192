use rand::rng;
use rand::seq::SliceRandom;

use crate::track::Track;

/// What the player should do after a queue advance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Start the track at this index (may equal the current index when
    /// repeating one track).
    Next(usize),
    /// End of queue without wrap: playback stops, index unchanged.
    Stop,
    /// Nothing to do (empty queue or no position).
    None,
}

/// Repeat behavior at queue boundaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Do not wrap at the end of the queue.
    #[default]
    NoLoop,
    /// Wrap around to the start of the queue.
    LoopAll,
    /// Repeat the current track when it ends.
    LoopOne,
}

/// Logical collection a queue was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Playlist,
    LikedList,
    Category,
    Search,
}

/// Token for one asynchronous queue load. Only the newest ticket may apply
/// its result; anything older is stale and discarded.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadTicket(pub(crate) u64);

/// Ordered playback queue. Insertion order is playback order; shuffling
/// snapshots the prior order so it can be restored exactly.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    current_index: Option<usize>,
    source: Option<(SourceKind, Option<String>)>,
    original_order: Vec<Track>,
    shuffled: bool,
    loop_mode: LoopMode,
    load_gen: u64,
}

impl Queue {
    pub fn new(shuffled: bool, loop_mode: LoopMode) -> Self {
        Self {
            shuffled,
            loop_mode,
            ..Self::default()
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Track at the current position, if the queue has one.
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    pub fn track_at(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn source(&self) -> Option<&(SourceKind, Option<String>)> {
        self.source.as_ref()
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Start a new load. Invalidates every ticket handed out before.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_gen += 1;
        LoadTicket(self.load_gen)
    }

    /// Apply a finished load. Returns false (and changes nothing) when a
    /// newer load started after this ticket was issued.
    ///
    /// The fetched order becomes the restore order; when shuffle is already
    /// on, the fresh queue is shuffled immediately. `current_index` is set by
    /// identity match against `target_id`, or `None` when the target is not
    /// part of the collection.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        kind: SourceKind,
        source_id: Option<String>,
        tracks: Vec<Track>,
        target_id: &str,
    ) -> bool {
        if ticket.0 != self.load_gen {
            return false;
        }

        self.original_order = tracks.clone();
        self.tracks = tracks;
        if self.shuffled {
            self.tracks.shuffle(&mut rng());
        }
        self.source = Some((kind, source_id));
        self.current_index = self.position_of(target_id);
        true
    }

    /// Advance one position according to the loop mode.
    pub fn play_next(&mut self) -> Advance {
        if self.tracks.is_empty() {
            return Advance::None;
        }
        let Some(cur) = self.current_index else {
            return Advance::None;
        };

        match self.loop_mode {
            LoopMode::LoopOne => Advance::Next(cur),
            _ if cur + 1 < self.tracks.len() => {
                self.current_index = Some(cur + 1);
                Advance::Next(cur + 1)
            }
            LoopMode::LoopAll => {
                self.current_index = Some(0);
                Advance::Next(0)
            }
            LoopMode::NoLoop => Advance::Stop,
        }
    }

    /// Step back one position. Does not wrap at the front.
    pub fn play_previous(&mut self) -> Option<usize> {
        match self.current_index {
            Some(cur) if cur > 0 => {
                self.current_index = Some(cur - 1);
                Some(cur - 1)
            }
            _ => None,
        }
    }

    /// Turn shuffle on or off, relocating `current_index` so it keeps
    /// pointing at the same track identity. Turning it on snapshots the
    /// current order; turning it off restores that snapshot.
    pub fn set_shuffle(&mut self, shuffled: bool) {
        if shuffled == self.shuffled {
            return;
        }
        self.shuffled = shuffled;

        let playing_id = self.current_track().map(|t| t.id.clone());
        if shuffled {
            self.original_order = self.tracks.clone();
            self.tracks.shuffle(&mut rng());
        } else {
            self.tracks = self.original_order.clone();
        }
        self.current_index = playing_id.as_deref().and_then(|id| self.position_of(id));
    }

    /// Point the queue at `track_id` without reloading, e.g. when the user
    /// plays another track from the already-active collection.
    pub fn select(&mut self, track_id: &str) -> Option<usize> {
        self.current_index = self.position_of(track_id);
        self.current_index
    }

    fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }
}
