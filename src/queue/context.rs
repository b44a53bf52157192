/// Collection the user most recently chose to play from. Drives queue
/// (re)loading when playback starts on a new track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayContext {
    pub kind: ContextKind,
    /// Playlist id or category name, when the kind needs one.
    pub id: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ContextKind {
    Playlist,
    LikedList,
    Category,
    /// Track detail page; resolves to a category load using the played
    /// track's own category.
    Detail,
    /// Search results; falls back to the played track's category.
    Search,
}

impl PlayContext {
    pub fn playlist(id: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Playlist,
            id: Some(id.into()),
        }
    }

    pub fn liked_list() -> Self {
        Self {
            kind: ContextKind::LikedList,
            id: None,
        }
    }

    pub fn category(name: impl Into<String>) -> Self {
        Self {
            kind: ContextKind::Category,
            id: Some(name.into()),
        }
    }

    pub fn detail() -> Self {
        Self {
            kind: ContextKind::Detail,
            id: None,
        }
    }

    pub fn search() -> Self {
        Self {
            kind: ContextKind::Search,
            id: None,
        }
    }
}
