//! Pure projection of the mirrored task list into render order.

use doitbro_store::task::Task;

/// Filter/sort selector for the task list. Local UI state only, never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Every task, in snapshot order (newest first).
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only tasks not yet completed.
    Incomplete,
    /// Every task, re-sorted newest first.
    Newest,
    /// Every task, re-sorted oldest first.
    Oldest,
}

impl ViewMode {
    /// The fixed set of modes, in selector order.
    pub const ALL: [Self; 5] = [
        Self::All,
        Self::Completed,
        Self::Incomplete,
        Self::Newest,
        Self::Oldest,
    ];

    /// The mode after this one in the selector, wrapping around.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::Completed,
            Self::Completed => Self::Incomplete,
            Self::Incomplete => Self::Newest,
            Self::Newest => Self::Oldest,
            Self::Oldest => Self::All,
        }
    }

    /// The mode before this one in the selector, wrapping around.
    #[must_use]
    pub const fn prev(self) -> Self {
        match self {
            Self::All => Self::Oldest,
            Self::Completed => Self::All,
            Self::Incomplete => Self::Completed,
            Self::Newest => Self::Incomplete,
            Self::Oldest => Self::Newest,
        }
    }

    /// Selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Completed => "Completed",
            Self::Incomplete => "Incomplete",
            Self::Newest => "Newest first",
            Self::Oldest => "Oldest first",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Project the mirrored collection into the order to render.
///
/// `tasks` arrives in snapshot order (`created_at` descending, as emitted
/// by the store). The projection is total, deterministic, and
/// side-effect-free; it is recomputed from current inputs on every render.
///
/// 1. `Completed`/`Incomplete` filter on the `done` flag; other modes keep
///    everything.
/// 2. `Newest`/`Oldest` re-sort by `created_at` (stable, so ties keep their
///    snapshot order).
/// 3. A final stable partition moves pinned tasks ahead of unpinned ones,
///    preserving each group's relative order.
#[must_use]
pub fn project(tasks: &[Task], mode: ViewMode) -> Vec<&Task> {
    let mut out: Vec<&Task> = match mode {
        ViewMode::Completed => tasks.iter().filter(|t| t.done).collect(),
        ViewMode::Incomplete => tasks.iter().filter(|t| !t.done).collect(),
        ViewMode::All | ViewMode::Newest | ViewMode::Oldest => tasks.iter().collect(),
    };

    match mode {
        ViewMode::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ViewMode::Oldest => out.sort_by_key(|t| t.created_at),
        ViewMode::All | ViewMode::Completed | ViewMode::Incomplete => {}
    }

    // Vec::sort_by_key is stable, so this is the stable pin partition.
    out.sort_by_key(|t| !t.pinned);
    out
}
