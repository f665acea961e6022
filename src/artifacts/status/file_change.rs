use colored::Colorize;

const LABEL_WIDTH: usize = 8;

/// Staging index vs HEAD tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum StagedChange {
    #[default]
    None,
    /// Staged, no entry in HEAD (`staged-new`)
    Added,
    /// Staged with a different blob identity than HEAD (`staged-modified`)
    Modified,
}

impl From<&StagedChange> for &str {
    fn from(change: &StagedChange) -> Self {
        match change {
            StagedChange::None => " ",
            StagedChange::Added => "A",
            StagedChange::Modified => "M",
        }
    }
}

/// Working tree vs staging entry (or HEAD entry when nothing is staged)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum WorktreeChange {
    #[default]
    None,
    /// Content hash differs (`modified-unstaged`)
    Modified,
    /// Tracked or staged, but absent from the working tree (`deleted`)
    Deleted,
}

impl From<&WorktreeChange> for &str {
    fn from(change: &WorktreeChange) -> Self {
        match change {
            WorktreeChange::None => " ",
            WorktreeChange::Modified => "M",
            WorktreeChange::Deleted => "D",
        }
    }
}

/// Both dimensions of one path's status
///
/// A path can be staged-new *and* modified-unstaged at once: staged
/// content is frozen at `add` time, later edits only show up on the
/// worktree side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct FileChange {
    pub staged: StagedChange,
    pub worktree: WorktreeChange,
}

impl FileChange {
    pub fn is_clean(&self) -> bool {
        self.staged == StagedChange::None && self.worktree == WorktreeChange::None
    }

    /// Two-letter porcelain code, staged column first
    pub fn porcelain_code(&self) -> String {
        let staged: &str = (&self.staged).into();
        let worktree: &str = (&self.worktree).into();
        format!("{staged}{worktree}")
    }
}

impl std::fmt::Display for StagedChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StagedChange::None => "".normal(),
            StagedChange::Added => "new file:   ".green(),
            StagedChange::Modified => "modified:   ".green(),
        };
        write!(f, "{:>width$}{}", "", label, width = LABEL_WIDTH)
    }
}

impl std::fmt::Display for WorktreeChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            WorktreeChange::None => "".normal(),
            WorktreeChange::Modified => "modified:   ".red(),
            WorktreeChange::Deleted => "deleted:    ".red(),
        };
        write!(f, "{:>width$}{}", "", label, width = LABEL_WIDTH)
    }
}
