use colored::Colorize;

const LABEL_WIDTH: usize = 4;

/// Status of one path relative to HEAD, the staging area and the working directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum FileLabel {
    /// Nothing to report, or the change is fully staged
    #[default]
    Unmodified,
    /// Working content differs from what the next commit would record
    Modified,
    /// The next commit expects a file that is gone from the working directory
    Deleted,
    /// The working file is not part of the next commit
    Untracked,
}

impl From<&FileLabel> for &str {
    fn from(label: &FileLabel) -> Self {
        match label {
            FileLabel::Unmodified => "",
            FileLabel::Modified => "modified",
            FileLabel::Deleted => "deleted",
            FileLabel::Untracked => "untracked",
        }
    }
}

impl std::fmt::Display for FileLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label: &str = self.into();
        let colored_str = match self {
            FileLabel::Unmodified => label.normal(),
            FileLabel::Modified | FileLabel::Deleted => label.red(),
            FileLabel::Untracked => label.yellow(),
        };
        write!(f, "{:>width$}{}", "", colored_str, width = LABEL_WIDTH)
    }
}
