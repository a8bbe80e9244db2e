use serde::{Deserialize, Serialize};

/// An asset category with its own catalog.
///
/// Sections are fixed: scripts land in `Tools`, wordlist-style text files in
/// `Combos`. The upload extension decides the target section, so a file can
/// never be filed under both.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Tools,
    Combos,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Tools, Section::Combos];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Combos => "combos",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tools" => Some(Self::Tools),
            "combos" => Some(Self::Combos),
            _ => None,
        }
    }

    /// Menu label shown to users.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Tools => "Tools",
            Self::Combos => "Combos",
        }
    }

    /// Name of the persisted catalog document for this section.
    pub fn document(&self) -> &'static str {
        self.as_str()
    }

    /// Classify an uploaded filename by extension: `.py` files are tools,
    /// `.txt` files are combos. Anything else is not accepted.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.').map(|(_, e)| e)?;
        if ext.eq_ignore_ascii_case("py") {
            Some(Self::Tools)
        } else if ext.eq_ignore_ascii_case("txt") {
            Some(Self::Combos)
        } else {
            None
        }
    }
}
