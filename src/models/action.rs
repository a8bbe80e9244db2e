use super::Section;

/// A parsed callback token.
///
/// Tokens are colon-separated so filenames may contain underscores; the
/// filename is always the last field and parsed greedily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// List a section's catalog.
    View(Section),
    /// Download one file from a section.
    Get(Section, String),
    /// Delete one file from a section (admin).
    Delete(Section, String),
    /// Show upload instructions (admin).
    UploadPrompt,
    /// Ask for a user id to toggle admin membership (owner).
    AdminPrompt,
    /// Delete every file in every section (owner).
    DeleteAll,
    /// Ask for a broadcast text (owner).
    BroadcastPrompt,
    /// Show user/admin counts and recent activity (owner).
    ActivityLogs,
}

impl Action {
    /// Encode into a callback token for a button.
    pub fn encode(&self) -> String {
        match self {
            Self::View(s) => format!("view:{}", s.as_str()),
            Self::Get(s, f) => format!("get:{}:{}", s.as_str(), f),
            Self::Delete(s, f) => format!("del:{}:{}", s.as_str(), f),
            Self::UploadPrompt => "upload".to_string(),
            Self::AdminPrompt => "admin".to_string(),
            Self::DeleteAll => "purge".to_string(),
            Self::BroadcastPrompt => "broadcast".to_string(),
            Self::ActivityLogs => "logs".to_string(),
        }
    }

    /// Parse a callback token. Returns `None` for anything this bot never
    /// issued; such tokens are ignored upstream.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "upload" => return Some(Self::UploadPrompt),
            "admin" => return Some(Self::AdminPrompt),
            "purge" => return Some(Self::DeleteAll),
            "broadcast" => return Some(Self::BroadcastPrompt),
            "logs" => return Some(Self::ActivityLogs),
            _ => {}
        }

        let mut parts = token.splitn(3, ':');
        let verb = parts.next()?;
        let section = Section::from_str(parts.next()?)?;
        match (verb, parts.next()) {
            ("view", None) => Some(Self::View(section)),
            ("get", Some(f)) if !f.is_empty() => Some(Self::Get(section, f.to_string())),
            ("del", Some(f)) if !f.is_empty() => Some(Self::Delete(section, f.to_string())),
            _ => None,
        }
    }
}
