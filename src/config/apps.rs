//! Application alias table

use serde::Deserialize;

/// One launchable application
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppEntry {
    /// Spoken name matched against the command (e.g. "code editor")
    pub alias: String,

    /// Program followed by whitespace-separated arguments
    pub launch: String,
}

impl AppEntry {
    /// Build an entry from string slices
    #[must_use]
    pub fn new(alias: &str, launch: &str) -> Self {
        Self {
            alias: alias.to_string(),
            launch: launch.to_string(),
        }
    }
}

/// Ordered alias table; earlier entries win when several aliases match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRegistry {
    entries: Vec<AppEntry>,
}

impl AppRegistry {
    /// Build a registry, lower-casing aliases and dropping blank ones
    #[must_use]
    pub fn new(entries: Vec<AppEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|e| AppEntry {
                alias: e.alias.trim().to_lowercase(),
                launch: e.launch.trim().to_string(),
            })
            .filter(|e| !e.alias.is_empty() && !e.launch.is_empty())
            .collect();
        Self { entries }
    }

    /// First entry whose alias occurs in the text
    #[must_use]
    pub fn find(&self, text: &str) -> Option<&AppEntry> {
        let text = text.to_lowercase();
        self.entries.iter().find(|e| text.contains(e.alias.as_str()))
    }

    /// All entries in match order
    #[must_use]
    pub fn entries(&self) -> &[AppEntry] {
        &self.entries
    }

    /// Number of registered apps
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::new(vec![
            AppEntry::new("brave", "brave-browser"),
            AppEntry::new("spotify", "spotify"),
            AppEntry::new("discord", "discord"),
            AppEntry::new("notepad", "gnome-text-editor"),
            AppEntry::new("vscode", "code"),
            AppEntry::new("code editor", "code"),
            AppEntry::new("browser", "brave-browser"),
            AppEntry::new("steam", "steam"),
            AppEntry::new("chrome", "google-chrome"),
        ])
    }
}
