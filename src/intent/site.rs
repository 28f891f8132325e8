//! Website shortcuts

/// A site that can be opened by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    YouTube,
    Google,
    Wikipedia,
}

impl Site {
    /// Checked in this order; the first name found in a command wins
    pub const ALL: [Self; 3] = [Self::YouTube, Self::Google, Self::Wikipedia];

    /// Lower-case name as it appears in a normalized command
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::Google => "google",
            Self::Wikipedia => "wikipedia",
        }
    }

    /// Name used in spoken replies
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::Google => "Google",
            Self::Wikipedia => "Wikipedia",
        }
    }

    /// Home page
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::YouTube => "https://youtube.com",
            Self::Google => "https://google.com",
            Self::Wikipedia => "https://wikipedia.org",
        }
    }

    /// First site named anywhere in `command`
    #[must_use]
    pub fn find(command: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|site| command.contains(site.keyword()))
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
