//! Intent routing
//!
//! Commands are matched against [`HANDLERS`] in priority order. The first
//! handler whose predicate matches and whose extractor yields an argument
//! wins; a handler whose extractor comes back empty hands the command on to
//! the next one. Nothing matched means the AI oracle answers, or a fixed
//! "didn't understand" reply when no oracle is configured.
//!
//! Every routed command produces exactly one reply. Collaborator failures are
//! logged and turned into an apology here; none of them escape.

pub mod matchers;
mod site;

pub use site::Site;

use chrono::Local;

use crate::config::{AppEntry, AppRegistry};
use crate::services::Services;

pub const SHUTDOWN_REPLY: &str = "System is shutting down, sir.";
pub const VOICE_TEST_REPLY: &str = "This is a voice test. Can you hear me, sir?";
pub const LOOKUP_NOT_FOUND_REPLY: &str = "Could not find information on that topic, sir.";
pub const ORACLE_FAILURE_REPLY: &str = "Unable to reach the AI module at the moment, sir.";
pub const UNRECOGNIZED_REPLY: &str = "I didn't understand that command, sir.";

/// Category of command a keyword handler serves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Shutdown,
    VoiceTest,
    Date,
    Time,
    LaunchApp,
    OpenSite,
    PlayMedia,
    Lookup,
}

/// Keyword handlers in priority order
pub const HANDLERS: [(Intent, fn(&str) -> bool); 8] = [
    (Intent::Shutdown, matchers::is_shutdown),
    (Intent::VoiceTest, matchers::is_voice_test),
    (Intent::Date, matchers::is_date_query),
    (Intent::Time, matchers::is_time_query),
    (Intent::LaunchApp, matchers::is_launch),
    (Intent::OpenSite, matchers::is_site),
    (Intent::PlayMedia, matchers::is_media),
    (Intent::Lookup, matchers::is_lookup),
];

/// A matched command with its extracted argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Shutdown,
    VoiceTest,
    Date,
    Time,
    LaunchApp(AppEntry),
    OpenSite(Site),
    PlayMedia(String),
    Lookup(String),
}

impl Command {
    /// Intent this command was matched under
    #[must_use]
    pub const fn intent(&self) -> Intent {
        match self {
            Self::Shutdown => Intent::Shutdown,
            Self::VoiceTest => Intent::VoiceTest,
            Self::Date => Intent::Date,
            Self::Time => Intent::Time,
            Self::LaunchApp(_) => Intent::LaunchApp,
            Self::OpenSite(_) => Intent::OpenSite,
            Self::PlayMedia(_) => Intent::PlayMedia,
            Self::Lookup(_) => Intent::Lookup,
        }
    }
}

/// Which stage of the chain produced the reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Handler(Intent),
    Oracle,
    Unrecognized,
}

/// Outcome of routing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routed {
    pub route: Route,
    pub reply: String,
}

impl Routed {
    /// Check if the command ends the session
    #[must_use]
    pub fn terminates(&self) -> bool {
        self.route == Route::Handler(Intent::Shutdown)
    }
}

/// Ordered first-match command router
pub struct Router {
    apps: AppRegistry,
    services: Services,
}

impl Router {
    #[must_use]
    pub const fn new(apps: AppRegistry, services: Services) -> Self {
        Self { apps, services }
    }

    /// Find the first keyword handler that takes this command
    ///
    /// A handler whose trigger matches but whose argument can't be extracted
    /// (unknown app alias, blank media query, topic too short) passes the
    /// command on to the next handler. A chain that stopped at the first
    /// matching trigger would send "open youtube" (not an app alias) straight
    /// to the oracle; here it reaches the site handler instead.
    #[must_use]
    pub fn classify(&self, command: &str) -> Option<Command> {
        HANDLERS
            .iter()
            .filter(|(_, matches)| matches(command))
            .find_map(|&(intent, _)| {
                let extracted = self.extract(intent, command);
                if extracted.is_none() {
                    tracing::debug!(?intent, command, "no argument extracted, falling through");
                }
                extracted
            })
    }

    fn extract(&self, intent: Intent, command: &str) -> Option<Command> {
        match intent {
            Intent::Shutdown => Some(Command::Shutdown),
            Intent::VoiceTest => Some(Command::VoiceTest),
            Intent::Date => Some(Command::Date),
            Intent::Time => Some(Command::Time),
            Intent::LaunchApp => self
                .apps
                .find(&matchers::launch_target(command))
                .cloned()
                .map(Command::LaunchApp),
            Intent::OpenSite => Site::find(command).map(Command::OpenSite),
            Intent::PlayMedia => matchers::media_query(command).map(Command::PlayMedia),
            Intent::Lookup => matchers::lookup_topic(command).map(Command::Lookup),
        }
    }

    /// Route a normalized command and produce the reply to speak
    pub async fn route(&self, command: &str) -> Routed {
        tracing::info!(command, "routing command");

        if let Some(matched) = self.classify(command) {
            let route = Route::Handler(matched.intent());
            let reply = self.execute(matched).await;
            return Routed { route, reply };
        }

        match &self.services.oracle {
            Some(oracle) => {
                let reply = match oracle.complete(command).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        tracing::warn!(error = %e, "AI oracle failed");
                        ORACLE_FAILURE_REPLY.to_string()
                    }
                };
                Routed {
                    route: Route::Oracle,
                    reply,
                }
            }
            None => {
                tracing::debug!(command, "no handler matched and no oracle configured");
                Routed {
                    route: Route::Unrecognized,
                    reply: UNRECOGNIZED_REPLY.to_string(),
                }
            }
        }
    }

    /// Run the side effect of a matched command
    async fn execute(&self, command: Command) -> String {
        match command {
            Command::Shutdown => SHUTDOWN_REPLY.to_string(),
            Command::VoiceTest => VOICE_TEST_REPLY.to_string(),
            Command::Date => matchers::format_date(Local::now().date_naive()),
            Command::Time => matchers::format_time(Local::now().time()),
            Command::LaunchApp(app) => match self.services.launcher.launch(&app) {
                Ok(()) => format!("Opening {}, sir.", app.alias),
                Err(e) => {
                    tracing::warn!(app = %app.alias, error = %e, "launch failed");
                    format!("Error opening {}, sir.", app.alias)
                }
            },
            Command::OpenSite(site) => match self.services.browser.open(site.url()) {
                Ok(()) => format!("Opening {site}, sir."),
                Err(e) => {
                    tracing::warn!(%site, error = %e, "site open failed");
                    format!("Error opening {site}, sir.")
                }
            },
            Command::PlayMedia(query) => {
                let url = matchers::media_search_url(&query);
                match self.services.browser.open(&url) {
                    Ok(()) => format!("Playing '{query}' on YouTube, sir."),
                    Err(e) => {
                        tracing::warn!(%query, error = %e, "media search failed");
                        format!("Error opening {}, sir.", Site::YouTube)
                    }
                }
            }
            Command::Lookup(topic) => match self.services.knowledge.summarize(&topic).await {
                Ok(summary) => summary,
                Err(e) => {
                    tracing::warn!(%topic, error = %e, "lookup failed");
                    LOOKUP_NOT_FOUND_REPLY.to_string()
                }
            },
        }
    }
}
