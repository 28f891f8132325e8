//! Keyword predicates and query extraction
//!
//! Everything here is plain substring matching over the normalized command.
//! Trigger words are stripped the same way: each is removed wherever it
//! occurs, in list order, so a later trigger sees the result of earlier ones.

use chrono::{NaiveDate, NaiveTime};

/// Phrases that end the session
pub const SHUTDOWN_PHRASES: &[&str] = &["shut down system", "close", "turn off", "shut down"];

/// Words that mark an application launch
pub const LAUNCH_WORDS: &[&str] = &["open", "start", "launch"];

/// Removed before looking up the application alias
pub const LAUNCH_PREFIXES: &[&str] = &["open", "start", "launch", "run"];

/// Words that mark a media request; also stripped from the query
pub const MEDIA_TRIGGERS: &[&str] = &["play", "song", "music", "listen to", "the song"];

/// Words that mark an encyclopedia lookup
pub const LOOKUP_TRIGGERS: &[&str] = &[
    "wikipedia",
    "tell me about",
    "what is",
    "who is",
    "about",
    "search",
];

/// Removed after [`LOOKUP_TRIGGERS`] when extracting the topic
const LOOKUP_EXTRA_STRIPS: &[&str] = &["search", "look up", "info"];

/// Topics this short are not worth looking up
const MIN_TOPIC_CHARS: usize = 3;

fn contains_any(command: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| command.contains(needle))
}

#[must_use]
pub fn is_shutdown(command: &str) -> bool {
    contains_any(command, SHUTDOWN_PHRASES)
}

#[must_use]
pub fn is_voice_test(command: &str) -> bool {
    command.contains("test") && command.contains("voice")
}

#[must_use]
pub fn is_date_query(command: &str) -> bool {
    contains_any(command, &["date", "today"])
}

#[must_use]
pub fn is_time_query(command: &str) -> bool {
    command.contains("time")
}

#[must_use]
pub fn is_launch(command: &str) -> bool {
    contains_any(command, LAUNCH_WORDS)
}

#[must_use]
pub fn is_site(command: &str) -> bool {
    super::Site::find(command).is_some()
}

#[must_use]
pub fn is_media(command: &str) -> bool {
    contains_any(command, MEDIA_TRIGGERS)
}

#[must_use]
pub fn is_lookup(command: &str) -> bool {
    contains_any(command, LOOKUP_TRIGGERS)
}

/// Lower-case `text`, remove every trigger occurrence in order, trim
#[must_use]
pub fn strip_triggers<'a>(text: &str, triggers: impl IntoIterator<Item = &'a str>) -> String {
    let stripped = triggers
        .into_iter()
        .fold(text.to_lowercase(), |acc, trigger| acc.replace(trigger, ""));
    stripped.trim().to_string()
}

/// Command text left once the launch verbs are gone
#[must_use]
pub fn launch_target(command: &str) -> String {
    strip_triggers(command, LAUNCH_PREFIXES.iter().copied())
}

/// Search query for a media request, `None` when nothing is left
#[must_use]
pub fn media_query(command: &str) -> Option<String> {
    let query = strip_triggers(command, MEDIA_TRIGGERS.iter().copied());
    (!query.is_empty()).then_some(query)
}

/// Topic for a lookup, `None` when nothing meaningful is left
#[must_use]
pub fn lookup_topic(command: &str) -> Option<String> {
    let topic = strip_triggers(
        command,
        LOOKUP_TRIGGERS.iter().chain(LOOKUP_EXTRA_STRIPS).copied(),
    );
    (topic.chars().count() >= MIN_TOPIC_CHARS).then_some(topic)
}

/// YouTube search results page for a query
#[must_use]
pub fn media_search_url(query: &str) -> String {
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(query)
    )
}

/// Spoken time, e.g. "The time is 09:05, sir."
#[must_use]
pub fn format_time(now: NaiveTime) -> String {
    now.format("The time is %H:%M, sir.").to_string()
}

/// Spoken date, e.g. "Today is March 7, 2025, sir."
#[must_use]
pub fn format_date(today: NaiveDate) -> String {
    today.format("Today is %B %-d, %Y, sir.").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(is_shutdown("please shut down"));
        assert!(is_shutdown("close everything"));
        assert!(is_voice_test("this is a voice test"));
        assert!(!is_voice_test("run the test"));
        assert!(is_date_query("what is the date"));
        assert!(is_date_query("what day is it today"));
        assert!(is_time_query("what time is it"));
        assert!(is_launch("launch steam"));
        assert!(!is_launch("run steam"));
        assert!(is_media("listen to jazz"));
        assert!(is_lookup("who is ada lovelace"));
    }

    #[test]
    fn test_media_query() {
        assert_eq!(
            media_query("play bohemian rhapsody").as_deref(),
            Some("bohemian rhapsody")
        );
        assert_eq!(media_query("play music"), None);
    }

    #[test]
    fn test_media_strip_keeps_declared_order() {
        // "song" goes before "the song" gets a chance
        assert_eq!(
            media_query("play the song yesterday").as_deref(),
            Some("the  yesterday")
        );
    }

    #[test]
    fn test_lookup_topic() {
        assert_eq!(
            lookup_topic("tell me about black holes").as_deref(),
            Some("black holes")
        );
        assert_eq!(lookup_topic("who is ada lovelace").as_deref(), Some("ada lovelace"));
        assert_eq!(lookup_topic("search info ox"), None);
        assert_eq!(lookup_topic("what is"), None);
    }

    #[test]
    fn test_launch_target() {
        assert_eq!(launch_target("Open Spotify please"), "spotify please");
        assert_eq!(launch_target("run steam"), "steam");
    }

    #[test]
    fn test_media_search_url_is_encoded() {
        assert_eq!(
            media_search_url("bohemian rhapsody"),
            "https://www.youtube.com/results?search_query=bohemian%20rhapsody"
        );
    }

    #[test]
    fn test_format_time_and_date() {
        let time = NaiveTime::from_hms_opt(9, 5, 59).unwrap();
        assert_eq!(format_time(time), "The time is 09:05, sir.");

        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date), "Today is March 7, 2025, sir.");
    }
}
