//! Intent router integration tests
//!
//! Routes normalized commands through mock collaborators

use jarvis_assistant::intent::{
    Command, Intent, LOOKUP_NOT_FOUND_REPLY, ORACLE_FAILURE_REPLY, Route, SHUTDOWN_REPLY,
    Site, UNRECOGNIZED_REPLY, VOICE_TEST_REPLY,
};
use jarvis_assistant::{Routed, Router, WordReplacementTable};

mod common;
use common::{Behavior, Fixture};

async fn route(router: &Router, raw: &str) -> Routed {
    let normalized = WordReplacementTable::default().normalize(raw);
    router.route(&normalized).await
}

#[tokio::test]
async fn test_date_beats_ai_fallback() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::with_oracle("It is a lovely day."));

    let routed = route(&router, "what is the date today").await;

    assert_eq!(routed.route, Route::Handler(Intent::Date));
    assert!(routed.reply.starts_with("Today is "));
    assert!(routed.reply.ends_with(", sir."));
    assert!(fixture.oracle_calls().is_empty());
}

#[tokio::test]
async fn test_unmatched_command_goes_to_oracle_once() {
    let fixture = Fixture::new();
    let answer = "Quantum tunneling lets particles cross barriers they classically could not.";
    let router = fixture.router(&Behavior::with_oracle(answer));

    let routed = route(&router, "explain quantum tunneling").await;

    assert_eq!(routed.route, Route::Oracle);
    assert_eq!(routed.reply, answer);
    assert_eq!(fixture.oracle_calls(), vec!["explain quantum tunneling"]);
}

#[tokio::test]
async fn test_unmatched_command_without_oracle() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    let routed = route(&router, "explain quantum tunneling").await;

    assert_eq!(routed.route, Route::Unrecognized);
    assert_eq!(routed.reply, UNRECOGNIZED_REPLY);
}

#[tokio::test]
async fn test_oracle_failure_is_an_apology() {
    let fixture = Fixture::new();
    let behavior = Behavior {
        oracle_configured: true,
        ..Behavior::default()
    };
    let router = fixture.router(&behavior);

    let routed = route(&router, "explain quantum tunneling").await;

    assert_eq!(routed.route, Route::Oracle);
    assert_eq!(routed.reply, ORACLE_FAILURE_REPLY);
    assert_eq!(fixture.oracle_calls().len(), 1);
}

#[tokio::test]
async fn test_play_extracts_query() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    assert_eq!(
        router.classify("play bohemian rhapsody"),
        Some(Command::PlayMedia("bohemian rhapsody".to_string()))
    );

    let routed = route(&router, "Play Bohemian Rhapsody").await;

    assert_eq!(routed.route, Route::Handler(Intent::PlayMedia));
    assert_eq!(routed.reply, "Playing 'bohemian rhapsody' on YouTube, sir.");
    assert_eq!(
        fixture.opened(),
        vec!["https://www.youtube.com/results?search_query=bohemian%20rhapsody"]
    );
}

#[tokio::test]
async fn test_media_failure_names_youtube() {
    let fixture = Fixture::new();
    let behavior = Behavior {
        browser_fails: true,
        ..Behavior::with_oracle("unused")
    };
    let router = fixture.router(&behavior);

    let routed = route(&router, "play bohemian rhapsody").await;

    assert_eq!(routed.reply, "Error opening YouTube, sir.");
    assert!(fixture.oracle_calls().is_empty());
}

#[tokio::test]
async fn test_launch_app() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    let routed = route(&router, "open spotifai").await;

    assert_eq!(routed.route, Route::Handler(Intent::LaunchApp));
    assert_eq!(routed.reply, "Opening spotify, sir.");
    assert_eq!(fixture.launched(), vec!["spotify"]);
}

#[tokio::test]
async fn test_launch_failure_is_the_only_reply() {
    let fixture = Fixture::new();
    let behavior = Behavior {
        launch_fails: true,
        ..Behavior::with_oracle("unused")
    };
    let router = fixture.router(&behavior);

    let routed = route(&router, "launch steam").await;

    assert_eq!(routed.route, Route::Handler(Intent::LaunchApp));
    assert_eq!(routed.reply, "Error opening steam, sir.");
    assert!(fixture.oracle_calls().is_empty());
}

#[tokio::test]
async fn test_unknown_app_falls_through_to_site() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    assert_eq!(
        router.classify("open youtube"),
        Some(Command::OpenSite(Site::YouTube))
    );

    let routed = route(&router, "open youtoob").await;

    assert_eq!(routed.route, Route::Handler(Intent::OpenSite));
    assert_eq!(routed.reply, "Opening YouTube, sir.");
    assert!(fixture.launched().is_empty());
    assert_eq!(fixture.opened(), vec!["https://youtube.com"]);
}

#[tokio::test]
async fn test_site_failure_names_site() {
    let fixture = Fixture::new();
    let behavior = Behavior {
        browser_fails: true,
        ..Behavior::default()
    };
    let router = fixture.router(&behavior);

    let routed = route(&router, "open google").await;

    assert_eq!(routed.reply, "Error opening Google, sir.");
}

#[tokio::test]
async fn test_lookup_speaks_summary() {
    let fixture = Fixture::new();
    let behavior = Behavior {
        summary: Some("A black hole is a region of spacetime.".to_string()),
        ..Behavior::default()
    };
    let router = fixture.router(&behavior);

    let routed = route(&router, "tell me about black holes").await;

    assert_eq!(routed.route, Route::Handler(Intent::Lookup));
    assert_eq!(routed.reply, "A black hole is a region of spacetime.");
    assert_eq!(fixture.lookups(), vec!["black holes"]);
}

#[tokio::test]
async fn test_lookup_not_found() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::with_oracle("unused"));

    let routed = route(&router, "who is zorblax the unknowable").await;

    assert_eq!(routed.reply, LOOKUP_NOT_FOUND_REPLY);
    assert_eq!(fixture.lookups(), vec!["zorblax the unknowable"]);
    assert!(fixture.oracle_calls().is_empty());
}

#[tokio::test]
async fn test_short_topic_falls_through_to_oracle() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::with_oracle("It depends, sir."));

    let routed = route(&router, "tell me about it").await;

    assert_eq!(routed.route, Route::Oracle);
    assert!(fixture.lookups().is_empty());
    assert_eq!(fixture.oracle_calls(), vec!["tell me about it"]);
}

#[tokio::test]
async fn test_bare_media_trigger_falls_through() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    let routed = route(&router, "play music").await;

    assert_eq!(routed.route, Route::Unrecognized);
    assert!(fixture.opened().is_empty());
}

#[tokio::test]
async fn test_shutdown_has_top_priority() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    let routed = route(&router, "turn off the music").await;

    assert!(routed.terminates());
    assert_eq!(routed.reply, SHUTDOWN_REPLY);
    assert!(fixture.opened().is_empty());
}

#[tokio::test]
async fn test_voice_test_and_time() {
    let fixture = Fixture::new();
    let router = fixture.router(&Behavior::default());

    let routed = route(&router, "this is a voice test").await;
    assert_eq!(routed.route, Route::Handler(Intent::VoiceTest));
    assert_eq!(routed.reply, VOICE_TEST_REPLY);
    assert!(!routed.terminates());

    let routed = route(&router, "what time is it").await;
    assert_eq!(routed.route, Route::Handler(Intent::Time));
    assert!(routed.reply.starts_with("The time is "));
    assert_eq!(routed.reply.len(), "The time is 00:00, sir.".len());
}
