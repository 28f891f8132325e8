//! Wikipedia topic summaries

use async_trait::async_trait;

use super::KnowledgeLookup;
use crate::{Error, Result};

/// Sentences read out from a summary
const SUMMARY_SENTENCES: usize = 2;

/// Opensearch response: `[query, [titles], [descriptions], [urls]]`
type OpenSearchResponse = (String, Vec<String>, Vec<String>, Vec<String>);

#[derive(serde::Deserialize)]
struct PageSummary {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    extract: String,
}

/// Looks topics up on English Wikipedia
pub struct WikipediaLookup {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaLookup {
    /// Create a lookup against `en.wikipedia.org`
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        Self::with_base_url("https://en.wikipedia.org")
    }

    /// Create a lookup against another MediaWiki host
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jarvis-assistant/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Best matching article title for a free-text topic
    async fn best_title(&self, topic: &str) -> Result<String> {
        let url = format!("{}/w/api.php", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "opensearch"),
                ("search", topic),
                ("limit", "1"),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let (_, titles, _, _): OpenSearchResponse = response.json().await?;
        titles
            .into_iter()
            .next()
            .ok_or_else(|| Error::LookupNotFound(topic.to_string()))
    }
}

#[async_trait]
impl KnowledgeLookup for WikipediaLookup {
    async fn summarize(&self, topic: &str) -> Result<String> {
        let title = self.best_title(topic).await?;
        tracing::debug!(topic, title = %title, "wikipedia match");

        let url = format!(
            "{}/api/rest_v1/page/summary/{}",
            self.base_url,
            urlencoding::encode(&title.replace(' ', "_"))
        );
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::LookupNotFound(topic.to_string()));
        }

        let summary: PageSummary = response.error_for_status()?.json().await?;

        // Disambiguation pages list meanings instead of describing one
        if summary.kind == "disambiguation" || summary.extract.trim().is_empty() {
            return Err(Error::LookupNotFound(topic.to_string()));
        }

        Ok(first_sentences(&summary.extract, SUMMARY_SENTENCES))
    }
}

/// First `n` sentences of a text
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text. Returns the whole trimmed text if it is shorter.
#[must_use]
pub fn first_sentences(text: &str, n: usize) -> String {
    let text = text.trim();
    if n == 0 {
        return String::new();
    }

    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen == n {
                    return text[..i + ch.len_utf8()].to_string();
                }
            }
        }
    }

    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sentences() {
        let extract = "Rust is a programming language. It emphasizes safety. It was designed by Graydon Hoare.";
        assert_eq!(
            first_sentences(extract, 2),
            "Rust is a programming language. It emphasizes safety."
        );
        assert_eq!(first_sentences(extract, 1), "Rust is a programming language.");
        assert_eq!(first_sentences(extract, 5), extract);
        assert_eq!(first_sentences(extract, 0), "");
    }

    #[test]
    fn test_decimal_points_do_not_split() {
        assert_eq!(
            first_sentences("Pi is about 3.14159 in value! Neat? Yes.", 2),
            "Pi is about 3.14159 in value! Neat?"
        );
    }

    #[test]
    fn test_opensearch_shape() {
        let body = r#"["rust",["Rust (programming language)"],[""],["https://en.wikipedia.org/wiki/Rust"]]"#;
        let (_, titles, _, _): OpenSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(titles, vec!["Rust (programming language)"]);
    }
}
