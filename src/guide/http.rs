//! Remote guide over HTTP

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use super::{last_user_turn, ChatTurn, Guide, GuideError};

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: &'a [ChatTurn],
}

/// Posts the conversation as `{"messages": [...]}` and accepts either a
/// plain-text body or a line stream of `0:"fragment"` records.
pub struct HttpGuide {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpGuide {
    pub fn new(endpoint: &str, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl Guide for HttpGuide {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GuideError> {
        last_user_turn(turns)?;

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&ChatRequest { messages: turns })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GuideError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!("Guide replied with {} bytes", body.len());
        Ok(decode_body(&body))
    }
}

/// Join `0:"..."` fragment lines; anything else is taken as plain text.
pub(crate) fn decode_body(body: &str) -> String {
    let fragments: Option<Vec<String>> = body
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.strip_prefix("0:").and_then(|json| serde_json::from_str::<String>(json).ok()))
        .collect();

    match fragments {
        Some(parts) if !parts.is_empty() => parts.concat(),
        _ => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fragment_stream() {
        let body = "0:\"Eva\"\n0:\"cua\"\n0:\"te\\n\"\n";
        assert_eq!(decode_body(body), "Evacuate\n");
    }

    #[test]
    fn test_decode_plain_text() {
        assert_eq!(decode_body("Evacuate Zone D"), "Evacuate Zone D");
        assert_eq!(decode_body(""), "");
    }

    #[tokio::test]
    async fn test_requires_user_turn() {
        let guide = HttpGuide::new("http://127.0.0.1:9/chat", Duration::from_millis(10));
        assert!(matches!(guide.complete(&[]).await, Err(GuideError::EmptyConversation)));
    }
}
