// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.

//! AI safety guide - external text-completion collaborator
//!
//! Nothing in the simulation core depends on this module. It gives a view
//! layer one interface over either the canned responder or a remote
//! endpoint, and a fallback message when the call fails.

mod canned;
#[cfg(feature = "guide-http")]
mod http;

pub use canned::CannedGuide;
#[cfg(feature = "guide-http")]
pub use http::HttpGuide;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::GuideConfig;

/// Shown to the user whenever the guide cannot answer
pub const FALLBACK_MESSAGE: &str =
    "Sorry, the AI guide is unavailable right now. For emergencies contact the central control room (ext. 100).";

/// Characters per streamed fragment
pub const FRAGMENT_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    pub fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GuideError {
    #[error("conversation has no user turn")]
    EmptyConversation,

    #[cfg(feature = "guide-http")]
    #[error("guide request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("guide endpoint returned status {0}")]
    Status(u16),
}

#[async_trait]
pub trait Guide: Send + Sync {
    /// Complete answer to the conversation so far
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, GuideError>;

    /// The answer as a stream of short text fragments
    async fn stream(&self, turns: &[ChatTurn]) -> Result<BoxStream<'static, String>, GuideError> {
        let text = self.complete(turns).await?;
        Ok(stream::iter(fragments(&text, FRAGMENT_CHARS)).boxed())
    }
}

/// Ask the guide, degrading to [`FALLBACK_MESSAGE`] on any failure.
pub async fn ask_with_fallback(guide: &dyn Guide, turns: &[ChatTurn]) -> String {
    match guide.complete(turns).await {
        Ok(text) => text,
        Err(e) => {
            warn!("AI guide failed: {}", e);
            FALLBACK_MESSAGE.to_string()
        }
    }
}

/// Pick the guide implementation for a configuration.
pub fn from_config(config: &GuideConfig) -> Box<dyn Guide> {
    match &config.endpoint {
        #[cfg(feature = "guide-http")]
        Some(endpoint) => Box::new(HttpGuide::new(
            endpoint,
            std::time::Duration::from_secs(config.timeout_secs),
        )),
        #[cfg(not(feature = "guide-http"))]
        Some(_) => {
            warn!("Guide endpoint configured but the guide-http feature is disabled; using canned guide");
            Box::new(CannedGuide::new())
        }
        None => Box::new(CannedGuide::new()),
    }
}

/// Split text into fragments of at most `size` characters.
pub fn fragments(text: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(size.max(1)).map(|c| c.iter().collect()).collect()
}

fn last_user_turn(turns: &[ChatTurn]) -> Result<&ChatTurn, GuideError> {
    turns
        .iter()
        .rev()
        .find(|t| t.role == Role::User)
        .ok_or(GuideError::EmptyConversation)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    #[async_trait]
    impl Guide for Broken {
        async fn complete(&self, _turns: &[ChatTurn]) -> Result<String, GuideError> {
            Err(GuideError::Status(503))
        }
    }

    #[test]
    fn test_fragments() {
        assert_eq!(fragments("abcdefg", 3), vec!["abc", "def", "g"]);
        assert_eq!(fragments("⛑️ok", 3).concat(), "⛑️ok");
        assert!(fragments("", 3).is_empty());
    }

    #[tokio::test]
    async fn test_fallback_on_error() {
        let answer = ask_with_fallback(&Broken, &[ChatTurn::user("gas?")]).await;
        assert_eq!(answer, FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn test_stream_reassembles() {
        let guide = CannedGuide::new();
        let turns = [ChatTurn::user("There is smoke in the turbine hall")];
        let full = guide.complete(&turns).await.unwrap();
        let streamed: Vec<String> = guide.stream(&turns).await.unwrap().collect().await;
        assert!(streamed.iter().all(|f| f.chars().count() <= FRAGMENT_CHARS));
        assert_eq!(streamed.concat(), full);
    }

    #[test]
    fn test_from_config_defaults_to_canned() {
        let _guide = from_config(&GuideConfig::default());
    }
}
