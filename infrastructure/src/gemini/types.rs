//! Wire types for the Gemini `generateContent` API.
//!
//! Field names follow the REST API (camelCase). Only the fields this
//! adapter reads or writes are modelled; unknown fields are ignored.

use codemax_domain::{Message, Role};
use serde::{Deserialize, Serialize};

// ==================== Request ====================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
}

impl GenerateContentRequest {
    /// Build a request from the conversation and a system instruction.
    ///
    /// Consecutive messages with the same role are merged into one content
    /// entry, since the API expects user and model turns to alternate.
    pub fn new(system_prompt: &str, messages: &[Message]) -> Self {
        let mut contents: Vec<Content> = Vec::with_capacity(messages.len());
        for message in messages {
            let role = wire_role(message.role);
            let parts = wire_parts(message);
            if parts.is_empty() {
                continue;
            }
            match contents.last_mut() {
                Some(last) if last.role.as_deref() == Some(role) => last.parts.extend(parts),
                _ => contents.push(Content {
                    role: Some(role.to_string()),
                    parts,
                }),
            }
        }

        let system_instruction = (!system_prompt.is_empty()).then(|| Content {
            role: None,
            parts: vec![WirePart::text(system_prompt)],
        });

        Self {
            contents,
            system_instruction,
        }
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Model => "model",
    }
}

/// Convert message parts, dropping empty text parts.
fn wire_parts(message: &Message) -> Vec<WirePart> {
    message
        .parts
        .iter()
        .filter_map(|part| {
            if let Some(inline) = &part.inline_data {
                return Some(WirePart {
                    inline_data: Some(WireInlineData {
                        mime_type: inline.mime_type.clone(),
                        data: inline.data.clone(),
                    }),
                    ..WirePart::default()
                });
            }
            match part.text.as_deref() {
                Some(text) if !text.is_empty() => Some(WirePart::text(text)),
                _ => None,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<WireInlineData>,
    /// Set on reasoning summaries, which are not part of the answer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

impl WirePart {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireInlineData {
    pub mime_type: String,
    pub data: String,
}

// ==================== Response ====================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub error: Option<ApiError>,
    pub model_version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiError,
}

impl GenerateContentResponse {
    /// Text of the first candidate, thought parts excluded.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|p| !p.thought)
                    .filter_map(|p| p.text.as_deref())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Failure carried by this event, if any.
    ///
    /// A candidate that stops for a reason other than `STOP`/`MAX_TOKENS`
    /// is only a failure when it carries no text.
    pub fn failure(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(match &error.status {
                Some(status) => format!("{}: {}", status, error.message),
                None => error.message.clone(),
            });
        }
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Some(format!("Prompt blocked ({})", reason));
        }
        let candidate = self.candidates.first()?;
        match candidate.finish_reason.as_deref() {
            Some("STOP") | Some("MAX_TOKENS") | None => None,
            Some(reason) if self.text().is_empty() => {
                Some(format!("Response stopped without content ({})", reason))
            }
            Some(_) => None,
        }
    }
}
