//! Transport-neutral shape of chat interactions and their responses.
//!
//! Option values arrive as loose JSON. [`Options`] is the only place that
//! looks at them; everything past it works with typed requests.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// The user submitted the command.
    Command,
    /// The user is typing into an option and wants suggestions.
    Autocomplete,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub kind: InteractionKind,
    #[serde(default)]
    pub options: Vec<CommandOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandOption {
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Message { content: String },
    Choices { choices: Vec<Choice> },
    /// Acknowledges a command whose result follows later.
    Deferred,
    FollowUp { content: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("missing required option `{0}`")]
    Missing(String),
    #[error("option `{0}` must be a string")]
    NotAString(String),
}

/// Read-only view over an interaction's options.
pub struct Options<'a> {
    options: &'a [CommandOption],
}

// -----------------------------------------------------------------------------
// Impls

impl Interaction {
    pub fn options(&self) -> Options<'_> {
        Options {
            options: &self.options,
        }
    }
}

impl Choice {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            name: value.clone(),
            value,
        }
    }

    /// A choice that only carries guidance text.
    pub fn hint(text: &str) -> Self {
        Self {
            name: text.to_string(),
            value: String::new(),
        }
    }
}

impl Response {
    pub fn message(content: impl Into<String>) -> Self {
        Response::Message {
            content: content.into(),
        }
    }

    /// Turn an immediate reply into the follow-up of a deferred command.
    pub fn into_follow_up(self) -> Self {
        match self {
            Response::Message { content } => Response::FollowUp { content },
            other => other,
        }
    }
}

impl<'a> Options<'a> {
    pub fn get(&self, name: &str) -> Option<&'a CommandOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// The option the user is currently typing into, if any.
    pub fn focused(&self) -> Option<&'a CommandOption> {
        self.options.iter().find(|o| o.focused)
    }

    /// A string option; absent and null both read as `None`.
    pub fn string(&self, name: &str) -> Result<Option<&'a str>, DecodeError> {
        match self.get(name).map(|o| &o.value) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(DecodeError::NotAString(name.to_string())),
        }
    }

    /// A non-blank string option.
    pub fn required(&self, name: &str) -> Result<String, DecodeError> {
        match self.string(name)? {
            Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(DecodeError::Missing(name.to_string())),
        }
    }
}
