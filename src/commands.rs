//! Chat commands.
//!
//! Every command the bot understands is a [`CommandKind`]. [`App::handle`]
//! routes an interaction by command and [`InteractionKind`]: submitted
//! commands go to their `cmd_*` handler, autocomplete requests are answered
//! from the topology index using the command's option roles.

use serde::Serialize;

use crate::App;
use crate::clients::git::RemoteOps;

pub mod autocomplete;
pub mod interaction;
pub mod replace_file;
pub mod serve;
pub mod sync;
pub mod whitelist;

use interaction::Interaction;
use interaction::InteractionKind;
use interaction::Response;

/// Discord permission bit for administrators.
const ADMINISTRATOR_PERMISSION: &str = "8";

/// Discord option type for strings.
const STRING_OPTION: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ReplaceFile,
    Whitelist,
}

/// What an option's value refers to, which decides its suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionRole {
    Folder,
    /// A file inside the folder named by the given sibling option.
    File { folder: &'static str },
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub role: OptionRole,
}

const REPLACE_FILE_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "source_folder",
        description: "The folder containing the source file.",
        required: true,
        role: OptionRole::Folder,
    },
    OptionSpec {
        name: "source_file",
        description: "The source file to copy from.",
        required: true,
        role: OptionRole::File {
            folder: "source_folder",
        },
    },
    OptionSpec {
        name: "target_folder",
        description: "The folder containing the target file.",
        required: true,
        role: OptionRole::Folder,
    },
    OptionSpec {
        name: "target_file",
        description: "The target file to replace.",
        required: true,
        role: OptionRole::File {
            folder: "target_folder",
        },
    },
];

const WHITELIST_OPTIONS: &[OptionSpec] = &[
    OptionSpec {
        name: "folder",
        description: "The folder containing the whitelist.",
        required: true,
        role: OptionRole::Folder,
    },
    OptionSpec {
        name: "file",
        description: "The whitelist file to overwrite.",
        required: true,
        role: OptionRole::File { folder: "folder" },
    },
    OptionSpec {
        name: "members",
        description: "Player IDs allowed to join, separated by commas or spaces. At least one is required.",
        required: true,
        role: OptionRole::Text,
    },
];

impl CommandKind {
    pub const ALL: [CommandKind; 2] = [CommandKind::ReplaceFile, CommandKind::Whitelist];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::ReplaceFile => "replacefile",
            CommandKind::Whitelist => "whitelist",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            CommandKind::ReplaceFile => "Replace the contents of one file with another",
            CommandKind::Whitelist => "Overwrite a whitelist with a non-empty list of player IDs",
        }
    }

    pub fn options(self) -> &'static [OptionSpec] {
        match self {
            CommandKind::ReplaceFile => REPLACE_FILE_OPTIONS,
            CommandKind::Whitelist => WHITELIST_OPTIONS,
        }
    }

    pub fn option(self, name: &str) -> Option<&'static OptionSpec> {
        self.options().iter().find(|o| o.name == name)
    }
}

// -----------------------------------------------------------------------------
// Registration payload

#[derive(Debug, Serialize)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub default_member_permissions: &'static str,
    pub dm_permission: bool,
    pub nsfw: bool,
    pub options: Vec<OptionDefinition>,
}

#[derive(Debug, Serialize)]
pub struct OptionDefinition {
    #[serde(rename = "type")]
    pub kind: u8,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub autocomplete: bool,
}

/// Definitions to register with the chat platform.
pub fn definitions() -> Vec<CommandDefinition> {
    CommandKind::ALL
        .into_iter()
        .map(|kind| CommandDefinition {
            name: kind.name(),
            description: kind.description(),
            default_member_permissions: ADMINISTRATOR_PERMISSION,
            dm_permission: false,
            nsfw: false,
            options: kind
                .options()
                .iter()
                .map(|o| OptionDefinition {
                    kind: STRING_OPTION,
                    name: o.name,
                    description: o.description,
                    required: o.required,
                    autocomplete: o.role != OptionRole::Text,
                })
                .collect(),
        })
        .collect()
}

// -----------------------------------------------------------------------------
// Dispatch

impl<R: RemoteOps> App<R> {
    pub async fn handle(&self, interaction: &Interaction) -> Response {
        let Some(kind) = CommandKind::from_name(&interaction.name) else {
            return Response::message(format!("Error: unknown command `{}`", interaction.name));
        };

        let result = match (kind, interaction.kind) {
            (_, InteractionKind::Autocomplete) => return self.autocomplete(kind, interaction),
            (CommandKind::ReplaceFile, InteractionKind::Command) => {
                self.cmd_replace_file(interaction).await
            }
            (CommandKind::Whitelist, InteractionKind::Command) => {
                self.cmd_whitelist(interaction).await
            }
        };

        match result {
            Ok(message) => Response::message(message),
            Err(e) => Response::message(format!("Error: {:#}", e)),
        }
    }
}
