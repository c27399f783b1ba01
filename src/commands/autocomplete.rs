use crate::App;
use crate::clients::git::RemoteOps;
use crate::commands::CommandKind;
use crate::commands::OptionRole;
use crate::commands::interaction::Choice;
use crate::commands::interaction::Interaction;
use crate::commands::interaction::Response;

/// Most choices a chat client accepts in one autocomplete reply.
pub const MAX_CHOICES: usize = 25;

pub const SELECT_OPTION_HINT: &str = "Please select an option.";
pub const SELECT_FOLDER_HINT: &str = "Please select a folder first.";

impl<R: RemoteOps> App<R> {
    /// Suggest values for the focused option from the topology index.
    pub fn autocomplete(&self, kind: CommandKind, interaction: &Interaction) -> Response {
        let options = interaction.options();
        let Some(focused) = options.focused() else {
            return hint(SELECT_OPTION_HINT);
        };
        let typed = focused.value.as_str().unwrap_or_default();

        let candidates = match kind.option(&focused.name).map(|o| o.role) {
            Some(OptionRole::Folder) => self.index.folders(),
            Some(OptionRole::File { folder }) => {
                let folder = match options.string(folder) {
                    Ok(Some(f)) if !f.trim().is_empty() => f.trim(),
                    _ => return hint(SELECT_FOLDER_HINT),
                };
                self.index.files(folder)
            }
            Some(OptionRole::Text) | None => Vec::new(),
        };

        Response::Choices {
            choices: filter(candidates, typed),
        }
    }
}

fn hint(text: &str) -> Response {
    Response::Choices {
        choices: vec![Choice::hint(text)],
    }
}

/// Keep candidates containing `typed` (case-insensitive), capped at
/// [`MAX_CHOICES`].
fn filter(candidates: Vec<String>, typed: &str) -> Vec<Choice> {
    let needle = typed.trim().to_lowercase();
    candidates
        .into_iter()
        .filter(|c| needle.is_empty() || c.to_lowercase().contains(&needle))
        .take(MAX_CHOICES)
        .map(Choice::new)
        .collect()
}
