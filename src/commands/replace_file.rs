use anyhow::Result;

use crate::App;
use crate::clients::git::RemoteOps;
use crate::commands::interaction::DecodeError;
use crate::commands::interaction::Interaction;
use crate::mutator::ReplaceFileRequest;

impl ReplaceFileRequest {
    pub fn decode(interaction: &Interaction) -> Result<Self, DecodeError> {
        let options = interaction.options();
        Ok(Self {
            source_folder: options.required("source_folder")?,
            source_file: options.required("source_file")?,
            target_folder: options.required("target_folder")?,
            target_file: options.required("target_file")?,
        })
    }
}

impl<R: RemoteOps> App<R> {
    pub async fn cmd_replace_file(&self, interaction: &Interaction) -> Result<String> {
        let request = ReplaceFileRequest::decode(interaction)?;
        self.replace_file(request).await
    }
}
