use anyhow::Result;

use crate::App;
use crate::clients::git::RemoteOps;
use crate::commands::interaction::DecodeError;
use crate::commands::interaction::Interaction;
use crate::mutator::WhitelistRequest;
use crate::whitelist::Whitelist;

impl WhitelistRequest {
    pub fn decode(interaction: &Interaction) -> Result<Self, DecodeError> {
        let options = interaction.options();
        Ok(Self {
            folder: options.required("folder")?,
            file: options.required("file")?,
            document: Whitelist::parse_members(&options.required("members")?),
        })
    }
}

impl<R: RemoteOps> App<R> {
    pub async fn cmd_whitelist(&self, interaction: &Interaction) -> Result<String> {
        let request = WhitelistRequest::decode(interaction)?;
        self.update_whitelist(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::clients::git::MockRemoteOps;
    use crate::commands::interaction::Response;
    use crate::index::TopologyIndex;

    fn interaction(json: &str) -> Interaction {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_decode() {
        let request = WhitelistRequest::decode(&interaction(
            r#"{"name":"whitelist","kind":"command","options":[
                {"name":"folder","value":"whitelists"},
                {"name":"file","value":"pvp.json"},
                {"name":"members","value":"111, 222 333"}
            ]}"#,
        ))
        .unwrap();
        assert_eq!(request.folder, "whitelists");
        assert_eq!(request.file, "pvp.json");
        assert_eq!(request.document.exclusive_join, vec!["111", "222", "333"]);
    }

    #[tokio::test]
    async fn test_separator_only_members_are_rejected() {
        let mut mock = MockRemoteOps::new();
        mock.expect_acquire().times(0);
        let app = App::new(Config::new("/nowhere".to_string()), TopologyIndex::new(), mock);

        let response = app
            .handle(&interaction(
                r#"{"name":"whitelist","kind":"command","options":[
                    {"name":"folder","value":"whitelists"},
                    {"name":"file","value":"pvp.json"},
                    {"name":"members","value":" , ,"}
                ]}"#,
            ))
            .await;
        assert_eq!(response, Response::message("Error: no player IDs given"));
    }
}
