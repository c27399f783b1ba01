use serde::Deserialize;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// A per-group whitelist file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whitelist {
    /// Identifiers allowed to join, in order.
    #[serde(rename = "ExclusiveJoin", default)]
    pub exclusive_join: Vec<String>,
}

impl Whitelist {
    pub fn new(exclusive_join: Vec<String>) -> Self {
        Self { exclusive_join }
    }

    /// Build a whitelist from free-form user input: identifiers separated by
    /// commas and/or whitespace. Duplicates keep their first position.
    pub fn parse_members(raw: &str) -> Self {
        let mut members: Vec<String> = Vec::new();
        for id in raw.split(|c: char| c == ',' || c.is_whitespace()) {
            if !id.is_empty() && !members.iter().any(|m| m == id) {
                members.push(id.to_string());
            }
        }
        Self::new(members)
    }

    /// Serialize with 4-space indentation, the on-disk format.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut out = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
        self.serialize(&mut ser)?;
        Ok(out)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
