use std::path::Path;

use serde_json::Value;

use crate::FormatError;

/// Turns structured text into a generic tree of objects, arrays and scalars.
pub trait MetadataParser {
    fn parse(&self, bytes: &[u8]) -> Result<Value, FormatError>;
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    #[default]
    Json,
    Yaml,
}

impl MetadataFormat {
    /// `.yaml` and `.yml` files are YAML, anything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                MetadataFormat::Yaml
            }
            _ => MetadataFormat::Json,
        }
    }
}

impl MetadataParser for MetadataFormat {
    fn parse(&self, bytes: &[u8]) -> Result<Value, FormatError> {
        match self {
            MetadataFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| FormatError::Metadata(Box::new(e))),
            MetadataFormat::Yaml => serde_yaml::from_slice(bytes)
                .map_err(|e| FormatError::Metadata(Box::new(e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_path() {
        assert_eq!(MetadataFormat::from_path(Path::new("a/atlas.json")), MetadataFormat::Json);
        assert_eq!(MetadataFormat::from_path(Path::new("atlas.YML")), MetadataFormat::Yaml);
        assert_eq!(MetadataFormat::from_path(Path::new("atlas")), MetadataFormat::Json);
    }

    #[test]
    fn test_json_and_yaml_produce_the_same_tree() {
        let json = MetadataFormat::Json
            .parse(br#"{"Sheets": [{"Name": "Player", "x": 3}]}"#)
            .unwrap();
        let yaml = MetadataFormat::Yaml
            .parse(b"Sheets:\n  - Name: Player\n    x: 3\n")
            .unwrap();

        assert_eq!(json, yaml);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MetadataFormat::Json.parse(b"{\"Sheets\": ["),
            Err(FormatError::Metadata(_))
        ));
    }
}
