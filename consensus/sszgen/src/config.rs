use crate::Error;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Options for `render`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Only render these types. All `pub` structs and enums are rendered if `None`.
    pub type_names: Option<Vec<String>>,
    /// The path of the SSZ crate in generated code.
    pub ssz_crate: String,
    /// The path of the tree hash crate in generated code.
    pub tree_hash_crate: String,
    /// Emit a banner stating that the file is generated.
    pub header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            type_names: None,
            ssz_crate: "ssz".to_string(),
            tree_hash_crate: "tree_hash".to_string(),
            header: true,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Error> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path.as_ref())?;
        serde_yaml::from_reader(file).map_err(Into::into)
    }

    pub(crate) fn ssz_path(&self) -> Result<syn::Path, Error> {
        parse_crate_path("ssz_crate", &self.ssz_crate)
    }

    pub(crate) fn tree_hash_path(&self) -> Result<syn::Path, Error> {
        parse_crate_path("tree_hash_crate", &self.tree_hash_crate)
    }
}

fn parse_crate_path(key: &str, path: &str) -> Result<syn::Path, Error> {
    syn::parse_str(path).map_err(|e| Error::Config(format!("{} {:?}: {}", key, path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.type_names, None);
        assert_eq!(config.ssz_crate, "ssz");
        assert!(config.header);
        assert_eq!(Config::from_yaml_str("{}").unwrap(), config);
    }

    #[test]
    fn partial_yaml() {
        let yaml = "type_names: [Checkpoint, Fork]\nheader: false\n";
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(
            config.type_names,
            Some(vec!["Checkpoint".to_string(), "Fork".to_string()])
        );
        assert!(!config.header);
        assert_eq!(config.tree_hash_crate, "tree_hash");
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(matches!(
            Config::from_yaml_str("typenames: [Checkpoint]"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ssz_crate: \"::ssz\"").unwrap();

        let config = Config::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.ssz_crate, "::ssz");
        assert!(config.ssz_path().is_ok());

        assert!(matches!(
            Config::from_yaml_file(file.path().with_extension("missing")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn invalid_crate_path() {
        let config = Config {
            ssz_crate: "not a path".to_string(),
            ..Config::default()
        };
        assert!(matches!(config.ssz_path(), Err(Error::Config(_))));
    }
}
