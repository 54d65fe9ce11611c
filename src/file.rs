//! File reading utilities.

use std::fs::File;
use std::io::Error;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::from_reader;

/// Reads a JSON-encoded type from a given file `path`.
pub fn read_json<D: DeserializeOwned>(path: impl AsRef<Path>) -> Result<D, Error> {
    let file = File::open(path)?;
    Ok(from_reader(file)?)
}

pub trait ReadJsonFile<D> {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error>;
}

impl<D: DeserializeOwned> ReadJsonFile<D> for D {
    fn read_json_file(path: impl AsRef<Path>) -> Result<D, Error> {
        read_json(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::env;
    use std::fs;

    #[test]
    fn read_config_file() {
        let path = env::temp_dir().join(format!("scorecast-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"max_goals": 8, "home_boost": 1.05}"#).unwrap();
        let config = Config::read_json_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(8, config.max_goals);
        assert_eq!(1.05, config.home_boost);
        assert_eq!(4.0, config.lambda_cap);
    }

    #[test]
    fn read_malformed_file() {
        let path = env::temp_dir().join(format!("scorecast-malformed-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let result = Config::read_json_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
