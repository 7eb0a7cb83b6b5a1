// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// Name of the optional configuration file in a collection directory.
pub const CONFIG_FILE: &str = "studydeck.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Maximum number of cards reviewed in one sitting.
    #[serde(default = "default_session_limit")]
    pub session_limit: usize,
    /// Port the drill server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whether to open the drill page in a browser.
    #[serde(default = "default_true")]
    pub open_browser: bool,
}

fn default_session_limit() -> usize {
    20
}

fn default_port() -> u16 {
    8000
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_limit: default_session_limit(),
            port: default_port(),
            open_browser: default_true(),
        }
    }
}

impl Config {
    /// Load the configuration for a collection. A missing file means the
    /// defaults.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE);
        if !path.exists() {
            log::debug!("No {CONFIG_FILE}, using defaults.");
            return Ok(Self::default());
        }
        let content = read_to_string(&path)?;
        Self::parse(&content)
            .map_err(|e| ErrorReport::new(format!("{}: {}", path.display(), e.message())))
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use super::*;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_defaults() -> Fallible<()> {
        let config = Config::parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.session_limit, 20);
        assert_eq!(config.port, 8000);
        assert!(config.open_browser);
        Ok(())
    }

    #[test]
    fn test_partial() -> Fallible<()> {
        let config = Config::parse("session_limit = 5\nopen_browser = false\n")?;
        assert_eq!(config.session_limit, 5);
        assert_eq!(config.port, 8000);
        assert!(!config.open_browser);
        Ok(())
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("sesion_limit = 5").is_err());
    }

    #[test]
    fn test_load_missing_file() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        assert_eq!(Config::load(&directory)?, Config::default());
        Ok(())
    }

    #[test]
    fn test_load_malformed_file_names_it() -> Fallible<()> {
        let directory = create_tmp_directory()?;
        write(directory.join(CONFIG_FILE), "port = \"eighty\"")?;
        let err = Config::load(&directory).unwrap_err();
        assert!(err.message().contains(CONFIG_FILE));
        Ok(())
    }
}
