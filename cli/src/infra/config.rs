//! Infrastructure implementation of the `AnswersStore` port.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::AnswersStore;
use crate::domain::AnswersFile;

/// Environment variable naming an answers file.
pub const CONFIG_ENV: &str = "N8N_PROVISION_CONFIG";

/// Reads the YAML answers file.
///
/// Resolution order: explicit path, then `N8N_PROVISION_CONFIG`, then
/// `<config dir>/n8n-provision/answers.yaml`. Only the implicit default may be
/// absent; a named file that does not exist is an error.
pub struct YamlAnswersStore {
    explicit: Option<PathBuf>,
}

impl YamlAnswersStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    fn named(&self) -> Option<PathBuf> {
        self.explicit
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
    }
}

impl AnswersStore for YamlAnswersStore {
    fn load(&self) -> Result<AnswersFile> {
        let named = self.named();
        let Some(path) = self.path() else {
            return Ok(AnswersFile::default());
        };
        if named.is_none() && !path.exists() {
            return Ok(AnswersFile::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        let answers: AnswersFile = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded answers file");
        Ok(answers)
    }

    fn path(&self) -> Option<PathBuf> {
        self.named()
            .or_else(|| dirs::config_dir().map(|d| d.join("n8n-provision").join("answers.yaml")))
    }
}
