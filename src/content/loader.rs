//! Load content from TOML files

use crate::content::template::BodyTemplate;
use crate::content::ContentConfig;
use crate::core::config::DamageConfig;
use crate::core::error::{AnatomyError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const BUILTIN_CONTENT: &str = include_str!("../../data/anatomy.toml");

/// Everything a content file declares
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Content {
    pub anatomy: ContentConfig,
    pub damage: DamageConfig,
    pub templates: BTreeMap<String, BodyTemplate>,
}

impl Content {
    /// Parse and validate a content document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: Content = toml::from_str(content)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Content shipped with the crate (`data/anatomy.toml`)
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONTENT)
    }

    pub fn template(&self, name: &str) -> Result<&BodyTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| AnatomyError::UnknownTemplate(name.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.anatomy.validate().map_err(AnatomyError::InvalidConfig)?;
        self.damage.validate().map_err(AnatomyError::InvalidConfig)?;
        for (name, template) in &self.templates {
            template.validate(name, &self.damage)?;
        }
        Ok(())
    }
}

/// Load content from a TOML file
pub fn load_content(path: &Path) -> Result<Content> {
    let content = fs::read_to_string(path)?;
    let parsed = Content::from_toml_str(&content)?;
    tracing::info!(
        path = %path.display(),
        templates = parsed.templates.len(),
        "loaded anatomy content"
    );
    Ok(parsed)
}
