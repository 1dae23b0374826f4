//! Loading a content directory.

use std::fs;
use std::path::Path;

use opwar_core::templates::TemplateLibrary;
use opwar_core::weapons::ProfileRegistry;
use tracing::debug;

use crate::error::{Result, ToolError};

/// Weapon profile file name inside a data directory.
pub const PROFILES_FILE: &str = "profiles.ron";

/// Unit template file name inside a data directory.
pub const TEMPLATES_FILE: &str = "templates.ron";

/// Parsed content of one data directory.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    /// Weapon profiles.
    pub profiles: ProfileRegistry,
    /// Unit templates.
    pub templates: TemplateLibrary,
}

impl DataSet {
    /// Parse profile and template RON text.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Game`] if either text is malformed.
    pub fn from_sources(profiles: &str, templates: &str) -> Result<Self> {
        Ok(Self {
            profiles: ProfileRegistry::from_ron_str(PROFILES_FILE, profiles)?,
            templates: TemplateLibrary::from_ron_str(TEMPLATES_FILE, templates)?,
        })
    }

    /// Read and parse `profiles.ron` and `templates.ron` from `dir`.
    ///
    /// # Errors
    ///
    /// - [`ToolError::Io`] if a file cannot be read.
    /// - [`ToolError::Game`] if a file is malformed.
    pub fn load(dir: &Path) -> Result<Self> {
        let profiles = read(dir, PROFILES_FILE)?;
        let templates = read(dir, TEMPLATES_FILE)?;
        let data = Self::from_sources(&profiles, &templates)?;
        debug!(
            dir = %dir.display(),
            profiles = data.profiles.len(),
            templates = data.templates.len(),
            "Loaded data directory"
        );
        Ok(data)
    }
}

fn read(dir: &Path, name: &str) -> Result<String> {
    let path = dir.join(name);
    fs::read_to_string(&path).map_err(|source| ToolError::Io { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use opwar_core::error::GameError;

    #[test]
    fn test_missing_directory() {
        let err = DataSet::load(Path::new("/nonexistent/opwar-data")).unwrap_err();
        match err {
            ToolError::Io { path, .. } => assert!(path.ends_with(PROFILES_FILE)),
            other => panic!("expected IO error, got {other}"),
        }
    }

    #[test]
    fn test_malformed_templates_name_the_file() {
        let err = DataSet::from_sources("[]", "{ \"x\": (").unwrap_err();
        assert!(matches!(
            err,
            ToolError::Game(GameError::Data { ref source_name, .. }) if source_name == TEMPLATES_FILE
        ));
    }
}
