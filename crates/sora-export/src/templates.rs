//! Dossier templates file
//!
//! A YAML file of named Handlebars templates. Every template is registered,
//! so any of them can be used as a partial from another.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;

use crate::ExportError;

static EMBEDDED_YAML: &str = include_str!("../templates/dossier.yaml");

static EMBEDDED: Lazy<Result<TemplatesFile, ExportError>> = Lazy::new(|| TemplatesFile::from_yaml(EMBEDDED_YAML));

/// Template rendered by `DossierExporter::render`
pub const ENTRY_TEMPLATE: &str = "dossier";

#[derive(Debug, Clone, Deserialize)]
pub struct TemplatesFile {
    pub version: String,
    pub templates: HashMap<String, Template>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub description: String,
    pub template: String,
}

impl TemplatesFile {
    /// Templates shipped with the crate
    pub fn embedded() -> Result<Self, ExportError> {
        EMBEDDED.clone()
    }

    pub fn load(path: &str) -> Result<Self, ExportError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ExportError::Template(format!("failed to read {}: {}", path, e)))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ExportError> {
        let file: TemplatesFile = serde_yaml::from_str(yaml).map_err(|e| ExportError::Template(e.to_string()))?;
        if !file.templates.contains_key(ENTRY_TEMPLATE) {
            return Err(ExportError::Template(format!("missing '{}' template", ENTRY_TEMPLATE)));
        }
        Ok(file)
    }

    pub fn list_templates(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_templates_parse() {
        let file = TemplatesFile::embedded().unwrap();
        assert_eq!(file.list_templates(), vec!["air", "conops", "dossier", "ground", "oso", "trace"]);
    }

    #[test]
    fn test_entry_template_required() {
        let err = TemplatesFile::from_yaml("version: \"1.0\"\ntemplates:\n  other:\n    description: x\n    template: y\n")
            .unwrap_err();
        assert!(err.to_string().contains("dossier"));
    }
}
