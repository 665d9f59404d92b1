//! Template rendering for dossiers.
//!
//! Handlebars with HTML escaping disabled (the output is Markdown) and a few
//! helpers on top of the built-ins (`eq`, `if`, `each`):
//! - default: value or a fallback when null/missing
//! - join: join an array with a separator
//! - oso_label: 3 -> "OSO#03"
//! - yes_no: bool -> "Yes"/"No"

use handlebars::{handlebars_helper, no_escape, Handlebars};
use serde_json::Value;

use crate::templates::TemplatesFile;
use crate::ExportError;

handlebars_helper!(default_value: |value: Json, fallback: str| {
    match value {
        Value::Null => fallback.to_string(),
        Value::String(s) if s.is_empty() => fallback.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
});

handlebars_helper!(join: |items: array, separator: str| {
    items
        .iter()
        .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
        .collect::<Vec<_>>()
        .join(separator)
});

handlebars_helper!(oso_label: |id: u64| format!("OSO#{:02}", id));

handlebars_helper!(yes_no: |flag: bool| if flag { "Yes" } else { "No" });

pub struct TemplateRenderer<'a> {
    handlebars: Handlebars<'a>,
    templates: TemplatesFile,
}

impl<'a> TemplateRenderer<'a> {
    pub fn new(templates: TemplatesFile) -> Result<Self, ExportError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars.register_escape_fn(no_escape);

        handlebars.register_helper("default", Box::new(default_value));
        handlebars.register_helper("join", Box::new(join));
        handlebars.register_helper("oso_label", Box::new(oso_label));
        handlebars.register_helper("yes_no", Box::new(yes_no));

        for (name, template) in &templates.templates {
            handlebars
                .register_template_string(name, &template.template)
                .map_err(|e| ExportError::Template(format!("{}: {}", name, e)))?;
        }

        Ok(TemplateRenderer { handlebars, templates })
    }

    pub fn render(&self, template_name: &str, data: &Value) -> Result<String, ExportError> {
        self.handlebars
            .render(template_name, data)
            .map_err(|e| ExportError::Render(e.to_string()))
    }

    pub fn render_string(&self, template: &str, data: &Value) -> Result<String, ExportError> {
        self.handlebars
            .render_template(template, data)
            .map_err(|e| ExportError::Render(e.to_string()))
    }

    pub fn list_templates(&self) -> Vec<&str> {
        self.templates.list_templates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> TemplateRenderer<'static> {
        TemplateRenderer::new(
            TemplatesFile::from_yaml(
                r#"
version: "1.0"
templates:
  dossier:
    description: test entry
    template: "{{oso_label id}} {{default missing \"-\"}}"
"#,
            )
            .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_label_and_default() {
        let out = renderer().render("dossier", &json!({ "id": 7 })).unwrap();
        assert_eq!(out, "OSO#07 -");
    }

    #[test]
    fn test_join_and_yes_no() {
        let out = renderer()
            .render_string("{{join items \" | \"}} {{yes_no flag}}", &json!({ "items": ["a", 2], "flag": true }))
            .unwrap();
        assert_eq!(out, "a | 2 Yes");
    }

    #[test]
    fn test_markdown_is_not_escaped() {
        let out = renderer()
            .render_string("{{text}}", &json!({ "text": "<details> & `code`" }))
            .unwrap();
        assert_eq!(out, "<details> & `code`");
    }

    #[test]
    fn test_bad_template_is_reported() {
        let file = TemplatesFile::from_yaml(
            "version: \"1.0\"\ntemplates:\n  dossier:\n    description: x\n    template: \"{{#if}}\"\n",
        )
        .unwrap();
        assert!(matches!(TemplateRenderer::new(file), Err(ExportError::Template(_))));
    }
}
