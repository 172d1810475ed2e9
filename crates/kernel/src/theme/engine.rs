//! Tera template engine with site filters.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tera::{Tera, Value};
use tracing::debug;

use crate::file::storage::public_path;

/// Template engine for page rendering.
pub struct ThemeEngine {
    tera: Tera,
}

impl ThemeEngine {
    /// Load every `*.html` under `template_dir`.
    ///
    /// `uploads_url` is the public prefix used by the `file_url` filter.
    pub fn new(template_dir: &Path, uploads_url: &str) -> Result<Self> {
        let pattern = template_dir.join("**/*.html");
        let pattern_str = pattern
            .to_str()
            .context("invalid template directory path")?;

        let mut tera = Tera::new(pattern_str).context("failed to initialize Tera templates")?;
        Self::register_filters(&mut tera, uploads_url);

        let template_names: Vec<_> = tera.get_template_names().collect();
        debug!(count = template_names.len(), "loaded templates");

        Ok(Self { tera })
    }

    /// Engine with no templates.
    #[cfg(test)]
    fn empty(uploads_url: &str) -> Self {
        let mut tera = Tera::default();
        Self::register_filters(&mut tera, uploads_url);
        Self { tera }
    }

    fn register_filters(tera: &mut Tera, uploads_url: &str) {
        // Unix timestamp -> "March 3, 2025"
        tera.register_filter(
            "format_date",
            |value: &Value, _args: &HashMap<String, Value>| {
                let timestamp = match value {
                    Value::Number(n) => n.as_i64().unwrap_or(0),
                    _ => return Ok(Value::String(String::new())),
                };

                let formatted = chrono::DateTime::from_timestamp(timestamp, 0)
                    .map(|dt| dt.format("%B %-d, %Y").to_string())
                    .unwrap_or_else(|| "Unknown date".to_string());

                Ok(Value::String(formatted))
            },
        );

        tera.register_filter("money", |value: &Value, _args: &HashMap<String, Value>| {
            let amount = tera::try_get_value!("money", "value", f64, value);
            Ok(Value::String(format!("${amount:.2}")))
        });

        let base = uploads_url.trim_end_matches('/').to_string();
        tera.register_filter(
            "file_url",
            move |value: &Value, _args: &HashMap<String, Value>| {
                let uri = tera::try_get_value!("file_url", "value", String, value);
                Ok(Value::String(public_path(&base, &uri)))
            },
        );
    }

    #[cfg(test)]
    fn tera_mut(&mut self) -> &mut Tera {
        &mut self.tera
    }

    pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
        self.tera.render(template, context)
    }
}
