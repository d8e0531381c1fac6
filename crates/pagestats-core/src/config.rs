use crate::audit::Category;
use crate::chart::SeriesColor;
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Device profile an audit was collected with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    Desktop,
    Mobile,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::Desktop, Platform::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Desktop => "Desktop",
            Platform::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An audited web application
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppProfile {
    /// Directory name under `data/<Module>/`
    pub id: String,
    /// Display name used in chart labels and consolidated headers
    pub label: String,
    /// Bar color (`#rrggbb`) when apps are compared side by side
    pub color: String,
}

/// An audit source (Lighthouse CLI, PageSpeed Insights)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleProfile {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlatformColors {
    pub desktop: String,
    pub mobile: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CategoryLabels {
    pub performance: String,
    pub accessibility: String,
    pub best_practices: String,
    pub seo: String,
}

impl CategoryLabels {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Performance => &self.performance,
            Category::Accessibility => &self.accessibility,
            Category::BestPractices => &self.best_practices,
            Category::Seo => &self.seo,
        }
    }
}

/// Immutable pipeline configuration
///
/// Every component that needs the app list, module list, directory layout or
/// presentation labels receives a `&Config`; nothing reads process-wide state.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_root: PathBuf,
    pub results_root: PathBuf,
    pub figs_root: PathBuf,
    pub apps: Vec<AppProfile>,
    pub modules: Vec<ModuleProfile>,
    pub platform_colors: PlatformColors,
    pub category_labels: CategoryLabels,
}

impl Default for Config {
    fn default() -> Self {
        let app = |id: &str, label: &str, color: &str| AppProfile {
            id: id.to_string(),
            label: label.to_string(),
            color: color.to_string(),
        };
        let module = |id: &str, label: &str| ModuleProfile {
            id: id.to_string(),
            label: label.to_string(),
        };

        Self {
            data_root: PathBuf::from("data"),
            results_root: PathBuf::from("results"),
            figs_root: PathBuf::from("figs"),
            apps: vec![
                app("ufc-hub", "UFC Hub", "#2b7fff"),
                app("sigaa", "SIGAA", "#ffd503"),
                app("ufc-noticias", "UFC Notícias", "#f83c5b"),
            ],
            modules: vec![
                module("Lighthouse", "Lighthouse"),
                module("PageSpeed", "PageSpeed Insights"),
            ],
            platform_colors: PlatformColors {
                desktop: "#2b7fff".to_string(),
                mobile: "#EA4335".to_string(),
            },
            category_labels: CategoryLabels {
                performance: "Performance".to_string(),
                accessibility: "Acessibilidade".to_string(),
                best_practices: "Boas Práticas".to_string(),
                seo: "SEO".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from an optional JSON file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Read a JSON configuration file; absent fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading configuration from: {}", path.display());

        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Override directory roots, typically from CLI flags
    pub fn with_roots(
        mut self,
        data_root: Option<PathBuf>,
        results_root: Option<PathBuf>,
        figs_root: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = data_root {
            self.data_root = path;
        }
        if let Some(path) = results_root {
            self.results_root = path;
        }
        if let Some(path) = figs_root {
            self.figs_root = path;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.apps.is_empty() {
            return Err(Error::Config("at least one app is required".to_string()));
        }
        if self.modules.is_empty() {
            return Err(Error::Config("at least one module is required".to_string()));
        }

        let mut seen = HashSet::new();
        for app in &self.apps {
            if !seen.insert(app.id.as_str()) {
                return Err(Error::Config(format!("duplicate app id '{}'", app.id)));
            }
            check_color(&app.color)?;
        }

        let mut seen = HashSet::new();
        for module in &self.modules {
            if !seen.insert(module.id.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate module id '{}'",
                    module.id
                )));
            }
        }

        check_color(&self.platform_colors.desktop)?;
        check_color(&self.platform_colors.mobile)?;
        Ok(())
    }

    pub fn app_ids(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(|a| a.id.as_str())
    }

    pub fn module_ids(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.id.as_str())
    }

    /// Display label for an app id, or the id itself when unknown
    pub fn app_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.apps
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.label.as_str())
            .unwrap_or(id)
    }

    pub fn module_label<'a>(&'a self, id: &'a str) -> &'a str {
        self.modules
            .iter()
            .find(|m| m.id == id)
            .map(|m| m.label.as_str())
            .unwrap_or(id)
    }

    pub fn app_color(&self, id: &str) -> SeriesColor {
        self.apps
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| SeriesColor::from_hex(&a.color))
            .unwrap_or_default()
    }

    pub fn platform_color(&self, platform: Platform) -> SeriesColor {
        let hex = match platform {
            Platform::Desktop => &self.platform_colors.desktop,
            Platform::Mobile => &self.platform_colors.mobile,
        };
        SeriesColor::from_hex(hex).unwrap_or_default()
    }

    pub fn category_label(&self, category: Category) -> &str {
        self.category_labels.get(category)
    }
}

fn check_color(hex: &str) -> Result<()> {
    if SeriesColor::from_hex(hex).is_none() {
        return Err(Error::Config(format!("invalid color '{}'", hex)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.app_ids().collect::<Vec<_>>(),
            vec!["ufc-hub", "sigaa", "ufc-noticias"]
        );
        assert_eq!(
            config.module_ids().collect::<Vec<_>>(),
            vec!["Lighthouse", "PageSpeed"]
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{"results_root": "out/results"}"#).unwrap();
        assert_eq!(config.results_root, PathBuf::from("out/results"));
        assert_eq!(config.data_root, PathBuf::from("data"));
        assert_eq!(config.apps.len(), 3);
    }

    #[test]
    fn test_rejects_duplicate_apps() {
        let json = r##"{"apps": [
            {"id": "a", "label": "A", "color": "#000000"},
            {"id": "a", "label": "B", "color": "#ffffff"}
        ]}"##;
        assert!(matches!(Config::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_bad_color() {
        let json = r##"{"platform_colors": {"desktop": "blue", "mobile": "#EA4335"}}"##;
        assert!(matches!(Config::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn test_labels_fall_back_to_id() {
        let config = Config::default();
        assert_eq!(config.app_label("ufc-noticias"), "UFC Notícias");
        assert_eq!(config.app_label("other"), "other");
        assert_eq!(config.module_label("PageSpeed"), "PageSpeed Insights");
        assert_eq!(config.category_label(Category::BestPractices), "Boas Práticas");
    }

    #[test]
    fn test_with_roots_overrides_only_given_paths() {
        let config = Config::default().with_roots(None, Some(PathBuf::from("/tmp/r")), None);
        assert_eq!(config.data_root, PathBuf::from("data"));
        assert_eq!(config.results_root, PathBuf::from("/tmp/r"));
        assert_eq!(config.figs_root, PathBuf::from("figs"));
    }
}
