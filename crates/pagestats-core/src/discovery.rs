//! Locating audit JSON files under `data/<Module>/<app>/<page>/`.
//!
//! Desktop runs sit directly in the page directory; Mobile runs sit in a
//! nested `mobile/` directory.

use crate::{Platform, Result};
use glob::Pattern;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const MOBILE_DIR: &str = "mobile";

/// Audit files for one page, per platform, in lexicographic order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFiles {
    pub desktop: Vec<PathBuf>,
    pub mobile: Vec<PathBuf>,
}

impl PageFiles {
    pub fn get(&self, platform: Platform) -> &[PathBuf] {
        match platform {
            Platform::Desktop => &self.desktop,
            Platform::Mobile => &self.mobile,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.desktop.is_empty() && self.mobile.is_empty()
    }
}

/// Directory holding every page of an app for a module
pub fn app_dir(data_root: &Path, module: &str, app: &str) -> PathBuf {
    data_root.join(module).join(app)
}

/// Map each page directory to its audit files.
///
/// A missing app directory yields an empty map; callers decide whether that
/// is worth reporting.
pub fn discover_pages(
    data_root: &Path,
    module: &str,
    app: &str,
) -> Result<BTreeMap<String, PageFiles>> {
    let base = app_dir(data_root, module, app);
    if !base.is_dir() {
        tracing::debug!("No audit directory at {}", base.display());
        return Ok(BTreeMap::new());
    }

    let mut pages = BTreeMap::new();
    for page_dir in list_matching(&base, "*")?.into_iter().filter(|p| p.is_dir()) {
        let Some(name) = page_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };

        let files = PageFiles {
            desktop: list_json(&page_dir)?,
            mobile: list_json(&page_dir.join(MOBILE_DIR))?,
        };

        tracing::debug!(
            "Found page {}/{}/{}: {} desktop, {} mobile",
            module,
            app,
            name,
            files.desktop.len(),
            files.mobile.len()
        );
        pages.insert(name.to_string(), files);
    }

    Ok(pages)
}

/// JSON files directly inside `dir`, sorted; empty when `dir` does not exist
pub fn list_json(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(list_matching(dir, "*.json")?
        .into_iter()
        .filter(|p| p.is_file())
        .collect())
}

/// Entries of `dir` whose name matches `file_pattern`, sorted
pub(crate) fn list_matching(dir: &Path, file_pattern: &str) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&dir.to_string_lossy());
    let pattern = format!("{}/{}", escaped, file_pattern);

    let mut paths: Vec<PathBuf> = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) => Some(path),
            Err(err) => {
                tracing::debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .collect();
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let pages = discover_pages(dir.path(), "Lighthouse", "ufc-hub").unwrap();
        assert!(pages.is_empty());
    }

    #[test]
    fn test_discovers_desktop_and_mobile_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("Lighthouse").join("sigaa");
        touch(&base.join("login").join("run-2.json"));
        touch(&base.join("login").join("run-1.json"));
        touch(&base.join("login").join("notes.txt"));
        touch(&base.join("login").join("mobile").join("run-1.json"));
        touch(&base.join("home").join("run-1.json"));
        fs::write(base.join("stray.json"), "{}").unwrap();

        let pages = discover_pages(dir.path(), "Lighthouse", "sigaa").unwrap();

        assert_eq!(pages.keys().collect::<Vec<_>>(), vec!["home", "login"]);

        let login = &pages["login"];
        let names: Vec<_> = login
            .desktop
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["run-1.json", "run-2.json"]);
        assert_eq!(login.get(Platform::Mobile).len(), 1);

        assert!(pages["home"].mobile.is_empty());
        assert!(!pages["home"].is_empty());
    }

    #[test]
    fn test_directory_names_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("Lighthouse").join("app[1]");
        touch(&base.join("page").join("run.json"));

        let pages = discover_pages(dir.path(), "Lighthouse", "app[1]").unwrap();
        assert_eq!(pages["page"].desktop.len(), 1);
    }
}
