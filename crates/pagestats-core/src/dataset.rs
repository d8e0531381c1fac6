//! Reading per-page tables back from `results/<app>/<module>/` and
//! regrouping them for charts.
//!
//! Group statistics are computed over each row's `mean`, so a group mean is
//! a mean of per-page means rather than a mean over the raw runs.

use crate::discovery::list_matching;
use crate::report::TableKind;
use crate::stats::StatSummary;
use crate::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A per-page statistics row tagged with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    pub app: String,
    pub module: String,
    pub page: String,
    pub platform: String,
    /// Metric label or category id
    pub name: String,
    pub stats: StatSummary,
    pub unit: String,
}

/// Column layout shared by the performance and scores tables
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Plataforma")]
    platform: String,
    #[serde(rename = "Métrica", alias = "Categoria")]
    name: String,
    #[serde(rename = "Média")]
    mean: f64,
    #[serde(rename = "Mediana")]
    median: f64,
    #[serde(rename = "Desvio Padrão")]
    stdev: f64,
    #[serde(rename = "Mínimo")]
    min: f64,
    #[serde(rename = "Máximo")]
    max: f64,
    #[serde(rename = "Unidade", default)]
    unit: String,
}

/// Restricts which records are read
///
/// Each criterion left as `None` accepts everything.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub apps: Option<Vec<String>>,
    pub modules: Option<Vec<String>>,
    /// Metric labels or category ids
    pub names: Option<Vec<String>>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_apps<S: Into<String>>(mut self, apps: impl IntoIterator<Item = S>) -> Self {
        self.apps = Some(apps.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_modules<S: Into<String>>(mut self, modules: impl IntoIterator<Item = S>) -> Self {
        self.modules = Some(modules.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn passes(allowed: &Option<Vec<String>>, value: &str) -> bool {
        allowed
            .as_ref()
            .is_none_or(|values| values.iter().any(|v| v == value))
    }

    pub fn accepts_app(&self, app: &str) -> bool {
        Self::passes(&self.apps, app)
    }

    pub fn accepts_module(&self, module: &str) -> bool {
        Self::passes(&self.modules, module)
    }

    pub fn accepts_name(&self, name: &str) -> bool {
        Self::passes(&self.names, name)
    }
}

/// Read every table of `kind` under `results_root`.
///
/// A missing results directory yields no records. Rows with missing columns
/// or unparsable numbers are skipped.
pub fn read_records(
    results_root: &Path,
    kind: TableKind,
    filter: &RecordFilter,
) -> Result<Vec<ResultRecord>> {
    let mut records = Vec::new();
    if !results_root.is_dir() {
        tracing::debug!("No results directory at {}", results_root.display());
        return Ok(records);
    }

    for app_dir in list_matching(results_root, "*")?.into_iter().filter(|p| p.is_dir()) {
        let Some(app) = dir_name(&app_dir) else { continue };
        if !filter.accepts_app(app) {
            continue;
        }

        for module_dir in list_matching(&app_dir, "*")?.into_iter().filter(|p| p.is_dir()) {
            let Some(module) = dir_name(&module_dir) else { continue };
            if !filter.accepts_module(module) {
                continue;
            }

            let pattern = format!("{}*.csv", kind.file_prefix());
            for csv_path in list_matching(&module_dir, &pattern)? {
                let Some(page) = csv_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(|s| s.strip_prefix(kind.file_prefix()))
                else {
                    continue;
                };

                let rows = read_table(&csv_path, filter, |row| ResultRecord {
                    app: app.to_string(),
                    module: module.to_string(),
                    page: page.to_string(),
                    platform: row.platform,
                    name: row.name,
                    stats: StatSummary {
                        mean: row.mean,
                        median: row.median,
                        stdev: row.stdev,
                        min: row.min,
                        max: row.max,
                    },
                    unit: row.unit,
                })?;
                records.extend(rows);
            }
        }
    }

    tracing::debug!(
        "Read {} {:?} records from {}",
        records.len(),
        kind,
        results_root.display()
    );
    Ok(records)
}

fn read_table<F>(path: &Path, filter: &RecordFilter, tag: F) -> Result<Vec<ResultRecord>>
where
    F: Fn(CsvRow) -> ResultRecord,
{
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for row in reader.deserialize::<CsvRow>() {
        match row {
            Ok(row) if filter.accepts_name(&row.name) => records.push(tag(row)),
            Ok(_) => {}
            Err(err) => tracing::trace!("Skipping row in {}: {}", path.display(), err),
        }
    }
    Ok(records)
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|n| n.to_str())
}

/// A tag dimension records can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    App,
    Module,
    Page,
    Platform,
    /// Metric label or category id
    Name,
}

impl GroupField {
    pub fn value<'a>(&self, record: &'a ResultRecord) -> &'a str {
        match self {
            GroupField::App => &record.app,
            GroupField::Module => &record.module,
            GroupField::Page => &record.page,
            GroupField::Platform => &record.platform,
            GroupField::Name => &record.name,
        }
    }
}

/// Mean and sample stdev of a group's per-page means
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupStat {
    pub mean: f64,
    pub stdev: f64,
    pub count: usize,
}

/// Groups keyed by the tag values of the requested fields, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedStats {
    groups: BTreeMap<Vec<String>, GroupStat>,
}

impl GroupedStats {
    /// Statistics for a key, or zeros when no record matched it
    pub fn get(&self, key: &[&str]) -> GroupStat {
        let key: Vec<String> = key.iter().map(|k| k.to_string()).collect();
        self.groups.get(&key).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[String], &GroupStat)> {
        self.groups.iter().map(|(k, v)| (k.as_slice(), v))
    }
}

/// Group records by `fields` and summarize each group's `mean` column
pub fn group_mean_stdev(records: &[ResultRecord], fields: &[GroupField]) -> GroupedStats {
    let mut values: BTreeMap<Vec<String>, Vec<f64>> = BTreeMap::new();
    for record in records {
        let key = fields.iter().map(|f| f.value(record).to_string()).collect();
        values.entry(key).or_default().push(record.stats.mean);
    }

    let groups = values
        .into_iter()
        .map(|(key, sample)| {
            let summary = StatSummary::from_values(&sample);
            let stat = GroupStat {
                mean: summary.mean,
                stdev: summary.stdev,
                count: sample.len(),
            };
            (key, stat)
        })
        .collect();

    GroupedStats { groups }
}

/// Distinct values of a field, sorted
pub fn distinct(records: &[ResultRecord], field: GroupField) -> Vec<String> {
    let mut values: Vec<String> = records.iter().map(|r| field.value(r).to_string()).collect();
    values.sort();
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn record(app: &str, platform: &str, name: &str, mean: f64) -> ResultRecord {
        ResultRecord {
            app: app.to_string(),
            module: "Lighthouse".to_string(),
            page: "home".to_string(),
            platform: platform.to_string(),
            name: name.to_string(),
            stats: StatSummary {
                mean,
                ..Default::default()
            },
            unit: "%".to_string(),
        }
    }

    #[test]
    fn test_group_by_category_and_platform() {
        let records = vec![
            record("ufc-hub", "Desktop", "performance", 80.0),
            record("sigaa", "Desktop", "performance", 60.0),
            record("ufc-hub", "Mobile", "performance", 50.0),
            record("ufc-hub", "Desktop", "seo", 90.0),
            record("sigaa", "Mobile", "seo", 70.0),
            record("ufc-hub", "Mobile", "seo", 100.0),
        ];

        let stats = group_mean_stdev(&records, &[GroupField::Name, GroupField::Platform]);

        assert_eq!(stats.len(), 4);
        let desktop_perf = stats.get(&["performance", "Desktop"]);
        assert_eq!(desktop_perf.mean, 70.0);
        assert_eq!(desktop_perf.count, 2);
        assert!((desktop_perf.stdev - 14.142135).abs() < 1e-5);

        let mobile_seo = stats.get(&["seo", "Mobile"]);
        assert_eq!(mobile_seo.mean, 85.0);

        assert_eq!(stats.get(&["seo", "Desktop"]).stdev, 0.0);
        assert_eq!(stats.get(&["pwa", "Desktop"]), GroupStat::default());

        for (key, stat) in stats.iter() {
            let members = records
                .iter()
                .filter(|r| r.name == key[0] && r.platform == key[1])
                .count();
            assert_eq!(members, stat.count);
        }
    }

    #[test]
    fn test_field_order_defines_key_order() {
        let records = vec![record("sigaa", "Mobile", "seo", 70.0)];
        let stats = group_mean_stdev(&records, &[GroupField::Platform, GroupField::App]);
        assert_eq!(stats.get(&["Mobile", "sigaa"]).mean, 70.0);
        assert_eq!(stats.get(&["sigaa", "Mobile"]).count, 0);
    }

    #[test]
    fn test_missing_results_directory() {
        let dir = tempfile::tempdir().unwrap();
        let records = read_records(
            &dir.path().join("absent"),
            TableKind::Scores,
            &RecordFilter::new(),
        )
        .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("sigaa").join("PageSpeed");
        fs::create_dir_all(&module_dir).unwrap();
        fs::write(
            module_dir.join("scores_login.csv"),
            "Plataforma,Categoria,Média,Mediana,Desvio Padrão,Mínimo,Máximo,Unidade\r\n\
             Desktop,performance,85.00,85.00,7.07,80.00,90.00,%\r\n\
             Desktop,seo,n/a,85.00,7.07,80.00,90.00,%\r\n\
             Mobile,seo,70.00\r\n\
             Mobile,performance,55.50,55.50,0.00,55.50,55.50,%\r\n",
        )
        .unwrap();
        fs::write(module_dir.join("notes.txt"), "ignored").unwrap();

        let records =
            read_records(dir.path(), TableKind::Scores, &RecordFilter::new()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].page, "login");
        assert_eq!(records[0].module, "PageSpeed");
        assert_eq!(records[1].stats.mean, 55.5);
    }

    #[test]
    fn test_filter_by_app_module_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let header = "Plataforma,Categoria,Média,Mediana,Desvio Padrão,Mínimo,Máximo,Unidade\n";
        for (app, module) in [("ufc-hub", "Lighthouse"), ("sigaa", "Lighthouse"), ("sigaa", "PageSpeed")] {
            let module_dir = dir.path().join(app).join(module);
            fs::create_dir_all(&module_dir).unwrap();
            fs::write(
                module_dir.join("scores_home.csv"),
                format!(
                    "{header}Desktop,performance,90.00,90.00,0.00,90.00,90.00,%\n\
                     Desktop,seo,80.00,80.00,0.00,80.00,80.00,%\n"
                ),
            )
            .unwrap();
        }

        let filter = RecordFilter::new()
            .with_apps(["sigaa"])
            .with_modules(["Lighthouse"])
            .with_names(["performance"]);
        let records = read_records(dir.path(), TableKind::Scores, &filter).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].app, "sigaa");

        let all = read_records(dir.path(), TableKind::Scores, &RecordFilter::new()).unwrap();
        assert_eq!(all.len(), 6);
        assert_eq!(distinct(&all, GroupField::App), vec!["sigaa", "ufc-hub"]);
        assert_eq!(
            distinct(&all, GroupField::Module),
            vec!["Lighthouse", "PageSpeed"]
        );
    }
}
