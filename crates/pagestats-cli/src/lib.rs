use clap::ValueEnum;

pub mod commands;

/// The chart families that can be generated from the per-page tables
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ChartView {
    /// Per page and platform, plus per-app comparisons for each module
    Pages,
    /// Quality summary per app across modules
    Apps,
    /// Quality summary per app and module
    Modules,
    /// Category scores compared across apps, one chart per platform
    Categories,
    /// Performance score per app and platform
    Performance,
}

impl ChartView {
    /// Order in which `charts` runs the views
    pub const ALL: [ChartView; 5] = [
        ChartView::Pages,
        ChartView::Apps,
        ChartView::Modules,
        ChartView::Categories,
        ChartView::Performance,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartView::Pages => "pages",
            ChartView::Apps => "apps",
            ChartView::Modules => "modules",
            ChartView::Categories => "categories",
            ChartView::Performance => "performance",
        }
    }

    /// Progress line printed by `charts`
    pub fn description(&self) -> &'static str {
        match self {
            ChartView::Pages => "Gráficos comparativos por página/app/módulo",
            ChartView::Apps => "Resumos gerais por app",
            ChartView::Modules => "Resumos por app e módulo",
            ChartView::Categories => "Comparativo por categoria (Desktop/Mobile)",
            ChartView::Performance => "Resumo geral de performance",
        }
    }
}
