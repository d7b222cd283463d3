//! Chart selection and loading shared by the commands.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::chart::discovery::compile_ignore_patterns;
use crate::chart::{ChartInfo, ChartInfoCache, ChartLoader, FsChartLoader, find_chart_directories, seed_cache};
use crate::config::HelmdocConfig;
use crate::core::user_friendly_error;
use crate::dependency::{CyclePolicy, DependencyResolver, Resolution};
use crate::utils::normalize_path;

/// Which charts a command operates on.
#[derive(Args, Debug, Clone)]
pub struct ChartArgs {
    /// Directory searched recursively for charts
    #[arg(default_value = ".")]
    pub chart_search_root: PathBuf,

    /// Only process the chart in this directory
    #[arg(long, value_name = "DIR")]
    pub chart: Option<PathBuf>,

    /// Values file read from each chart directory [default: values.yaml]
    #[arg(long, value_name = "FILE")]
    pub values_file: Option<String>,

    /// Glob pattern of directories to skip during discovery (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub ignore: Vec<String>,
}

/// Everything a command needs after configuration and discovery.
pub struct Workspace {
    pub config: HelmdocConfig,
    pub loader: FsChartLoader,
    pub cache: ChartInfoCache,
    /// Charts to report on, in path order.
    pub charts: Vec<PathBuf>,
}

impl Workspace {
    /// Load configuration, discover charts and seed the cache.
    ///
    /// With `--chart`, that directory must hold a parseable chart and is the
    /// only one reported on; discovery still runs so its `file://` and
    /// vendored dependencies resolve against the rest of the search root.
    pub async fn load(
        args: &ChartArgs,
        config_path: Option<&Path>,
        on_cycle: Option<CyclePolicy>,
    ) -> Result<Self> {
        let root = &args.chart_search_root;
        if !root.is_dir() {
            return Err(anyhow::anyhow!(
                "Chart search root {} is not a directory",
                root.display()
            ));
        }

        let (mut config, source) = HelmdocConfig::load(config_path, root).await?;
        if let Some(source) = &source {
            tracing::debug!("Using configuration {}", source.display());
        }
        config.apply_overrides(args.values_file.clone(), &args.ignore, on_cycle);

        let ignore = compile_ignore_patterns(&config.ignore)?;
        let loader = FsChartLoader::new(config.parsing_config());

        let directories = find_chart_directories(root, &ignore)?;
        tracing::debug!("Found {} chart directories under {}", directories.len(), root.display());
        let mut cache = seed_cache(&directories, &loader);

        let charts = match &args.chart {
            Some(chart) => {
                let chart = normalize_path(chart);
                if !cache.contains(&chart) {
                    let info = loader
                        .load(&chart)
                        .with_context(|| format!("Failed to load chart {}", chart.display()))?;
                    cache.insert(&chart, info);
                }
                vec![chart]
            }
            None => directories.into_iter().filter(|dir| cache.contains(dir)).collect(),
        };

        Ok(Self {
            config,
            loader,
            cache,
            charts,
        })
    }

    /// Resolve the dependencies of one selected chart.
    ///
    /// Returns the root chart's info alongside its resolution; keep the
    /// resolution alive while its chart directories are read.
    pub fn resolve(&mut self, chart_directory: &Path) -> Result<(ChartInfo, Resolution)> {
        let root = self
            .cache
            .get(chart_directory)
            .cloned()
            .with_context(|| format!("Chart {} is not loaded", chart_directory.display()))?;

        let resolution = DependencyResolver::new(&mut self.cache, &self.loader)
            .with_cycle_policy(self.config.cycle_policy())
            .resolve(&root)
            .with_context(|| format!("Failed to resolve dependencies of {}", root.directory().display()))?;

        Ok((root, resolution))
    }

    /// Resolve every selected chart and turn each resolution into a report.
    ///
    /// A chart whose resolution (or report) fails is reported on stderr and
    /// left out; the remaining charts are still processed.
    pub fn resolve_each<T>(
        &mut self,
        mut report: impl FnMut(ChartInfo, Resolution) -> Result<T>,
    ) -> ResolvedCharts<T> {
        let charts = self.charts.clone();
        let mut reports = Vec::with_capacity(charts.len());
        let mut failed = 0;

        for chart in &charts {
            match self.resolve(chart).and_then(|(root, resolution)| report(root, resolution)) {
                Ok(r) => reports.push(r),
                Err(e) => {
                    failed += 1;
                    tracing::warn!("Leaving out chart {}", chart.display());
                    user_friendly_error(e).display();
                }
            }
        }

        ResolvedCharts {
            reports,
            failed,
            total: charts.len(),
        }
    }
}

/// Reports of the charts that resolved, plus a count of those that did not.
#[derive(Debug)]
pub struct ResolvedCharts<T> {
    pub reports: Vec<T>,
    pub failed: usize,
    pub total: usize,
}

impl<T> ResolvedCharts<T> {
    /// Fails when any chart was left out, after its output has been printed.
    pub fn finish(&self) -> Result<()> {
        if self.failed > 0 {
            return Err(anyhow::anyhow!(
                "Failed to resolve {} of {} charts",
                self.failed,
                self.total
            ));
        }
        Ok(())
    }
}
