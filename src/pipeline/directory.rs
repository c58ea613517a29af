//! Scan and update orchestration over files and directory trees
//!
//! Every template file is an independent unit of work running on its own
//! task. Completions are funneled through a channel; the run drains all of
//! them and reports the first error observed. Files written before or while
//! another file fails keep their changes.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::parser::bicep::BicepParser;
use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{TemplateDirectory, TemplateFile};
use crate::pipeline::error::PipelineError;
use crate::pipeline::resolve::resolve_references;
use crate::pipeline::rewrite::{WriteMode, rewrite_file};
use crate::version::cache::CachedCatalog;
use crate::version::catalog::Catalog;
use crate::version::catalogs::LearnCatalog;
use crate::version::selector::SelectionPolicy;

/// What to do with a file once its references are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Resolve only
    Scan,
    /// Resolve, then rewrite the file
    Update(WriteMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub action: Action,
    pub policy: SelectionPolicy,
    /// During a scan, report references whose lookup failed as unresolved
    /// instead of failing the file. Updates always fail the file.
    pub keep_going: bool,
    /// Skip files that have not started once any file failed
    pub fail_fast: bool,
    pub max_concurrent_files: usize,
    pub max_concurrent_fetches: usize,
}

impl PipelineOptions {
    pub fn new(action: Action, policy: SelectionPolicy) -> Self {
        Self {
            action,
            policy,
            keep_going: false,
            fail_fast: false,
            max_concurrent_files: crate::config::DEFAULT_MAX_CONCURRENT_FILES,
            max_concurrent_fetches: crate::config::DEFAULT_MAX_CONCURRENT_FETCHES,
        }
    }

    /// Take concurrency settings from the configuration
    pub fn with_config(mut self, config: &Config) -> Self {
        self.fail_fast = config.concurrency.fail_fast;
        self.max_concurrent_files = config.concurrency.max_files;
        self.max_concurrent_fetches = config.concurrency.max_fetches;
        self
    }
}

/// Result of running the pipeline on a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    File(TemplateFile),
    Directory(TemplateDirectory),
}

/// Extract -> resolve -> select -> rewrite, for one file or a whole tree
///
/// Returned files describe the state before rewriting: pinned versions are
/// the ones read from disk and `selected_version` is what was written.
#[derive(Clone)]
pub struct Pipeline {
    parser: Arc<BicepParser>,
    catalog: Arc<dyn Catalog>,
    options: PipelineOptions,
    file_permits: Arc<Semaphore>,
    fetch_permits: Arc<Semaphore>,
}

impl Pipeline {
    pub fn new(catalog: Arc<dyn Catalog>, options: PipelineOptions) -> Self {
        Self {
            parser: Arc::new(BicepParser::new()),
            file_permits: Arc::new(Semaphore::new(options.max_concurrent_files.max(1))),
            fetch_permits: Arc::new(Semaphore::new(options.max_concurrent_fetches.max(1))),
            catalog,
            options,
        }
    }

    /// Build a pipeline backed by the Azure templates reference
    pub fn from_config(config: &Config, options: PipelineOptions) -> Self {
        let learn: Arc<dyn Catalog> = Arc::new(LearnCatalog::with_timeout(
            &config.catalog.base_url,
            Duration::from_millis(config.catalog.timeout_ms),
        ));

        let catalog: Arc<dyn Catalog> = if config.catalog.cache {
            Arc::new(CachedCatalog::new(learn))
        } else {
            learn
        };

        Self::new(catalog, options.with_config(config))
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Process a single file or every template file under a directory
    pub async fn run(&self, path: &Path) -> Result<Outcome, PipelineError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ParseError::from_io(path, e))?;

        if metadata.is_dir() {
            self.process_directory(path).await.map(Outcome::Directory)
        } else {
            self.process_file(path).await.map(Outcome::File)
        }
    }

    /// Process one template file
    pub async fn process_file(&self, path: &Path) -> Result<TemplateFile, PipelineError> {
        let mut file = self.parser.parse_file(path).await?;

        let failures = resolve_references(
            self.catalog.as_ref(),
            &self.fetch_permits,
            &mut file.references,
            self.options.policy,
        )
        .await;

        if let Some(first) = failures.into_iter().next() {
            if self.options.action == Action::Scan && self.options.keep_going {
                warn!("Some references in {:?} could not be resolved", path);
            } else {
                return Err(first);
            }
        }

        if let Action::Update(mode) = self.options.action {
            let mut written = file.clone();
            let target = rewrite_file(&self.parser, &mut written, mode).await?;
            info!(
                "Wrote {:?} ({} references updated)",
                target,
                file.outdated().count()
            );
        }

        Ok(file)
    }

    /// Process every template file under `root`, one task per file
    ///
    /// All tasks run to completion (unless `fail_fast` skips those not yet
    /// started) and the first error observed is returned. Successful files
    /// are returned in walk order.
    pub async fn process_directory(&self, root: &Path) -> Result<TemplateDirectory, PipelineError> {
        let paths = self.discover(root)?;
        info!("Processing {} template files under {:?}", paths.len(), root);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let failed = Arc::new(AtomicBool::new(false));

        let handles: Vec<_> = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| {
                let pipeline = self.clone();
                let tx = tx.clone();
                let failed = failed.clone();

                tokio::spawn(async move {
                    let _permit = pipeline.file_permits.clone().acquire_owned().await.ok();

                    if pipeline.options.fail_fast && failed.load(Ordering::SeqCst) {
                        debug!("Skipping {:?}: an earlier file failed", path);
                        return;
                    }

                    let result = pipeline.process_file(&path).await;
                    if let Err(e) = &result {
                        error!("Failed to process {:?}: {}", path, e);
                        failed.store(true, Ordering::SeqCst);
                    }

                    let _ = tx.send((index, result));
                })
            })
            .collect();

        // Only the workers hold senders now, so the channel closes when they finish
        drop(tx);

        let mut first_error = None;
        let mut files = Vec::new();

        while let Some((index, result)) = rx.recv().await {
            match result {
                Ok(file) => files.push((index, file)),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        for joined in join_all(handles).await {
            if let Err(e) = joined {
                first_error.get_or_insert(PipelineError::Task(e));
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        files.sort_by_key(|(index, _)| *index);

        Ok(TemplateDirectory {
            root: root.to_path_buf(),
            files: files.into_iter().map(|(_, file)| file).collect(),
        })
    }

    /// Template files under `root`, sorted by name within each directory
    fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, PipelineError> {
        let mut paths = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && self.parser.can_parse(entry.path()) {
                paths.push(entry.into_path());
            }
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::types::ReferenceStatus;
    use crate::version::catalog::MockCatalog;
    use crate::version::error::CatalogError;
    use crate::version::types::VersionSet;
    use tempfile::TempDir;

    fn version_set(values: &[&str]) -> VersionSet {
        VersionSet::from_unsorted(values.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    fn web_catalog() -> MockCatalog {
        let mut catalog = MockCatalog::new();
        catalog
            .expect_fetch_versions()
            .withf(|_, type_name| type_name == "sites")
            .returning(|_, _| Ok(version_set(&["2022-03-01", "2021-02-01", "2019-08-01"])));
        catalog
            .expect_fetch_versions()
            .withf(|_, type_name| type_name != "sites")
            .returning(|_, type_name| Err(CatalogError::NoVersionsFound(type_name.to_string())));
        catalog
    }

    fn options(action: Action) -> PipelineOptions {
        PipelineOptions::new(action, SelectionPolicy::default())
    }

    #[test]
    fn with_config_copies_concurrency_settings() {
        let mut config = Config::default();
        config.concurrency.max_files = 3;
        config.concurrency.max_fetches = 2;
        config.concurrency.fail_fast = true;

        let options = options(Action::Scan).with_config(&config);

        assert_eq!(options.max_concurrent_files, 3);
        assert_eq!(options.max_concurrent_fetches, 2);
        assert!(options.fail_fast);
    }

    #[tokio::test]
    async fn discover_skips_directories_and_other_extensions() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("modules/nested.bicep")).unwrap();
        std::fs::write(dir.path().join("main.bicep"), "").unwrap();
        std::fs::write(dir.path().join("main.parameters.json"), "{}").unwrap();
        std::fs::write(dir.path().join("modules/compute.bicep"), "").unwrap();

        let pipeline = Pipeline::new(Arc::new(MockCatalog::new()), options(Action::Scan));
        let paths = pipeline.discover(dir.path()).unwrap();

        assert_eq!(
            paths,
            vec![
                dir.path().join("main.bicep"),
                dir.path().join("modules/compute.bicep"),
            ]
        );
    }

    #[tokio::test]
    async fn process_file_scan_fails_on_unresolved_reference() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.bicep");
        std::fs::write(
            &path,
            "resource a 'Microsoft.Web/sites@2019-08-01' = {}\nresource b 'Microsoft.Web/unknown@2020-01-01' = {}\n",
        )
        .unwrap();

        let pipeline = Pipeline::new(Arc::new(web_catalog()), options(Action::Scan));
        let result = pipeline.process_file(&path).await;

        assert!(matches!(result, Err(PipelineError::Catalog { .. })));
    }

    #[tokio::test]
    async fn process_file_scan_keep_going_reports_unresolved_reference() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.bicep");
        std::fs::write(
            &path,
            "resource a 'Microsoft.Web/sites@2019-08-01' = {}\nresource b 'Microsoft.Web/unknown@2020-01-01' = {}\n",
        )
        .unwrap();

        let mut options = options(Action::Scan);
        options.keep_going = true;
        let pipeline = Pipeline::new(Arc::new(web_catalog()), options);
        let file = pipeline.process_file(&path).await.unwrap();

        let statuses: Vec<_> = file.references.iter().map(|r| r.status()).collect();
        assert_eq!(
            statuses,
            vec![ReferenceStatus::Outdated, ReferenceStatus::Unresolved]
        );
    }

    #[tokio::test]
    async fn process_file_update_ignores_keep_going() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.bicep");
        let content = "resource a 'Microsoft.Web/sites@2019-08-01' = {}\nresource b 'Microsoft.Web/unknown@2020-01-01' = {}\n";
        std::fs::write(&path, content).unwrap();

        let mut options = options(Action::Update(WriteMode::InPlace));
        options.keep_going = true;
        let pipeline = Pipeline::new(Arc::new(web_catalog()), options);
        let result = pipeline.process_file(&path).await;

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[tokio::test]
    async fn process_file_update_returns_state_before_rewrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.bicep");
        std::fs::write(&path, "resource a 'Microsoft.Web/sites@2019-08-01' = {}\n").unwrap();

        let pipeline = Pipeline::new(
            Arc::new(web_catalog()),
            options(Action::Update(WriteMode::InPlace)),
        );
        let file = pipeline.process_file(&path).await.unwrap();

        assert_eq!(file.references[0].current_version, "2019-08-01");
        assert_eq!(file.references[0].selected_version.as_deref(), Some("2022-03-01"));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "resource a 'Microsoft.Web/sites@2022-03-01' = {}\n"
        );
    }

    #[tokio::test]
    async fn run_rejects_missing_path() {
        let dir = TempDir::new().unwrap();
        let pipeline = Pipeline::new(Arc::new(MockCatalog::new()), options(Action::Scan));

        let result = pipeline.run(&dir.path().join("missing")).await;

        assert!(matches!(
            result,
            Err(PipelineError::InvalidPath(ParseError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn run_rejects_file_with_wrong_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("azure.deploy.parameters.json");
        std::fs::write(&path, "{}").unwrap();
        let pipeline = Pipeline::new(Arc::new(MockCatalog::new()), options(Action::Scan));

        let result = pipeline.run(&path).await;

        assert!(matches!(
            result,
            Err(PipelineError::InvalidPath(ParseError::InvalidExtension(_)))
        ));
    }

    #[tokio::test]
    async fn fail_fast_skips_files_not_yet_started() {
        let dir = TempDir::new().unwrap();
        // Sorted walk order: the failing file comes first
        std::fs::write(
            dir.path().join("a.bicep"),
            "resource a 'Microsoft.Web/unknown@2020-01-01' = {}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.bicep"),
            "resource b 'Microsoft.Web/sites@2019-08-01' = {}\n",
        )
        .unwrap();

        let mut options = options(Action::Update(WriteMode::SideBySide));
        options.fail_fast = true;
        options.max_concurrent_files = 1;
        let pipeline = Pipeline::new(Arc::new(web_catalog()), options);

        let result = pipeline.process_directory(dir.path()).await;

        assert!(matches!(result, Err(PipelineError::Catalog { .. })));
        assert!(!dir.path().join("a_updated.bicep").exists());
        assert!(!dir.path().join("b_updated.bicep").exists());
    }
}
