//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::help::command_name;
use crate::cli::output::OutputFormat;
use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_apply_text, format_generate_text, format_inspect_text, format_projection_text,
    format_route_text, format_views_text, to_json, ApplyReport, GenerateReport, InspectReport,
    RouteReport, ViewsReport,
};
use crate::config::{ConfigLoader, VitrineConfig};
use crate::error::ApiError;
use crate::generation::{GenerationJob, MergeTarget};
use crate::projection::{MemoryEnvironment, Projector};
use crate::provider::{build_generator, ContentGenerator, ContentKind, GenerationRequest, StaticGenerator};
use crate::router::{resolve, FragmentRouter};
use crate::runtime::{App, Command};
use crate::store::{CollectionName, EntityId, Operation};
use crate::tree::{hasher, FileSnapshot};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: workspace, loaded configuration and output format.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: VitrineConfig,
    snapshot_path: PathBuf,
    format: OutputFormat,
}

impl RunContext {
    /// Create run context from workspace root, optional config path and optional snapshot
    /// override.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        snapshot_path: Option<PathBuf>,
        format: &str,
    ) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        Self::with_config(workspace_root, config, snapshot_path, format)
    }

    /// Create run context from an already loaded configuration.
    pub fn with_config(
        workspace_root: PathBuf,
        config: VitrineConfig,
        snapshot_path: Option<PathBuf>,
        format: &str,
    ) -> Result<Self, ApiError> {
        let config = config.validated()?;
        let snapshot_path =
            snapshot_path.unwrap_or_else(|| config.snapshot.resolve(&workspace_root));
        Ok(Self {
            workspace_root,
            config,
            snapshot_path,
            format: OutputFormat::parse(format)?,
        })
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn config(&self) -> &VitrineConfig {
        &self.config
    }

    /// Execute a command, returning its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute_async(command))
    }

    /// Execute a command on the caller's runtime.
    pub async fn execute_async(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let mut app = self.boot().await?;

        let output = match command {
            Commands::Inspect { all } => self.handle_inspect(&app, *all),
            Commands::Views => self.handle_views(&app),
            Commands::Route { fragment } => self.handle_route(&app, fragment),
            Commands::Project => self.handle_project(&app),
            Commands::Apply { ops, output } => {
                self.handle_apply(&mut app, ops, output.as_deref()).await
            }
            Commands::Generate {
                prompt,
                kind,
                provider,
                collection,
                id,
                field,
            } => {
                let target = self.merge_target(collection.as_deref(), id.as_deref(), field.as_deref())?;
                self.handle_generate(&mut app, prompt, kind, provider.as_deref(), target)
                    .await
            }
        }?;

        info!(
            command = command_name(command),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        Ok(output)
    }

    async fn boot(&self) -> Result<App, ApiError> {
        let source = FileSnapshot::new(&self.snapshot_path);
        App::boot(
            &source,
            self.config.views.clone(),
            FragmentRouter::new(self.config.router.clone()),
        )
        .await
        .into_app()
    }

    fn render<T: serde::Serialize>(
        &self,
        report: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<String, ApiError> {
        match self.format {
            OutputFormat::Json => to_json(report),
            OutputFormat::Text => Ok(text(report)),
        }
    }

    fn handle_inspect(&self, app: &App, all: bool) -> Result<String, ApiError> {
        let report = InspectReport::from_published(&app.store().current(), all);
        self.render(&report, format_inspect_text)
    }

    fn handle_views(&self, app: &App) -> Result<String, ApiError> {
        let tree = app.tree();
        let views = app.views();
        let report = ViewsReport {
            revenue: views.revenue(&tree).as_ref().clone(),
            kpis: views.kpis(&tree).as_ref().clone(),
            top_products: views.top_products(&tree).as_ref().clone(),
            leaderboard: views.leaderboard(&tree).as_ref().clone(),
            active_banners: views.active_banners(&tree).as_ref().clone(),
        };
        self.render(&report, format_views_text)
    }

    fn handle_route(&self, app: &App, fragment: &str) -> Result<String, ApiError> {
        let router = app.router();
        let route = router.parse(fragment);
        let view = resolve(route, &app.tree());
        let report = RouteReport::new(fragment, route, router.fragment_for(&route), view);
        self.render(&report, format_route_text)
    }

    fn handle_project(&self, app: &App) -> Result<String, ApiError> {
        let mut projector = Projector::new(MemoryEnvironment::new());
        projector.observe(&app.tree());
        let environment = projector.into_environment();
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "style_variables": environment.style_variables,
                "base_font": environment.base_font,
                "favicon": environment.favicon,
                "injected_markup": environment.injected_markup,
            }))?),
            OutputFormat::Text => Ok(format_projection_text(&environment)),
        }
    }

    async fn handle_apply(
        &self,
        app: &mut App,
        ops_path: &Path,
        output: Option<&Path>,
    ) -> Result<String, ApiError> {
        let raw = tokio::fs::read_to_string(ops_path).await?;
        let operations: Vec<Operation> = serde_json::from_str(&raw)?;
        let count = operations.len();

        let handle = app.handle();
        for operation in operations {
            handle.apply(operation)?;
        }
        app.drain();

        let published = app.store().current();
        let written_to = match output {
            Some(path) => {
                let document = serde_json::to_string_pretty(&published.tree.to_value())?;
                tokio::fs::write(path, document).await?;
                Some(path.to_path_buf())
            }
            None => None,
        };

        let report = ApplyReport {
            operations: count,
            version: published.version,
            fingerprint: hasher::fingerprint(&published.tree),
            notices: app.take_notices(),
            written_to,
        };
        self.render(&report, format_apply_text)
    }

    fn merge_target(
        &self,
        collection: Option<&str>,
        id: Option<&str>,
        field: Option<&str>,
    ) -> Result<MergeTarget, ApiError> {
        let collection: CollectionName = match collection {
            Some(name) => name.parse()?,
            None => self.config.generation.target_collection,
        };
        Ok(match (id, field) {
            (Some(id), Some(field)) => MergeTarget::Field {
                collection,
                id: parse_entity_id(id),
                field: field.to_string(),
            },
            _ => MergeTarget::NewEntity { collection },
        })
    }

    fn generator(&self, provider: Option<&str>) -> Result<Arc<dyn ContentGenerator>, ApiError> {
        let name = provider.or(self.config.generation.provider.as_deref());
        match name {
            None => Ok(Arc::new(StaticGenerator::default())),
            Some(name) => {
                let config = self.config.providers.get(name).ok_or_else(|| {
                    ApiError::ProviderNotConfigured(format!("Unknown provider '{}'", name))
                })?;
                build_generator(name, config)
            }
        }
    }

    async fn handle_generate(
        &self,
        app: &mut App,
        prompt: &str,
        kind: &str,
        provider: Option<&str>,
        target: MergeTarget,
    ) -> Result<String, ApiError> {
        let kind: ContentKind = kind.parse()?;
        let generator = self.generator(provider)?;
        let request = GenerationRequest {
            kind,
            prompt: prompt.to_string(),
            max_tokens: self.config.generation.max_tokens,
        };
        let target_label = match &target {
            MergeTarget::Field {
                collection,
                id,
                field,
            } => format!("{}/{}.{}", collection, id, field),
            MergeTarget::NewEntity { collection } => collection.to_string(),
        };

        let job = GenerationJob::new(request, target);
        let command = job.run(generator.as_ref()).await;
        let operation = match &command {
            Command::Apply(operation) => operation.clone(),
            Command::Failed { error, .. } => return Err(ApiError::ProviderError(error.clone())),
            Command::Shutdown => return Err(ApiError::NotReady("shutdown requested".to_string())),
        };
        app.handle().submit(command)?;
        app.drain();
        if let Some(notice) = app.notices().last() {
            return Err(ApiError::ProviderError(notice.message.clone()));
        }

        let report = GenerateReport {
            target: target_label,
            provider: generator.provider_name().to_string(),
            operation,
            version: app.store().version(),
        };
        self.render(&report, format_generate_text)
    }
}

/// Numeric strings are legacy ids, everything else an opaque key.
fn parse_entity_id(raw: &str) -> EntityId {
    raw.parse::<u64>()
        .map(EntityId::Numeric)
        .unwrap_or_else(|_| EntityId::from(raw))
}
