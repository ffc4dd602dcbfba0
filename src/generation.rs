//! Generation jobs
//!
//! Binds a generation request to the place its result lands in the tree. A job runs
//! off the main loop; its completion is sent back as a [`Command`] and merged
//! against whatever tree is current at that moment. A job started from a view that
//! has since been torn down drops its result.

use crate::error::ApiError;
use crate::provider::{ContentGenerator, GeneratedContent, GenerationRequest};
use crate::runtime::{AppHandle, Command};
use crate::store::{CollectionName, Entity, EntityId, Operation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Shared flag telling pending work whether its originating view still exists.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Guard held by a view for as long as it is shown. Dropping it marks every
/// [`Liveness`] handed out by it as dead.
#[derive(Debug)]
pub struct ViewScope {
    name: String,
    alive: Arc<AtomicBool>,
}

impl ViewScope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alive: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn liveness(&self) -> Liveness {
        Liveness(Arc::clone(&self.alive))
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::Release);
        debug!(scope = %self.name, "View scope closed");
    }
}

/// Where a generated result is merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum MergeTarget {
    /// Set one field of an existing entity. A vanished entity makes this a no-op.
    Field {
        collection: CollectionName,
        id: EntityId,
        field: String,
    },
    /// Store the result as a new entity with a freshly issued id.
    NewEntity { collection: CollectionName },
}

impl MergeTarget {
    /// The operation that lands `content` at this target.
    pub fn operation(&self, request: &GenerationRequest, content: &GeneratedContent) -> Operation {
        match self {
            MergeTarget::Field {
                collection,
                id,
                field,
            } => {
                let mut fields = Map::new();
                fields.insert(field.clone(), Value::String(content.body.clone()));
                Operation::MergeFields {
                    collection: *collection,
                    id: id.clone(),
                    fields,
                }
            }
            MergeTarget::NewEntity { collection } => {
                let entity = Entity::new(EntityId::issue_for(*collection))
                    .with("kind", content.kind.as_str())
                    .with("prompt", request.prompt.clone())
                    .with("body", content.body.clone())
                    .with("provider", content.provider.clone())
                    .with("model", content.model.clone())
                    .with("createdAt", chrono::Utc::now().to_rfc3339());
                Operation::Upsert {
                    collection: *collection,
                    entity,
                    policy: None,
                }
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            MergeTarget::Field {
                collection,
                id,
                field,
            } => format!("{}/{}.{}", collection, id, field),
            MergeTarget::NewEntity { collection } => collection.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationJob {
    pub request: GenerationRequest,
    pub target: MergeTarget,
}

impl GenerationJob {
    pub fn new(request: GenerationRequest, target: MergeTarget) -> Self {
        Self { request, target }
    }

    /// Run the request and turn the outcome into the command to dispatch.
    pub async fn run(&self, generator: &dyn ContentGenerator) -> Command {
        match generator.generate(self.request.clone()).await {
            Ok(content) => {
                info!(
                    provider = %content.provider,
                    kind = content.kind.as_str(),
                    target = %self.target.describe(),
                    "Generation completed"
                );
                Command::Apply(self.target.operation(&self.request, &content))
            }
            Err(e) => {
                warn!(target = %self.target.describe(), error = %e, "Generation failed");
                Command::Failed {
                    origin: format!("generate {}", self.target.describe()),
                    error: e.to_string(),
                }
            }
        }
    }

    /// Run on the tokio runtime and dispatch the outcome to `handle` if `liveness`
    /// is still alive at completion. Resolves to whether a command was dispatched.
    pub fn spawn(
        self,
        generator: Arc<dyn ContentGenerator>,
        handle: AppHandle,
        liveness: Liveness,
    ) -> JoinHandle<Result<bool, ApiError>> {
        tokio::spawn(async move {
            let command = self.run(generator.as_ref()).await;
            if !liveness.is_alive() {
                debug!(target = %self.target.describe(), "View gone, generation result dropped");
                return Ok(false);
            }
            handle.submit(command)?;
            Ok(true)
        })
    }
}
