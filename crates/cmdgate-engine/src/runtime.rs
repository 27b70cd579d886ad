//! Assembly of stores, handlers and actors from a [`GatewayConfig`]

#![allow(clippy::result_large_err)]

use crate::config::GatewayConfig;
use crate::dispatcher::{Dispatcher, RunOptions};
use crate::effects::{default_registry, EffectContext};
use crate::gateway::IngressGateway;
use cmdgate_core::errors::ExError;
use cmdgate_core::{AllowListModulePolicy, DenyAllModulePolicy, ModulePolicy, RestartSignal};
use cmdgate_store::{ExecutionLog, IngressLog, MemoryStore, QueueStore};
use std::sync::Arc;

/// Every long-lived component of one gateway process
///
/// The queue store is created once and shared, so the gateway and the
/// dispatcher built here go through the same exclusion boundary.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub config: GatewayConfig,
    pub queue: Arc<QueueStore>,
    pub memory: Arc<MemoryStore>,
    pub execution_log: Arc<ExecutionLog>,
    pub ingress_log: Arc<IngressLog>,
    pub restart: RestartSignal,
    pub dispatcher: Arc<Dispatcher>,
    pub gateway: IngressGateway,
}

impl Runtime {
    /// Open (or create) the data directory described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the queue document cannot be created.
    pub fn open(config: GatewayConfig) -> Result<Self, ExError> {
        let queue = Arc::new(QueueStore::open(config.queue_path())?);
        let memory = Arc::new(MemoryStore::new(config.memory_path()));
        let execution_log = Arc::new(ExecutionLog::new(config.log_path()));
        let ingress_log = Arc::new(IngressLog::new(config.ingress_log_path()));
        let restart = RestartSignal::new();

        let module_policy: Arc<dyn ModulePolicy> = if config.allowed_modules.is_empty() {
            Arc::new(DenyAllModulePolicy)
        } else {
            Arc::new(AllowListModulePolicy::new(config.allowed_modules.iter().cloned()))
        };

        let registry = default_registry(&EffectContext {
            workspace_dir: config.workspace_path(),
            modules_dir: config.modules_path(),
            memory: Arc::clone(&memory),
            module_policy,
            restart: restart.clone(),
        });

        let dispatcher = Arc::new(
            Dispatcher::new(
                Arc::clone(&queue),
                registry,
                Arc::clone(&execution_log),
                restart.clone(),
            )
            .with_command_delay(config.command_delay()),
        );
        let gateway = IngressGateway::new(Arc::clone(&queue), Arc::clone(&ingress_log));

        tracing::debug!(
            data_dir = %config.data_dir.display(),
            allowed_modules = config.allowed_modules.len(),
            "runtime opened"
        );

        Ok(Self {
            config,
            queue,
            memory,
            execution_log,
            ingress_log,
            restart,
            dispatcher,
            gateway,
        })
    }

    pub fn run_options(&self, once: bool) -> RunOptions {
        RunOptions {
            poll_interval: self.config.poll_interval(),
            restart_delay: self.config.restart_delay(),
            once,
        }
    }
}
