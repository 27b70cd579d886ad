//! Default effect handlers
//!
//! One module per handler slot. [`default_registry`] wires them into an
//! [`EffectRegistry`].

pub mod create_file;
pub mod load_script;
pub mod memory_backup;
pub mod print;
pub mod restart;
pub mod run_module;
pub mod speak;
pub mod update_memory;

pub use create_file::CreateFileEffect;
pub use load_script::LoadScriptEffect;
pub use memory_backup::MemoryBackupEffect;
pub use print::PrintEffect;
pub use restart::RestartEffect;
pub use run_module::RunModuleEffect;
pub use speak::{SpeakEffect, TextInput, TtsEngine};
pub use update_memory::UpdateMemoryEffect;

use cmdgate_core::{EffectRegistry, HandlerError, HandlerKind, ModulePolicy, RestartSignal};
use cmdgate_store::MemoryStore;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Everything the default handlers need from their environment
#[derive(Clone)]
pub struct EffectContext {
    pub workspace_dir: PathBuf,
    pub modules_dir: PathBuf,
    pub memory: Arc<MemoryStore>,
    pub module_policy: Arc<dyn ModulePolicy>,
    pub restart: RestartSignal,
}

/// Registry with every built-in handler
pub fn default_registry(ctx: &EffectContext) -> EffectRegistry {
    EffectRegistry::new()
        .with(HandlerKind::Print, PrintEffect)
        .with(
            HandlerKind::CreateFile,
            CreateFileEffect::new(ctx.workspace_dir.clone()),
        )
        .with(HandlerKind::Speak, SpeakEffect::platform_default())
        .with(
            HandlerKind::UpdateMemory,
            UpdateMemoryEffect::new(Arc::clone(&ctx.memory)),
        )
        .with(
            HandlerKind::RunModule,
            RunModuleEffect::new(ctx.modules_dir.clone(), Arc::clone(&ctx.module_policy)),
        )
        .with(
            HandlerKind::RestartSystem,
            RestartEffect::new(ctx.restart.clone()),
        )
        .with(
            HandlerKind::MemoryBackup,
            MemoryBackupEffect::new(Arc::clone(&ctx.memory), ctx.workspace_dir.clone()),
        )
        .with(HandlerKind::LoadScript, LoadScriptEffect)
}

/// Join a user-supplied file name under `root`
///
/// Empty names, absolute paths and any `..` component are rejected so
/// handlers never write outside their root.
pub(crate) fn confined_path(root: &Path, name: &str) -> Result<PathBuf, HandlerError> {
    if name.is_empty() {
        return Err(HandlerError::new("File name is required"));
    }

    let relative = Path::new(name);
    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                return Err(HandlerError::new(format!(
                    "File name '{}' must not leave the workspace",
                    name
                )))
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(HandlerError::new(format!(
                    "File name '{}' must be relative",
                    name
                )))
            }
        }
    }

    Ok(root.join(relative))
}
