use cmdgate_core::{EffectHandler, HandlerError, ModulePolicy};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

/// Runs `<modules_dir>/<name>` and captures its stdout
///
/// Names are restricted to `[A-Za-z0-9_-]+` and must pass the module policy
/// before anything is executed.
#[derive(Clone)]
pub struct RunModuleEffect {
    modules_dir: PathBuf,
    policy: Arc<dyn ModulePolicy>,
}

impl RunModuleEffect {
    pub fn new(modules_dir: PathBuf, policy: Arc<dyn ModulePolicy>) -> Self {
        Self {
            modules_dir,
            policy,
        }
    }

    fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl fmt::Debug for RunModuleEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunModuleEffect")
            .field("modules_dir", &self.modules_dir)
            .finish_non_exhaustive()
    }
}

impl EffectHandler for RunModuleEffect {
    fn execute(&self, parameter: &str) -> Result<String, HandlerError> {
        if !Self::is_valid_name(parameter) {
            return Err(HandlerError::new(format!(
                "Invalid module name '{}'",
                parameter
            )));
        }

        self.policy
            .check(parameter)
            .map_err(|e| HandlerError::new(e.message().to_string()))?;

        let program = self.modules_dir.join(parameter);
        if !program.is_file() {
            return Err(HandlerError::new(format!(
                "Module '{}' not found",
                parameter
            )));
        }

        let output = Command::new(&program).output().map_err(|e| {
            HandlerError::new(format!("Module execution failed: {}", e))
        })?;

        if !output.status.success() {
            return Err(HandlerError::new(format!(
                "Module '{}' failed with {}: {}",
                parameter,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(format!(
            "Module '{}' executed successfully: {}",
            parameter,
            String::from_utf8_lossy(&output.stdout).trim()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdgate_core::{AllowListModulePolicy, DenyAllModulePolicy};
    use tempfile::TempDir;

    #[test]
    fn test_invalid_name_is_rejected_before_policy() {
        let effect = RunModuleEffect::new(
            PathBuf::from("/nonexistent"),
            Arc::new(AllowListModulePolicy::new(["../x"])),
        );

        let err = effect.execute("../x").unwrap_err();
        assert_eq!(err.message(), "Invalid module name '../x'");
        assert!(effect.execute("").is_err());
    }

    #[test]
    fn test_default_policy_denies() {
        let effect = RunModuleEffect::new(PathBuf::from("/nonexistent"), Arc::new(DenyAllModulePolicy));

        let err = effect.execute("report").unwrap_err();
        assert!(err.message().contains("denied"));
    }

    #[test]
    fn test_allowed_but_missing_module() {
        let dir = TempDir::new().unwrap();
        let effect = RunModuleEffect::new(
            dir.path().to_path_buf(),
            Arc::new(AllowListModulePolicy::new(["report"])),
        );

        let err = effect.execute("report").unwrap_err();
        assert_eq!(err.message(), "Module 'report' not found");
    }

    #[cfg(unix)]
    #[test]
    fn test_runs_allowed_module() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink("/bin/echo", dir.path().join("report")).unwrap();

        let effect = RunModuleEffect::new(
            dir.path().to_path_buf(),
            Arc::new(AllowListModulePolicy::new(["report"])),
        );

        let result = effect.execute("report").unwrap();
        assert!(result.starts_with("Module 'report' executed successfully:"));
    }
}
