//! Module execution policy
//!
//! `RUN_MODULE` starts an external program by name. Whether a given name may
//! run is decided by a [`ModulePolicy`] injected into the handler, so the
//! dispatcher never executes arbitrary code unconditionally.

use std::collections::BTreeSet;

use crate::errors::{ExError, ExErrorKind};

/// Policy trait deciding which modules `RUN_MODULE` may execute
pub trait ModulePolicy: Send + Sync {
    /// Check whether the named module may run.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::PolicyDenied` if the module is not permitted.
    fn check(&self, module_name: &str) -> Result<(), ExError>;
}

/// Denies every module (the default when nothing is configured)
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllModulePolicy;

impl ModulePolicy for DenyAllModulePolicy {
    fn check(&self, module_name: &str) -> Result<(), ExError> {
        Err(ExError::new(ExErrorKind::PolicyDenied)
            .with_op("run_module")
            .with_message(format!(
                "Module '{}' denied: module execution is disabled",
                module_name
            )))
    }
}

/// Allows only explicitly listed module names
///
/// # Example
/// ```
/// use cmdgate_core::policy::{AllowListModulePolicy, ModulePolicy};
///
/// let policy = AllowListModulePolicy::new(["report", "cleanup"]);
///
/// assert!(policy.check("report").is_ok());
/// assert!(policy.check("rm_everything").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AllowListModulePolicy {
    allowed: BTreeSet<String>,
}

impl AllowListModulePolicy {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl ModulePolicy for AllowListModulePolicy {
    fn check(&self, module_name: &str) -> Result<(), ExError> {
        if self.allowed.contains(module_name) {
            Ok(())
        } else {
            Err(ExError::new(ExErrorKind::PolicyDenied)
                .with_op("run_module")
                .with_message(format!("Module '{}' is not in the allow list", module_name)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deny_all_denies() {
        let policy = DenyAllModulePolicy;
        let err = policy.check("anything").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::PolicyDenied);
    }

    #[test]
    fn test_allow_list_is_exact_match() {
        let policy = AllowListModulePolicy::new(["report"]);

        assert!(policy.check("report").is_ok());
        assert!(policy.check("Report").is_err());
        assert!(policy.check("report2").is_err());
    }

    #[test]
    fn test_empty_allow_list_denies_everything() {
        let policy = AllowListModulePolicy::default();
        assert!(policy.is_empty());
        assert_eq!(
            policy.check("report").unwrap_err().kind(),
            ExErrorKind::PolicyDenied
        );
    }
}
