//! Where paver finds its config file and its default state root.
//!
//! The state root is the directory [`StateDirs`](crate::state::StateDirs)
//! lays out as `terraform/`, `vars/` and `latest-error.log`. `--state-dir`
//! (or `PAVER_STATE_DIR`, read by clap) and the config file can move it;
//! otherwise it is `paver/` under the platform state directory
//! (`$XDG_STATE_HOME` or `~/.local/state` on Linux), falling back to the
//! local data directory where the platform has no state directory.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Moves the config file to `$PAVER_CONFIG_DIR/config.toml`
pub const ENV_CONFIG_DIR: &str = "PAVER_CONFIG_DIR";

/// Name of the config file inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

const APP_DIR: &str = "paver";

/// Path of `config.toml`. The file may not exist.
pub fn config_file() -> Result<PathBuf> {
    let dir = match std::env::var(ENV_CONFIG_DIR) {
        Ok(dir) => expand(&dir),
        Err(_) => dirs::config_dir()
            .context("Could not determine config directory")?
            .join(APP_DIR),
    };
    Ok(dir.join(CONFIG_FILE))
}

/// State root used when neither a flag nor the config file names one.
pub fn default_state_root() -> Result<PathBuf> {
    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .context("Could not determine a directory for terraform state")?;
    log::debug!("Default state root under {}", base.display());
    Ok(base.join(APP_DIR))
}

/// Expand `~` and `$VARS` in a user-supplied path. Unknown variables are
/// left as written.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard, PoisonError};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Sets an environment variable for the lifetime of the guard and
    /// restores the previous value on drop. Holds a lock so tests touching
    /// the environment run one at a time.
    pub(crate) struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        pub(crate) fn set(key: &'static str, value: &str) -> Self {
            let lock = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            let previous = env::var(key).ok();
            // SAFETY: ENV_LOCK serializes every test that touches the environment
            unsafe { env::set_var(key, value) };
            Self {
                key,
                previous,
                _lock: lock,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: still holding ENV_LOCK
            match &self.previous {
                Some(value) => unsafe { env::set_var(self.key, value) },
                None => unsafe { env::remove_var(self.key) },
            }
        }
    }

    #[test]
    fn test_config_file_from_env() {
        let _env = EnvGuard::set(ENV_CONFIG_DIR, "/etc/paver");
        assert_eq!(
            config_file().unwrap(),
            PathBuf::from("/etc/paver/config.toml")
        );
    }

    #[test]
    fn test_config_file_env_expands_tilde() {
        let _env = EnvGuard::set(ENV_CONFIG_DIR, "~/envs/lake");
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            config_file().unwrap(),
            home.join("envs").join("lake").join(CONFIG_FILE)
        );
    }

    #[test]
    fn test_default_state_root_is_app_dir() {
        let root = default_state_root().unwrap();
        assert!(root.ends_with(APP_DIR));
        assert!(root.is_absolute());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_default_state_root_follows_xdg_state_home() {
        let _env = EnvGuard::set("XDG_STATE_HOME", "/var/lib/ci-state");
        assert_eq!(
            default_state_root().unwrap(),
            PathBuf::from("/var/lib/ci-state/paver")
        );
    }

    #[test]
    fn test_expand_state_root_with_env_var() {
        let _env = EnvGuard::set("PAVER_TEST_ENV_NAME", "lake");
        assert_eq!(
            expand("/srv/$PAVER_TEST_ENV_NAME"),
            PathBuf::from("/srv/lake")
        );
    }

    #[test]
    fn test_expand_keeps_bare_binary_name() {
        assert_eq!(expand("terraform"), PathBuf::from("terraform"));
    }

    #[test]
    fn test_expand_unknown_var_unchanged() {
        assert_eq!(
            expand("/srv/$PAVER_UNSET_12345/vars"),
            PathBuf::from("/srv/$PAVER_UNSET_12345/vars")
        );
    }
}
