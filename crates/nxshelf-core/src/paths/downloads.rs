//! Download and partial-file directories.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::{create_dir, data_root, normalize_user_path};

/// Environment variable overriding the downloads directory.
pub const DOWNLOADS_DIR_ENV: &str = "NXSHELF_DOWNLOADS_DIR";

/// Where completed payloads are stored.
///
/// `NXSHELF_DOWNLOADS_DIR` if set, otherwise `<data root>/downloads`.
pub fn downloads_dir() -> Result<PathBuf, PathError> {
    let dir = match env::var(DOWNLOADS_DIR_ENV) {
        Ok(raw) if !raw.trim().is_empty() => normalize_user_path(&raw)?,
        _ => data_root()?.join("downloads"),
    };
    create_dir(&dir)?;
    Ok(dir)
}

/// Where in-flight transfers write their partial files.
pub fn partial_dir() -> Result<PathBuf, PathError> {
    let dir = data_root()?.join("partial");
    create_dir(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_downloads_default_and_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let root = tempfile::tempdir().unwrap();
        let _data = EnvVarGuard::set("NXSHELF_DATA_DIR", root.path().to_str().unwrap());
        let _unset = EnvVarGuard::set(DOWNLOADS_DIR_ENV, "");

        assert_eq!(downloads_dir().unwrap(), root.path().join("downloads"));
        assert_eq!(partial_dir().unwrap(), root.path().join("partial"));

        let custom = tempfile::tempdir().unwrap();
        let _dl = EnvVarGuard::set(DOWNLOADS_DIR_ENV, custom.path().to_str().unwrap());
        assert_eq!(downloads_dir().unwrap(), custom.path());
    }
}
