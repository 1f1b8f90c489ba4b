pub mod commands;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Canonicalize the root path if possible, falling back to the given string
/// relative to the current working directory.
pub fn canonicalize_or_current(root: &str) -> Result<PathBuf> {
    let path = Path::new(root);
    if path == Path::new(".") {
        Ok(env::current_dir().context("Failed to get current directory")?)
    } else {
        // Not-yet-existing roots are joined onto the cwd instead.
        match path.canonicalize() {
            Ok(p) => Ok(p),
            Err(_) => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                Ok(cwd.join(path))
            }
        }
    }
}

/// Reject module names that would escape the cache or report directories.
///
/// Names are used verbatim as path components and URL segments.
pub fn validate_module_name(module: &str) -> Result<()> {
    if module.trim().is_empty() {
        anyhow::bail!("Module name is empty");
    }
    if module.trim() != module {
        anyhow::bail!("Module name has leading or trailing whitespace: '{module}'");
    }
    if module.contains(['/', '\\']) || module == "." || module == ".." {
        anyhow::bail!("Module name must be a bare file name, got '{module}'");
    }
    Ok(())
}
