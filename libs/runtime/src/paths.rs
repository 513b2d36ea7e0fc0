use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the server home directory into an absolute path.
///
/// - `None` or empty → `$HOME/<default_subdir>`
/// - Leading `~` is expanded against the user's home directory
/// - Relative paths are resolved against the current working directory
///
/// The directory is created when `create` is set.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match configured.as_deref().map(str::trim) {
        None | Some("") => user_home()?.join(default_subdir),
        Some(p) if p == "~" => user_home()?,
        Some(p) => {
            if let Some(rest) = p.strip_prefix("~/").or_else(|| p.strip_prefix("~\\")) {
                user_home()?.join(rest)
            } else {
                absolutize(Path::new(p))?
            }
        }
    };

    if create {
        std::fs::create_dir_all(&resolved)
            .with_context(|| format!("Failed to create home dir {}", resolved.display()))?;
    }
    Ok(resolved)
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine the user's home directory"))
}

fn absolutize(p: &Path) -> Result<PathBuf> {
    if p.is_absolute() {
        Ok(p.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("Cannot resolve the current working directory")?
            .join(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_paths_are_kept() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("campushub-home");
        let resolved =
            resolve_home_dir(Some(p.to_string_lossy().to_string()), ".campushub", true).unwrap();
        assert_eq!(resolved, p);
        assert!(p.exists());
    }

    #[test]
    fn relative_paths_resolve_against_cwd() {
        let resolved = resolve_home_dir(Some("some/rel/dir".into()), ".campushub", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel/dir"));
    }

    #[test]
    fn empty_falls_back_to_default_subdir() {
        let resolved = resolve_home_dir(Some("  ".into()), ".campushub", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".campushub"));
    }
}
