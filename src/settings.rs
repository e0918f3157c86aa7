//! Bundler settings composition
//!
//! Merges global and local Bundler configuration into the flat `BUNDLE_*`
//! environment map one update runs under:
//! - local `.bundle/config` settings override global ones
//! - path-valued settings are rewritten absolute against the project root
//! - the isolated manifest becomes the active Gemfile
//! - a resolved version pin is carried as `BUNDLER_VERSION`
//!
//! Config files use Bundler's own serialization, one `BUNDLE_KEY: value`
//! pair per line; multi-valued settings arrive already colon-joined
//! (e.g. `BUNDLE_WITHOUT: "development:test"`) and pass through verbatim.

use crate::context::ProjectContext;
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable selecting the active manifest
pub const GEMFILE_VAR: &str = "BUNDLE_GEMFILE";

/// Environment variable pinning the Bundler version
pub const VERSION_VAR: &str = "BUNDLER_VERSION";

/// Compose the environment map for one update
pub fn compose_environment(
    context: &ProjectContext,
    version_pin: Option<&str>,
) -> BTreeMap<String, String> {
    compose_with_global(context, version_pin, global_config_path().as_deref())
}

fn compose_with_global(
    context: &ProjectContext,
    version_pin: Option<&str>,
    global_config: Option<&Path>,
) -> BTreeMap<String, String> {
    let mut env_map = BTreeMap::new();

    // Global first, local second: later inserts win, so local settings
    // take precedence by construction
    if let Some(global) = global_config {
        read_config_file(global, &mut env_map);
    }
    read_config_file(
        &context.root.join(".bundle").join("config"),
        &mut env_map,
    );

    absolutize_paths(&mut env_map, &context.root);

    env_map.insert(
        GEMFILE_VAR.to_string(),
        context.isolated_manifest.display().to_string(),
    );
    if let Some(version) = version_pin {
        env_map.insert(VERSION_VAR.to_string(), version.to_string());
    }

    env_map
}

/// Global Bundler config location
///
/// `BUNDLE_USER_CONFIG` overrides the default `~/.bundle/config`.
fn global_config_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os("BUNDLE_USER_CONFIG") {
        return Some(PathBuf::from(path));
    }
    env::var_os("HOME").map(|home| PathBuf::from(home).join(".bundle").join("config"))
}

/// Parse a Bundler config file into the settings map
///
/// Read errors degrade to an empty contribution; a project without
/// configuration is not an error.
fn read_config_file(path: &Path, settings: &mut BTreeMap<String, String>) {
    let Ok(content) = std::fs::read_to_string(path) else {
        return;
    };

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("---") {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if !key.starts_with("BUNDLE_") {
            continue;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        settings.insert(key.to_string(), value.to_string());
    }
}

/// Rewrite relative path-valued settings against the project root
///
/// The update runs with a working directory that may differ from the
/// project root, so relative paths recorded by the original configuration
/// would resolve incorrectly. Already-absolute values are untouched,
/// which makes the rewrite idempotent.
pub fn absolutize_paths(env_map: &mut BTreeMap<String, String>, root: &Path) {
    for (key, value) in env_map.iter_mut() {
        if !is_path_key(key) {
            continue;
        }
        if Path::new(value.as_str()).is_absolute() {
            continue;
        }
        let absolute = root.join(value.as_str());
        *value = absolute.display().to_string();
    }
}

/// Whether a settings key denotes a filesystem path
fn is_path_key(key: &str) -> bool {
    key == "BUNDLE_PATH" || (key.starts_with("BUNDLE_") && key.ends_with("_PATH"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project_with_manifest() -> (TempDir, ProjectContext) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Gemfile"), "").unwrap();
        let context = ProjectContext::resolve(dir.path());
        (dir, context)
    }

    #[test]
    fn test_is_path_key() {
        assert!(is_path_key("BUNDLE_PATH"));
        assert!(is_path_key("BUNDLE_CACHE_PATH"));
        assert!(is_path_key("BUNDLE_FOO_PATH"));
        assert!(!is_path_key("BUNDLE_WITHOUT"));
        assert!(!is_path_key("OTHER_VAR"));
        assert!(!is_path_key("OTHER_PATH"));
    }

    #[test]
    fn test_absolutize_relative_path_key() {
        let mut env_map = BTreeMap::from([(
            "BUNDLE_FOO_PATH".to_string(),
            "vendor/bundle".to_string(),
        )]);
        absolutize_paths(&mut env_map, Path::new("/root"));
        assert_eq!(
            env_map["BUNDLE_FOO_PATH"],
            Path::new("/root").join("vendor/bundle").display().to_string()
        );
    }

    #[test]
    fn test_absolutize_leaves_absolute_value() {
        let mut env_map = BTreeMap::from([(
            "BUNDLE_FOO_PATH".to_string(),
            "/already/absolute".to_string(),
        )]);
        absolutize_paths(&mut env_map, Path::new("/root"));
        assert_eq!(env_map["BUNDLE_FOO_PATH"], "/already/absolute");
    }

    #[test]
    fn test_absolutize_leaves_non_path_keys() {
        let mut env_map =
            BTreeMap::from([("OTHER_VAR".to_string(), "vendor/bundle".to_string())]);
        absolutize_paths(&mut env_map, Path::new("/root"));
        assert_eq!(env_map["OTHER_VAR"], "vendor/bundle");
    }

    #[test]
    fn test_absolutize_is_idempotent() {
        let mut env_map = BTreeMap::from([
            ("BUNDLE_PATH".to_string(), "vendor/bundle".to_string()),
            ("BUNDLE_CACHE_PATH".to_string(), "/abs/cache".to_string()),
            ("BUNDLE_WITHOUT".to_string(), "development:test".to_string()),
        ]);
        absolutize_paths(&mut env_map, Path::new("/root"));
        let once = env_map.clone();
        absolutize_paths(&mut env_map, Path::new("/root"));
        assert_eq!(env_map, once);
    }

    #[test]
    fn test_read_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(
            &path,
            "---\nBUNDLE_PATH: \"vendor/bundle\"\nBUNDLE_WITHOUT: \"development:test\"\n",
        )
        .unwrap();

        let mut settings = BTreeMap::new();
        read_config_file(&path, &mut settings);
        assert_eq!(settings["BUNDLE_PATH"], "vendor/bundle");
        assert_eq!(settings["BUNDLE_WITHOUT"], "development:test");
    }

    #[test]
    fn test_read_config_file_skips_foreign_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, "SOME_KEY: value\nBUNDLE_RETRY: \"3\"\n").unwrap();

        let mut settings = BTreeMap::new();
        read_config_file(&path, &mut settings);
        assert_eq!(settings.len(), 1);
        assert_eq!(settings["BUNDLE_RETRY"], "3");
    }

    #[test]
    fn test_read_config_file_missing_is_empty() {
        let mut settings = BTreeMap::new();
        read_config_file(Path::new("/nonexistent/config"), &mut settings);
        assert!(settings.is_empty());
    }

    #[test]
    fn test_compose_sets_isolated_manifest() {
        let (_dir, context) = project_with_manifest();
        let env_map = compose_with_global(&context, None, None);
        assert_eq!(
            env_map[GEMFILE_VAR],
            context.isolated_manifest.display().to_string()
        );
    }

    #[test]
    fn test_compose_with_version_pin() {
        let (_dir, context) = project_with_manifest();
        let env_map = compose_with_global(&context, Some("2.5.4"), None);
        assert_eq!(env_map[VERSION_VAR], "2.5.4");
    }

    #[test]
    fn test_compose_without_version_pin_omits_variable() {
        let (_dir, context) = project_with_manifest();
        let env_map = compose_with_global(&context, None, None);
        assert!(!env_map.contains_key(VERSION_VAR));
    }

    #[test]
    fn test_compose_local_overrides_global() {
        let (dir, context) = project_with_manifest();

        let global = dir.path().join("global-config");
        fs::write(
            &global,
            "BUNDLE_RETRY: \"1\"\nBUNDLE_TIMEOUT: \"10\"\n",
        )
        .unwrap();

        fs::create_dir(dir.path().join(".bundle")).unwrap();
        fs::write(
            dir.path().join(".bundle").join("config"),
            "BUNDLE_RETRY: \"5\"\n",
        )
        .unwrap();

        let env_map = compose_with_global(&context, None, Some(&global));
        assert_eq!(env_map["BUNDLE_RETRY"], "5");
        assert_eq!(env_map["BUNDLE_TIMEOUT"], "10");
    }

    #[test]
    fn test_compose_absolutizes_local_path_settings() {
        let (dir, context) = project_with_manifest();

        fs::create_dir(dir.path().join(".bundle")).unwrap();
        fs::write(
            dir.path().join(".bundle").join("config"),
            "BUNDLE_PATH: \"vendor/bundle\"\n",
        )
        .unwrap();

        let env_map = compose_with_global(&context, None, None);
        assert_eq!(
            env_map["BUNDLE_PATH"],
            dir.path().join("vendor/bundle").display().to_string()
        );
    }

    #[test]
    fn test_compose_degrades_without_configuration() {
        let (_dir, context) = project_with_manifest();
        let env_map = compose_with_global(&context, None, None);
        // Only the active-manifest variable is present
        assert_eq!(env_map.len(), 1);
        assert!(env_map.contains_key(GEMFILE_VAR));
    }
}
