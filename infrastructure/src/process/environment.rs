//! Child process environment
//!
//! Starts from the ambient environment and layers the tool's settings on
//! top:
//!
//! 1. tool variables, with `${VAR}` expanded against the ambient values
//!    (unknown variables expand to nothing)
//! 2. the runtime binary directory appended to the executable search path
//! 3. library paths appended to the platform's loader variable

use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use toolbridge_application::ToolEnvironment;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

#[cfg(windows)]
const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
const PATH_SEPARATOR: char = ':';

/// Name of the executable search path variable.
pub fn path_key() -> &'static str {
    if cfg!(windows) { "Path" } else { "PATH" }
}

/// Name of the shared-library search path variable.
pub fn library_path_key() -> &'static str {
    if cfg!(windows) {
        "Path"
    } else if cfg!(target_os = "macos") {
        "DYLD_LIBRARY_PATH"
    } else {
        "LD_LIBRARY_PATH"
    }
}

/// Build the complete environment of a child process.
pub fn build_environment<I>(tool: &ToolEnvironment, ambient: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let ambient: BTreeMap<String, String> = ambient.into_iter().collect();
    let mut environment = ambient.clone();

    for (key, value) in &tool.variables {
        environment.insert(key.clone(), expand_placeholders(value, &ambient));
    }

    if let Some(bin_dir) = &tool.runtime_bin_dir {
        append_path(&mut environment, path_key(), bin_dir);
    }
    for library_path in &tool.library_paths {
        append_path(&mut environment, library_path_key(), library_path);
    }

    environment
}

/// Replace every `${VAR}` with its value in `variables`.
pub fn expand_placeholders(value: &str, variables: &BTreeMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(value, |captures: &regex::Captures<'_>| {
            variables
                .get(&captures[1])
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

fn append_path(environment: &mut BTreeMap<String, String>, key: &str, dir: &Path) {
    let dir = dir.to_string_lossy();
    let joined = match environment.get(key) {
        Some(existing) if !existing.is_empty() => {
            format!("{}{}{}", existing, PATH_SEPARATOR, dir)
        }
        _ => dir.into_owned(),
    };
    environment.insert(key.to_string(), joined);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ambient() -> Vec<(String, String)> {
        vec![
            ("HOME".to_string(), "/home/u".to_string()),
            (path_key().to_string(), "/usr/bin".to_string()),
        ]
    }

    #[test]
    fn test_placeholders_expand_against_ambient() {
        let tool = ToolEnvironment::default()
            .with_variable("DATA", "${HOME}/share:${MISSING}x")
            .with_variable("PLAIN", "$HOME");
        let env = build_environment(&tool, ambient());
        assert_eq!(env["DATA"], "/home/u/share:x");
        assert_eq!(env["PLAIN"], "$HOME");
        assert_eq!(env["HOME"], "/home/u");
    }

    #[test]
    fn test_runtime_bin_dir_is_appended() {
        let tool = ToolEnvironment::default().with_runtime_bin_dir("/opt/python/bin");
        let env = build_environment(&tool, ambient());
        assert_eq!(
            env[path_key()],
            format!("/usr/bin{}/opt/python/bin", PATH_SEPARATOR)
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_library_paths_accumulate() {
        let tool = ToolEnvironment::default()
            .with_library_path("/opt/a/lib")
            .with_library_path("/opt/b/lib");
        let env = build_environment(&tool, ambient());
        assert_eq!(env["LD_LIBRARY_PATH"], "/opt/a/lib:/opt/b/lib");
    }

    #[test]
    fn test_empty_tool_environment_keeps_ambient() {
        let env = build_environment(&ToolEnvironment::default(), ambient());
        assert_eq!(env.len(), 2);
    }
}
