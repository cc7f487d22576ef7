//! Build environment derived from resolved dependencies.
//!
//! Every dependency package contributes its `include/`, `lib/` and
//! `lib/pkgconfig/` directories to the compiler and linker search paths,
//! plus a `DEP_<NAME>` variable pointing at its package folder so build
//! scripts can locate bundled tools (`$DEP_WXWIDGETS/bin/wx-config`).

use std::path::Path;
use std::process::Command;

use crate::deps::ResolvedDeps;

/// Environment variables applied to every build tool invocation.
#[derive(Debug, Clone, Default)]
pub struct BuildEnv {
    vars: Vec<(String, String)>,
}

impl BuildEnv {
    /// Derive the environment from the resolved dependency set.
    pub fn from_deps(deps: &ResolvedDeps) -> Self {
        let mut cflags: Vec<String> = Vec::new();
        let mut ldflags: Vec<String> = Vec::new();
        let mut pkg_config_paths: Vec<String> = Vec::new();
        let mut vars: Vec<(String, String)> = Vec::new();

        for (name, folder) in deps.iter() {
            let env_name = format!("DEP_{}", name.to_uppercase().replace(['-', '.'], "_"));
            vars.push((env_name, folder.display().to_string()));

            let include = folder.join("include");
            if include.is_dir() {
                cflags.push(format!("-I{}", include.display()));
            }
            let lib = folder.join("lib");
            if lib.is_dir() {
                ldflags.push(format!("-L{}", lib.display()));
            }
            let pkgconfig = folder.join("lib/pkgconfig");
            if pkgconfig.is_dir() {
                pkg_config_paths.push(pkgconfig.display().to_string());
            }
        }

        if !cflags.is_empty() {
            let flags = cflags.join(" ");
            vars.push(("CFLAGS".to_string(), flags.clone()));
            vars.push(("CPPFLAGS".to_string(), flags));
        }
        if !ldflags.is_empty() {
            vars.push(("LDFLAGS".to_string(), ldflags.join(" ")));
        }
        if !pkg_config_paths.is_empty() {
            vars.push(("PKG_CONFIG_PATH".to_string(), pkg_config_paths.join(":")));
        }

        Self { vars }
    }

    /// Apply the variables to a command.
    pub fn apply(&self, cmd: &mut Command) {
        for (key, value) in &self.vars {
            cmd.env(key, value);
        }
    }

    /// Look up a variable, for tests and diagnostics.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// `DEP_<NAME>`-style variable name for a dependency.
pub fn dep_var_name(name: &str) -> String {
    format!("DEP_{}", name.to_uppercase().replace(['-', '.'], "_"))
}

/// Convenience: the path to a tool inside a dependency's `bin/`.
pub fn dep_tool(dep_folder: &Path, tool: &str) -> std::path::PathBuf {
    dep_folder.join("bin").join(tool)
}
