//! CMake driver: configure / build / install against an external `cmake`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kiln_schema::BuildType;

use crate::error::RecipeError;
use crate::toolchain::env::BuildEnv;
use crate::toolchain::run_tool;

/// One CMake invocation triad.
///
/// Definitions are accumulated first and rendered into `-D` flags at
/// configure time, mirroring how recipes think about a CMake build:
/// a map of cache variables plus the standard prefix/build-type plumbing.
#[derive(Debug)]
pub struct Cmake {
    source_dir: PathBuf,
    build_dir: PathBuf,
    install_prefix: PathBuf,
    build_type: BuildType,
    jobs: usize,
    definitions: BTreeMap<String, String>,
}

impl Cmake {
    /// Set up a CMake build of `source_dir` into `build_dir`, installing
    /// under `install_prefix`.
    pub fn new(
        source_dir: &Path,
        build_dir: &Path,
        install_prefix: &Path,
        build_type: BuildType,
        jobs: usize,
    ) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            build_dir: build_dir.to_path_buf(),
            install_prefix: install_prefix.to_path_buf(),
            build_type,
            jobs,
            definitions: BTreeMap::new(),
        }
    }

    /// Set a cache variable (`-DKEY=VALUE`).
    pub fn define(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.definitions.insert(key.to_string(), value.into());
        self
    }

    /// Set a boolean cache variable (`ON`/`OFF`).
    pub fn define_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.define(key, if value { "ON" } else { "OFF" })
    }

    /// The exact `cmake` arguments for the configure step.
    pub fn configure_args(&self) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            self.source_dir.display().to_string(),
            "-B".to_string(),
            self.build_dir.display().to_string(),
            format!("-DCMAKE_BUILD_TYPE={}", self.build_type.cmake_name()),
            format!("-DCMAKE_INSTALL_PREFIX={}", self.install_prefix.display()),
        ];
        for (key, value) in &self.definitions {
            args.push(format!("-D{key}={value}"));
        }
        args
    }

    /// The exact `cmake` arguments for the build step.
    pub fn build_args(&self) -> Vec<String> {
        vec![
            "--build".to_string(),
            self.build_dir.display().to_string(),
            "--parallel".to_string(),
            self.jobs.to_string(),
        ]
    }

    /// The exact `cmake` arguments for the install step.
    pub fn install_args(&self) -> Vec<String> {
        vec!["--install".to_string(), self.build_dir.display().to_string()]
    }

    /// Run the configure step.
    pub fn configure(&self, env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        std::fs::create_dir_all(&self.build_dir)?;
        run_tool("cmake", &self.configure_args(), &self.source_dir, env, log)
    }

    /// Run the build step.
    pub fn build(&self, env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        run_tool("cmake", &self.build_args(), &self.build_dir, env, log)
    }

    /// Run the install step.
    pub fn install(&self, env: &BuildEnv, log: &Path) -> Result<(), RecipeError> {
        run_tool("cmake", &self.install_args(), &self.build_dir, env, log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Cmake {
        let mut cmake = Cmake::new(
            Path::new("/src"),
            Path::new("/build"),
            Path::new("/pkg"),
            BuildType::Release,
            8,
        );
        cmake
            .define_bool("SPDLOG_BUILD_SHARED", false)
            .define_bool("SPDLOG_INSTALL", true)
            .define("CMAKE_CXX_STANDARD", "11");
        cmake
    }

    #[test]
    fn test_configure_args() {
        let args = sample().configure_args();
        assert_eq!(args[0..4], ["-S", "/src", "-B", "/build"]);
        assert!(args.contains(&"-DCMAKE_BUILD_TYPE=Release".to_string()));
        assert!(args.contains(&"-DCMAKE_INSTALL_PREFIX=/pkg".to_string()));
        assert!(args.contains(&"-DSPDLOG_BUILD_SHARED=OFF".to_string()));
        assert!(args.contains(&"-DSPDLOG_INSTALL=ON".to_string()));
        assert!(args.contains(&"-DCMAKE_CXX_STANDARD=11".to_string()));
    }

    #[test]
    fn test_build_and_install_args() {
        let cmake = sample();
        assert_eq!(cmake.build_args(), ["--build", "/build", "--parallel", "8"]);
        assert_eq!(cmake.install_args(), ["--install", "/build"]);
    }

    #[test]
    fn test_definitions_render_sorted() {
        let args = sample().configure_args();
        let defs: Vec<&String> = args.iter().filter(|a| a.starts_with("-DSPDLOG")).collect();
        assert_eq!(defs, ["-DSPDLOG_BUILD_SHARED=OFF", "-DSPDLOG_INSTALL=ON"]);
    }
}
