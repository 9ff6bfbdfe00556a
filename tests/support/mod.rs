use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Isolated data and config locations for one test
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config").join("config.toml")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir().join("todo-tasks.json")
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_tasks_raw(&self, contents: &str) -> std::io::Result<()> {
        fs::create_dir_all(self.data_dir())?;
        fs::write(self.tasks_file(), contents)
    }

    pub fn read_tasks(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.tasks_file())?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// `todo` pointed at this environment, with logging off
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todo").expect("binary");
        cmd.current_dir(self.path())
            .env("TODO_DIR", self.data_dir())
            .env("TODO_CONFIG", self.config_path())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Plain process builder for spawning several `todo` runs at once
    pub fn process(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(cargo_bin("todo"));
        cmd.current_dir(self.path())
            .env("TODO_DIR", self.data_dir())
            .env("TODO_CONFIG", self.config_path())
            .env_remove("RUST_LOG")
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null());
        cmd
    }

    /// Run with `--json` and parse the envelope from stdout
    pub fn json(&self, args: &[&str]) -> Result<Value, Box<dyn std::error::Error>> {
        let output = self.cmd().arg("--json").args(args).output()?;
        Ok(serde_json::from_slice(&output.stdout)?)
    }

    /// Add a task and return its id
    pub fn add(&self, name: &str, description: &str) -> Result<String, Box<dyn std::error::Error>> {
        let value = self.json(&["add", name, description])?;
        let id = value["data"]["id"]
            .as_str()
            .ok_or("missing data.id")?
            .to_string();
        Ok(id)
    }
}
