use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for vaultdb
pub fn vaultdb() -> Command {
    cargo_bin_cmd!("vaultdb")
}

/// A vault directory plus a database path kept outside it
pub struct TestVault {
    pub dir: TempDir,
}

impl TestVault {
    pub fn new(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("vault")).unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let vault = Self { dir };
        for (rel, content) in files {
            vault.write(rel, content);
        }
        vault
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("vault")
    }

    pub fn db(&self) -> PathBuf {
        self.dir.path().join("index.sqlite")
    }

    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    /// vaultdb isolated from any user config, pointed at this vault's database
    pub fn cmd(&self) -> Command {
        let mut cmd = vaultdb();
        cmd.env("VAULTDB_CONFIG_DIR", self.dir.path().join("config"))
            .env_remove("VAULTDB_DB")
            .env_remove("RUST_LOG")
            .env_remove("VAULTDB_LOG")
            .arg("--db")
            .arg(self.db());
        cmd
    }

    /// Run `index` over the vault and require success
    pub fn index(&self) {
        self.cmd().arg("index").arg(self.root()).assert().success();
    }
}

/// Parse stdout as JSON
#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[allow(dead_code)]
pub fn path_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
