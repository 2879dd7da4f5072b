use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

pub struct ServerGuard {
    pub base_url: String,
    _dir: tempfile::TempDir,
    child: Child,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

pub fn spawn_server(count: u64) -> Result<ServerGuard> {
    let dir = tempfile::tempdir().context("create tempdir")?;
    let addr_file = dir.path().join("addr.txt");

    let child = Command::new(env!("CARGO_BIN_EXE_listsync-server"))
        .args([
            "--addr",
            "127.0.0.1:0",
            "--addr-file",
            addr_file.to_str().unwrap(),
            "--count",
            &count.to_string(),
        ])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn listsync-server")?;

    let base_url = read_addr_file(&addr_file)?;
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        _dir: dir,
        child,
    })
}

fn read_addr_file(addr_file: &std::path::Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }
        if let Ok(addr) = std::fs::read_to_string(addr_file) {
            let addr = addr.trim();
            if !addr.is_empty() {
                return Ok(format!("http://{}", addr));
            }
        }
        thread::sleep(Duration::from_millis(20));
    }
}

fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server at {} never became healthy", base_url);
        }
        if let Ok(resp) = client.get(format!("{}/healthz", base_url)).send()
            && resp.status().is_success()
        {
            return Ok(());
        }
        thread::sleep(Duration::from_millis(20));
    }
}
