//! Server management - spawning and health checking the web server

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Handle to a running server process
pub struct ServerHandle {
    child: Child,
    pub base_url: String,
    pub port: u16,
}

impl ServerHandle {
    /// Spawn the tasklist-web server
    pub async fn spawn(config: ServerConfig) -> E2eResult<Self> {
        if !config.binary_path.exists() {
            return Err(E2eError::ServerBinaryNotFound(config.binary_path));
        }

        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning web server on port {}", port);

        let mut cmd = Command::new(&config.binary_path);

        cmd.env("TASKLIST_WEB_PORT", port.to_string())
            .env("TASKLIST_WEB_HOST", "127.0.0.1")
            .env("RUST_LOG", &config.log_filter);

        if let Some(seed) = &config.seed {
            cmd.env("TASKLIST_SEED", seed.join("|"));
        }

        if let Some(path) = &config.config_path {
            cmd.arg("--config").arg(path);
        }

        let output: fn() -> Stdio = if config.show_output {
            Stdio::inherit
        } else {
            Stdio::null
        };
        cmd.stdout(output()).stderr(output());

        let child = cmd.spawn().map_err(|e| {
            E2eError::ServerStartup(format!(
                "Failed to spawn {}: {}",
                config.binary_path.display(),
                e
            ))
        })?;

        let mut handle = ServerHandle {
            child,
            base_url: base_url.clone(),
            port,
        };

        // Wait for server to be healthy
        handle.wait_for_healthy(config.startup_timeout).await?;

        info!("Server is healthy at {}", base_url);
        Ok(handle)
    }

    /// Wait for the server to respond to health checks
    async fn wait_for_healthy(&mut self, timeout_duration: Duration) -> E2eResult<()> {
        let health_url = format!("{}/health", self.base_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            if let Some(status) = self.child.try_wait()? {
                return Err(E2eError::ServerStartup(format!(
                    "Server exited during startup with {}",
                    status
                )));
            }

            match client.get(&health_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Health check returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for server to start...");
                    }
                    // Connection refused is expected while server is starting
                    if !e.is_connect() {
                        warn!("Health check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(100)).await;
        }

        Err(E2eError::ServerHealthCheck(attempts))
    }

    /// Get the base URL for this server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop the server
    pub fn stop(&mut self) -> E2eResult<()> {
        if self.child.try_wait()?.is_some() {
            return Ok(());
        }

        info!("Stopping server (pid: {})", self.child.id());

        // Try graceful shutdown first
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                // Give it a moment to shut down gracefully
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        // Force kill if still running
        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Configuration for spawning a server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the tasklist-web binary
    pub binary_path: PathBuf,

    /// Optional TOML config passed via --config
    pub config_path: Option<PathBuf>,

    /// Seed tasks (None = server default)
    pub seed: Option<Vec<String>>,

    /// Port to listen on (None = find free port)
    pub port: Option<u16>,

    /// Timeout for server startup
    pub startup_timeout: Duration,

    /// RUST_LOG value for the server process
    pub log_filter: String,

    /// Forward server stdout/stderr to this process
    pub show_output: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            config_path: None,
            seed: None,
            port: None,
            startup_timeout: Duration::from_secs(30),
            log_filter: "warn".to_string(),
            show_output: false,
        }
    }
}

/// Debug build of tasklist-web in the workspace target directory
pub fn default_binary_path() -> PathBuf {
    let target = std::env::var_os("CARGO_TARGET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../target")));
    target.join("debug").join(format!("tasklist-web{}", std::env::consts::EXE_SUFFIX))
}

/// Find a free port to use
fn find_free_port() -> E2eResult<u16> {
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_free_port() {
        let port1 = find_free_port().unwrap();
        let port2 = find_free_port().unwrap();

        // Ports should be in valid range
        assert!(port1 > 1024);
        assert!(port2 > 1024);
    }

    #[test]
    fn test_default_binary_path() {
        let path = default_binary_path();
        assert!(path.to_string_lossy().contains("tasklist-web"));
    }

    #[tokio::test]
    async fn test_spawn_missing_binary() {
        let config = ServerConfig {
            binary_path: PathBuf::from("/nonexistent/tasklist-web"),
            ..Default::default()
        };
        let result = ServerHandle::spawn(config).await;
        assert!(matches!(result, Err(E2eError::ServerBinaryNotFound(_))));
    }
}
