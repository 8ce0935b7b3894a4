//! Main test runner that orchestrates the server and Playwright

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info};

use crate::error::{E2eError, E2eResult};
use crate::page;
use crate::playwright::{PlaywrightConfig, PlaywrightHandle, StepResult};
use crate::server::{ServerConfig, ServerHandle};
use crate::spec::TestSpec;

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running all tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn from_results(results: Vec<TestResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }
}

/// Main E2E test runner
pub struct TestRunner {
    /// Server configuration
    server_config: ServerConfig,

    /// Playwright configuration
    playwright_config: PlaywrightConfig,

    /// Running server handle (if any)
    server: Option<ServerHandle>,

    /// Test specs directory
    specs_dir: PathBuf,

    /// Output directory for results
    output_dir: PathBuf,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            server_config: config.server,
            playwright_config: config.playwright,
            server: None,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// Start the server
    pub async fn start_server(&mut self) -> E2eResult<()> {
        if self.server.is_some() {
            return Ok(()); // Already running
        }

        let server = ServerHandle::spawn(self.server_config.clone()).await?;

        // Update playwright config with actual server URL
        self.playwright_config.base_url = server.base_url().to_string();

        self.server = Some(server);
        Ok(())
    }

    /// Stop the server
    pub fn stop_server(&mut self) -> E2eResult<()> {
        if let Some(mut server) = self.server.take() {
            server.stop()?;
        }
        Ok(())
    }

    /// Load the YAML specs from the specs directory
    pub fn load_specs(&self) -> E2eResult<Vec<TestSpec>> {
        TestSpec::load_all(&self.specs_dir)
    }

    /// Specs from `source`, narrowed to `name` and `tag` when given.
    /// YAML specs come first, then the page object scenarios.
    pub fn select_specs(
        &self,
        source: SpecSource,
        name: Option<&str>,
        tag: Option<&str>,
    ) -> E2eResult<Vec<TestSpec>> {
        let mut specs = Vec::new();
        if matches!(source, SpecSource::Yaml | SpecSource::All) {
            specs.extend(self.load_specs()?);
        }
        if matches!(source, SpecSource::Pom | SpecSource::All) {
            specs.extend(page::scenarios());
        }

        if let Some(name) = name {
            specs.retain(|s| s.name == name);
        }
        if let Some(tag) = tag {
            specs = TestSpec::filter_by_tag(&specs, tag).into_iter().cloned().collect();
        }
        Ok(specs)
    }

    /// Run a list of test specs
    pub async fn run_specs(&mut self, specs: &[TestSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::new();

        // Ensure server is running
        self.start_server().await?;

        info!("Running {} test(s)...", specs.len());

        for spec in specs {
            let result = match self.run_spec(spec).await {
                Ok(result) => result,
                Err(e) => TestResult {
                    name: spec.name.clone(),
                    success: false,
                    duration_ms: 0,
                    steps: vec![],
                    error: Some(e.to_string()),
                },
            };

            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let suite = TestSuiteResult::from_results(results, start.elapsed().as_millis() as u64);

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );

        Ok(suite)
    }

    /// Run a single test spec
    pub async fn run_spec(&self, spec: &TestSpec) -> E2eResult<TestResult> {
        let start = Instant::now();
        debug!("Running test: {}", spec.name);

        let playwright = PlaywrightHandle::new(self.playwright_config.clone())?;
        let steps = playwright.run_spec(spec).await?;

        let failed = steps.iter().find(|s| !s.success).map(|s| {
            E2eError::StepFailed {
                step: s.step_name.clone(),
                reason: s.error.clone().unwrap_or_default(),
            }
            .to_string()
        });
        let incomplete = failed.is_none() && steps.len() < spec.steps.len();

        let error = failed.or_else(|| {
            incomplete.then(|| format!("only {} of {} steps ran", steps.len(), spec.steps.len()))
        });

        Ok(TestResult {
            name: spec.name.clone(),
            success: error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error,
        })
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_server();
    }
}

/// Where [`TestRunner::select_specs`] takes specs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SpecSource {
    /// YAML specs from the specs directory
    Yaml,
    /// Scenarios written with the page object
    Pom,
    All,
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub server: ServerConfig,
    pub playwright: PlaywrightConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            playwright: PlaywrightConfig::default(),
            specs_dir: default_specs_dir(),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// YAML specs shipped with this crate
pub fn default_specs_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/specs"))
}
