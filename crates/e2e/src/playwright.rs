//! Playwright browser automation
//!
//! A spec is compiled into one Node script so every step runs against the same
//! page. The script prints `STEP <n> OK <ms>` after each step and a JSON
//! failure record on stderr; [`PlaywrightHandle::run_spec`] turns that output
//! back into per-step results.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::spec::{TestSpec, TestStep};

/// Playwright browser handle
pub struct PlaywrightHandle {
    config: PlaywrightConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

impl std::str::FromStr for Browser {
    type Err = E2eError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chromium" => Ok(Browser::Chromium),
            "firefox" => Ok(Browser::Firefox),
            "webkit" => Ok(Browser::Webkit),
            other => Err(E2eError::Playwright(format!("unknown browser: {}", other))),
        }
    }
}

/// Result of executing a test step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub screenshot_path: Option<PathBuf>,
}

/// Failure record the script writes to stderr
#[derive(Debug, Deserialize)]
struct ScriptFailure {
    step: usize,
    error: String,
}

impl PlaywrightHandle {
    /// Create a new Playwright handle
    pub fn new(config: PlaywrightConfig) -> E2eResult<Self> {
        std::fs::create_dir_all(&config.screenshot_dir)?;
        Ok(Self { config })
    }

    /// Check if Playwright is installed
    pub fn check_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["--no-install", "playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Build the Playwright script for a spec
    pub fn build_script(&self, spec: &TestSpec) -> String {
        let mut script = String::new();

        // Header
        script.push_str(&format!(
            r#"
const {{ chromium, firefox, webkit }} = require('playwright');
const {{ expect }} = require('@playwright/test');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = {base_url};
  let step = 0;
  let started = Date.now();

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = spec.viewport.width,
            height = spec.viewport.height,
            base_url = js_str(&self.config.base_url),
        ));

        // Generate step code
        for (i, step) in spec.steps.iter().enumerate() {
            let n = i + 1;
            script.push_str(&format!("\n    // Step {}: {}\n", n, step.label()));
            script.push_str(&format!("    step = {}; started = Date.now();\n", n));
            script.push_str(&self.step_to_js(step));
            script.push_str(&format!(
                "\n    console.log('STEP {} OK ' + (Date.now() - started));\n",
                n
            ));
        }

        // Footer
        script.push_str(
            r#"
    console.log(JSON.stringify({ success: true }));
  } catch (error) {
    console.error(JSON.stringify({ success: false, step, error: error.message }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &TestStep) -> String {
        match step {
            TestStep::Navigate { url, wait_for_selector } => {
                let wait = wait_for_selector
                    .as_ref()
                    .map(|s| format!("\n    await page.waitForSelector({});", js_str(s)))
                    .unwrap_or_default();
                format!("    await page.goto(baseUrl + {});{}", js_str(url), wait)
            }
            TestStep::Click { selector, timeout_ms } => {
                let timeout = timeout_ms.unwrap_or(5000);
                format!(
                    "    await page.locator({}).click({{ timeout: {} }});",
                    js_str(selector),
                    timeout
                )
            }
            TestStep::Fill { selector, value } => {
                format!(
                    "    await page.locator({}).fill({});",
                    js_str(selector),
                    js_str(value)
                )
            }
            TestStep::Press { selector, key } => match selector {
                Some(sel) => format!(
                    "    await page.locator({}).press({});",
                    js_str(sel),
                    js_str(key)
                ),
                None => format!("    await page.keyboard.press({});", js_str(key)),
            },
            TestStep::Wait { selector, timeout_ms, state } => {
                format!(
                    "    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});",
                    js_str(selector),
                    state.as_str(),
                    timeout_ms
                )
            }
            TestStep::Assert {
                selector,
                visible,
                text,
                text_contains,
                texts,
                value,
                count,
            } => {
                let locator = format!("page.locator({})", js_str(selector));
                let mut assertions = Vec::new();

                if let Some(vis) = visible {
                    let matcher = if *vis { "toBeVisible()" } else { "toBeHidden()" };
                    assertions.push(format!("    await expect({}).{};", locator, matcher));
                }

                if let Some(t) = text {
                    assertions.push(format!(
                        "    await expect({}).toHaveText({});",
                        locator,
                        js_str(t)
                    ));
                }

                if let Some(tc) = text_contains {
                    assertions.push(format!(
                        "    await expect({}).toContainText({});",
                        locator,
                        js_str(tc)
                    ));
                }

                if let Some(all) = texts {
                    let list = serde_json::to_string(all).unwrap_or_else(|_| "[]".to_string());
                    assertions.push(format!(
                        "    await expect({}).toHaveText({}, {{ useInnerText: true }});",
                        locator, list
                    ));
                }

                if let Some(v) = value {
                    assertions.push(format!(
                        "    await expect({}).toHaveValue({});",
                        locator,
                        js_str(v)
                    ));
                }

                if let Some(c) = count {
                    assertions.push(format!("    await expect({}).toHaveCount({});", locator, c));
                }

                assertions.join("\n")
            }
            TestStep::Screenshot { name, selector, full_page } => {
                let path = self.screenshot_path(name);
                let path_str = js_str(&path.to_string_lossy());

                match selector {
                    Some(sel) => format!(
                        "    await page.locator({}).screenshot({{ path: {} }});",
                        js_str(sel),
                        path_str
                    ),
                    None => format!(
                        "    await page.screenshot({{ path: {}, fullPage: {} }});",
                        path_str, full_page
                    ),
                }
            }
            TestStep::Log { message } => {
                format!("    console.log('[TEST] ' + {});", js_str(message))
            }
        }
    }

    fn screenshot_path(&self, name: &str) -> PathBuf {
        self.config.screenshot_dir.join(format!("{}.png", name))
    }

    /// Run a spec in one browser session and report per-step results.
    ///
    /// Steps after the first failure are not run and not reported.
    pub async fn run_spec(&self, spec: &TestSpec) -> E2eResult<Vec<StepResult>> {
        let script = self.build_script(spec);
        let output = self.run_script(&script).await?;
        Ok(self.collect_results(spec, &output.stdout, &output.stderr))
    }

    /// Execute a script via node and capture its output
    pub async fn run_script(&self, script: &str) -> E2eResult<ScriptOutput> {
        // Write script to temp file
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("test.js");
        std::fs::write(&script_path, script)?;

        debug!("Running Playwright script: {}", script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path).current_dir(temp_dir.path());
        if let Some(modules) = &self.config.node_modules_dir {
            cmd.env("NODE_PATH", modules);
        }

        let output = cmd.output().await?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() && parse_failure(&stderr).is_none() {
            return Err(E2eError::Playwright(format!(
                "Script failed:\nstdout: {}\nstderr: {}",
                stdout, stderr
            )));
        }

        for line in stdout.lines().filter(|l| l.starts_with("[TEST]")) {
            info!("{}", line);
        }

        Ok(ScriptOutput {
            stdout,
            stderr,
        })
    }

    fn collect_results(&self, spec: &TestSpec, stdout: &str, stderr: &str) -> Vec<StepResult> {
        let passed = parse_step_markers(stdout);
        let failure = parse_failure(stderr);

        let mut results = Vec::new();
        for (i, step) in spec.steps.iter().enumerate() {
            let n = i + 1;
            let screenshot_path = match step {
                TestStep::Screenshot { name, .. } => Some(self.screenshot_path(name)),
                _ => None,
            };

            if let Some(duration_ms) = passed.get(&n) {
                results.push(StepResult {
                    success: true,
                    step_name: step.label(),
                    duration_ms: *duration_ms,
                    error: None,
                    screenshot_path,
                });
                continue;
            }

            let error = match &failure {
                Some(f) if f.step == n => f.error.clone(),
                _ => "step did not complete".to_string(),
            };
            results.push(StepResult {
                success: false,
                step_name: step.label(),
                duration_ms: 0,
                error: Some(error),
                screenshot_path: None,
            });
            break;
        }

        results
    }
}

/// Captured output of a script run
#[derive(Debug, Clone)]
pub struct ScriptOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Encode a string as a JavaScript string literal
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

/// Map of completed step number to its duration in ms
fn parse_step_markers(stdout: &str) -> HashMap<usize, u64> {
    let Ok(re) = Regex::new(r"^STEP (\d+) OK (\d+)$") else {
        return HashMap::new();
    };

    stdout
        .lines()
        .filter_map(|line| re.captures(line.trim()))
        .filter_map(|caps| {
            let step = caps.get(1)?.as_str().parse().ok()?;
            let ms = caps.get(2)?.as_str().parse().ok()?;
            Some((step, ms))
        })
        .collect()
}

fn parse_failure(stderr: &str) -> Option<ScriptFailure> {
    stderr
        .lines()
        .filter(|l| l.trim_start().starts_with('{'))
        .find_map(|l| serde_json::from_str(l.trim()).ok())
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub browser: Browser,
    pub headless: bool,
    /// Directory holding `playwright` and `@playwright/test`, exported as NODE_PATH
    pub node_modules_dir: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            browser: Browser::Chromium,
            headless: true,
            node_modules_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle() -> PlaywrightHandle {
        let dir = std::env::temp_dir().join("tasklist-e2e-playwright-tests");
        PlaywrightHandle::new(PlaywrightConfig {
            screenshot_dir: dir,
            ..Default::default()
        })
        .unwrap()
    }

    fn spec(steps: Vec<TestStep>) -> TestSpec {
        TestSpec {
            name: "t".to_string(),
            description: String::new(),
            tags: vec![],
            viewport: crate::spec::Viewport { width: 800, height: 600 },
            steps,
        }
    }

    #[test]
    fn test_js_str_escapes_quotes() {
        assert_eq!(js_str(r#"it's "quoted""#), r#""it's \"quoted\"""#);
        assert_eq!(js_str("   "), r#""   ""#);
    }

    #[test]
    fn test_script_has_marker_per_step() {
        let script = handle().build_script(&spec(vec![
            TestStep::Navigate { url: "/".to_string(), wait_for_selector: None },
            TestStep::Fill { selector: "#a".to_string(), value: "x".to_string() },
        ]));

        assert!(script.contains("console.log('STEP 1 OK '"));
        assert!(script.contains("console.log('STEP 2 OK '"));
        assert!(script.contains("width: 800, height: 600"));
        assert!(script.contains(r##"await page.locator("#a").fill("x");"##));
        assert!(script.contains("require('@playwright/test')"));
    }

    #[test]
    fn test_assert_generates_each_matcher() {
        let js = handle().step_to_js(&TestStep::Assert {
            selector: "li".to_string(),
            visible: Some(false),
            text: None,
            text_contains: None,
            texts: Some(vec!["a".to_string(), "b".to_string()]),
            value: Some(String::new()),
            count: Some(2),
        });

        assert!(js.contains("toBeHidden()"));
        assert!(js.contains(r#"toHaveText(["a","b"]"#));
        assert!(js.contains(r#"toHaveValue("")"#));
        assert!(js.contains("toHaveCount(2)"));
    }

    #[test]
    fn test_collect_results_stops_at_failure() {
        let h = handle();
        let s = spec(vec![
            TestStep::Navigate { url: "/".to_string(), wait_for_selector: None },
            TestStep::Click { selector: "#b".to_string(), timeout_ms: None },
            TestStep::Log { message: "never".to_string() },
        ]);
        let stdout = "STEP 1 OK 12\n";
        let stderr = r#"{"success":false,"step":2,"error":"Timeout 5000ms exceeded"}"#;

        let results = h.collect_results(&s, stdout, stderr);

        assert_eq!(results.len(), 2);
        assert!(results[0].success);
        assert_eq!(results[0].duration_ms, 12);
        assert!(!results[1].success);
        assert_eq!(results[1].error.as_deref(), Some("Timeout 5000ms exceeded"));
    }

    #[test]
    fn test_browser_from_str() {
        assert_eq!("webkit".parse::<Browser>().unwrap(), Browser::Webkit);
        assert!("netscape".parse::<Browser>().is_err());
    }
}
