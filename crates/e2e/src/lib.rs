//! Task List E2E Test Framework
//!
//! This crate drives the task list web surface through a real browser:
//! - Spawns `tasklist-web` as a subprocess on a free port
//! - Compiles each spec into one Playwright script so state carries across steps
//! - Parses declarative YAML test specs
//! - Offers a page object ([`TaskListPage`]) for writing specs in code
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── start_server() -> ServerHandle                       │
//! │    ├── run_spec(spec: TestSpec) -> TestResult               │
//! │    └── write_results(suite) -> test-results.json            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML or TaskListPage)                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── fill { selector, value } / press { key }       │
//! │          ├── click { selector }                             │
//! │          ├── wait { selector, state }                       │
//! │          ├── assert { selector, text?, texts?, count? }     │
//! │          └── screenshot { name, selector? }                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod page;
pub mod playwright;
pub mod runner;
pub mod server;
pub mod spec;

pub use error::{E2eError, E2eResult};
pub use page::TaskListPage;
pub use runner::TestRunner;
pub use spec::{TestSpec, TestStep};
