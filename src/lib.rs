//! Check installed WordPress plugins, themes and core releases against a
//! vulnerability database.
//!
//! The [`Orchestrator`] drives a [`CheckingService`] for single packages,
//! whole package classes or an entire site, shows progress for long batch
//! checks and renders the findings in one of six [`OutputFormat`]s.
//!
//! ```
//! use soter::checker::{LocalChecker, VulnerabilityDatabase};
//! use soter::progress::BarReporter;
//! use soter::{CheckOptions, Orchestrator, OutputFormat, Package};
//!
//! let database = VulnerabilityDatabase::from_json(
//!     r#"{"plugins": {"akismet": {"vulnerabilities": [{"id": 8215, "title": "Stored XSS", "fixed_in": "3.1.5"}]}}}"#,
//! )?;
//! let installed = vec![Package::plugin("akismet").with_version("3.1.4")];
//! let orchestrator = Orchestrator::new(
//!     LocalChecker::new(database, installed),
//!     Box::new(BarReporter::new()),
//! );
//!
//! let options = CheckOptions::parse(OutputFormat::Ids, None, None)?;
//! let rendered = orchestrator.check_plugin("akismet", None, &options)?;
//! assert_eq!(rendered.as_str(), "8215");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod checker;
pub mod command;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod output;
pub mod progress;
pub mod scanner;

pub use checker::{CheckScope, CheckingService, IgnoreList, ItemReport};
pub use command::{CheckOptions, Orchestrator};
pub use config::Config;
pub use error::{CheckError, CommandError, FieldError, ProgressError};
pub use model::{core_slug, Package, PackageType, Vulnerability, VulnerabilityCollection};
pub use output::{FieldSet, OutputFormat, Rendered};
pub use scanner::Scanner;
