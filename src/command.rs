//! Check orchestration.
//!
//! An [`Orchestrator`] wraps a [`CheckingService`] for one invocation. It
//! validates options, keeps the progress bar paired with the batch that
//! opened it, and hands the results to [`render`].

use crate::checker::{CheckScope, CheckingService, IgnoreList, ItemReport};
use crate::error::{CheckError, CommandError, FieldError};
use crate::model::{Package, PackageType};
use crate::output::{render, FieldSet, OutputFormat, Rendered};
use crate::progress::{Progress, ProgressReporter, SharedProgress};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Validated per-command options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    pub format: OutputFormat,
    pub fields: FieldSet,
    pub ignore: IgnoreList,
}

impl CheckOptions {
    /// Builds options from raw command line values.
    ///
    /// `fields` is only validated for formats that display fields; `ids` and
    /// `count` accept anything.
    ///
    /// ```
    /// use soter::{CheckOptions, OutputFormat};
    ///
    /// let err = CheckOptions::parse(OutputFormat::Json, Some("foo,id,bar"), None).unwrap_err();
    /// assert_eq!(err.to_string(), "foo, bar are not valid fields");
    ///
    /// assert!(CheckOptions::parse(OutputFormat::Count, Some("foo"), None).is_ok());
    /// ```
    pub fn parse(
        format: OutputFormat,
        fields: Option<&str>,
        ignore: Option<&str>,
    ) -> Result<Self, FieldError> {
        let fields = match fields {
            Some(list) if format.uses_fields() => FieldSet::parse(list)?,
            _ => FieldSet::default(),
        };

        Ok(Self {
            format,
            fields,
            ignore: ignore.map(IgnoreList::parse).unwrap_or_default(),
        })
    }

    pub fn with_ignored<I, S>(mut self, slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(slugs);
        self
    }
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            fields: FieldSet::default(),
            ignore: IgnoreList::new(),
        }
    }
}

pub struct Orchestrator<S: CheckingService> {
    service: S,
    progress: SharedProgress,
    in_batch: Rc<Cell<bool>>,
}

impl<S: CheckingService> Orchestrator<S> {
    pub fn new(service: S, reporter: Box<dyn ProgressReporter>) -> Self {
        Self::with_progress(service, Progress::shared(reporter))
    }

    /// Uses an existing progress handle, which may be shared with other
    /// orchestrators.
    pub fn with_progress(mut service: S, progress: SharedProgress) -> Self {
        let ticker = Rc::clone(&progress);
        service.register_post_check_callback(Box::new(move |_: &ItemReport<'_>| {
            // A closed bar ignores ticks, so single checks pass straight through.
            ticker.borrow_mut().tick();
        }));
        let in_batch = Rc::new(Cell::new(false));
        let batch_flag = Rc::clone(&in_batch);
        service.register_post_check_callback(Box::new(move |report: &ItemReport<'_>| {
            log_item(report, batch_flag.get())
        }));

        Self {
            service,
            progress,
            in_batch,
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn progress(&self) -> &SharedProgress {
        &self.progress
    }

    pub fn check_single(
        &self,
        package: &Package,
        options: &CheckOptions,
    ) -> Result<Rendered, CommandError> {
        if package.slug.trim().is_empty() {
            return Err(CheckError::EmptySlug {
                package_type: package.package_type,
            }
            .into());
        }

        debug!(
            package_type = package.package_type.as_str(),
            slug = %package.slug,
            version = package.version.as_deref().unwrap_or("installed"),
            "Checking package"
        );
        let vulnerabilities = self.service.check_package(package)?;
        render(&vulnerabilities, options.format, &options.fields)
    }

    pub fn check_plugin(
        &self,
        slug: &str,
        version: Option<&str>,
        options: &CheckOptions,
    ) -> Result<Rendered, CommandError> {
        let package = Package::plugin(slug).with_optional_version(version.map(str::to_string));
        self.check_single(&package, options)
    }

    pub fn check_theme(
        &self,
        slug: &str,
        version: Option<&str>,
        options: &CheckOptions,
    ) -> Result<Rendered, CommandError> {
        let package = Package::theme(slug).with_optional_version(version.map(str::to_string));
        self.check_single(&package, options)
    }

    /// Checks a core release; the slug is derived from `version`.
    pub fn check_wordpress(
        &self,
        version: &str,
        options: &CheckOptions,
    ) -> Result<Rendered, CommandError> {
        self.check_single(&Package::wordpress(version), options)
    }

    /// Checks every installed package of one class.
    pub fn check_batch(
        &self,
        package_type: PackageType,
        options: &CheckOptions,
    ) -> Result<Rendered, CommandError> {
        self.run_batch(CheckScope::from(package_type), options)
    }

    /// Checks all plugins, all themes and the core.
    pub fn check_site(&self, options: &CheckOptions) -> Result<Rendered, CommandError> {
        self.run_batch(CheckScope::Site, options)
    }

    fn run_batch(
        &self,
        scope: CheckScope,
        options: &CheckOptions,
    ) -> Result<Rendered, CommandError> {
        let total = self.service.count(scope, &options.ignore)?;
        debug!(
            scope = scope.as_str(),
            total,
            ignored = options.ignore.len(),
            "Starting batch check"
        );

        let opened = options.format.shows_progress();
        if opened {
            self.progress.borrow_mut().open(total as u64)?;
        }

        self.in_batch.set(true);
        let result = self.service.check_scope(scope, &options.ignore);
        self.in_batch.set(false);

        if opened {
            self.progress.borrow_mut().finish();
        }

        let vulnerabilities = result?;
        render(&vulnerabilities, options.format, &options.fields)
    }
}

/// Per-item failures are only warned about inside a batch, which carries on
/// without them. A failed single check is returned to the caller instead.
fn log_item(report: &ItemReport<'_>, in_batch: bool) {
    let package = report.package;
    match report.outcome {
        Ok(found) => debug!(
            package_type = package.package_type.as_str(),
            slug = %package.slug,
            found = found.len(),
            "Checked package"
        ),
        Err(e) if !in_batch => debug!(
            package_type = package.package_type.as_str(),
            slug = %package.slug,
            error = %e,
            "Check failed"
        ),
        Err(e) => warn!(
            "Skipping {} '{}': {}",
            package.package_type.as_str(),
            package.slug,
            e
        ),
    }
}
