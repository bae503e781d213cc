//! The single-file rename flow.
//!
//! Stages run strictly in order:
//! `Validating → DetectingType → Gating → Reading → Generating → Sanitizing →
//! ResolvingCollision → Confirming → Renaming`, with dry-run stopping right
//! after the proposal is shown. Any error aborts the run; the rename is the
//! only mutation and always happens last.

use std::fmt;
use std::future::{self, Future};
use std::path::Path;
use std::pin::Pin;
use tracing::{debug, info};

use crate::{
    console::Ui,
    errors::RenameError,
    file_analyzer::FileSystem,
    mime_gate,
    models::{RenameOutcome, RenameRequest},
    naming,
    providers::NameGenerator,
};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    DetectingType,
    Gating,
    Reading,
    Generating,
    Sanitizing,
    ResolvingCollision,
    Confirming,
    Renaming,
    DryRunSkipped,
    Done,
    Aborted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Validating => "validating",
            Stage::DetectingType => "detecting-type",
            Stage::Gating => "gating",
            Stage::Reading => "reading",
            Stage::Generating => "generating",
            Stage::Sanitizing => "sanitizing",
            Stage::ResolvingCollision => "resolving-collision",
            Stage::Confirming => "confirming",
            Stage::Renaming => "renaming",
            Stage::DryRunSkipped => "dry-run-skipped",
            Stage::Done => "done",
            Stage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

pub struct RenamePipeline<'a, F, G, U> {
    fs: &'a F,
    generator: &'a G,
    ui: &'a mut U,
    dry_run: bool,
    stage: Stage,
    interrupt: Pin<Box<dyn Future<Output = ()> + 'a>>,
}

impl<'a, F, G, U> RenamePipeline<'a, F, G, U>
where
    F: FileSystem,
    G: NameGenerator,
    U: Ui,
{
    pub fn new(fs: &'a F, generator: &'a G, ui: &'a mut U, dry_run: bool) -> Self {
        Self {
            fs,
            generator,
            ui,
            dry_run,
            stage: Stage::Validating,
            interrupt: Box::pin(interrupted()),
        }
    }

    /// Replaces the Ctrl-C listener. Once `signal` resolves, a pending model
    /// call or confirmation prompt aborts with `RenameError::Interrupted`.
    pub fn with_interrupt(mut self, signal: impl Future<Output = ()> + 'a) -> Self {
        self.interrupt = Box::pin(signal);
        self
    }

    /// Last stage entered; `Aborted` after a failed run.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub async fn run(&mut self, path: &Path) -> Result<RenameOutcome, RenameError> {
        let result = self.run_stages(path).await;
        match &result {
            Ok(_) => self.enter(Stage::Done),
            Err(e) => {
                debug!(failed_at = %self.stage, error = %e, "rename aborted");
                self.enter(Stage::Aborted);
            }
        }
        result
    }

    fn enter(&mut self, stage: Stage) {
        debug!(%stage, "pipeline stage");
        self.stage = stage;
    }

    async fn run_stages(&mut self, path: &Path) -> Result<RenameOutcome, RenameError> {
        self.enter(Stage::Validating);
        if !self.fs.exists(path) {
            return Err(RenameError::NotFound(path.to_path_buf()));
        }

        self.enter(Stage::DetectingType);
        let mime_type = self
            .fs
            .detect_mime_type(path)
            .map_err(|source| RenameError::TypeDetection {
                path: path.to_path_buf(),
                source,
            })?;
        self.ui.print_detected_type(&mime_type);

        self.enter(Stage::Gating);
        mime_gate::is_allowed(&mime_type)?;

        self.enter(Stage::Reading);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.ui.print_analyzing(&file_name);
        let content = self.fs.read(path).map_err(|source| RenameError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let request = RenameRequest::new(path, content, mime_type);

        self.enter(Stage::Generating);
        let proposal = tokio::select! {
            generated = self.generator.generate(&request) => generated?,
            _ = &mut self.interrupt => return Err(RenameError::Interrupted),
        };
        debug!(proposed = %proposal.filename, "model proposal received");

        self.enter(Stage::Sanitizing);
        let sanitized = naming::sanitize(&proposal.filename);

        self.enter(Stage::ResolvingCollision);
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let fs = self.fs;
        let resolved = naming::resolve_collision(&sanitized, |name| fs.exists(&dir.join(name)))?;

        self.ui
            .print_proposal(&file_name, resolved.as_str(), &proposal.reasoning);

        if self.dry_run {
            self.enter(Stage::DryRunSkipped);
            self.ui.print_dry_run();
            return Ok(RenameOutcome::DryRun { proposed: resolved });
        }

        self.enter(Stage::Confirming);
        let confirmed = tokio::select! {
            answer = self.ui.confirm("Rename?") => answer?,
            _ = &mut self.interrupt => return Err(RenameError::Interrupted),
        };
        if !confirmed {
            self.ui.print_cancelled();
            return Ok(RenameOutcome::Cancelled { proposed: resolved });
        }

        self.enter(Stage::Renaming);
        let target = dir.join(resolved.as_str());
        self.fs
            .rename(path, &target)
            .map_err(|source| RenameError::Rename {
                from: path.to_path_buf(),
                to: target.clone(),
                source,
            })?;
        info!(from = %path.display(), to = %target.display(), "file renamed");
        self.ui.print_success(resolved.as_str());

        Ok(RenameOutcome::Renamed {
            from: path.to_path_buf(),
            to: target,
        })
    }
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        future::pending::<()>().await;
    }
}
