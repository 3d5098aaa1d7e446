//! Package Reserver - Main orchestrator for name reservation
//!
//! Drives the safe-staging pipeline:
//! Stager -> Substitutor -> Finalizer -> Pruner -> Publisher -> Recorder.
//! The staged workspace is removed on every path, success or failure,
//! before the outcome is reported; the original project tree is never
//! mutated (the recorder rewrites only the reservation log).

use crate::core::error::ReserveError;
use crate::core::request::ReservationRequest;
use crate::core::state_machine::{ReservationState, ReservationStateMachine};
use crate::core::traits::{PublishOutcome, RegistryClient};
use crate::manifest::finalizer::ManifestFinalizer;
use crate::orchestration::recorder::OutcomeRecorder;
use crate::registry::npm::{PublishFailureKind, classify_failure};
use crate::staging::pruner::PublishPruner;
use crate::staging::stager::{StagedWorkspace, WorkspaceStager};
use crate::staging::substitutor::{PlaceholderSubstitutor, ReplacementMap};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

/// Options passed from the CLI
#[derive(Debug, Clone, Default)]
pub struct ReserveOptions {
    /// Skip the pre-publish confirmation prompt
    pub assume_yes: bool,

    /// Non-interactive mode (CI/CD); never prompts
    pub non_interactive: bool,
}

/// Report returned after a reservation run
#[derive(Debug, Clone)]
pub struct ReservationReport {
    pub id: String,
    pub success: bool,
    pub package_name: String,
    pub state: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
    pub reserved_at: Option<DateTime<Utc>>,
}

/// Main reservation orchestrator
pub struct PackageReserver {
    project_path: PathBuf,
    registry: Box<dyn RegistryClient>,
    state_machine: ReservationStateMachine,
}

impl PackageReserver {
    /// Create a new PackageReserver for a template project
    pub fn new<P: AsRef<Path>>(project_path: P, registry: Box<dyn RegistryClient>) -> Self {
        Self {
            project_path: project_path.as_ref().to_path_buf(),
            registry,
            state_machine: ReservationStateMachine::new(),
        }
    }

    /// Run the full reservation pipeline
    ///
    /// Validation happens before any filesystem mutation. Once staging has
    /// produced a workspace, that workspace is removed on every exit path
    /// before this function returns.
    pub async fn reserve(
        &mut self,
        request: ReservationRequest,
        options: ReserveOptions,
    ) -> anyhow::Result<ReservationReport> {
        let start_time = Instant::now();
        let mut warnings = Vec::new();

        request.validate()?;

        println!("📦 Staging workspace...");
        let stager = WorkspaceStager::new(&self.project_path);
        let staged = stager.stage().await?;
        self.state_machine.transition(ReservationState::Staged);
        println!("  ✅ Staged at {}\n", staged.root().display());

        let pipeline_result = self
            .run_pipeline(&staged, &request, &options, &mut warnings)
            .await;

        // Cleanup runs on every path; a failure here is a warning only,
        // the original tree is unaffected either way.
        if let Err(e) = staged.cleanup() {
            eprintln!("⚠️  Failed to remove staged workspace: {}", e);
            warnings.push(format!("Cleanup failed: {}", e));
        }
        self.state_machine.transition(ReservationState::CleanedUp);

        let duration_ms = start_time.elapsed().as_millis() as u64;
        match pipeline_result {
            Ok(true) => {
                self.state_machine.transition(ReservationState::Done);
                Ok(ReservationReport {
                    id: Uuid::new_v4().to_string(),
                    success: true,
                    package_name: request.package_name,
                    state: self.state_machine.state().as_str().to_string(),
                    errors: Vec::new(),
                    warnings,
                    duration_ms,
                    reserved_at: Some(Utc::now()),
                })
            }
            Ok(false) => {
                self.state_machine.transition(ReservationState::Failed);
                Ok(ReservationReport {
                    id: Uuid::new_v4().to_string(),
                    success: false,
                    package_name: request.package_name,
                    state: self.state_machine.state().as_str().to_string(),
                    errors: vec!["Reservation cancelled by user".to_string()],
                    warnings,
                    duration_ms,
                    reserved_at: None,
                })
            }
            Err(e) => {
                self.state_machine.transition(ReservationState::Failed);
                Err(e)
            }
        }
    }

    /// Pipeline stages between staging and cleanup
    ///
    /// Returns `Ok(false)` when the user declines the confirmation.
    async fn run_pipeline(
        &mut self,
        staged: &StagedWorkspace,
        request: &ReservationRequest,
        options: &ReserveOptions,
        warnings: &mut Vec<String>,
    ) -> anyhow::Result<bool> {
        println!("🔄 Replacing placeholders...");
        let substitutor = PlaceholderSubstitutor::new(ReplacementMap::for_request(request));
        let rewritten = substitutor.substitute_tree(staged.root()).await?;
        self.state_machine.transition(ReservationState::Substituted);
        println!("  ✅ {} file(s) rewritten\n", rewritten);

        println!("📝 Finalizing manifest...");
        let finalizer = ManifestFinalizer::new();
        if finalizer.finalize(staged.root(), request).await? {
            println!("  ✅ package.json finalized\n");
        } else {
            warnings.push("package.json missing or unparseable".to_string());
            println!("  ⚠️  package.json missing or unparseable (publish will surface it)\n");
        }
        self.state_machine.transition(ReservationState::Finalized);

        println!("🧹 Pruning non-publishable paths...");
        let pruner = PublishPruner::from_project_root(&self.project_path).await?;
        let removed = pruner.prune(staged.root()).await?;
        self.state_machine.transition(ReservationState::Pruned);
        println!("  ✅ {} path(s) removed\n", removed);

        let should_confirm = !options.non_interactive && !options.assume_yes;
        if should_confirm {
            println!("📋 Reservation checklist:");
            println!("  ✅ Registry: {}", self.registry.name());
            println!("  ✅ Package: {}", request.package_name);
            println!("  ✅ Author: {}", request.username);
            println!();

            if !self.confirm("Proceed with publishing?").await? {
                println!("Reservation cancelled by user");
                return Ok(false);
            }
        }

        println!("📤 Publishing placeholder...");
        let outcome = self.registry.publish(staged.root()).await?;
        self.state_machine.transition(ReservationState::Published);

        if !outcome.success() {
            let error = match classify_failure(&outcome) {
                PublishFailureKind::NameConflict => ReserveError::NameConflict {
                    name: request.package_name.clone(),
                },
                PublishFailureKind::Forbidden => ReserveError::PublishForbidden {
                    message: last_output_line(&outcome),
                },
                PublishFailureKind::Other => ReserveError::PublishFailed {
                    exit_code: outcome.exit_code,
                    message: last_output_line(&outcome),
                },
            };
            return Err(error.into());
        }
        println!("  ✅ Published\n");

        let recorder = OutcomeRecorder::new(&self.project_path);
        match recorder.record(&request.package_name).await {
            Ok(()) => {
                self.state_machine.transition(ReservationState::Recorded);
                println!("📒 Logged to {}\n", recorder.log_path().display());
            }
            Err(e) => {
                eprintln!("⚠️  Failed to update reservation log: {}", e);
                warnings.push(format!("Log update failed: {}", e));
            }
        }

        Ok(true)
    }

    /// Prompt user for confirmation
    async fn confirm(&self, message: &str) -> anyhow::Result<bool> {
        let mut stdout = io::stdout();
        stdout
            .write_all(format!("{} (yes/no): ", message).as_bytes())
            .await?;
        stdout.flush().await?;

        let mut answer = String::new();
        BufReader::new(io::stdin()).read_line(&mut answer).await?;

        let answer = answer.trim().to_lowercase();
        Ok(answer == "yes" || answer == "y")
    }
}

/// Compact single-line summary of a failed publish for error messages
fn last_output_line(outcome: &PublishOutcome) -> String {
    outcome
        .combined_output()
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("publish command produced no output")
        .to_string()
}
