//! Application execution logic.
//!
//! One run reads the template and the previously generated file, probes every
//! interface with a dynamic section, decides what changed, and then does
//! nothing, resets decrementing lifetimes, or regenerates and reloads.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use thiserror::Error;

use radvd_regen::config::ValidatedConfig;
use radvd_regen::diff::{Differ, Verdict};
use radvd_regen::generator::{OutputError, generate, write_atomically};
use radvd_regen::notify::{Notifier, NotifyError, PidFileNotifier};
use radvd_regen::parser::{ParseError, parse_document};
use radvd_regen::probe::{AddressProbe, IpCommandProbe, ProbeError, fold_into};
use radvd_regen::session::{Mode, Session};

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to read the template.
    #[error("Failed to read template '{}': {source}", path.display())]
    ReadTemplate {
        /// Template path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The previously generated file exists but could not be read.
    #[error("Failed to read current configuration '{}': {source}", path.display())]
    ReadCurrent {
        /// Generated configuration path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A document has an unparsable header.
    #[error("{0}")]
    Parse(#[source] ParseError),

    /// Live addresses could not be read.
    #[error("Failed to probe addresses: {0}")]
    Probe(#[source] ProbeError),

    /// The generated configuration could not be written.
    #[error("Failed to write configuration: {0}")]
    Write(#[source] OutputError),

    /// The daemon could not be signalled.
    #[error("Failed to notify radvd: {0}")]
    Notify(#[source] NotifyError),
}

/// Runtime options extracted from validated config.
#[derive(Debug, Clone)]
struct RunOptions {
    template: PathBuf,
    output: PathBuf,
    threshold: u32,
    dry_run: bool,
}

impl From<&ValidatedConfig> for RunOptions {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            template: config.template.clone(),
            output: config.output.clone(),
            threshold: config.threshold,
            dry_run: config.dry_run,
        }
    }
}

/// Executes one regeneration run with the system probe and notifier.
///
/// # Errors
///
/// Returns an error if any fatal step fails. The generated configuration is
/// left untouched unless the new content was written completely.
pub fn execute(config: &ValidatedConfig) -> Result<Verdict, RunError> {
    tracing::info!(
        "Triggered by '{}' on {}",
        config.event,
        config.interface
    );

    let probe = IpCommandProbe::new(config.ip_command.as_str());
    let notifier = PidFileNotifier::new(&config.pid_file);
    execute_with(&RunOptions::from(config), &probe, &notifier)
}

/// Executes one run against the given collaborators.
fn execute_with<P, N>(options: &RunOptions, probe: &P, notifier: &N) -> Result<Verdict, RunError>
where
    P: AddressProbe,
    N: Notifier,
{
    let template = read_template(&options.template)?;
    let current = read_current(&options.output)?;

    let mut session = Session::new();
    parse_document(
        &mut session,
        &template,
        Mode::Source,
        &options.template.display().to_string(),
    )
    .map_err(RunError::Parse)?;
    parse_document(
        &mut session,
        &current,
        Mode::Current,
        &options.output.display().to_string(),
    )
    .map_err(RunError::Parse)?;

    probe_dynamic_interfaces(&mut session, probe)?;

    let report = Differ::new(&session, options.threshold).check();
    let verdict = report.verdict();
    tracing::info!("Verdict: {verdict}");

    match verdict {
        Verdict::Unchanged => {}
        Verdict::Reset => reset(options, notifier)?,
        Verdict::Reload => {
            let output = generate(&session, &template);
            if options.dry_run {
                tracing::debug!("Generated configuration:\n{output}");
                tracing::info!(
                    "Dry run: not writing {} and not reloading radvd",
                    options.output.display()
                );
                return Ok(verdict);
            }

            write_atomically(&options.output, &output).map_err(RunError::Write)?;
            tracing::info!("Regenerated {}", options.output.display());

            notifier.reload().map_err(RunError::Notify)?;
            if report.reset_after_reload() {
                reset(options, notifier)?;
            }
        }
    }

    Ok(verdict)
}

fn reset<N: Notifier>(options: &RunOptions, notifier: &N) -> Result<(), RunError> {
    if options.dry_run {
        tracing::info!("Dry run: not resetting radvd lifetimes");
        return Ok(());
    }
    notifier.reset().map_err(RunError::Notify)
}

/// Probes every interface whose template section holds the placeholder.
fn probe_dynamic_interfaces<P: AddressProbe>(
    session: &mut Session,
    probe: &P,
) -> Result<(), RunError> {
    let interfaces: Vec<String> = session.dynamic_interfaces().map(String::from).collect();

    for iface in &interfaces {
        let probed = probe.probe(iface).map_err(RunError::Probe)?;
        tracing::debug!("{iface}: {} live prefix(es)", probed.len());
        fold_into(session, iface, &probed);
    }
    Ok(())
}

fn read_template(path: &Path) -> Result<String, RunError> {
    std::fs::read_to_string(path).map_err(|source| RunError::ReadTemplate {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads the previously generated file; a missing file reads as empty.
fn read_current(path: &Path) -> Result<String, RunError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(
                "{} does not exist yet, treating it as empty",
                path.display()
            );
            Ok(String::new())
        }
        Err(source) => Err(RunError::ReadCurrent {
            path: path.to_path_buf(),
            source,
        }),
    }
}
