use std::{
    fs,
    io::{self, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use glsl_link::{
    bundle,
    driver::{config::ConfRoot, loader::Loader, manifest::load_manifest, register_sources},
    Module,
};
use lang_utils::{
    diagnostic::emit_pretty_diagnostics,
    span::SpanManager,
};

// === Clap === //

#[derive(Debug, Clone, Parser)]
#[command(about = "bundler for GLSL modules linked with `#pragma glslify` directives", long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Clone, Subcommand)]
enum CliCommand {
    /// Bundles entry shaders along with everything they import from disk.
    Bundle(CliBundleCommand),

    /// Bundles the modules listed in a TOML manifest.
    Manifest(CliManifestCommand),
}

#[derive(Debug, Clone, Args)]
struct CliBundleCommand {
    #[arg(required = true, name = "entry shaders")]
    entries: Vec<PathBuf>,

    #[command(flatten)]
    common: CliCommonArgs,
}

#[derive(Debug, Clone, Args)]
struct CliManifestCommand {
    #[arg(name = "path to manifest")]
    path: PathBuf,

    #[command(flatten)]
    common: CliCommonArgs,
}

#[derive(Debug, Clone, Args)]
struct CliCommonArgs {
    #[arg(short = 'c', long = "config", name = "path to config")]
    config: Option<PathBuf>,

    #[arg(short = 'o', long = "output", name = "path to output")]
    output: Option<PathBuf>,
}

// === Driver === //

fn main() -> anyhow::Result<ExitCode> {
    // Setup debug services
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("INFO"));

    // Parse arguments
    let cmd = CliArgs::parse();

    let (common, modules, conf) = match &cmd.command {
        CliCommand::Bundle(sub) => {
            let conf = ConfRoot::discover(sub.common.config.as_deref())?;
            let modules = Loader::new(conf.include_dirs.clone()).load(&sub.entries)?;
            (&sub.common, modules, conf)
        }
        CliCommand::Manifest(sub) => {
            let conf = ConfRoot::discover(sub.common.config.as_deref())?;
            let modules = load_manifest(&sub.path)?;
            (&sub.common, modules, conf)
        }
    };

    let Some(output) = do_bundle(modules, &conf)? else {
        return Ok(ExitCode::FAILURE);
    };

    match &common.output {
        Some(path) => {
            fs::write(path, &output)
                .with_context(|| format!("failed to write bundle to {path:?}"))?;
            log::info!("wrote bundle to {}", path.display());
        }
        None => {
            io::stdout()
                .lock()
                .write_all(output.as_bytes())
                .context("failed to write bundle to stdout")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Returns `None` if bundling failed, in which case the error was already reported.
fn do_bundle(modules: Vec<Module>, conf: &ConfRoot) -> anyhow::Result<Option<String>> {
    let mut spans = SpanManager::new();
    register_sources(&mut spans, &modules);

    let err = match bundle(modules, &conf.bundle_options()) {
        Ok(output) => return Ok(Some(output)),
        Err(err) => err,
    };

    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    emit_pretty_diagnostics(&mut stderr, &spans, &[err.to_diagnostic(&spans)])
        .context("failed to report bundle error")?;

    Ok(None)
}
