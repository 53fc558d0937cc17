//! Jolly CLI entry point.
//!
//! ```text
//! jolly compile <INPUT>... [-o DIR] [--stdout]   compile files, directories or globs
//! jolly check <INPUT>...                         validate without writing
//! jolly run <FILE> [--runtime node]              compile and execute
//! ```

use std::fs;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use jolly::error_msg::ansi;
use jolly::JollyCompiler;

const SOURCE_EXTENSION: &str = "jolly";

#[derive(Parser)]
#[command(name = "jolly")]
#[command(about = "Compile Jolly source to JavaScript", version)]
struct Cli {
    /// Disable coloured diagnostics
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile Jolly files to JavaScript
    Compile {
        /// Glob patterns, files, or directories (searched recursively for .jolly files)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory for compiled files [default: current directory]
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print compiled JavaScript instead of writing files
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },

    /// Validate Jolly files without writing output
    Check {
        /// Glob patterns, files, or directories (searched recursively for .jolly files)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Compile a Jolly file and run it
    Run {
        /// Path to the .jolly file
        file: PathBuf,

        /// JavaScript runtime used to execute the output
        #[arg(long, default_value = "node")]
        runtime: String,
    },
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("jolly=info".parse()?))
        .init();

    let cli = Cli::parse();
    let color = !cli.no_color
        && std::env::var_os("NO_COLOR").is_none()
        && std::io::stderr().is_terminal();
    let compiler = JollyCompiler::new();

    match cli.command {
        Commands::Compile { inputs, out, stdout } => {
            let files = discover_sources(&inputs)?;
            if let Some(dir) = &out {
                prepare_output_dir(dir)?;
            }

            let mut failures = 0;
            for file in &files {
                let Some(compiled) = compile_file(&compiler, file, color)? else {
                    failures += 1;
                    continue;
                };

                if stdout {
                    let mut handle = std::io::stdout().lock();
                    writeln!(handle, "{}", compiled)?;
                } else {
                    let target = output_path(file, out.as_deref());
                    fs::write(&target, compiled)
                        .with_context(|| format!("failed to write {}", target.display()))?;
                    info!("{} -> {}", file.display(), target.display());
                }
            }

            finish(failures, files.len(), color)
        }

        Commands::Check { inputs } => {
            let files = discover_sources(&inputs)?;
            let mut failures = 0;
            for file in &files {
                match compile_file(&compiler, file, color)? {
                    Some(_) => info!("{} ok", file.display()),
                    None => failures += 1,
                }
            }
            finish(failures, files.len(), color)
        }

        Commands::Run { file, runtime } => {
            if !file.is_file() || file.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
                bail!("{} is not a .{} file", file.display(), SOURCE_EXTENSION);
            }
            let Some(compiled) = compile_file(&compiler, &file, color)? else {
                return Ok(ExitCode::FAILURE);
            };

            let mut script = tempfile::Builder::new()
                .prefix("jolly-")
                .suffix(".js")
                .tempfile()
                .context("failed to create temporary script")?;
            script.write_all(compiled.as_bytes())?;
            script.flush()?;

            debug!(runtime = runtime.as_str(), script = %script.path().display(), "executing");
            let status = Command::new(&runtime)
                .arg(script.path())
                .status()
                .with_context(|| format!("failed to start `{}`", runtime))?;

            // The temporary script is removed when `script` drops
            let code = status.code().unwrap_or(1);
            Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
        }
    }
}

/// Compile one file. A compile error is reported on stderr and yields `None`;
/// I/O errors propagate.
fn compile_file(compiler: &JollyCompiler, file: &Path, color: bool) -> Result<Option<String>> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let label = file.display().to_string();

    match compiler.compile(&source, &label) {
        Ok(compiled) => Ok(Some(compiled)),
        Err(err) => {
            warn!(file = label.as_str(), code = err.code(), "compile failed");
            eprintln!("{}", err.render(color));
            Ok(None)
        }
    }
}

fn finish(failures: usize, total: usize, color: bool) -> Result<ExitCode> {
    if failures > 0 {
        let (style, reset) = if color { (ansi::BOLD_RED, ansi::RESET) } else { ("", "") };
        eprintln!("{}error{}: {} of {} file(s) failed to compile", style, reset, failures, total);
        return Ok(ExitCode::FAILURE);
    }
    info!("{} file(s) compiled", total);
    Ok(ExitCode::SUCCESS)
}

/// Expand inputs into a sorted, de-duplicated list of source files.
///
/// Files are taken as given whatever their extension; directories are
/// searched recursively for `.jolly` files. Anything else is a glob pattern
/// (`src/**/*.jolly`), which must match at least one file.
fn discover_sources(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_dir(input, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            collect_glob(input, &mut files)?;
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        bail!("no .{} files found", SOURCE_EXTENSION);
    }
    debug!(count = files.len(), "discovered sources");
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            collect_dir(&path, files)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION) {
            files.push(path);
        }
    }
    Ok(())
}

fn collect_glob(pattern: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let Some(pattern) = pattern.to_str() else {
        bail!("no such file or directory: {}", pattern.display());
    };

    let before = files.len();
    let entries = glob::glob(pattern).with_context(|| format!("invalid glob pattern `{}`", pattern))?;
    for entry in entries {
        let path = entry.with_context(|| format!("failed to expand `{}`", pattern))?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.len() == before {
        bail!("no such file, directory, or matching files: {}", pattern);
    }
    debug!(pattern, matched = files.len() - before, "expanded glob");
    Ok(())
}

fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        bail!("{} exists and is not a directory", dir.display());
    }
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

/// `<stem>.js`, inside `out_dir` or the current directory
fn output_path(file: &Path, out_dir: Option<&Path>) -> PathBuf {
    let file_name = Path::new(file.file_stem().unwrap_or(file.as_os_str())).with_extension("js");
    match out_dir {
        Some(dir) => dir.join(file_name),
        None => file_name,
    }
}
