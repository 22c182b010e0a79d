//! Formula Drawer - command-line front end
//!
//! Collects the expression and output path from arguments or interactive
//! prompts, loads settings and hands the work to the render driver.

use anyhow::{bail, Context, Result};
use clap::Parser;
use formula::settings::{DrawerSettings, SettingsLoader, CONFIG_ENV_VAR};
use formula::{RenderBackend, RenderDriver, RenderReport};
use raster::RasterBackend;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const EXPRESSION_PROMPT: &str = "Enter expression: ";
pub const OUTPUT_PROMPT: &str = "Enter output file name: ";

#[derive(Debug, Parser)]
#[command(name = "formula-drawer", version, about = "Render a mathematical formula to an image")]
pub struct Args {
    /// Formula to render, e.g. "x^2 + \frac{1}{n}"
    #[arg(short = 'i', long = "input", value_name = "EXPRESSION")]
    pub expression: Option<String>,

    /// Image file to write; the extension picks the format (png, jpg, bmp)
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(long, value_name = "PATH", env = CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,
}

/// Everything needed for one render
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub expression: String,
    pub output: PathBuf,
}

/// Fill in whatever the arguments left out by prompting on `output`
pub fn resolve_request(
    args: &Args,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<Request> {
    let expression = match &args.expression {
        Some(expression) => expression.clone(),
        None => prompt(EXPRESSION_PROMPT, input, output)?,
    };
    let path = match &args.output {
        Some(path) => path.clone(),
        None => PathBuf::from(prompt(OUTPUT_PROMPT, input, output)?),
    };
    if path.as_os_str().is_empty() {
        bail!("no output file given");
    }

    Ok(Request {
        expression,
        output: path,
    })
}

fn prompt(message: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<String> {
    write!(output, "{}", message)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("unexpected end of input");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Settings from `config`, or defaults when none is given
pub fn load_settings(config: Option<&Path>) -> Result<DrawerSettings> {
    match config {
        Some(path) => SettingsLoader::new(path)
            .load()
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(DrawerSettings::default()),
    }
}

/// Render `request` with `backend`
pub fn render<B: RenderBackend>(
    backend: &B,
    settings: &DrawerSettings,
    request: &Request,
) -> Result<RenderReport> {
    let driver = RenderDriver::new(backend, settings);
    let report = driver.draw_formula(&request.expression, &request.output)?;
    Ok(report)
}

/// Resolve the request, load the font and render
pub fn run(args: &Args, input: &mut impl BufRead, output: &mut impl Write) -> Result<RenderReport> {
    let request = resolve_request(args, input, output)?;
    let settings = load_settings(args.config.as_deref())?;
    let backend = RasterBackend::from_settings(&settings).context("failed to load formula font")?;
    tracing::debug!(expression = %request.expression, output = %request.output.display(), "rendering");
    render(&backend, &settings, &request)
}

/// Print the outcome the way the binary reports it and return its exit status
pub fn report_outcome(
    result: &Result<RenderReport>,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> u8 {
    // Write failures on the terminal are ignored
    match result {
        Ok(report) => {
            tracing::debug!(width = report.width, height = report.height, "done");
            let _ = writeln!(stdout, "Success");
            0
        }
        Err(e) => {
            let _ = writeln!(stderr, "Error: {:#}", e);
            1
        }
    }
}
