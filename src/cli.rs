use crate::config::load_config;
use crate::metrics::{CharTableMetrics, FontMetrics, SystemFontMetrics};
use crate::wire::{DiagramRequest, GeometryDoc, layout_request};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "tmap", version, about = "Thinking-map layout engine")]
pub struct Args {
    /// Input request (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output geometry file. Defaults to stdout.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config JSON5 file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Pretty-print the geometry JSON
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Measure labels against real system fonts instead of the built-in table
    #[arg(long = "system-fonts")]
    pub system_fonts: bool,

    /// Font family used with --system-fonts
    #[arg(long = "font-family", default_value = "sans-serif")]
    pub font_family: String,
}

pub fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let request: DiagramRequest = json5::from_str(&input)
        .map_err(|err| anyhow::anyhow!("invalid diagram request: {err}"))?;

    let metrics: Box<dyn FontMetrics> = if args.system_fonts {
        let system = SystemFontMetrics::from_system(&args.font_family).ok_or_else(|| {
            anyhow::anyhow!("no system font matches family `{}`", args.font_family)
        })?;
        Box::new(system)
    } else {
        Box::new(CharTableMetrics)
    };

    let result = layout_request(request, &config, metrics.as_ref())?;
    for warning in &result.warnings {
        log::warn!("{warning}");
    }

    let json = GeometryDoc::from_result(&result).to_json(args.pretty)?;
    match args.output {
        Some(path) => std::fs::write(&path, json.as_bytes())
            .map_err(|err| anyhow::anyhow!("failed to write {}: {err}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path
        && path != Path::new("-")
    {
        return std::fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("failed to read {}: {err}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
