//! `rbxgui`: command-line front end for GUI construction scripts.
//!
//! Usage:
//!   rbxgui extract <file>                       - element forest as JSON
//!   rbxgui format <file>                        - regenerated source text
//!   rbxgui layout <file> --width W --height H   - resolved rects as JSON
//!   rbxgui hit <file> <x> <y>                   - path of the element under a point
//!   rbxgui example                              - the bundled example script
//!
//! `-` in place of a file reads stdin.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use rbxgui_editor::Document;
use rbxgui_engine::coords::{Vec2, Viewport};
use rbxgui_engine::logging::{init_logging, LoggingConfig};
use rbxgui_script::{ExtractOptions, GenerateOptions, EXAMPLE_SCRIPT};

#[derive(Parser, Debug)]
#[command(name = "rbxgui", version, about = "Inspect and rewrite Roblox GUI construction scripts")]
struct Cli {
    #[command(flatten)]
    options: Options,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Options {
    /// Binding generated scripts declare the ScreenGui under. Also accepted
    /// as a root container when reading.
    #[arg(long, global = true, value_name = "NAME")]
    root: Option<String>,

    /// Expression the generated ScreenGui is parented to.
    #[arg(long, global = true, value_name = "EXPR")]
    container: Option<String>,

    /// Largest script accepted, in bytes.
    #[arg(long = "max-len", global = true, value_name = "BYTES")]
    max_len: Option<usize>,

    /// Deepest element nesting accepted, counting root elements as 1.
    #[arg(long = "max-depth", global = true, value_name = "LEVELS")]
    max_depth: Option<usize>,

    /// Log filter, e.g. `debug` or `rbxgui_script=trace`. Defaults to `RUST_LOG`.
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the element forest as JSON.
    Extract { file: PathBuf },
    /// Print the script regenerated from its elements.
    Format { file: PathBuf },
    /// Print the resolved layout as JSON.
    Layout {
        file: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
    },
    /// Print the path of the top-most element under a point.
    Hit {
        file: PathBuf,
        x: f32,
        y: f32,
        #[arg(long, default_value_t = 800.0)]
        width: f32,
        #[arg(long, default_value_t = 600.0)]
        height: f32,
    },
    /// Print the bundled example script.
    Example,
}

impl Options {
    fn extract_options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::default();
        if let Some(root) = &self.root {
            if !options.root_containers.contains(root) {
                options.root_containers.push(root.clone());
            }
        }
        if let Some(limit) = self.max_len {
            options.max_source_len = limit;
        }
        if let Some(depth) = self.max_depth {
            options.max_depth = depth;
        }
        options
    }

    fn generate_options(&self) -> GenerateOptions {
        let mut options = GenerateOptions {
            root_containers: self.extract_options().root_containers,
            ..GenerateOptions::default()
        };
        if let Some(root) = &self.root {
            options.root_binding = root.clone();
        }
        if let Some(container) = &self.container {
            options.container_binding = container.clone();
        }
        options
    }

    fn load(&self, file: &Path) -> Result<Document> {
        let text = read_input(file)?;
        let mut doc = Document::with_options(self.extract_options(), self.generate_options());
        doc.sync_from_source(text)
            .with_context(|| format!("cannot process {}", file.display()))?;
        log::debug!("{}: {} element(s)", file.display(), doc.len());
        Ok(doc)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig::with_filter(cli.options.log.clone()));
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let options = &cli.options;
    match &cli.command {
        Command::Extract { file } => {
            let doc = options.load(file)?;
            println!("{}", serde_json::to_string_pretty(doc.forest())?);
        }
        Command::Format { file } => {
            let mut doc = options.load(file)?;
            print!("{}", doc.to_source());
        }
        Command::Layout { file, width, height } => {
            let viewport = viewport(*width, *height)?;
            let doc = options.load(file)?;
            println!("{}", serde_json::to_string_pretty(&doc.layout(viewport))?);
        }
        Command::Hit { file, x, y, width, height } => {
            let viewport = viewport(*width, *height)?;
            let doc = options.load(file)?;
            match doc.element_at(viewport, Vec2::new(*x, *y)) {
                Some(path) => println!("{}", path),
                None => log::info!("no element at ({}, {})", x, y),
            }
        }
        Command::Example => print!("{}", EXAMPLE_SCRIPT),
    }
    Ok(())
}

fn viewport(width: f32, height: f32) -> Result<Viewport> {
    let viewport = Viewport::new(width, height);
    ensure!(viewport.is_valid(), "viewport {}x{} must be positive and finite", width, height);
    Ok(viewport)
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("cannot read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("cannot read {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_flag_is_both_binding_and_container() {
        let cli = Cli::parse_from(["rbxgui", "--root", "screen", "format", "a.lua"]);
        assert!(cli.options.extract_options().root_containers.contains(&"screen".to_string()));
        let generate = cli.options.generate_options();
        assert_eq!(generate.root_binding, "screen");
        assert_eq!(generate.container_binding, "PlayerGui");
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from(["rbxgui", "extract", "-", "--max-len", "10", "--max-depth", "3"]);
        assert_eq!(cli.options.extract_options().max_source_len, 10);
        assert_eq!(cli.options.extract_options().max_depth, 3);
        assert!(matches!(cli.command, Command::Extract { ref file } if file.as_os_str() == "-"));
    }

    #[test]
    fn bad_viewport_is_an_error() {
        assert!(viewport(0.0, 10.0).is_err());
        assert!(viewport(10.0, f32::NAN).is_err());
        assert!(viewport(10.0, 10.0).is_ok());
    }
}
