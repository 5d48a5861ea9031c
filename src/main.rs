use anyhow::{Context, Result};
use clap::Parser;
use polynet::{init_logging, render_svg, DielineConfig, BUILD_DATE, VERSION};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "polynet")]
#[command(about = "Render a pyramid net dieline as SVG")]
struct Cli {
    /// Dieline config (.json or .toml); defaults are used when omitted
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Write the SVG here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Save the effective config to this file and exit
    #[arg(long)]
    save_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::debug!("polynet {} built {}", VERSION, BUILD_DATE);

    let config = match &cli.config {
        Some(path) => DielineConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => DielineConfig::default(),
    };

    if let Some(path) = &cli.save_config {
        config
            .save_to_file(path)
            .with_context(|| format!("saving {}", path.display()))?;
        return Ok(());
    }

    let svg = render_svg(&config)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => print!("{}", svg),
    }
    Ok(())
}
