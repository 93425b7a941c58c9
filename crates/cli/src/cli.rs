use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "prodshot")]
#[command(version)]
#[command(about = "Turn product photos into clean e-commerce shots")]
#[command(long_about = "\
Turn product photos into clean e-commerce shots

Each image is sent to Gemini with a fixed instruction: pure white
background, glare and dust removed, soft shadow, centered framing.
All images of a batch are processed at the same time; a failure only
affects its own image.

The API key is read from API_KEY (or GEMINI_API_KEY), also via .env.")]
pub struct Cli {
    /// Images (PNG, JPG or WEBP), or directories containing them
    pub paths: Vec<PathBuf>,

    /// Directory the edited images are written to
    #[arg(long, short, default_value = "edited")]
    pub out_dir: PathBuf,

    /// After each batch, prompt for another one (blank line quits)
    #[arg(long, short)]
    pub interactive: bool,
}
