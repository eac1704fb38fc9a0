use clap::Parser;

#[derive(Parser)]
#[command(name = "tone-survey")]
#[command(version = "0.5.0")]
#[command(about = "Terminal runner for the voice-tone anxiety study survey")]
pub struct Args {
    /// Dataset repository id (overrides HF_DATASET_REPO)
    #[arg(long)]
    pub repo: Option<String>,

    /// Path of the responses file inside the dataset (overrides HF_DATASET_PATH)
    #[arg(long)]
    pub path: Option<String>,

    /// Keep everything in memory; print the resulting CSV instead of uploading
    #[arg(long)]
    pub dry_run: bool,

    /// List the voice catalog and exit
    #[arg(long)]
    pub voices: bool,
}
