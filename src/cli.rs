use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(name = "shoppies", version, about = "Search movies and nominate up to five of them")]
pub struct Cli {
    #[arg(
        long,
        env = "OMDB_API_KEY",
        hide_env_values = true,
        help = "OMDb API key"
    )]
    pub api_key: Option<String>,
    #[arg(long, value_name = "URL", help = "Search endpoint (default: https://www.omdbapi.com/)")]
    pub endpoint: Option<String>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Where nominations are stored (default: <data dir>/shoppies/storage.json)"
    )]
    pub data_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Configuration file (default: <config dir>/shoppies/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        long,
        value_name = "FILE",
        help = "Log file (default: <data dir>/shoppies/shoppies.log)"
    )]
    pub log_file: Option<PathBuf>,
}
