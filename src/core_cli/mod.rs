use clap::Parser;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mountftpd", about = "An FTP server over mountable partitions.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    pub config: String,

    /// Password required by PASS, overrides the configuration file
    #[arg(long)]
    pub password: Option<String>,

    /// Control port, overrides the configuration file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
