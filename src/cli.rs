use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "ghrm", version, about = "GitHub repository cleanup TUI")]
pub struct Cli {
    /// Initial search term (uses the search endpoint)
    #[arg(short, long)]
    pub search: Option<String>,

    /// Repositories per page (10, 30, 50 or 100)
    #[arg(short, long, default_value_t = 30)]
    pub per_page: u32,

    /// Disable desktop notifications for batch results
    #[arg(long)]
    pub no_notify: bool,

    /// Write debug logs to the state directory
    #[arg(long)]
    pub verbose: bool,
}
