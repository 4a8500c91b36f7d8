use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "valuenum-cli", version, about = "Value Number calculator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the S- or W-formula
    Calc {
        #[command(subcommand)]
        action: commands::calc::CalcAction,
    },
    /// Stored calculations, newest first
    History {
        /// Maximum number of entries (clamped to history.max_page_size)
        #[arg(long)]
        limit: Option<usize>,
        /// Only calculations made by this caller
        #[arg(long)]
        caller: Option<String>,
    },
    /// Show one stored calculation
    Show {
        /// Calculation id
        id: String,
    },
    /// Recorded concepts-access leads
    Leads {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Bearer token issuance and inspection
    Token {
        #[command(subcommand)]
        action: commands::token::TokenAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Calc { action } => commands::calc::run(action),
        Commands::History { limit, caller } => commands::history::run(limit, caller),
        Commands::Show { id } => commands::history::show(&id),
        Commands::Leads { limit } => commands::leads::run(limit),
        Commands::Config { action } => commands::config::run(action),
        Commands::Token { action } => commands::token::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
