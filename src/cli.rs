use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::types::MembershipType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "gh-team")]
#[command(about = "Look up a GitHub team and its members and repositories", version)]
#[command(after_help = "EXAMPLES:
    gh-team team platform                        Show a team with all members
    gh-team team platform --membership-type immediate
    gh-team team platform --summary-only -o json Team metadata only, as JSON")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Show detailed error information and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a team, its members and its repositories
    #[command(
        alias = "t",
        after_help = "EXAMPLES:
    gh-team team platform
    gh-team team platform --org acme --results-per-page 50
    gh-team team platform --membership-type immediate --format json"
    )]
    Team(TeamArgs),
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    gh-team completions bash > ~/.bash_completion.d/gh-team
    gh-team completions zsh > ~/.zfunc/_gh-team
    gh-team completions fish > ~/.config/fish/completions/gh-team.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    #[command(after_help = "EXAMPLES:
    gh-team init")]
    Init,
}

#[derive(Args, Debug, Clone)]
pub struct TeamArgs {
    /// Team slug (e.g., platform-eng)
    pub slug: String,

    /// Organization login (uses GITHUB_OWNER or config if not specified)
    #[arg(long)]
    pub org: Option<String>,

    /// Which members to list
    #[arg(long, value_enum, default_value_t = MembershipType::All)]
    pub membership_type: MembershipType,

    /// Only fetch team metadata, skip members and repositories
    #[arg(long)]
    pub summary_only: bool,

    /// Page size for REST listings (0 lets GitHub choose)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub results_per_page: u32,
}
