use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "groupctl")]
#[command(version)]
#[command(about = "Declarative group and membership management for Coder deployments", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Deployment URL (overrides config.toml)
    #[arg(long, env = "GROUPCTL_URL", global = true)]
    pub url: Option<String>,

    /// Session token (overrides config.toml)
    #[arg(long, env = "GROUPCTL_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Groups file describing the desired groups
    #[arg(short, long, default_value = "groups.toml", global = true)]
    pub file: String,

    /// State file (default: <state dir>/groups.state.json)
    #[arg(long, global = true)]
    pub state: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show what apply would change
    Plan(TargetArgs),

    /// Create, update and destroy groups to match the groups file
    Apply(ApplyArgs),

    /// Re-read every recorded group, dropping deleted ones
    Refresh,

    /// Start managing an existing group
    Import {
        /// Address to record the group under (e.g. group.devs)
        address: String,

        /// Group UUID or <organization>/<group>
        identifier: String,
    },

    /// Destroy recorded groups
    Destroy(DestroyArgs),

    /// Inspect or edit recorded state
    #[command(subcommand)]
    State(StateCommand),

    /// Check the groups file without contacting the deployment
    Validate,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Plan / Apply / Destroy
// ============================================================================

#[derive(Args)]
pub struct TargetArgs {
    /// Only this target: "group" or "group.<name>"
    pub target: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Only this target: "group" or "group.<name>"
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Show the plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Number of groups applied concurrently
    #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u16).range(1..=64))]
    pub jobs: u16,
}

#[derive(Args)]
pub struct DestroyArgs {
    /// Only this target: "group" or "group.<name>"
    pub target: Option<String>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// State
// ============================================================================

#[derive(Subcommand)]
pub enum StateCommand {
    /// List recorded addresses
    List,

    /// Show one recorded group
    Show {
        /// Address (e.g. group.devs)
        address: String,
    },

    /// Forget a group without deleting it remotely
    Rm {
        /// Address (e.g. group.devs)
        address: String,
    },
}
