//! Clap derive structures for the `parkly` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkly -- manage your cars and parking sessions from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "parkly",
    version,
    about = "Manage cars and parking sessions from the command line",
    long_about = "A command-line client for the parking-management service.\n\n\
        Sign in once with `parkly login`; the session is kept per profile\n\
        until it expires or you run `parkly logout`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "PARKLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service base URL (overrides profile)
    #[arg(long, short = 'u', env = "PARKLY_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKLY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "PARKLY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PARKLY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session for this profile
    Login(LoginArgs),

    /// End the session for this profile
    Logout,

    /// Create an account
    Register(RegisterArgs),

    /// Show the signed-in user
    Whoami(WhoamiArgs),

    /// Manage your cars
    #[command(alias = "car")]
    Cars(CarsArgs),

    /// Start and stop parking
    #[command(alias = "park")]
    Parking(ParkingArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (defaults to the profile's email)
    #[arg(long, short = 'e')]
    pub email: Option<String>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long, short = 'e')]
    pub email: String,

    /// Additional registration fields as KEY=VALUE (repeatable)
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WhoamiArgs {
    /// Fetch the full profile and cars from the service
    #[arg(long)]
    pub remote: bool,
}

// ── Cars ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CarsArgs {
    #[command(subcommand)]
    pub command: CarsCommand,
}

#[derive(Debug, Subcommand)]
pub enum CarsCommand {
    /// List your cars
    #[command(alias = "ls")]
    List,

    /// Register a car
    Create {
        /// Manufacturer, e.g. "Toyota"
        #[arg(long)]
        brand: String,

        /// Model name
        #[arg(long)]
        model: String,

        /// Model year
        #[arg(long)]
        year: i32,

        /// License plate
        #[arg(long)]
        plate: String,
    },

    /// Remove a car
    #[command(alias = "rm")]
    Delete {
        /// Car id
        id: String,
    },
}

// ── Parking ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ParkingArgs {
    #[command(subcommand)]
    pub command: ParkingCommand,
}

#[derive(Debug, Subcommand)]
pub enum ParkingCommand {
    /// Start parking a car on a spot
    Start {
        /// Car id
        car_id: String,

        /// Parking spot id
        spot_id: String,
    },

    /// Stop parking a car
    Stop {
        /// Car id
        car_id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Show the loaded configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key, e.g. "base_url", "email", "timeout"
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
