//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, LogFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "playdist",
    bin_name = "playdist",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Lay out the dependencies of a Play! application",
    long_about = "Playdist places modules and libraries of a Play! 1.x application \
                  into its directory, or assembles a standalone distribution.",
    after_help = "EXAMPLES:\n\
        \x20 playdist deps --clean\n\
        \x20 playdist dist --id prod --classifier linux\n\
        \x20 playdist modules --id prod --format json\n\
        \x20 playdist completions bash > /usr/share/bash-completion/completions/playdist",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract modules and copy libraries into the application directory.
    #[command(
        visible_alias = "dependencies",
        about = "Place dependencies into the application",
        after_help = "EXAMPLES:\n\
            \x20 playdist deps\n\
            \x20 playdist deps --clean --overwrite\n\
            \x20 playdist deps --skip-jars"
    )]
    Deps(DepsArgs),

    /// Assemble a standalone distribution.
    #[command(
        about = "Assemble a standalone distribution",
        after_help = "EXAMPLES:\n\
            \x20 playdist dist --id prod\n\
            \x20 playdist dist --archive-name shop --classifier linux\n\
            \x20 playdist dist --dep-excludes org.example.dev --no-archive"
    )]
    Dist(DistArgs),

    /// Show how modules are classified and activated.
    #[command(
        visible_alias = "ls",
        about = "List modules and their activation",
        after_help = "EXAMPLES:\n\
            \x20 playdist modules\n\
            \x20 playdist modules --id prod --format json\n\
            \x20 playdist modules --mode deps"
    )]
    Modules(ModulesArgs),

    /// Initialise a Playdist configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 playdist init\n\
            \x20 playdist --config ./playdist.toml init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 playdist completions bash > ~/.local/share/bash-completion/completions/playdist\n\
            \x20 playdist completions zsh  > ~/.zfunc/_playdist\n\
            \x20 playdist completions fish > ~/.config/fish/completions/playdist.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Playdist configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 playdist config get dist.output_dir\n\
            \x20 playdist config list\n\
            \x20 playdist config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Where the application and its resolved dependencies are.
#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Application root (contains `conf/application.conf`).
    #[arg(
        short = 'b',
        long = "base-dir",
        value_name = "DIR",
        help = "Application root directory"
    )]
    pub base_dir: Option<PathBuf>,

    /// Resolved-dependency manifest (JSON or TOML).
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "FILE",
        help = "Resolved dependency manifest"
    )]
    pub manifest: Option<PathBuf>,
}

// ── deps ──────────────────────────────────────────────────────────────────────

/// Arguments for `playdist deps`.
#[derive(Debug, Args)]
pub struct DepsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Remove `modules/` and `lib/` first.
    #[arg(long = "clean", help = "Remove modules/ and lib/ before placing")]
    pub clean: bool,

    /// Re-extract and re-copy regardless of timestamps.
    #[arg(long = "overwrite", help = "Overwrite up-to-date files")]
    pub overwrite: bool,

    /// Only extract modules.
    #[arg(long = "skip-jars", help = "Do not copy libraries")]
    pub skip_jars: bool,

    /// Fail on the first module name conflict.
    #[arg(long = "strict", help = "Treat module name conflicts as errors")]
    pub strict: bool,

    /// Do nothing.
    #[arg(long = "skip", env = "PLAYDIST_DEPS_SKIP", help = "Skip this command")]
    pub skip: bool,
}

// ── dist ──────────────────────────────────────────────────────────────────────

/// Arguments for `playdist dist`.
#[derive(Debug, Args)]
pub struct DistArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Profile id selecting `%<id>.` configuration keys.
    #[arg(long = "id", value_name = "PROFILE", help = "Configuration profile id")]
    pub profile: Option<String>,

    /// Directory receiving the staging tree and the archive.
    #[arg(
        short = 'o',
        long = "output-dir",
        value_name = "DIR",
        help = "Output directory"
    )]
    pub output_dir: Option<PathBuf>,

    /// Archive base name (defaults to `application.name`).
    #[arg(long = "archive-name", value_name = "NAME", help = "Archive name")]
    pub archive_name: Option<String>,

    /// Suffix appended to the archive name.
    #[arg(long = "classifier", value_name = "CLASSIFIER", help = "Archive classifier")]
    pub classifier: Option<String>,

    /// Application resources to include (comma-separated globs).
    #[arg(long = "app-includes", value_name = "GLOBS")]
    pub app_includes: Option<String>,

    /// Application resources to exclude (comma-separated globs).
    #[arg(long = "app-excludes", value_name = "GLOBS")]
    pub app_excludes: Option<String>,

    /// Dependencies to include (comma-separated `group:name:type:version` patterns).
    #[arg(long = "dep-includes", value_name = "PATTERNS")]
    pub dep_includes: Option<String>,

    /// Dependencies to exclude (comma-separated `group:name:type:version` patterns).
    #[arg(long = "dep-excludes", value_name = "PATTERNS")]
    pub dep_excludes: Option<String>,

    /// Leave the staging tree as the deliverable.
    #[arg(long = "no-archive", help = "Do not create the zip archive")]
    pub no_archive: bool,

    /// Fail on the first module name conflict.
    #[arg(long = "strict", help = "Treat module name conflicts as errors")]
    pub strict: bool,

    /// Do nothing.
    #[arg(long = "skip", env = "PLAYDIST_DIST_SKIP", help = "Skip this command")]
    pub skip: bool,
}

// ── modules ───────────────────────────────────────────────────────────────────

/// Arguments for `playdist modules`.
#[derive(Debug, Args)]
pub struct ModulesArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Profile id selecting `%<id>.` configuration keys.
    #[arg(long = "id", value_name = "PROFILE", help = "Configuration profile id")]
    pub profile: Option<String>,

    /// Which command's activation rules to apply.
    #[arg(long = "mode", value_enum, default_value = "dist")]
    pub mode: ModeArg,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Activation rules for `modules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// As `playdist dist` would place them.
    Dist,
    /// As `playdist deps` would place them.
    Deps,
}

/// Output format for the `modules` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON document.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `playdist init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `playdist completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `playdist config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `dist.output_dir`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
