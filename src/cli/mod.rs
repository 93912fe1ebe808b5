//! CLI module for the cookbook server
//!
//! Provides command-line interface parsing for the cookbook-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod init;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cookbook - recipe catalogue server
///
/// Ingredients, recipes, ingredient search and favorites behind role-gated
/// JWT authentication.
#[derive(Parser, Debug)]
#[command(
    name = "cookbook-server",
    version,
    about = "Cookbook - recipe catalogue server",
    long_about = "Recipe catalogue server: ingredients, recipes composed of existing ingredients,\n\
                  search by ingredient, per-user favorites and role-gated JWT authentication.\n\n\
                  Run without arguments to start the server, or use 'init' to scaffold a new project.",
    after_help = "EXAMPLES:\n    \
                  cookbook-server init                  # Scaffold cookbook.toml and .env.example\n    \
                  cookbook-server                       # Start the server (requires cookbook.toml)\n    \
                  cookbook-server config --validate     # Check the configuration\n    \
                  cookbook-server --config my.toml      # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "cookbook.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (the default)
    Serve,

    /// Initialize a new cookbook project
    ///
    /// Creates cookbook.toml, .env.example, the data/ directory and a
    /// .gitignore.
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration information
    Config {
        /// Only validate the configuration file
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults() {
        let cli = Cli::try_parse_from(["cookbook-server"]).expect("should parse");
        assert_eq!(cli.config, PathBuf::from("cookbook.toml"));
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_init_with_force() {
        let cli = Cli::try_parse_from(["cookbook-server", "init", "demo", "--force"])
            .expect("should parse");
        match cli.command {
            Some(Commands::Init { path, force }) => {
                assert_eq!(path, PathBuf::from("demo"));
                assert!(force);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cookbook-server",
            "config",
            "--validate",
            "--config",
            "other.toml",
            "--no-color",
        ])
        .expect("should parse");

        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(cli.no_color);
        assert!(matches!(cli.command, Some(Commands::Config { validate: true })));
    }
}
