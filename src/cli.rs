//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// modoos - study-group recruitment backend
#[derive(Parser, Debug)]
#[command(name = "modoos")]
#[command(version)]
#[command(about = "Backend for the modoos study-group recruitment platform", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Run database migrations and exit
    Migrate,

    /// Write a sample configuration file
    GenerateConfig {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn command(&self) -> &Commands {
        self.command.as_ref().unwrap_or(&Commands::Serve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::parse_from(["modoos"]);
        assert_eq!(cli.command(), &Commands::Serve);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["modoos", "migrate", "-c", "/etc/modoos.toml"]);
        assert_eq!(cli.command(), &Commands::Migrate);
        assert_eq!(cli.config.as_deref(), Some("/etc/modoos.toml"));
    }

    #[test]
    fn test_generate_config_args() {
        let cli = Cli::parse_from(["modoos", "generate-config", "out.toml", "--force"]);
        assert_eq!(
            cli.command(),
            &Commands::GenerateConfig {
                output_path: Some("out.toml".into()),
                force: true
            }
        );
    }
}
