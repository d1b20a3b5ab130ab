//! CLI module for the chat relay
//!
//! Provides subcommands for running the relay:
//! - `serve`: HTTP server (default when no subcommand is given)

pub mod serve;

use clap::{Parser, Subcommand};

/// Chat Relay - forwards browser chat requests to an LLM provider
#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve(serve::ServeArgs::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["chat-relay"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(Command::default(), Command::Serve(_)));
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["chat-relay", "serve", "--host", "127.0.0.1", "--port", "9000"])
                .unwrap();

        let Some(Command::Serve(args)) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(9000));
    }
}
