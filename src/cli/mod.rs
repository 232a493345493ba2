pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "memestream")]
#[command(about = "An image-only meme feed service", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/memestream/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to listen on, overriding the config file
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Fetch one feed page and print it as JSON
    Feed {
        /// Cursor returned by the previous page
        #[arg(short, long)]
        after: Option<String>,
    },
    /// Caption a template
    Caption {
        /// Template ID
        #[arg(short, long)]
        template: String,

        /// One text per box, in box order
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Print suggested text positions for a template
    Positions {
        /// Template ID
        template_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_caption() {
        let cli = Cli::parse_from(["memestream", "caption", "--template", "61579", "one", "two"]);
        match cli.command {
            Commands::Caption { template, texts } => {
                assert_eq!(template, "61579");
                assert_eq!(texts, vec!["one", "two"]);
            }
            _ => panic!("expected caption"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["memestream", "feed", "--config", "/tmp/m.toml", "--after", "cycle-1-0"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/m.toml")));
        match cli.command {
            Commands::Feed { after } => assert_eq!(after.as_deref(), Some("cycle-1-0")),
            _ => panic!("expected feed"),
        }
    }

    #[test]
    fn test_caption_needs_text() {
        assert!(Cli::try_parse_from(["memestream", "caption", "--template", "1"]).is_err());
    }
}
