//! Command-line interface definitions.

use clap::Parser;
use std::path::PathBuf;

/// Live markdown preview server
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Port number to listen on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    /// Render in the context of this repository (enables flavored markdown)
    #[arg(short = 'r', long, value_name = "OWNER/REPO")]
    pub context: Option<String>,

    /// GitHub Enterprise API base URL
    #[arg(short = 'u', long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Poll file modification times every N seconds instead of using OS
    /// notifications
    #[arg(long, value_name = "SECONDS")]
    pub poll: Option<u64>,

    /// Files and/or directories to watch
    #[arg(required = true, value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_with_a_single_document() {
        let cli = Cli::try_parse_from(["mdview", "README.md"]).unwrap();
        assert_eq!(cli.port, 8080);
        assert!(cli.context.is_none());
        assert!(cli.api_url.is_none());
        assert!(cli.poll.is_none());
        assert_eq!(cli.paths, vec![PathBuf::from("README.md")]);
    }

    #[test]
    fn all_flags_and_multiple_paths() {
        let cli = Cli::try_parse_from([
            "mdview",
            "-p",
            "9000",
            "-r",
            "octocat/hello-world",
            "-u",
            "https://github.example.com/api/v3",
            "--poll",
            "2",
            "a.md",
            "docs",
        ])
        .unwrap();
        assert_eq!(cli.port, 9000);
        assert_eq!(cli.context.as_deref(), Some("octocat/hello-world"));
        assert_eq!(
            cli.api_url.as_deref(),
            Some("https://github.example.com/api/v3")
        );
        assert_eq!(cli.poll, Some(2));
        assert_eq!(
            cli.paths,
            vec![PathBuf::from("a.md"), PathBuf::from("docs")]
        );
    }

    #[test]
    fn at_least_one_path_is_required() {
        assert!(Cli::try_parse_from(["mdview"]).is_err());
    }
}
