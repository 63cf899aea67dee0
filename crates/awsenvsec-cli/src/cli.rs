//! Command-line flags

use clap::{CommandFactory, Parser};

use awsenvsec_core::config::{ConfigResult, RunConfig};
use awsenvsec_core::presenter::DESCRIPTION;
use awsenvsec_core::types::OutputMode;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "awsenvsec")]
#[command(about = DESCRIPTION, long_about = None)]
#[command(version)]
#[command(after_help = "Example: awsenvsec -p myprofile -r us-east-1 -s \"product/dev/var\" -P \"/product/dev/var\" -c -o json")]
pub struct Cli {
    /// AWS Profile (Profile Name - Optional)
    #[arg(short = 'p', long)]
    pub profile: Option<String>,

    /// AWS Region (Default: $AWS_REGION, then us-east-1)
    #[arg(short = 'r', long)]
    pub region: Option<String>,

    /// AWS Secrets Manager Path (example: "product/dev/var", default: $SM_PATH)
    #[arg(short = 's', long = "smpath", visible_alias = "sm")]
    pub secrets_path: Option<String>,

    /// AWS Parameter Store Path (example: "/product/dev/var", default: $PS_PATH)
    #[arg(short = 'P', long = "pspath", visible_alias = "ps")]
    pub parameters_path: Option<String>,

    /// Recursive Flag (used if recursion is needed in Parameter Store)
    #[arg(short = 'c', long)]
    pub recursive: bool,

    /// Output to environment file (optional: must be either "env" or "json")
    #[arg(short = 'o', long)]
    pub output: Option<String>,

    /// Print debug diagnostics to stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply the flags on top of `base`, usually `RunConfig::from_env()`
    pub fn apply(&self, base: RunConfig) -> ConfigResult<RunConfig> {
        let mut config = base
            .with_output_mode(OutputMode::parse_optional(self.output.as_deref())?)
            .with_recursive(self.recursive);

        if let Some(profile) = &self.profile {
            config = config.with_profile(profile);
        }
        if let Some(region) = &self.region {
            config = config.with_region(region);
        }
        if let Some(path) = &self.secrets_path {
            config = config.with_secrets_path(path);
        }
        if let Some(path) = &self.parameters_path {
            config = config.with_parameters_path(path);
        }

        config.validate()?;
        Ok(config)
    }

    /// Full usage text
    pub fn usage() -> String {
        Self::command().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsenvsec_core::config::ConfigError;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["awsenvsec"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-p", "ops", "-r", "eu-west-1", "-s", "product/dev", "-P", "/product/dev", "-c", "-o", "json"]);
        let config = cli.apply(RunConfig::new()).unwrap();

        assert_eq!(config.profile.as_deref(), Some("ops"));
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.secrets_filter(), Some("product/dev"));
        assert_eq!(config.parameters_prefix(), Some("/product/dev"));
        assert!(config.recursive);
        assert_eq!(config.output_mode, OutputMode::Json);
    }

    #[test]
    fn test_long_flags_and_aliases() {
        let cli = parse(&["--sm", "a/b", "--ps", "/a/b", "--output", "env", "--recursive"]);
        assert_eq!(cli.secrets_path.as_deref(), Some("a/b"));
        assert_eq!(cli.parameters_path.as_deref(), Some("/a/b"));

        let cli = parse(&["--smpath", "c/d", "--pspath", "/c/d", "--profile", "dev", "--region", "us-west-2"]);
        let config = cli.apply(RunConfig::new()).unwrap();
        assert_eq!(config.secrets_filter(), Some("c/d"));
        assert_eq!(config.region, "us-west-2");
        assert_eq!(config.output_mode, OutputMode::Export);
    }

    #[test]
    fn test_flags_override_environment_defaults() {
        let base = RunConfig::new()
            .with_region("eu-central-1")
            .with_secrets_path("env/path");

        let config = parse(&["-s", "flag/path"]).apply(base.clone()).unwrap();
        assert_eq!(config.secrets_filter(), Some("flag/path"));
        assert_eq!(config.region, "eu-central-1");

        let untouched = parse(&[]).apply(base).unwrap();
        assert_eq!(untouched.secrets_filter(), Some("env/path"));
    }

    #[test]
    fn test_invalid_output_mode() {
        let err = parse(&["-o", "yaml"]).apply(RunConfig::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOutputMode(ref v) if v == "yaml"));
    }

    #[test]
    fn test_empty_region_rejected() {
        let err = parse(&["-r", ""]).apply(RunConfig::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRegion));
    }

    #[test]
    fn test_usage_mentions_flags() {
        let usage = Cli::usage();
        assert!(usage.contains("--smpath"));
        assert!(usage.contains("--pspath"));
        assert!(usage.contains("--output"));
    }
}
