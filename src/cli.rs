//! CLI argument parsing and run dispatch

use std::env;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use deployctl::build;
use deployctl::command::SystemRunner;
use deployctl::defaults;
use deployctl::output::{summary_lines, OutputConfig};
use deployctl::pipeline::Pipeline;
use deployctl::settings::{default_launchers, BuildMode, BuildStrategy, Launcher, Settings, Tools};

/// deployctl - Build manifest-listed projects and roll out their images
#[derive(Parser, Debug)]
#[command(name = "deployctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Deployment environment (e.g. dev, staging, prod)
    #[arg(value_name = "ENV")]
    env: String,

    /// Build mode: CI (always build, no rollout) or CICD (build changed versions and roll out)
    #[arg(value_name = "BUILD_MODE")]
    build_mode: String,

    /// Repository name; selects modules/<REPO>/<ENV>/build.config.json
    #[arg(value_name = "REPO")]
    repo: String,

    /// Only process these application identifiers
    #[arg(value_name = "PROJECT")]
    projects: Vec<String>,

    /// Container registry images are tagged for and pushed to
    #[arg(long, value_name = "REGISTRY", env = "DEPLOYCTL_REGISTRY", default_value = defaults::REGISTRY)]
    registry: String,

    /// GitOps checkout holding deployment YAML (defaults to <REPO>_argocd)
    #[arg(long, value_name = "DIR", env = "DEPLOYCTL_GITOPS_DIR")]
    gitops_dir: Option<String>,

    /// Build strategy (script, direct, auto)
    #[arg(long, value_name = "STRATEGY", env = "DEPLOYCTL_STRATEGY", default_value = defaults::STRATEGY)]
    strategy: String,

    /// Ways to run build.sh, tried in order ("exec" or an interpreter such as "wsl bash")
    #[arg(long = "launcher", value_name = "LAUNCHER", env = "DEPLOYCTL_LAUNCHERS", value_delimiter = ',')]
    launchers: Vec<String>,

    /// dotnet executable used by the direct build
    #[arg(long, value_name = "PATH", env = "DEPLOYCTL_DOTNET", default_value = "dotnet")]
    dotnet_bin: String,

    /// Container engine executable used by the direct build
    #[arg(long, value_name = "PATH", env = "DEPLOYCTL_DOCKER", default_value = "docker")]
    docker_bin: String,

    /// yq executable used to patch deployment YAML
    #[arg(long, value_name = "PATH", env = "DEPLOYCTL_YQ", default_value = "yq")]
    yq_bin: String,

    /// git executable used to commit the rollout
    #[arg(long, value_name = "PATH", env = "DEPLOYCTL_GIT", default_value = "git")]
    git_bin: String,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    /// Builds the run settings from the parsed arguments.
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::new(&self.env, BuildMode::parse(&self.build_mode), &self.repo);
        settings.projects = self.projects.clone();
        settings.registry = self.registry.clone();
        if let Some(dir) = &self.gitops_dir {
            settings.gitops_dir = dir.clone();
        }
        settings.strategy = self.strategy.parse::<BuildStrategy>()?;

        let launchers = self
            .launchers
            .iter()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.parse::<Launcher>())
            .collect::<Result<Vec<_>, _>>()?;
        settings.launchers = if launchers.is_empty() {
            default_launchers()
        } else {
            launchers
        };

        settings.tools = Tools {
            dotnet: self.dotnet_bin.clone(),
            docker: self.docker_bin.clone(),
            yq: self.yq_bin.clone(),
            git: self.git_bin.clone(),
        };
        Ok(settings)
    }

    /// Execute the run
    pub fn execute(self) -> Result<()> {
        let output = OutputConfig::from_env_and_flag(&self.color);
        init_logging(&self.log_level, &output);

        let settings = self.settings()?;
        let root = env::current_dir().context("Failed to get current directory")?;

        info!(
            "Starting build process for {} in {} environment with mode {}",
            settings.repo, settings.env, settings.mode
        );
        if settings.projects.is_empty() {
            info!("Building all projects");
        } else {
            info!("Building specific projects: {}", settings.projects.join(", "));
        }
        info!("Current directory: {}", root.display());

        let runner = SystemRunner;
        let builder = build::builder_for(&settings, &runner);
        let summary = Pipeline::new(&root, &settings, &runner, builder.as_ref()).run()?;

        println!();
        for line in summary_lines(&output, &summary) {
            println!("{}", line);
        }

        if summary.exit_code() != 0 {
            anyhow::bail!("One or more builds failed");
        }
        Ok(())
    }
}

/// Route `log` records to stdout at the requested level.
///
/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level: &str, output: &OutputConfig) {
    let style = if output.use_color {
        env_logger::WriteStyle::Always
    } else {
        env_logger::WriteStyle::Never
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stdout)
        .write_style(style)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
