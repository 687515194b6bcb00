//! Headless replay CLI (native).

#[cfg(feature = "native")]
mod cli {
    use std::path::PathBuf;

    use anyhow::Context as _;
    use clap::{Parser, Subcommand};
    use fadeink_app::{ReplayOptions, ReplayScript, RunUntil, replay};
    use fadeink_core::DoodleConfig;

    #[derive(Parser, Debug)]
    #[command(name = "fadeink", version)]
    struct Cli {
        #[command(subcommand)]
        cmd: Command,
    }

    #[derive(Subcommand, Debug)]
    enum Command {
        /// Replay a scripted doodle session and print a JSON report.
        Replay(ReplayArgs),
        /// Print the effective configuration as JSON.
        Config(ConfigArgs),
    }

    #[derive(Parser, Debug)]
    struct ReplayArgs {
        /// Input script JSON.
        #[arg(long)]
        script: PathBuf,

        /// Configuration JSON. Defaults are used when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop at this simulated time (ms) instead of waiting for every fade.
        #[arg(long)]
        until: Option<f64>,

        /// Include the drawing surface call log.
        #[arg(long, default_value_t = false)]
        ops: bool,

        /// Override the fade-delay seed.
        #[arg(long)]
        seed: Option<u64>,
    }

    #[derive(Parser, Debug)]
    struct ConfigArgs {
        /// Configuration JSON to validate and print.
        #[arg(long)]
        config: Option<PathBuf>,
    }

    fn load_config(path: Option<&PathBuf>) -> anyhow::Result<DoodleConfig> {
        match path {
            Some(path) => DoodleConfig::load(path)
                .with_context(|| format!("load config '{}'", path.display())),
            None => Ok(DoodleConfig::default()),
        }
    }

    pub fn main() -> anyhow::Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        match cli.cmd {
            Command::Replay(args) => cmd_replay(args),
            Command::Config(args) => cmd_config(args),
        }
    }

    fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
        let mut config = load_config(args.config.as_ref())?;
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        let script = ReplayScript::load(&args.script)
            .with_context(|| format!("load script '{}'", args.script.display()))?;
        log::info!(
            "Replaying {} steps from '{}'",
            script.steps.len(),
            args.script.display()
        );

        let options = ReplayOptions {
            until: args.until.map_or(RunUntil::Settled, RunUntil::Time),
            record_ops: args.ops,
        };
        let report = replay(&config, &script, options)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }

    fn cmd_config(args: ConfigArgs) -> anyhow::Result<()> {
        let config = load_config(args.config.as_ref())?;
        println!("{}", config.to_json()?);
        Ok(())
    }
}

#[cfg(feature = "native")]
fn main() -> anyhow::Result<()> {
    cli::main()
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
