use crate::demo::{run_demo, run_engine_once, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand, ValueEnum};
use talentlink::engine::EngineKind;
use talentlink::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "talentlink",
    about = "Run the talentlink matching engine service and its batch scans from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service with both recurring engines (default command)
    Serve(ServeArgs),
    /// Operate on the batch engines directly
    Engine {
        #[command(subcommand)]
        command: EngineCommand,
    },
    /// Run an end-to-end demo over a seeded in-memory marketplace
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum EngineCommand {
    /// Run one engine once against the demo dataset and print its summary
    Run {
        #[arg(value_enum)]
        engine: EngineArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum EngineArg {
    AutoApply,
    TalentRadar,
}

impl From<EngineArg> for EngineKind {
    fn from(value: EngineArg) -> Self {
        match value {
            EngineArg::AutoApply => EngineKind::AutoApply,
            EngineArg::TalentRadar => EngineKind::TalentRadar,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Start with the demo marketplace instead of empty stores
    #[arg(long)]
    pub(crate) demo: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Engine {
            command: EngineCommand::Run { engine },
        } => run_engine_once(engine.into()),
        Command::Demo(args) => run_demo(args),
    }
}
