use crate::demo::{run_demo, run_step_plan, DemoArgs, StepPlanArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use visa_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Visa Intake",
    about = "Run the visa application intake service or walk through it from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the wizard steps an applicant would see
    Steps(StepPlanArgs),
    /// Fill the whole wizard for a sample applicant and print the staff dashboard
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Skip the sample clients and banner
    #[arg(long)]
    pub(crate) no_seed: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Steps(args) => run_step_plan(args),
        Command::Demo(args) => run_demo(args),
    }
}
