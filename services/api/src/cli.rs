use crate::demo::{
    run_demo, run_listing_export, run_listing_report, run_region_assess, run_region_grade,
    DemoArgs, ListingExportArgs, ListingReportArgs, RegionAssessArgs, RegionGradeArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tenant_note::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tenant Note",
    about = "Score, filter, and map rental listings and neighbourhood grades",
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
    /// Generate, filter, and report synthetic listings
    Listings {
        #[command(subcommand)]
        command: ListingsCommand,
    },
    /// Simulate or assess neighbourhood grades
    Regions {
        #[command(subcommand)]
        command: RegionsCommand,
    },
    /// Walk through generation, filtering, clustering, and region grading
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ListingsCommand {
    /// Print the filtered listing view with scores and SWOT tags
    Report(ListingReportArgs),
    /// Write the filtered view as CSV
    Export(ListingExportArgs),
}

#[derive(Subcommand, Debug)]
enum RegionsCommand {
    /// Grade one region, or every region in a GeoJSON file, for a view mode
    Grade(RegionGradeArgs),
    /// Derive base grades from an indicator CSV
    Assess(RegionAssessArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Fix the listing generator seed
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Listings {
            command: ListingsCommand::Report(args),
        } => run_listing_report(args),
        Command::Listings {
            command: ListingsCommand::Export(args),
        } => run_listing_export(args),
        Command::Regions {
            command: RegionsCommand::Grade(args),
        } => run_region_grade(args).await,
        Command::Regions {
            command: RegionsCommand::Assess(args),
        } => run_region_assess(args),
        Command::Demo(args) => run_demo(args),
    }
}
