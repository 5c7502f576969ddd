
use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use tbench::util::log;
use tbench::util::speed::CountHuman;
use tracing::{error, info};

mod args;

fn main() {
    let args = Args::parse();

    // before the runtime starts, while the local utc offset is still
    // determinate
    log::init();

    let r = run_me(args);
    if let Err(e) = r {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run_me(args: Args) -> Result<()> {
    match args.command {
        Commands::Server(mut args) => {
            args.normalize()?;
            tbench::server::run(&args.listen).await
        }
        Commands::Client(mut args) => {
            args.normalize()?;
            let report = tbench::client::run(&args.target, args.direction, args.length).await?;
            info!(
                "transferred {} bytes in {} usec",
                CountHuman(report.bytes),
                CountHuman(report.elapsed_usec)
            );
            info!("throughput {}", report.throughput);
            Ok(())
        }
    }
}
