
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tbench::packet::Direction;
use tbench::util::normalize_addr;

#[derive(Parser, Debug, Clone)]
#[clap(name = "tbench", author, about = "tcp bulk-transfer throughput bench", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone)]
#[derive(Subcommand)]
pub enum Commands {
    Server(ServerArgs),
    Client(ClientArgs),
}

#[derive(Parser, Debug, Clone)]
#[clap(about = "run as server")]
pub struct ServerArgs {
    #[clap(long_help = "address to listen on, in the format of ip:port", default_value = DEFAULT_BIND)]
    pub listen: String,
}

impl ServerArgs {
    pub fn normalize(&mut self) -> Result<()> {
        self.listen = normalize_addr(&self.listen, DEFAULT_SERVER_PORT)
        .with_context(||"invalid listen address")?;
        Ok(())
    }
}

#[derive(Parser, Debug, Clone)]
#[clap(about = "run one transfer as client")]
pub struct ClientArgs {
    #[clap(long_help = "server address to connect, in the format of ip:port")]
    pub target: String,

    #[clap(long_help = "transfer direction: UL sends to the server, DL receives from it")]
    #[arg(value_enum)]
    pub direction: Direction,

    #[clap(long_help = "bytes to transfer, at most 4 GiB")]
    pub length: u64,
}

impl ClientArgs {
    pub fn normalize(&mut self) -> Result<()> {
        self.target = normalize_addr(&self.target, DEFAULT_SERVER_PORT)
        .with_context(||"invalid target")?;
        Ok(())
    }
}

pub const DEFAULT_SERVER_PORT: u16 = 6171;
pub const DEFAULT_BIND: &str = "0.0.0.0:6171";
