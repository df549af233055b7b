use clap::Parser;
use mum_cli::{config::TrainArgs, logging, pipeline::train};

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> anyhow::Result<()> {
    let args = TrainArgs::parse();
    let _guard = logging::create_logger("mum-train", "logs")?;

    let args_for_blocking = args;
    let result = tokio::task::spawn_blocking(move || train::run(&args_for_blocking)).await?;

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("mum-train: {err}");
            std::process::exit(1);
        }
    }
}
