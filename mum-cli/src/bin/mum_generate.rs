use clap::Parser;
use mum_cli::{config::GenerateArgs, logging, pipeline::generate};

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> anyhow::Result<()> {
    let args = GenerateArgs::parse();
    let _guard = logging::create_logger("mum-generate", "logs")?;

    let args_for_blocking = args;
    let result = tokio::task::spawn_blocking(move || generate::run(&args_for_blocking)).await?;

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("\nmum-generate: {err}");
            std::process::exit(1);
        }
    }
}
