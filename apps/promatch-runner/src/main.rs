use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = promatch_runner::Args::parse();
	promatch_runner::run(args).await
}
