use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = atrium_cli::Args::parse();

	atrium_cli::run(args).await
}
