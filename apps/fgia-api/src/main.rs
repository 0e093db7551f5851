use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = fgia_api::Args::parse();

	fgia_api::run(args).await
}
