use anyhow::Result;
use mailmill::cli::App;

#[tokio::main]
async fn main() -> Result<()> {
    let mut app = App::from_args().await?;
    let args = mailmill::cli::Args::parse_args();

    app.run(args).await?;

    Ok(())
}
