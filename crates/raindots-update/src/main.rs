use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    raindots_core::init()?;

    let config = raindots_core::Config::from_env()?;
    let report = raindots_update::run(&config).await?;

    println!("{}", report.describe());
    Ok(())
}
