mod app;
mod intake;
mod storage;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut rng = rand::rng();
    let intake = intake::run_intake(&mut rng)?;

    let app = app::App::new(intake)?;
    app.run()?;

    Ok(())
}
