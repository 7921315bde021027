#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = edusphere::run().await {
        eprintln!("edusphere fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
