pub fn run() -> anyhow::Result<()> {
    println!("daimon {}", env!("CARGO_PKG_VERSION"));
    println!("Session watcher and risk classifier for the NOESIS stack");
    Ok(())
}
