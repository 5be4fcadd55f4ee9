pub fn run() -> anyhow::Result<()> {
    println!("askpane {}", env!("CARGO_PKG_VERSION"));
    println!("Ask a conversational assistant about highlighted text");
    Ok(())
}
