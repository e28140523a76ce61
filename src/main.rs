#[tokio::main]
async fn main() {
    if let Err(e) = hawk_loader::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
