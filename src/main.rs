#[tokio::main]
async fn main() {
    if let Err(error) = tagpress_lib::run().await {
        eprintln!("tagpress failed: {error}");
        std::process::exit(1);
    }
}
