use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(e) = valuenum_server::start_server().await {
        error!("{e}");
        eprintln!("valuenum-server: {e}");
        std::process::exit(1);
    }
}
