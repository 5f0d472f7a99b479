use taskdeck::{bootstrap, routes, server::Server};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap::register().await {
        eprintln!("Failed to bootstrap: {}", err);
        std::process::exit(1);
    }

    if let Err(err) = Server::from_config(routes::build_router()).run().await {
        tracing::error!(error = %err, "server exited");
        std::process::exit(1);
    }
}
