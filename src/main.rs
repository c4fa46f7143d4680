use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use quill::logging::init_tracing;
use quill::metrics::init_metrics;
use quill::router::init_router;
use quill::state::init_app_state;
use quill_core::errors::set_render_env;

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("❌ Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let mut state = match init_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };
    set_render_env(state.app_config.env);

    match init_metrics() {
        Ok(handle) => state.metrics = handle,
        Err(e) => error!(error = %e, "Failed to install Prometheus recorder; metrics disabled"),
    }

    let addr = state.app_config.bind_addr();
    let port = state.app_config.port;
    let app = init_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, addr = %addr, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %addr, "Server running");
    println!("🚀 Server running on http://localhost:{}", port);
    println!("📚 Swagger UI available at http://localhost:{}/swagger-ui", port);
    println!("📖 Scalar UI available at http://localhost:{}/scalar", port);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
