use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use coordkit::api::create_router;
use coordkit::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "api-server")]
#[command(about = "Serve coordinate formatting, parsing and height lookups over HTTP")]
struct Args {
    /// Settings file, defaults to $COORDKIT_CONFIG
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured bind address
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() {
    coordkit::init_logging("coordkit=info,api_server=info,tower_http=info");

    let args = Args::parse();
    let settings = match Settings::discover(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            process::exit(1);
        }
    };

    let bind = args.bind.unwrap_or_else(|| settings.server.bind.clone());
    let app = create_router(Arc::new(settings));

    let listener = match tokio::net::TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", bind, e);
            process::exit(1);
        }
    };

    info!("Listening on http://{}", bind);
    info!("  GET  /api/format?x=<x>&y=<y>[&crs=][&format=][&display_crs=]");
    info!("  GET  /api/parse?text=<text>[&format=][&target_crs=]");
    info!("  GET  /api/height?x=<x>&y=<y>[&crs=][&unit=]");
    info!("  GET  /api/search?q=<text>");
    info!("  POST /api/batch/format (multipart/form-data: csv [format, crs, display_crs])");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        process::exit(1);
    }
}
