use crate::{config::Settings, error, info, server, warning};

/// Starts the HTTP server and blocks until it stops.
///
/// `addr` overrides the configured listen address. With `open` set, the
/// default browser is pointed at the server once it is about to bind.
pub async fn serve(addr: Option<String>, open: bool) {
    let mut settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    if let Some(addr) = addr {
        settings.server_address = addr;
    }

    if !settings.static_dir.is_dir() {
        warning!(
            "Static directory {} not found, serving the API only.",
            settings.static_dir.display()
        );
    }

    if open {
        let url = format!("http://{}", settings.server_address);
        info!("Opening {} in your browser...", url);
        if let Err(e) = webbrowser::open(&url) {
            warning!("Cannot open browser: {}", e);
        }
    }

    if let Err(e) = server::start_api_server(settings).await {
        error!("Server stopped: {}", e);
    }
}
