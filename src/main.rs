use std::io;

use tokio::net::TcpListener;

use mdreader::logger::Logger;
use mdreader::{AppState, Config, ReaderError};

#[tokio::main]
async fn main() -> Result<(), ReaderError> {
    if let Err(e) = Logger::init() {
        eprintln!("Logger already initialised: {}", e);
    }

    let config = Config::from_env();
    if !config.root_dir.is_dir() {
        log::error!("Root directory {:?} does not exist", config.root_dir);
        return Err(ReaderError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("root directory {:?} does not exist", config.root_dir),
        )));
    }

    let addr = config.socket_addr();
    log::info!("Serving {:?} on http://{}", config.root_dir, addr);

    let app = mdreader::app(AppState::new(config));
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await.map_err(ReaderError::from)
}
