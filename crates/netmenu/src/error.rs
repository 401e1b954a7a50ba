// ── CLI error type ──

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Server(#[from] netmenu_server::ServerError),

    #[error(transparent)]
    Client(#[from] netmenu_client::ClientError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
