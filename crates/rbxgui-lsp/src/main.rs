use rbxgui_engine::logging::{init_logging, LoggingConfig};
use tower_lsp::{LspService, Server};

mod analysis;
mod backend;
mod knowledge;

use backend::Backend;

#[tokio::main]
async fn main() {
    // stdout carries the protocol; logs go to stderr without color codes.
    init_logging(LoggingConfig::with_filter(None).plain());

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();
    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
