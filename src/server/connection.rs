// Connection handling module
// Serves a single accepted TCP connection with hyper

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::handler::{self, ServeState};
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// This function:
/// 1. Wraps the TCP stream in `TokioIo`
/// 2. Serves HTTP/1.1 on it with the synthetic handler
/// 3. Bounds the whole connection by the configured timeout
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServeState>,
    keep_alive: bool,
) {
    logger::log_connection_accepted(&peer_addr);

    let state = Arc::clone(state);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let timeout = state.connection_timeout;

        let service_state = Arc::clone(&state);
        let service = service_fn(move |req| {
            let response = handler::handle_request(&req, &service_state, peer_addr);
            async move { Ok::<_, Infallible>(response) }
        });

        let conn = http1::Builder::new()
            .keep_alive(keep_alive)
            .serve_connection(io, service);

        match tokio::time::timeout(timeout, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_connection_timeout(timeout.as_secs()),
        }
    });
}
