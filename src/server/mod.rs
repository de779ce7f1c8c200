//! Server module entry
//!
//! Hosts a `SyntheticHandler` on a TCP listener. `TestServer` binds an
//! ephemeral loopback port for client tests; the binary uses the same type
//! with a configured address.

pub mod connection;
pub mod listener;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::behavior::BehaviorOption;
use crate::error::Result;
use crate::handler::{ServeState, SyntheticHandler};
use crate::logger;

pub use listener::create_reusable_listener;

/// A running synthetic server. Dropping it stops the accept loop.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl TestServer {
    /// Serve the given options on an ephemeral loopback port
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<I>(options: I) -> Result<Self>
    where
        I: IntoIterator<Item = BehaviorOption>,
    {
        let handler = SyntheticHandler::from_options(options)?;
        Self::bind(SocketAddr::from(([127, 0, 0, 1], 0)), ServeState::new(handler), true)
    }

    /// Serve `state` on `addr`
    pub fn bind(addr: SocketAddr, state: ServeState, keep_alive: bool) -> Result<Self> {
        let listener = create_reusable_listener(addr)?;
        let addr = listener.local_addr()?;
        let shutdown = Arc::new(Notify::new());

        let task = tokio::spawn(accept_loop(
            listener,
            Arc::new(state),
            Arc::clone(&shutdown),
            keep_alive,
        ));

        Ok(Self {
            addr,
            shutdown,
            task: Some(task),
        })
    }

    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL, e.g. `http://127.0.0.1:40123`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    /// Connections already being served finish on their own.
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                logger::log_error(&format!("Accept loop ended abnormally: {e}"));
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    state: Arc<ServeState>,
    shutdown: Arc<Notify>,
    keep_alive: bool,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(stream, peer_addr, &state, keep_alive);
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = shutdown.notified() => break,
        }
    }
}

/// Run `f` against a fresh server for `options`, then shut it down
///
/// ```no_run
/// # async fn demo() -> grabtest::Result<()> {
/// use grabtest::behavior::content_length;
///
/// let url = grabtest::with_test_server([content_length(128)], |url| async move {
///     // point a client at `url`
///     url
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_test_server<I, F, Fut, T>(options: I, f: F) -> Result<T>
where
    I: IntoIterator<Item = BehaviorOption>,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = T>,
{
    let server = TestServer::start(options)?;
    let output = f(server.url()).await;
    server.shutdown().await;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::content_length;
    use crate::error::{BehaviorError, ServerError};

    #[tokio::test]
    async fn test_start_binds_loopback() {
        let server = TestServer::start([content_length(16)]).unwrap();
        assert!(server.addr().ip().is_loopback());
        assert_eq!(server.url(), format!("http://{}", server.addr()));
        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_start_rejects_invalid_options() {
        let err = TestServer::start([content_length(-1)]).unwrap_err();
        assert!(matches!(
            err,
            ServerError::Behavior(BehaviorError::InvalidContentLength(-1))
        ));
    }

    #[tokio::test]
    async fn test_shutdown_stops_accepting() {
        let server = TestServer::start(Vec::new()).unwrap();
        let addr = server.addr();
        server.shutdown().await;
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
