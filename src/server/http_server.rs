//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use log::{debug, error, info, warn};

use crate::parser::{parse_request, request_length};
use crate::router::RouteTable;
use crate::server::config::ServerConfig;
use crate::server::dispatcher::Dispatcher;
use crate::server::error::Error;
use crate::server::response::{HttpResponse, StatusCode};

/// An HTTP server dispatching every connection's single request through a
/// shared [`Dispatcher`].
pub struct HttpServer {
    /// The server configuration.
    pub config: ServerConfig,
    dispatcher: Arc<Dispatcher>,
}

impl HttpServer {
    /// Create a server for a fully registered route table.
    ///
    /// The table is frozen from here on; routes cannot be added while serving.
    pub fn new(config: ServerConfig, routes: RouteTable) -> Self {
        let mut dispatcher = Dispatcher::new(routes);
        if let Some(dir) = &config.static_dir {
            dispatcher = dispatcher.with_static_dir(dir);
        }

        Self {
            config,
            dispatcher: Arc::new(dispatcher),
        }
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Log the registered endpoints.
    fn display_server_info(&self) {
        let routes = self.dispatcher.routes();
        info!("Registered endpoints ({count}):", count = routes.len());
        for route in routes.routes() {
            info!("  {method} {pattern}", method = route.method(), pattern = route.pattern());
        }
        if let Some(dir) = self.dispatcher.static_dir() {
            info!("Serving static files from {dir}", dir = dir.display());
        }
    }

    /// Set up the TCP listener.
    async fn setup_listener(&self) -> Result<TcpListener, Error> {
        let listener = TcpListener::bind(&self.config.addr).await?;
        info!("Server listening on http://{addr}", addr = self.config.addr);
        Ok(listener)
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(shutdown_tx: mpsc::Sender<()>, tasks: &mut JoinSet<()>) {
        tasks.spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    let _ = shutdown_tx.send(()).await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Spawn a task for a freshly accepted connection, or turn it away when
    /// the connection limit is reached.
    async fn handle_new_connection(&self, mut socket: TcpStream, addr: SocketAddr, semaphore: &Arc<Semaphore>, tasks: &mut JoinSet<()>) {
        let permit = match semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("Connection limit reached, rejecting connection from {addr}");
                let response = HttpResponse::new(StatusCode::ServiceUnavailable)
                    .with_content_type("text/plain")
                    .with_header("Connection", "close")
                    .with_body_string("Server is at capacity, please try again later");
                let _ = socket.write_all(&response.to_bytes()).await;
                return;
            }
        };

        let dispatcher = self.dispatcher.clone();
        let read_buffer_size = self.config.read_buffer_size;
        let max_request_size = self.config.max_request_size;

        tasks.spawn(async move {
            // Released when the task completes.
            let _permit = permit;

            if let Err(e) = Self::handle_connection(&mut socket, &dispatcher, read_buffer_size, max_request_size).await {
                warn!("Error handling connection from {addr}: {e}");
            }
        });
    }

    /// Handle connection errors.
    async fn handle_connection_error(e: std::io::Error) -> bool {
        error!("Error accepting connection: {e}");

        if e.kind() == std::io::ErrorKind::BrokenPipe {
            error!("Critical error accepting connection, shutting down");
            return true;
        }

        // For other errors, wait a bit before retrying
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        false
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Shutdown timed out, aborting {len} connections", len = tasks.len());
            tasks.abort_all();
        }
        info!("Server shutdown complete");
    }

    /// Start the server and listen for incoming connections until Ctrl+C.
    pub async fn start(&self) -> Result<(), Error> {
        self.display_server_info();

        let listener = self.setup_listener().await?;

        // Create a semaphore to limit concurrent connections
        let semaphore = Arc::new(Semaphore::new(self.config.max_connections));

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        // Use JoinSet to keep track of all spawned tasks
        let mut tasks = JoinSet::new();

        // The original sender stays alive for the whole loop so `recv` only
        // resolves on an actual signal.
        Self::setup_ctrl_c_handler(shutdown_tx.clone(), &mut tasks);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            debug!("Connection from {addr}");
                            self.handle_new_connection(socket, addr, &semaphore, &mut tasks).await;
                        },
                        Err(e) => {
                            if Self::handle_connection_error(e).await {
                                break;
                            }
                        }
                    }
                }
            }

            // Reap finished connection tasks so the set does not grow without bound.
            while let Some(res) = tasks.try_join_next() {
                if let Err(e) = res {
                    error!("Connection task failed: {e}");
                }
            }
        }

        Self::perform_shutdown(&mut tasks).await;

        Ok(())
    }

    /// Read one request from `socket`, bounded by `max_request_size`.
    ///
    /// Returns `Ok(None)` when the peer closed the connection without sending anything.
    async fn read_request(
        socket: &mut (impl AsyncRead + Unpin),
        read_buffer_size: usize,
        max_request_size: usize,
    ) -> Result<Option<Vec<u8>>, Error> {
        let mut buf = Vec::with_capacity(read_buffer_size);
        let mut chunk = vec![0; read_buffer_size.max(1)];

        loop {
            let n = socket.read(&mut chunk).await?;
            if n == 0 {
                return Ok((!buf.is_empty()).then_some(buf));
            }
            buf.extend_from_slice(&chunk[..n]);

            match request_length(&buf) {
                Some(total) if total > max_request_size => return Err(Error::PayloadTooLarge(max_request_size)),
                Some(total) if buf.len() >= total => return Ok(Some(buf)),
                None if buf.len() > max_request_size => return Err(Error::PayloadTooLarge(max_request_size)),
                _ => {}
            }
        }
    }

    /// Handle a single connection: read one request, dispatch it, write the response.
    ///
    /// Malformed and oversized requests are answered here and reported as
    /// errors; everything the dispatcher produces counts as success.
    pub async fn handle_connection(
        socket: &mut (impl AsyncRead + AsyncWrite + Unpin),
        dispatcher: &Dispatcher,
        read_buffer_size: usize,
        max_request_size: usize,
    ) -> Result<(), Error> {
        let outcome = match Self::read_request(socket, read_buffer_size, max_request_size).await {
            Ok(None) => return Ok(()),
            Ok(Some(bytes)) => parse_request(&bytes).map_err(Error::from),
            Err(e) => Err(e),
        };

        let (response, result) = match outcome {
            Ok(request) => (dispatcher.handle(request).await, Ok(())),
            Err(Error::IoError(e)) => return Err(Error::IoError(e)),
            Err(e) => (e.to_response(), Err(e)),
        };

        let response = response.with_header("Connection", "close");
        socket.write_all(&response.to_bytes()).await?;
        socket.flush().await?;
        result
    }
}

/// Serve `routes` on `addr` with otherwise default settings.
pub async fn serve(addr: SocketAddr, routes: RouteTable) -> Result<(), Error> {
    HttpServer::new(ServerConfig::default().with_addr(addr), routes).start().await
}
