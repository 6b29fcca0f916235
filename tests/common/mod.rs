//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use markit::config::ServiceConfig;
use markit::convert::{ConversionOutput, ConverterError, DocumentConverter};
use markit::http::HttpServer;
use markit::lifecycle::Shutdown;
use tokio::net::TcpListener;

/// What the stub saw for one call.
#[derive(Debug, Clone)]
pub struct Call {
    pub locator: String,
    /// Whether a local path existed while the converter ran.
    pub existed: bool,
}

/// Converter that never touches the network.
///
/// URLs containing `fail` return an error; local paths are echoed as
/// `# <file contents>`, or fail when the contents are `reject`.
#[derive(Default)]
pub struct StubConverter {
    calls: Mutex<Vec<Call>>,
}

impl StubConverter {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Call {
        self.calls().last().cloned().expect("converter was called")
    }
}

#[async_trait]
impl DocumentConverter for StubConverter {
    async fn convert(&self, locator: &str) -> Result<ConversionOutput, ConverterError> {
        if locator.starts_with("http") {
            self.calls.lock().unwrap().push(Call {
                locator: locator.to_string(),
                existed: false,
            });
            if locator.contains("fail") {
                return Err(ConverterError::Http {
                    url: locator.to_string(),
                    status: 404,
                });
            }
            return Ok(ConversionOutput::new(format!("# Converted\n\n{locator}")));
        }

        let path = PathBuf::from(locator);
        let content = tokio::fs::read_to_string(&path).await;
        self.calls.lock().unwrap().push(Call {
            locator: locator.to_string(),
            existed: content.is_ok(),
        });

        let content = content.map_err(|source| ConverterError::Io { path, source })?;
        if content == "reject" {
            return Err(ConverterError::Unsupported("rejected by stub".into()));
        }
        Ok(ConversionOutput::new(format!("# {content}")))
    }
}

/// A running server plus the stub behind it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub converter: Arc<StubConverter>,
    pub temp_dir: tempfile::TempDir,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port with a [`StubConverter`].
pub async fn start_server() -> TestServer {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.converter.temp_dir = Some(temp_dir.path().to_path_buf());

    let converter = Arc::new(StubConverter::default());
    let server = HttpServer::with_converter(config, converter.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        converter,
        temp_dir,
        shutdown,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Files left in the server's staging directory.
#[allow(dead_code)]
pub fn staged_files(server: &TestServer) -> usize {
    std::fs::read_dir(server.temp_dir.path()).unwrap().count()
}
