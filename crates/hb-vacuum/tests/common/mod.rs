//! Test helpers: a fake vacuum web interface and log capture

#![allow(dead_code)]

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use hb_vacuum::VacuumConfig;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::subscriber::DefaultGuard;

#[derive(Clone)]
struct DeviceState {
    requests: Arc<Mutex<Vec<String>>>,
    status_response: Arc<Mutex<(StatusCode, String)>>,
    command_status: Arc<Mutex<StatusCode>>,
    delay: Arc<Mutex<Duration>>,
}

/// A local HTTP server answering like the vacuum's web interface
///
/// `/status` returns the configured status response, every other path is a
/// command and returns the configured command status. All request paths
/// are recorded.
pub struct FakeDevice {
    addr: SocketAddr,
    state: DeviceState,
}

impl FakeDevice {
    pub async fn start() -> Self {
        let state = DeviceState {
            requests: Arc::new(Mutex::new(Vec::new())),
            status_response: Arc::new(Mutex::new((
                StatusCode::OK,
                r#"{"charging":"charging"}"#.to_string(),
            ))),
            command_status: Arc::new(Mutex::new(StatusCode::OK)),
            delay: Arc::new(Mutex::new(Duration::ZERO)),
        };

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn config(&self, name: &str) -> VacuumConfig {
        VacuumConfig::new(
            name,
            self.url("/status"),
            self.url("/clean"),
            self.url("/charge"),
        )
    }

    pub fn set_status(&self, status: StatusCode, body: &str) {
        *self.state.status_response.lock().unwrap() = (status, body.to_string());
    }

    pub fn set_command_status(&self, status: StatusCode) {
        *self.state.command_status.lock().unwrap() = status;
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.state.delay.lock().unwrap() = delay;
    }

    /// Paths requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|p| p.as_str() == path).count()
    }
}

async fn handle(State(state): State<DeviceState>, uri: Uri) -> Response {
    state.requests.lock().unwrap().push(uri.path().to_string());

    let delay = *state.delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    if uri.path() == "/status" {
        let (status, body) = state.status_response.lock().unwrap().clone();
        (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
    } else {
        let status = *state.command_status.lock().unwrap();
        (status, "OK").into_response()
    }
}

/// Captured formatted log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }

    /// Lines logged at ERROR level
    pub fn errors(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains("ERROR"))
            .map(String::from)
            .collect()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture logs emitted on the current thread until the guard is dropped
///
/// `#[tokio::test]` runs on a current-thread runtime, so everything the
/// accessory logs while the test awaits it lands in the buffer.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
