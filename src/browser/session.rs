use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::browser::driver::{Driver, ElementState, SessionFactory};
use crate::browser::error::CheckError;
use crate::browser::locator::Locator;

/// Request sent to the driver server over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest<'a> {
    Navigate { url: &'a str },
    Title,
    Count { locator: &'a Locator },
    State { locator: &'a Locator },
    Value { locator: &'a Locator },
    Text { locator: &'a Locator },
    Clear { locator: &'a Locator },
    Type { locator: &'a Locator, text: &'a str },
    Click { locator: &'a Locator },
    ForceClick { locator: &'a Locator },
    ScrollIntoView { locator: &'a Locator },
    Dialog,
    AcceptDialog,
    Screenshot { path: &'a str },
    Quit,
}

impl BrowserRequest<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::Title => "title",
            BrowserRequest::Count { .. } => "count",
            BrowserRequest::State { .. } => "state",
            BrowserRequest::Value { .. } => "value",
            BrowserRequest::Text { .. } => "text",
            BrowserRequest::Clear { .. } => "clear",
            BrowserRequest::Type { .. } => "type",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::ForceClick { .. } => "force_click",
            BrowserRequest::ScrollIntoView { .. } => "scroll_into_view",
            BrowserRequest::Dialog => "dialog",
            BrowserRequest::AcceptDialog => "accept_dialog",
            BrowserRequest::Screenshot { .. } => "screenshot",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Response received from the driver server over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub state: Option<ElementState>,
}

/// How to start the driver server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverConfig {
    #[serde(default = "default_program")]
    pub program: String,

    #[serde(default = "default_script")]
    pub script: String,

    #[serde(default)]
    pub headless: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            script: default_script(),
            headless: false,
        }
    }
}

fn default_program() -> String { "node".to_string() }
fn default_script() -> String { "driver/browser_server.js".to_string() }

/// A browser session backed by a driver-server subprocess.
///
/// The server keeps one Chromium page open. Commands are sent as NDJSON over
/// stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the driver server and wait for its ready line.
    pub fn launch(config: &DriverConfig) -> Result<Self, CheckError> {
        let mut command = Command::new(&config.program);
        command.arg(&config.script);
        if config.headless {
            command.arg("--headless");
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| CheckError::Spawn {
                program: format!("{} {}", config.program, config.script),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| CheckError::SessionIo("failed to capture driver stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| CheckError::SessionIo("failed to capture driver stdout".into()))?;

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            closed: false,
        };

        let ready = match session.read_response("ready signal") {
            Ok(ready) => ready,
            Err(e) => {
                session.abort();
                return Err(e);
            }
        };
        if !ready.ok || ready.ready != Some(true) {
            session.abort();
            return Err(CheckError::driver(
                "launch",
                ready
                    .error
                    .unwrap_or_else(|| "did not receive ready signal".into()),
            ));
        }

        debug!(script = %config.script, headless = config.headless, "browser session ready");
        Ok(session)
    }

    /// Kill a server that never became usable.
    fn abort(&mut self) {
        self.closed = true;
        let _ = self.child.kill();
        let _ = self.child.wait();
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse, CheckError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| CheckError::SessionIo(format!("failed to read {}: {}", context, e)))?;

        if line.trim().is_empty() {
            return Err(CheckError::SessionIo(format!(
                "empty {} from driver (process may have died)",
                context
            )));
        }

        serde_json::from_str(line.trim()).map_err(|e| CheckError::Json {
            context: context.to_string(),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest<'_>) -> Result<BrowserResponse, CheckError> {
        if self.closed {
            return Err(CheckError::SessionIo("session already closed".into()));
        }

        let json = serde_json::to_string(request).map_err(|e| CheckError::Json {
            context: "browser request".into(),
            source: e,
        })?;
        trace!(request = %json, "driver request");

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| CheckError::SessionIo(format!("failed to write to driver: {}", e)))?;

        self.read_response("driver response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest<'_>) -> Result<BrowserResponse, CheckError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(CheckError::driver(
                request.name(),
                response.error.unwrap_or_else(|| "unknown error".into()),
            ));
        }
        Ok(response)
    }

    fn text_of(&mut self, request: &BrowserRequest<'_>) -> Result<String, CheckError> {
        let response = self.send_ok(request)?;
        Ok(response.text.unwrap_or_default())
    }
}

impl Driver for BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::Navigate { url })?;
        Ok(())
    }

    fn title(&mut self) -> Result<String, CheckError> {
        self.text_of(&BrowserRequest::Title)
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, CheckError> {
        let response = self.send_ok(&BrowserRequest::Count { locator })?;
        Ok(response.count.unwrap_or(0))
    }

    fn state(&mut self, locator: &Locator) -> Result<ElementState, CheckError> {
        let response = self.send_ok(&BrowserRequest::State { locator })?;
        Ok(response.state.unwrap_or_else(ElementState::absent))
    }

    fn value(&mut self, locator: &Locator) -> Result<String, CheckError> {
        self.text_of(&BrowserRequest::Value { locator })
    }

    fn text(&mut self, locator: &Locator) -> Result<String, CheckError> {
        self.text_of(&BrowserRequest::Text { locator })
    }

    fn clear(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::Clear { locator })?;
        Ok(())
    }

    fn type_text(&mut self, locator: &Locator, text: &str) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::Type { locator, text })?;
        Ok(())
    }

    fn click(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::Click { locator })?;
        Ok(())
    }

    fn force_click(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::ForceClick { locator })?;
        Ok(())
    }

    fn scroll_into_view(&mut self, locator: &Locator) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::ScrollIntoView { locator })?;
        Ok(())
    }

    fn dialog_text(&mut self) -> Result<Option<String>, CheckError> {
        let response = self.send_ok(&BrowserRequest::Dialog)?;
        Ok(response.text)
    }

    fn accept_dialog(&mut self) -> Result<(), CheckError> {
        self.send_ok(&BrowserRequest::AcceptDialog)?;
        Ok(())
    }

    fn screenshot(&mut self, path: &Path) -> Result<(), CheckError> {
        let path = path.to_string_lossy();
        self.send_ok(&BrowserRequest::Screenshot { path: &path })?;
        Ok(())
    }

    /// Idempotent; later calls are no-ops.
    fn quit(&mut self) -> Result<(), CheckError> {
        if self.closed {
            return Ok(());
        }
        // Best-effort: the server may already be gone
        let _ = self.send(&BrowserRequest::Quit);
        self.closed = true;
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.quit() {
            warn!(error = %e, "browser session cleanup failed");
        }
    }
}

/// Launches a new `BrowserSession` for every scenario.
#[derive(Debug, Clone)]
pub struct BrowserLauncher {
    config: DriverConfig,
}

impl BrowserLauncher {
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }
}

impl SessionFactory for BrowserLauncher {
    type Session = BrowserSession;

    fn create(&mut self) -> Result<BrowserSession, CheckError> {
        BrowserSession::launch(&self.config)
    }
}
