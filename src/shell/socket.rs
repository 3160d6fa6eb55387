use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::error::ProjectionError;
use crate::layout::{LayoutStrategy, project_with};
use crate::logging::{LogLevel, Logger, LoggingError, SHELL_TARGET, event_with_fields, json_str};
use crate::record::{Record, describe, record_json};
use crate::registry::ProjectionRegistry;

pub type ShellResult<T> = std::result::Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("no route for `{0}`")]
    NotFound(String),
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),
}

impl ShellError {
    pub fn kind(&self) -> &'static str {
        match self {
            ShellError::Io(_) => "io",
            ShellError::Decode(_) => "decode",
            ShellError::Config(_) => "config",
            ShellError::Logging(_) => "logging",
            ShellError::NotFound(_) => "not_found",
            ShellError::Projection(err) => err.kind(),
        }
    }
}

/// Handler producing the JSON body for one route.
pub type RouteHandler = Box<dyn Fn() -> ShellResult<Value> + Send + Sync>;

#[derive(Debug, Deserialize)]
struct ShellRequest {
    path: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ShellResponse {
    Ok { body: Value },
    Error { kind: String, error: String },
}

/// Route table plus a newline-delimited JSON loop over TCP.
#[derive(Default)]
pub struct SduiShell {
    routes: HashMap<String, RouteHandler>,
    logger: Option<Logger>,
}

impl SduiShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Register `handler` for `path`, replacing any earlier handler.
    pub fn route<F>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn() -> ShellResult<Value> + Send + Sync + 'static,
    {
        self.routes.insert(path.into(), Box::new(handler));
        self
    }

    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<_> = self.routes.keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    /// Run the handler for `path`.
    pub fn handle(&self, path: &str) -> ShellResult<Value> {
        let handler = self
            .routes
            .get(path)
            .ok_or_else(|| ShellError::NotFound(path.to_string()))?;
        handler()
    }

    /// Answer one request line. Failures become an error response; a partial
    /// body is never sent.
    pub fn handle_line(&self, line: &str) -> String {
        let outcome = serde_json::from_str::<ShellRequest>(line)
            .map_err(|err| ShellError::Decode(err.to_string()))
            .and_then(|request| {
                let body = self.handle(&request.path);
                self.log_outcome(&request.path, &body);
                body
            });

        let response = match outcome {
            Ok(body) => ShellResponse::Ok { body },
            Err(err) => ShellResponse::Error {
                kind: err.kind().to_string(),
                error: err.to_string(),
            },
        };
        serde_json::to_string(&response).unwrap_or_else(|err| {
            format!(r#"{{"status":"error","kind":"serialization","error":"{err}"}}"#)
        })
    }

    /// Serve one connection until the peer closes it.
    pub fn serve_connection(&self, stream: TcpStream) -> ShellResult<()> {
        stream.set_nodelay(true).ok();
        let reader = BufReader::new(stream.try_clone()?);
        let mut writer = stream;
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_line(&line);
            writer.write_all(response.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Accept connections one at a time until the listener fails.
    pub fn serve(&self, listener: TcpListener) -> ShellResult<()> {
        if let Ok(addr) = listener.local_addr() {
            self.emit(
                LogLevel::Info,
                "listening",
                [json_str("addr", addr.to_string())],
            );
        }
        for stream in listener.incoming() {
            let stream = stream?;
            if let Err(err) = self.serve_connection(stream) {
                self.emit(
                    LogLevel::Warn,
                    "connection_failed",
                    [json_str("error", err.to_string())],
                );
            }
        }
        Ok(())
    }

    fn log_outcome(&self, path: &str, outcome: &ShellResult<Value>) {
        match outcome {
            Ok(_) => self.emit(LogLevel::Info, "request", [json_str("path", path)]),
            Err(err) => self.emit(
                LogLevel::Error,
                "request_failed",
                [
                    json_str("path", path),
                    json_str("kind", err.kind()),
                    json_str("error", err.to_string()),
                ],
            ),
        }
    }

    fn emit(&self, level: LogLevel, message: &str, fields: impl IntoIterator<Item = (String, Value)>) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(level, SHELL_TARGET, message, fields));
        }
    }
}

/// Route projecting the records from `source` through `registry`.
pub fn projection_route<R, F>(
    registry: Arc<ProjectionRegistry>,
    source: F,
) -> impl Fn() -> ShellResult<Value> + Send + Sync + 'static
where
    R: Record,
    F: Fn() -> Vec<R> + Send + Sync + 'static,
{
    move || {
        let records = source();
        let tree = registry.project(&records)?;
        Ok(tree.to_value()?)
    }
}

/// Route projecting the records from `source` with `strategy`, no registry
/// binding involved.
pub fn strategy_route<R, S, F>(
    strategy: S,
    source: F,
) -> impl Fn() -> ShellResult<Value> + Send + Sync + 'static
where
    R: Record,
    S: LayoutStrategy<R> + 'static,
    F: Fn() -> Vec<R> + Send + Sync + 'static,
{
    move || {
        let records = source();
        let tree = project_with::<R>(&strategy, &records)?;
        Ok(tree.to_value()?)
    }
}

/// Route returning the raw records from `source` as JSON objects.
pub fn records_route<R, F>(source: F) -> impl Fn() -> ShellResult<Value> + Send + Sync + 'static
where
    R: Record,
    F: Fn() -> Vec<R> + Send + Sync + 'static,
{
    move || {
        let schema = describe::<R>()?;
        let rows = source()
            .iter()
            .map(|record| record_json(&schema, record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Value::Array(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Dessert, desserts};
    use crate::layout::NiceTable;
    use crate::logging::MemorySink;
    use serde_json::json;
    use std::thread;

    fn shell() -> SduiShell {
        let registry = Arc::new(ProjectionRegistry::new());
        registry.bind::<Dessert, _>(NiceTable::new()).unwrap();
        SduiShell::new()
            .route("/api/data", records_route(desserts))
            .route("/decorator_demo/_sdui", projection_route(registry.clone(), desserts))
            .route(
                "/nice_table_demo/_sdui",
                strategy_route(NiceTable::with_labels(), desserts),
            )
            .route(
                "/unbound/_sdui",
                projection_route(Arc::new(ProjectionRegistry::new()), desserts),
            )
    }

    #[test]
    fn ok_response_wraps_tree() {
        let response: Value =
            serde_json::from_str(&shell().handle_line(r#"{"path":"/decorator_demo/_sdui"}"#))
                .unwrap();
        assert_eq!(response["status"], "ok");
        assert_eq!(response["body"][0]["component"], "NiceTable");
    }

    #[test]
    fn strategy_route_bypasses_registry() {
        let shell = shell();
        let labelled = shell.handle("/nice_table_demo/_sdui").unwrap();
        let bound = shell.handle("/decorator_demo/_sdui").unwrap();
        assert_eq!(labelled[0]["component"], "NiceTable");
        assert_eq!(labelled[0]["props"]["rows"], bound[0]["props"]["rows"]);
        assert_eq!(
            shell.paths(),
            vec!["/api/data", "/decorator_demo/_sdui", "/nice_table_demo/_sdui", "/unbound/_sdui"]
        );
    }

    #[test]
    fn raw_route_lists_records() {
        let body = shell().handle("/api/data").unwrap();
        assert_eq!(body.as_array().unwrap().len(), 5);
        assert_eq!(body[4]["name"], "Gingerbread");
    }

    #[test]
    fn failures_become_error_responses() {
        let shell = shell();
        let unbound: Value =
            serde_json::from_str(&shell.handle_line(r#"{"path":"/unbound/_sdui"}"#)).unwrap();
        assert_eq!(unbound["status"], "error");
        assert_eq!(unbound["kind"], "unbound_type");
        assert!(unbound.get("body").is_none());

        let missing: Value =
            serde_json::from_str(&shell.handle_line(r#"{"path":"/nope"}"#)).unwrap();
        assert_eq!(missing["kind"], "not_found");

        let garbage: Value = serde_json::from_str(&shell.handle_line("not json")).unwrap();
        assert_eq!(garbage["kind"], "decode");
    }

    #[test]
    fn requests_are_logged() {
        let sink = MemorySink::new();
        let shell = shell().with_logger(Logger::new(sink.clone()));
        shell.handle_line(r#"{"path":"/api/data"}"#);
        shell.handle_line(r#"{"path":"/nope"}"#);
        assert_eq!(sink.messages(), vec!["request", "request_failed"]);
        assert_eq!(sink.events()[1].field("kind"), Some(&json!("not_found")));
    }

    #[test]
    fn serves_over_tcp() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            shell().serve_connection(stream).unwrap();
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client
            .write_all(b"{\"path\":\"/decorator_demo/_sdui\"}\n")
            .unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut lines = BufReader::new(client).lines();
        let response: Value = serde_json::from_str(&lines.next().unwrap().unwrap()).unwrap();
        assert_eq!(response["status"], "ok");
        assert_eq!(
            response["body"][0]["props"]["headings"],
            json!(["name", "calories", "fat", "carbs", "protein"])
        );
        server.join().unwrap();
    }
}
