//! HTTP response helpers.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tiny_http::{Header, Request, Response, StatusCode};

use super::inject::inject_widget;
use super::mime;
use super::publish::PublishOutcome;

/// Serve HTML page source with the publish widget injected.
///
/// Content-Length is the UTF-8 byte length of the injected page.
pub fn respond_page(request: Request, content: &str, widget: &str) -> Result<()> {
    let body = inject_widget(content, widget);
    send_body(request, 200, mime::HTML, body.into_bytes())
}

/// Serve file bytes with a Content-Type guessed from `path`.
///
/// tiny_http drops the body of HEAD responses but keeps the headers.
pub fn respond_file(request: Request, path: &Path, body: Vec<u8>) -> Result<()> {
    send_body(request, 200, mime::from_path(path), body)
}

/// Respond with the publish outcome as JSON (always status 200).
pub fn respond_json(request: Request, outcome: &PublishOutcome) -> Result<()> {
    let body = serde_json::to_vec(outcome).context("Failed to serialize publish outcome")?;
    send_body(request, 200, mime::JSON, body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, mime::PLAIN, b"404 Not Found".to_vec())
}

pub fn respond_not_implemented(request: Request) -> Result<()> {
    send_body(request, 501, mime::PLAIN, b"501 Unsupported method".to_vec())
}

pub fn respond_server_error(request: Request, error: &anyhow::Error) -> Result<()> {
    let body = format!("500 Internal Server Error\n\n{error:#}");
    send_body(request, 500, mime::PLAIN, body.into_bytes())
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<()> {
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(())
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow!("Invalid header {name}: {value}"))
}
