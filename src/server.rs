//! HTTP front: serves the precomputed composite on `/timetables`.
//!
//! Every worker thread borrows the same [`Composite`]; nothing is recomputed
//! or mutated per request.

use crate::{Composite, Error, Result, ServiceConfig};
use std::net::SocketAddr;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

/// The one path we answer
pub const TIMETABLES_PATH: &str = "/timetables";

/// Where a request goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Timetables,
    MethodNotAllowed,
    NotFound,
}

/// Route by path (query string ignored) and method.
pub fn route(method: &Method, url: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    if path != TIMETABLES_PATH {
        return Route::NotFound;
    }
    match method {
        Method::Get | Method::Head => Route::Timetables,
        _ => Route::MethodNotAllowed,
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}

fn etag_matches(request: &Request, etag: &str) -> bool {
    request
        .headers()
        .iter()
        .filter(|h| h.field.equiv("If-None-Match"))
        .flat_map(|h| h.value.as_str().split(','))
        .map(|tag| tag.trim().trim_start_matches("W/").trim_matches('"'))
        .any(|tag| tag == "*" || tag == etag)
}

/// Answer one request from the shared composite.
pub fn handle(request: Request, composite: &Composite) {
    let method = request.method().clone();
    let url = request.url().to_string();
    let routed = route(&method, &url);
    log::debug!("{} {} -> {:?}", method, url, routed);

    let result = match routed {
        Route::Timetables => {
            let etag = header("ETag", &format!("\"{}\"", composite.etag));
            if etag_matches(&request, &composite.etag) {
                let mut response = Response::empty(StatusCode(304));
                if let Some(etag) = etag {
                    response.add_header(etag);
                }
                request.respond(response)
            } else {
                let headers: Vec<Header> = [header("Content-Type", "image/jpeg"), etag]
                    .into_iter()
                    .flatten()
                    .collect();
                let body: &[u8] = &composite.jpeg;
                // always send Content-Length, never chunked, however large
                let response =
                    Response::new(StatusCode(200), headers, body, Some(composite.len()), None)
                        .with_chunked_threshold(usize::MAX);
                request.respond(response)
            }
        }
        Route::MethodNotAllowed => {
            let mut response = Response::empty(StatusCode(405));
            if let Some(allow) = header("Allow", "GET, HEAD") {
                response.add_header(allow);
            }
            request.respond(response)
        }
        Route::NotFound => request.respond(Response::from_string("404 page not found").with_status_code(404)),
    };

    if let Err(e) = result {
        log::warn!("Failed to answer {} {}: {}", method, url, e);
    }
}

/// Bound HTTP listener
pub struct TimetableServer {
    server: Server,
    workers: usize,
}

impl TimetableServer {
    pub fn bind(config: &ServiceConfig) -> Result<Self> {
        let addr = config.listen_addr();
        let server = Server::http(&addr).map_err(|e| Error::ListenError(format!("{}: {}", addr, e)))?;
        Ok(Self {
            server,
            workers: config.workers.max(1),
        })
    }

    /// Actual bound address (useful when binding port 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve `composite` until the listener shuts down.
    pub fn serve(&self, composite: &Composite) {
        std::thread::scope(|scope| {
            for _ in 0..self.workers {
                scope.spawn(|| {
                    for request in self.server.incoming_requests() {
                        handle(request, composite);
                    }
                });
            }
        });
    }
}
