//! Shared fixtures: a tiny_http stand-in for the DSB API and image host.

#![allow(dead_code)]

use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;
use tiny_http::{Response, Server};

pub const TOKEN: &str = "5c1e8b2a-0000-4000-8000-000000000001";

pub fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(px))
}

pub fn png(img: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), image::ImageOutputFormat::Png)
        .expect("encode png");
    buf
}

/// A plan page served by the mock
pub struct Page {
    pub path: &'static str,
    pub body: Option<Vec<u8>>,
}

impl Page {
    pub fn image(path: &'static str, img: &RgbaImage) -> Self {
        Self { path, body: Some(png(img)) }
    }

    /// Answered with 404
    pub fn missing(path: &'static str) -> Self {
        Self { path, body: None }
    }
}

/// Start a mock DSB API on an ephemeral port.
///
/// `listing` is the `dsbtimetables` JSON with `{base}` standing in for the
/// mock's own URL. Returns the base URL.
pub fn start_dsb_mock(listing: &str, pages: Vec<Page>) -> String {
    let server = Server::http("127.0.0.1:0").expect("bind mock");
    let base = format!("http://{}", server.server_addr());
    let listing = listing.replace("{base}", &base);

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let path = request.url().split('?').next().unwrap_or("").to_string();
            let response = match path.as_str() {
                "/authid" => {
                    if request.url().contains("user=236661") {
                        Response::from_string(format!("\"{}\"", TOKEN))
                    } else {
                        Response::from_string("\"\"")
                    }
                }
                "/dsbtimetables" => {
                    if request.url().contains(TOKEN) {
                        Response::from_string(listing.clone())
                    } else {
                        Response::from_string("unauthorized").with_status_code(401)
                    }
                }
                other => match pages.iter().find(|p| p.path == other) {
                    Some(Page { body: Some(body), .. }) => Response::from_data(body.clone()),
                    _ => Response::from_string("Not Found").with_status_code(404),
                },
            };
            let _ = request.respond(response);
        }
    });

    base
}

/// A port with nothing listening on it
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port()
}

/// A listener that accepts connections and never answers. Returns its base URL.
pub fn start_silent_server() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    std::thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });
    base
}
