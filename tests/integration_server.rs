//! HTTP behavior of the timetable server

use dsb_timetables::{Composite, ServiceConfig, TimetableServer};
use image::{Rgba, RgbaImage};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::net::SocketAddr;

fn start_server() -> (SocketAddr, Composite) {
    let img = RgbaImage::from_fn(20, 10, |x, y| Rgba([x as u8 * 12, y as u8 * 25, 90, 255]));
    let composite = Composite::from_image(&img, 75).expect("encode");
    let shared = composite.clone();

    let cfg = ServiceConfig {
        bind_host: "127.0.0.1".into(),
        port: 0,
        workers: 4,
        ..Default::default()
    };
    let server = TimetableServer::bind(&cfg).expect("bind");
    let addr = server.local_addr().expect("tcp listener");
    std::thread::spawn(move || server.serve(&shared));
    (addr, composite)
}

#[test]
fn get_returns_exact_bytes() {
    let (addr, composite) = start_server();
    let res = reqwest::blocking::get(format!("http://{}/timetables", addr)).expect("request");

    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers().clone();
    assert_eq!(headers["content-length"], composite.len().to_string().as_str());
    assert_eq!(headers["content-type"], "image/jpeg");
    assert_eq!(headers["etag"], format!("\"{}\"", composite.etag).as_str());
    assert_eq!(res.bytes().expect("body").as_ref(), composite.jpeg.as_slice());
}

#[test]
fn repeated_requests_see_the_same_buffer() {
    let (addr, composite) = start_server();
    let client = Client::new();
    for _ in 0..5 {
        let body = client
            .get(format!("http://{}/timetables?x=1", addr))
            .send()
            .and_then(|r| r.bytes())
            .expect("request");
        assert_eq!(body.as_ref(), composite.jpeg.as_slice());
    }
}

#[test]
fn concurrent_requests_all_succeed() {
    let (addr, composite) = start_server();
    let url = format!("http://{}/timetables", addr);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| reqwest::blocking::get(&url).and_then(|r| r.bytes())))
            .collect();
        for h in handles {
            let body = h.join().expect("thread").expect("request");
            assert_eq!(body.len(), composite.len());
        }
    });
}

#[test]
fn head_has_no_body() {
    let (addr, composite) = start_server();
    let res = Client::new()
        .head(format!("http://{}/timetables", addr))
        .send()
        .expect("request");
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["etag"], format!("\"{}\"", composite.etag).as_str());
    assert!(res.bytes().expect("body").is_empty());
}

#[test]
fn large_body_keeps_content_length() {
    // big enough to cross tiny_http's default chunking threshold
    let composite = Composite::from_jpeg(1, 1, vec![0xAB; 200_000]);
    let shared = composite.clone();
    let cfg = ServiceConfig {
        bind_host: "127.0.0.1".into(),
        port: 0,
        workers: 1,
        ..Default::default()
    };
    let server = TimetableServer::bind(&cfg).expect("bind");
    let addr = server.local_addr().expect("tcp listener");
    std::thread::spawn(move || server.serve(&shared));

    let res = reqwest::blocking::get(format!("http://{}/timetables", addr)).expect("request");
    assert_eq!(res.headers()["content-length"], "200000");
    assert_eq!(res.bytes().expect("body").len(), composite.len());
}

#[test]
fn matching_etag_is_not_modified() {
    let (addr, composite) = start_server();
    let res = Client::new()
        .get(format!("http://{}/timetables", addr))
        .header("If-None-Match", format!("\"{}\"", composite.etag))
        .send()
        .expect("request");
    assert_eq!(res.status(), StatusCode::NOT_MODIFIED);

    let res = Client::new()
        .get(format!("http://{}/timetables", addr))
        .header("If-None-Match", "\"something-else\"")
        .send()
        .expect("request");
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn other_paths_and_methods() {
    let (addr, _) = start_server();
    let client = Client::new();

    let res = client.get(format!("http://{}/", addr)).send().expect("request");
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client.post(format!("http://{}/timetables", addr)).send().expect("request");
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}
