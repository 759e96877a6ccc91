//! Local servers for exercising network checks in tests

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::JoinHandle;
use std::time::Duration;

fn read_request_head(stream: &mut std::net::TcpStream) -> String {
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&data).to_string()
}

/// Serve one canned HTTP response per connection, in order.
///
/// Returns the base URL and a handle yielding the raw request heads.
pub fn serve_http(
    responses: Vec<(u16, Vec<(&'static str, &'static str)>, &'static str)>,
) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let handle = std::thread::spawn(move || {
        let mut requests = Vec::new();
        for (status, headers, body) in responses {
            let (mut stream, _) = listener.accept().unwrap();
            requests.push(read_request_head(&mut stream));

            let mut response = format!("HTTP/1.1 {} Canned\r\n", status);
            for (name, value) in headers {
                response.push_str(&format!("{}: {}\r\n", name, value));
            }
            response.push_str(&format!(
                "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            ));
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
        requests
    });

    (base, handle)
}

/// Accept one TCP connection and write a banner.
///
/// With `expect_probe` the server first reads the client's probe and returns it.
pub fn serve_banner(banner: &'static str, expect_probe: bool) -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut probe = String::new();
        if expect_probe {
            stream
                .set_read_timeout(Some(Duration::from_secs(5)))
                .unwrap();
            let mut chunk = [0u8; 256];
            if let Ok(n) = stream.read(&mut chunk) {
                probe = String::from_utf8_lossy(&chunk[..n]).to_string();
            }
        }
        stream.write_all(banner.as_bytes()).unwrap();
        stream.flush().unwrap();
        probe
    });

    (port, handle)
}
