use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};

use crate::data::registry::DatasetRegistry;

pub mod api;
pub mod routes;
pub mod static_files;

/// Bind and serve until killed. The canonical dataset is loaded exactly once
/// here; every request reads the same immutable registry.
pub fn run_server(bind_addr: &str) -> std::io::Result<()> {
    let registry = DatasetRegistry::load()?;
    let listener = TcpListener::bind(bind_addr)?;
    println!(
        "merlion server listening on http://{bind_addr} ({} records)",
        registry.records().len()
    );

    for stream in listener.incoming() {
        match stream {
            Ok(mut stream) => {
                if let Err(err) = handle_connection(&mut stream, &registry) {
                    eprintln!("request error: {err}");
                }
            }
            Err(err) => eprintln!("connection failed: {err}"),
        }
    }

    Ok(())
}

fn handle_connection(stream: &mut TcpStream, registry: &DatasetRegistry) -> std::io::Result<()> {
    let mut buffer = [0_u8; 16_384];
    let bytes_read = stream.read(&mut buffer)?;
    if bytes_read == 0 {
        return Ok(());
    }

    let request = String::from_utf8_lossy(&buffer[..bytes_read]);
    let request_line = request.lines().next().unwrap_or_default();
    let mut request_parts = request_line.split_whitespace();
    let method = request_parts.next().unwrap_or("GET");
    let path = request_parts.next().unwrap_or("/");

    let response = routes::route_request(method, path, registry).to_http_string();
    stream.write_all(response.as_bytes())?;
    stream.flush()?;
    Ok(())
}
