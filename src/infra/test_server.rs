//! Scripted HTTP server for exercising `BackendClient` over a real socket.
//!
//! Each scripted response answers one connection, in order. Responses carry
//! `Connection: close`, so the client opens a fresh connection per request.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

pub struct ScriptedServer {
    pub base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl ScriptedServer {
    pub async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let handle = tokio::spawn(async move {
            let mut requests = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().await.expect("accept connection");
                requests.push(read_request(&mut stream).await);
                stream
                    .write_all(response.as_bytes())
                    .await
                    .expect("write response");
                let _ = stream.shutdown().await;
            }
            requests
        });
        Self {
            base_url: format!("http://{addr}/"),
            handle,
        }
    }

    /// Raw requests received. Waits until every scripted response went out.
    pub async fn requests(self) -> Vec<String> {
        self.handle.await.expect("server task")
    }
}

pub fn response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut raw = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n",
        body.len()
    );
    for (name, value) in headers {
        raw.push_str(&format!("{name}: {value}\r\n"));
    }
    raw.push_str("\r\n");
    raw.push_str(body);
    raw
}

pub fn json(status: &str, body: &str) -> String {
    response(status, &[("Content-Type", "application/json")], body)
}

pub fn html(status: &str, body: &str) -> String {
    response(status, &[("Content-Type", "text/html; charset=utf-8")], body)
}

pub fn redirect(location: &str, headers: &[(&str, &str)]) -> String {
    let mut all = vec![("Location", location)];
    all.extend_from_slice(headers);
    response("302 FOUND", &all, "")
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = stream.read(&mut chunk).await.expect("read request");
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);
        if let Some(head_end) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
