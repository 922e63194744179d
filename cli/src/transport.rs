//! Executes core `HttpRequest`s with ureq.

use std::time::Duration;

use blog_core::{HttpMethod, HttpRequest, HttpResponse};

/// Blocking HTTP executor; clone it into worker tasks.
#[derive(Clone)]
pub struct Transport {
    agent: ureq::Agent,
}

impl Transport {
    /// Status codes are returned as data so the core can interpret error
    /// bodies; only connection-level failures are errors here.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    pub fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ureq::Error> {
        tracing::debug!(method = %req.method, path = %req.path, "executing");
        let mut response = match req.method {
            HttpMethod::Get => {
                let mut builder = self.agent.get(&req.path);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                builder.call()?
            }
            HttpMethod::Post => {
                let mut builder = self.agent.post(&req.path);
                for (key, value) in &req.headers {
                    builder = builder.header(key.as_str(), value.as_str());
                }
                match req.body {
                    Some(body) => builder.send(body.as_bytes())?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (name.as_str().to_string(), value.to_str().unwrap_or_default().to_string())
            })
            .collect();
        // Non-UTF-8 error pages still have to reach the core with their status.
        let bytes = response.body_mut().read_to_vec()?;
        Ok(HttpResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    use blog_core::{ApiClient, MemoryStore, RequestError, RequestOptions};

    /// Answer a single connection with `status` and a raw `body`.
    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 {status}\r\ncontent-type: text/html\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        });
        format!("http://{addr}/api")
    }

    #[test]
    fn latin1_error_page_keeps_its_status() {
        let base = serve_once("502 Bad Gateway", b"<html>Bad Gateway \xff\xfe</html>");
        let client = ApiClient::new(&base);
        let request = client.build("/posts", RequestOptions::get(), &MemoryStore::new());

        let response = Transport::new(Duration::from_secs(5)).execute(request).unwrap();
        assert_eq!(response.status, 502);
        assert!(response.body.starts_with("<html>Bad Gateway"));
        assert_eq!(client.parse(response), Err(RequestError::Status(502)));
    }

    #[test]
    fn json_body_is_passed_through() {
        let base = serve_once("200 OK", br#"{"posts":[]}"#);
        let client = ApiClient::new(&base);
        let request = client.build("/posts", RequestOptions::get(), &MemoryStore::new());

        let response = Transport::new(Duration::from_secs(5)).execute(request).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"posts":[]}"#);
    }
}
