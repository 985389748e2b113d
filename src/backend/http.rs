use bytes::{BufMut, BytesMut};

const TERMINATOR: &[u8] = b"\r\n";
const HEADER_END: &[u8] = b"\r\n\r\n";

/// Largest header block accepted before the connection is dropped.
pub const MAX_HEADER_BYTES: usize = 16 * 1024;
/// Largest request body accepted; the service only answers GETs.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug, PartialEq)]
pub struct HttpRequest<'data> {
    pub method: &'data str,
    pub target: &'data str,
    pub version: &'data str,
    pub headers: Vec<(&'data str, &'data str)>,
    pub body: &'data [u8],
}

impl<'data> HttpRequest<'data> {
    /// Parse one request from the front of `data`.
    ///
    /// Returns `Ok(None)` while the frame is incomplete, otherwise the request
    /// and the number of bytes it occupied.
    pub fn deserialize(data: &'data [u8]) -> anyhow::Result<Option<(Self, usize)>> {
        let header_len = match find(data, HEADER_END) {
            Some(index) => index,
            None if data.len() > MAX_HEADER_BYTES => {
                return Err(anyhow::format_err!("header block too large"))
            }
            None => return Ok(None),
        };
        if header_len > MAX_HEADER_BYTES {
            return Err(anyhow::format_err!("header block too large"));
        }

        let head = std::str::from_utf8(&data[..header_len])?;
        let mut lines = head.split("\r\n");

        let request_line = lines
            .next()
            .ok_or_else(|| anyhow::format_err!("missing request line"))?;
        let mut parts = request_line.split(' ');
        let (method, target, version) = match (parts.next(), parts.next(), parts.next()) {
            (Some(method), Some(target), Some(version))
                if parts.next().is_none() && !method.is_empty() && !target.is_empty() =>
            {
                (method, target, version)
            }
            _ => {
                return Err(anyhow::format_err!(
                    "malformed request line {:?}",
                    request_line
                ))
            }
        };
        if !version.starts_with("HTTP/1.") {
            return Err(anyhow::format_err!("unsupported version {:?}", version));
        }

        let mut headers = Vec::new();
        for line in lines {
            match line.split_once(':') {
                Some((name, value)) if !name.is_empty() => {
                    headers.push((name.trim(), value.trim()))
                }
                _ => return Err(anyhow::format_err!("malformed header {:?}", line)),
            }
        }

        let mut request = HttpRequest {
            method,
            target,
            version,
            headers,
            body: &[],
        };

        let body_start = header_len + HEADER_END.len();
        let body_len = match request.header("content-length") {
            Some(len) => len.parse::<usize>()?,
            None => 0,
        };
        if body_len > MAX_BODY_BYTES {
            return Err(anyhow::format_err!("request body too large"));
        }
        let end = body_start
            .checked_add(body_len)
            .ok_or_else(|| anyhow::format_err!("request body too large"))?;
        if data.len() < end {
            return Ok(None);
        }
        request.body = &data[body_start..end];

        Ok(Some((request, end)))
    }

    /// Case-insensitive header lookup, first match wins.
    pub fn header(&self, name: &str) -> Option<&'data str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    pub fn wants_close(&self) -> bool {
        match self.header("connection") {
            Some(value) => value.eq_ignore_ascii_case("close"),
            None => self.version == "HTTP/1.0",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl StatusCode {
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::Unauthorized => 401,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Unauthorized => "Unauthorized",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            content_type: "text/plain",
            body: body.into(),
        }
    }

    pub fn json(body: String) -> Self {
        HttpResponse {
            status: StatusCode::Ok,
            content_type: "application/json",
            body,
        }
    }

    pub fn serialize(&self, buf: &mut BytesMut, close: bool) {
        buf.put(&b"HTTP/1.1 "[..]);
        buf.put(self.status.code().to_string().as_bytes());
        buf.put_u8(b' ');
        buf.put(self.status.reason().as_bytes());
        buf.put(TERMINATOR);
        put_header(buf, "Content-Type", self.content_type);
        put_header(buf, "Content-Length", &self.body.len().to_string());
        put_header(buf, "Connection", if close { "close" } else { "keep-alive" });
        buf.put(TERMINATOR);
        buf.put(self.body.as_bytes());
    }
}

fn put_header(buf: &mut BytesMut, name: &str, value: &str) {
    buf.put(name.as_bytes());
    buf.put(&b": "[..]);
    buf.put(value.as_bytes());
    buf.put(TERMINATOR);
}

fn find(data: &[u8], needle: &[u8]) -> Option<usize> {
    data.windows(needle.len()).position(|window| window == needle)
}
