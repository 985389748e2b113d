use crate::backend::http::HttpRequest;

pub const SPRAY_PATH: &str = "/spray";

#[derive(Debug, PartialEq)]
pub enum Request<'data> {
    Spray(SprayRequest<'data>),
    NotFound,
    MethodNotAllowed,
}

#[derive(Debug, PartialEq)]
pub struct SprayRequest<'data> {
    pub authorization: Option<&'data str>,
    pub user_id: Option<String>,
}

impl<'data> Request<'data> {
    pub fn from_http(http: &HttpRequest<'data>) -> Self {
        let (path, query) = match http.target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (http.target, ""),
        };
        match path {
            SPRAY_PATH => {
                if !http.method.eq_ignore_ascii_case("get") {
                    return Request::MethodNotAllowed;
                }
                let user_id = query_param(query, "userid").filter(|id| !id.is_empty());
                Request::Spray(SprayRequest {
                    authorization: http.header("authorization"),
                    user_id,
                })
            }
            _ => Request::NotFound,
        }
    }
}

/// First value for `name` in a urlencoded query string.
fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| percent_decode(key) == name)
        .map(|(_, value)| percent_decode(value))
}

/// Lenient urlencoded decoding: a malformed `%` escape is kept as written and
/// invalid UTF-8 is replaced.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match bytes.get(i + 1..i + 3).and_then(decode_hex_pair) {
                Some(byte) => {
                    out.push(byte);
                    i += 2;
                }
                None => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn decode_hex_pair(pair: &[u8]) -> Option<u8> {
    let hex = std::str::from_utf8(pair).ok()?;
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(hex, 16).ok()
}
