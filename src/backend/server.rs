use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::backend::{
    handler::handle_request,
    http::{HttpRequest, HttpResponse, StatusCode},
    request::Request,
    store::Store,
};

/// Everything a connection needs; never mutated after start-up.
#[derive(Debug)]
pub struct State {
    pub api_token: String,
    pub store: Store,
}

impl State {
    pub fn new(api_token: String, store: Store) -> Self {
        State { api_token, store }
    }

    pub fn respond(&self, http: &HttpRequest) -> HttpResponse {
        handle_request(&self.api_token, &Request::from_http(http), &self.store)
    }
}

pub async fn serve(listener: TcpListener, state: Arc<State>) -> anyhow::Result<()> {
    log::info!("listening on {}", listener.local_addr()?);
    loop {
        let (stream, peer) = listener.accept().await?;
        log::debug!("accepted connection from {}", peer);
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, state).await {
                log::warn!("connection from {} failed: {:#}", peer, e);
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, state: Arc<State>) -> anyhow::Result<()> {
    let mut input_buf = BytesMut::with_capacity(1024);
    let mut output_buf = BytesMut::with_capacity(1024);
    loop {
        // Answer every complete request already buffered
        loop {
            let parsed = match HttpRequest::deserialize(&input_buf) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("failed to parse request: {}", e);
                    output_buf.clear();
                    HttpResponse::text(StatusCode::BadRequest, "Bad request")
                        .serialize(&mut output_buf, true);
                    stream.write_all(&output_buf).await?;
                    return Ok(());
                }
            };
            let Some((request, used)) = parsed else {
                break;
            };

            let close = request.wants_close();
            output_buf.clear();
            state.respond(&request).serialize(&mut output_buf, close);
            input_buf.advance(used);
            stream.write_all(&output_buf).await?;
            if close {
                return Ok(());
            }
        }

        if stream.read_buf(&mut input_buf).await? == 0 {
            return Ok(());
        }
    }
}
