use std::{net::SocketAddrV4, path::Path, sync::Arc};

use tokio::net::TcpListener;

use sprayed::backend::{
    config::Config,
    serve,
    store::{read_store_file, Store},
    State,
};

fn load_store(config: &Config) -> anyhow::Result<Store> {
    let Some(path) = config.store_file() else {
        log::warn!("no --store-file given, serving an empty store");
        return Ok(Store::default());
    };
    if !Path::new(path).exists() {
        log::warn!("store file {:?} doesn't exist, serving an empty store", path);
        return Ok(Store::default());
    }
    let store = read_store_file(path)?;
    log::info!("loaded {} record(s) from {:?}", store.data.len(), path);
    Ok(store)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let config = Config::from_args(std::env::args().skip(1))?;
    let state = Arc::new(State::new(config.api_token()?, load_store(&config)?));

    let listener =
        TcpListener::bind(SocketAddrV4::new(config.bind_address()?, config.port()?)).await?;
    serve(listener, state).await
}
