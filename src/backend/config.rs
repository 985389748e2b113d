use std::{collections::HashMap, net::Ipv4Addr};

pub const DEFAULT_PORT: u16 = 8787;
pub const TOKEN_ENV_VAR: &str = "SPRAY_API_TOKEN";

#[derive(Debug, Default)]
pub struct Config(pub HashMap<Parameter, String>);

#[derive(Debug, Hash, PartialEq, Eq, Clone, Copy)]
pub enum Parameter {
    Bind,
    Port,
    ApiToken,
    StoreFile,
}

impl Parameter {
    pub fn deserialize(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bind" => Ok(Parameter::Bind),
            "port" => Ok(Parameter::Port),
            "api-token" => Ok(Parameter::ApiToken),
            "store-file" => Ok(Parameter::StoreFile),
            _ => Err(anyhow::format_err!("unknown parameter {:?}", s)),
        }
    }

    pub fn serialize(&self) -> &'static str {
        match self {
            Parameter::Bind => "bind",
            Parameter::Port => "port",
            Parameter::ApiToken => "api-token",
            Parameter::StoreFile => "store-file",
        }
    }
}

impl Config {
    /// Load config from `--key value` command line arguments.
    pub fn from_args<I>(args: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut current_key = None;
        for arg in args {
            if let Some(current_key) = current_key.take() {
                config.0.insert(current_key, arg);
            } else if let Some(key) = arg.strip_prefix("--") {
                current_key = Some(Parameter::deserialize(key)?);
            } else {
                anyhow::bail!("invalid argument {:?}", arg)
            }
        }
        if let Some(key) = current_key {
            anyhow::bail!("missing value for --{}", key.serialize());
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> anyhow::Result<Ipv4Addr> {
        match self.0.get(&Parameter::Bind) {
            Some(addr) => Ok(addr.parse()?),
            None => Ok(Ipv4Addr::LOCALHOST),
        }
    }

    pub fn port(&self) -> anyhow::Result<u16> {
        match self.0.get(&Parameter::Port) {
            Some(port) => Ok(port.parse()?),
            None => Ok(DEFAULT_PORT),
        }
    }

    /// The shared secret clients must send in `Authorization`. Falls back to
    /// the environment so the token can stay off the command line.
    pub fn api_token(&self) -> anyhow::Result<String> {
        let token = match self.0.get(&Parameter::ApiToken) {
            Some(token) => token.clone(),
            None => std::env::var(TOKEN_ENV_VAR).unwrap_or_default(),
        };
        if token.is_empty() {
            anyhow::bail!(
                "no API token configured (pass --api-token or set {})",
                TOKEN_ENV_VAR
            );
        }
        Ok(token)
    }

    pub fn store_file(&self) -> Option<&str> {
        self.0.get(&Parameter::StoreFile).map(String::as_str)
    }
}
