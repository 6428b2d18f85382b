use std::net::SocketAddr;

use crate::core::error::Error;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub pool_size: u32,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
        where F: Fn(&str) -> Option<String>
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Error::MissingEnvError("DATABASE_URL".to_string()))?;

        let bind_address = parse_or(&lookup, "BIND_ADDRESS", DEFAULT_BIND_ADDRESS.parse().ok())?;
        let pool_size = parse_or(&lookup, "DATABASE_POOL_SIZE", Some(DEFAULT_POOL_SIZE))?;
        if pool_size == 0 {
            return Err(Error::InvalidEnvError("DATABASE_POOL_SIZE".to_string(), "0".to_string()))
        }

        Ok(Config { database_url, bind_address, pool_size })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: Option<T>) -> Result<T, Error>
    where F: Fn(&str) -> Option<String>,
          T: std::str::FromStr
{
    match lookup(key) {
        Some(raw) => raw.trim().parse()
            .map_err(|_| Error::InvalidEnvError(key.to_string(), raw)),
        None => default.ok_or_else(|| Error::MissingEnvError(key.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
        let vars: HashMap<String, String> = vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/cinema")]).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/cinema");
        assert_eq!(config.bind_address, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.pool_size, 10);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db/cinema"),
            ("BIND_ADDRESS", "0.0.0.0:9000"),
            ("DATABASE_POOL_SIZE", " 4 "),
        ]).unwrap();

        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.pool_size, 4);
    }

    #[test]
    fn database_url_is_required() {
        assert!(matches!(config(&[]), Err(Error::MissingEnvError(key)) if key == "DATABASE_URL"));
        assert!(matches!(config(&[("DATABASE_URL", " ")]), Err(Error::MissingEnvError(_))));
    }

    #[test]
    fn bad_values_fail() {
        let url = ("DATABASE_URL", "postgres://db/cinema");

        assert!(matches!(
            config(&[url, ("BIND_ADDRESS", "localhost")]),
            Err(Error::InvalidEnvError(key, _)) if key == "BIND_ADDRESS"
        ));
        assert!(matches!(
            config(&[url, ("DATABASE_POOL_SIZE", "many")]),
            Err(Error::InvalidEnvError(key, value)) if key == "DATABASE_POOL_SIZE" && value == "many"
        ));
        assert!(matches!(config(&[url, ("DATABASE_POOL_SIZE", "0")]), Err(Error::InvalidEnvError(_, _))));
    }
}
