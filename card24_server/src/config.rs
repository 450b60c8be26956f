use std::env;
use std::net::SocketAddr;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:25924";

/// 服务器配置，从环境变量读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `CARD24_ADDR`，监听地址
    pub addr: SocketAddr,
    /// `CARD24_SEED`，设置后每个连接的牌局都使用这个种子，便于复现
    pub seed: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("无效的监听地址 CARD24_ADDR={0}")]
    InvalidAddr(String),
    #[error("无效的随机种子 CARD24_SEED={0}")]
    InvalidSeed(String),
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(env::var("CARD24_ADDR").ok(), env::var("CARD24_SEED").ok())
    }

    fn from_vars(addr: Option<String>, seed: Option<String>) -> Result<Self, ConfigError> {
        let addr = addr.unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr: SocketAddr = addr.trim().parse().map_err(|_| ConfigError::InvalidAddr(addr.clone()))?;

        let seed: Option<u64> = match seed.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(s.parse().map_err(|_| ConfigError::InvalidSeed(s.to_string()))?),
        };

        Ok(ServerConfig { addr, seed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(None, None).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_explicit_values() {
        let config = ServerConfig::from_vars(Some("127.0.0.1:9000".into()), Some(" 42 ".into())).unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.seed, Some(42));

        // 空字符串等同于未设置
        assert_eq!(ServerConfig::from_vars(None, Some(String::new())).unwrap().seed, None);
    }

    #[test]
    fn test_invalid_values() {
        assert_eq!(
            ServerConfig::from_vars(Some("not-an-addr".into()), None),
            Err(ConfigError::InvalidAddr("not-an-addr".into()))
        );
        assert_eq!(
            ServerConfig::from_vars(None, Some("-1".into())),
            Err(ConfigError::InvalidSeed("-1".into()))
        );
    }
}
