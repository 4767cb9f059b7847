/// 환경 변수 기반 설정
/// 프로세스 시작 시 한 번 읽어서 AppConfig 로 고정한다.
// region:    --- Imports
use crate::bidding::policy::BidPolicy;
use std::str::FromStr;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config Error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("환경 변수 {key} 값이 올바르지 않습니다: {value}")]
    InvalidValue { key: &'static str, value: String },
}
// endregion: --- Config Error

// region:    --- App Config
/// 기본 이벤트 토픽
pub const DEFAULT_EVENTS_TOPIC: &str = "auction-events";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 없으면 인메모리 저장소로 동작
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub bind_addr: String,
    /// true 이면 기동 시 스키마를 지우고 다시 만든다
    pub reset_database: bool,
    /// 없으면 이벤트는 로그로만 남긴다
    pub kafka_brokers: Option<String>,
    pub events_topic: String,
    pub policy: BidPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            db_max_connections: 5,
            bind_addr: "0.0.0.0:3000".to_string(),
            reset_database: false,
            kafka_brokers: None,
            events_topic: DEFAULT_EVENTS_TOPIC.to_string(),
            policy: BidPolicy::default(),
        }
    }
}

impl AppConfig {
    /// 프로세스 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드 (테스트에서 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            database_url: non_empty("DATABASE_URL"),
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                non_empty("DB_MAX_CONNECTIONS"),
                defaults.db_max_connections,
            )?,
            bind_addr: non_empty("BIND_ADDR").unwrap_or(defaults.bind_addr),
            reset_database: parse_flag(
                "RESET_DATABASE",
                non_empty("RESET_DATABASE"),
                defaults.reset_database,
            )?,
            kafka_brokers: non_empty("KAFKA_BROKERS"),
            events_topic: non_empty("EVENTS_TOPIC").unwrap_or(defaults.events_topic),
            policy: BidPolicy {
                allow_owner_bids: parse_flag(
                    "ALLOW_OWNER_BIDS",
                    non_empty("ALLOW_OWNER_BIDS"),
                    defaults.policy.allow_owner_bids,
                )?,
                allow_outbidding_self: parse_flag(
                    "ALLOW_OUTBIDDING_SELF",
                    non_empty("ALLOW_OUTBIDDING_SELF"),
                    defaults.policy.allow_outbidding_self,
                )?,
                owner_only_close: parse_flag(
                    "OWNER_ONLY_CLOSE",
                    non_empty("OWNER_ONLY_CLOSE"),
                    defaults.policy.owner_only_close,
                )?,
            },
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

fn parse_flag(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
    }
}
// endregion: --- App Config

// region:    --- Tests
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert!(config.database_url.is_none());
        assert!(config.kafka_brokers.is_none());
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.events_topic, DEFAULT_EVENTS_TOPIC);
        assert_eq!(config.policy, BidPolicy::default());
    }

    #[test]
    fn reads_values_and_flags() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/auctions"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("OWNER_ONLY_CLOSE", "yes"),
            ("ALLOW_OWNER_BIDS", "false"),
            ("KAFKA_BROKERS", "  "),
        ]))
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/auctions")
        );
        assert_eq!(config.db_max_connections, 12);
        assert!(config.policy.owner_only_close);
        assert!(!config.policy.allow_owner_bids);
        assert!(config.policy.allow_outbidding_self);
        assert!(config.kafka_brokers.is_none());
    }

    #[test]
    fn rejects_malformed_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("DB_MAX_CONNECTIONS", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "DB_MAX_CONNECTIONS",
                ..
            }
        ));

        let err = AppConfig::from_lookup(lookup_from(&[("RESET_DATABASE", "maybe")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "RESET_DATABASE",
                ..
            }
        ));
    }
}
// endregion: --- Tests
