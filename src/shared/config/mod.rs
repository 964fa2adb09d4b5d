// Application configuration
// 애플리케이션 설정 (환경 변수 기반)
use chrono::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// 설정 로드/검증 에러
/// Configuration errors (fatal at startup)
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

const MIN_SECRET_LEN: usize = 32;

/// JWT 설정
/// Signing secrets and lifetimes for both token kinds
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl JwtConfig {
    /// 두 토큰 종류는 서로 다른 secret을 사용해야 함
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_AT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }
        if self.refresh_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                name: "JWT_RT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }
        if self.access_secret == self.refresh_secret {
            return Err(ConfigError::Invalid {
                name: "JWT_RT_SECRET",
                reason: "must differ from JWT_AT_SECRET".to_string(),
            });
        }
        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(ConfigError::Invalid {
                name: "JWT_AT_TTL",
                reason: "token lifetimes must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Cloudinary 설정
/// Media host credentials
#[derive(Debug, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

impl CloudinaryConfig {
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// 전체 서버 설정
/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// None이면 인메모리 저장소 사용
    /// When unset the server runs on in-memory stores
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    /// logout-by-id 보호용 서비스 키
    pub service_api_key: Option<String>,
    pub cors_origins: Vec<String>,
    pub cloudinary: CloudinaryConfig,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 조회 함수로부터 설정 로드 (테스트에서 직접 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: e.to_string(),
            })?,
            None => 8000,
        };

        let jwt = JwtConfig {
            access_secret: get("JWT_AT_SECRET").ok_or(ConfigError::Missing("JWT_AT_SECRET"))?,
            refresh_secret: get("JWT_RT_SECRET").ok_or(ConfigError::Missing("JWT_RT_SECRET"))?,
            access_ttl: parse_ttl("JWT_AT_TTL", get("JWT_AT_TTL").as_deref().unwrap_or("1h"))?,
            refresh_ttl: parse_ttl("JWT_RT_TTL", get("JWT_RT_TTL").as_deref().unwrap_or("7d"))?,
        };
        jwt.validate()?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let cloudinary = CloudinaryConfig {
            cloud_name: get("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: get("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: get("CLOUDINARY_API_SECRET").unwrap_or_default(),
            folder: get("CLOUDINARY_FOLDER").unwrap_or_else(|| "tours".to_string()),
        };

        let config = Self {
            host,
            port,
            database_url: get("DATABASE_URL"),
            jwt,
            service_api_key: get("SERVICE_API_KEY"),
            cors_origins,
            cloudinary,
        };
        config.log_summary();
        Ok(config)
    }

    fn log_summary(&self) {
        info!(
            "Config loaded: bind={}:{}, access_ttl={}s, refresh_ttl={}s",
            self.host,
            self.port,
            self.jwt.access_ttl.num_seconds(),
            self.jwt.refresh_ttl.num_seconds()
        );
        if self.database_url.is_none() {
            warn!("DATABASE_URL not set; using in-memory stores (data is lost on restart)");
        }
        if self.service_api_key.is_none() {
            warn!("SERVICE_API_KEY not set; /auth/logout-by-id will refuse every call");
        }
        if !self.cloudinary.is_configured() {
            warn!("Cloudinary credentials not set; image uploads will fail");
        }
    }
}

const MAX_TTL_DAYS: i64 = 36_500;

/// TTL 파싱: "3600", "30s", "15m", "1h", "7d"
/// Parse a token lifetime. Bare numbers are seconds.
pub fn parse_ttl(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let raw = raw.trim();
    let invalid = |reason: &str| ConfigError::Invalid {
        name,
        reason: format!("{} ({:?})", reason, raw),
    };

    let (digits, unit) = match raw.char_indices().last() {
        Some((idx, c)) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
        Some(_) => (raw, 's'),
        None => return Err(invalid("empty duration")),
    };

    let value: i64 = digits.parse().map_err(|_| invalid("expected a number with optional s/m/h/d suffix"))?;
    if value <= 0 {
        return Err(invalid("duration must be positive"));
    }

    let ttl = match unit {
        's' => Duration::try_seconds(value),
        'm' => Duration::try_minutes(value),
        'h' => Duration::try_hours(value),
        'd' => Duration::try_days(value),
        _ => return Err(invalid("unknown unit")),
    };

    // 발급 시각 + TTL 이 DateTime 범위를 넘지 않도록 상한
    match ttl {
        Some(ttl) if ttl.num_days() <= MAX_TTL_DAYS => Ok(ttl),
        _ => Err(invalid("duration out of range")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const AT: &str = "access-secret-access-secret-access-secret";
    const RT: &str = "refresh-secret-refresh-secret-refresh-secret";

    #[test]
    fn parses_ttl_units() {
        assert_eq!(parse_ttl("X", "90").unwrap(), Duration::seconds(90));
        assert_eq!(parse_ttl("X", "5s").unwrap(), Duration::seconds(5));
        assert_eq!(parse_ttl("X", "15m").unwrap(), Duration::minutes(15));
        assert_eq!(parse_ttl("X", "1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_ttl("X", "7D").unwrap(), Duration::days(7));
    }

    #[test]
    fn rejects_bad_ttl() {
        assert!(parse_ttl("X", "").is_err());
        assert!(parse_ttl("X", "0").is_err());
        assert!(parse_ttl("X", "-5m").is_err());
        assert!(parse_ttl("X", "10w").is_err());
        assert!(parse_ttl("X", "abc").is_err());
    }

    #[test]
    fn rejects_out_of_range_ttl() {
        let err = parse_ttl("JWT_RT_TTL", "999999999999999d").unwrap_err();
        assert!(err.to_string().contains("duration out of range"), "{}", err);
        assert!(parse_ttl("X", "9223372036854775807s").is_err());
        assert!(parse_ttl("X", "36501d").is_err());
        assert_eq!(parse_ttl("X", "36500d").unwrap(), Duration::days(36_500));
    }

    #[test]
    fn loads_defaults() {
        let config =
            AppConfig::from_lookup(env(&[("JWT_AT_SECRET", AT), ("JWT_RT_SECRET", RT)])).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.jwt.access_ttl, Duration::hours(1));
        assert_eq!(config.jwt.refresh_ttl, Duration::days(7));
        assert!(config.database_url.is_none());
        assert!(config.service_api_key.is_none());
        assert_eq!(config.cors_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(config.cloudinary.folder, "tours");
    }

    #[test]
    fn requires_secrets() {
        let err = AppConfig::from_lookup(env(&[("JWT_RT_SECRET", RT)])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_AT_SECRET"));
    }

    #[test]
    fn rejects_shared_or_short_secrets() {
        let same = AppConfig::from_lookup(env(&[("JWT_AT_SECRET", AT), ("JWT_RT_SECRET", AT)]));
        assert!(matches!(same, Err(ConfigError::Invalid { name: "JWT_RT_SECRET", .. })));

        let short = AppConfig::from_lookup(env(&[("JWT_AT_SECRET", "short"), ("JWT_RT_SECRET", RT)]));
        assert!(matches!(short, Err(ConfigError::Invalid { name: "JWT_AT_SECRET", .. })));
    }

    #[test]
    fn splits_cors_origins() {
        let config = AppConfig::from_lookup(env(&[
            ("JWT_AT_SECRET", AT),
            ("JWT_RT_SECRET", RT),
            ("CORS_ORIGINS", "http://a.test, http://b.test,"),
            ("JWT_AT_TTL", "5s"),
        ]))
        .unwrap();
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.jwt.access_ttl, Duration::seconds(5));
    }
}
