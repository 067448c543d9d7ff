//! Credential files mounted by the deployment
//!
//! The deployment mounts two plaintext files under a base directory:
//! `github/user` and `github/token`. They are read fresh on every request so
//! a rotated secret is picked up without a restart.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::error::{ProxyError, Result};

const USER_FILE: &str = "github/user";
const TOKEN_FILE: &str = "github/token";

/// Resolved base directory of the credential files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsLocation(PathBuf);

impl SecretsLocation {
    /// Resolve a configured location: a plain path, or a `file:` URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ProxyError::UriMalformed(
                "secrets path is empty".to_string(),
            ));
        }

        if !has_scheme(raw) {
            return Ok(Self(PathBuf::from(raw)));
        }

        let url = reqwest::Url::parse(raw)
            .map_err(|e| ProxyError::UriMalformed(format!("'{raw}': {e}")))?;
        if url.scheme() != "file" {
            return Err(ProxyError::UriMalformed(format!(
                "'{raw}': unsupported scheme '{}'",
                url.scheme()
            )));
        }

        url.to_file_path().map(Self).map_err(|()| {
            ProxyError::UriMalformed(format!("'{raw}' does not name a local directory"))
        })
    }

    pub fn user_file(&self) -> PathBuf {
        self.0.join(USER_FILE)
    }

    pub fn token_file(&self) -> PathBuf {
        self.0.join(TOKEN_FILE)
    }
}

/// True when `raw` opens with a URL scheme (`ALPHA *(ALPHA / DIGIT / + - .)`
/// then `:`). Single letters are left alone so `C:\secrets` stays a path.
fn has_scheme(raw: &str) -> bool {
    let Some((scheme, _)) = raw.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Username and token read for a single request
pub struct Credentials {
    username: String,
    token: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        let token: String = token.into();
        Self {
            username: username.into(),
            token: SecretString::new(token.into_boxed_str()),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Value of the `Authorization` header, without the `Basic ` prefix
    pub fn basic_auth_value(&self) -> SecretString {
        use base64::Engine;

        let pair = format!("{}:{}", self.username, self.token.expose_secret());
        let encoded = base64::engine::general_purpose::STANDARD.encode(pair.as_bytes());
        SecretString::new(encoded.into_boxed_str())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Read both credential files. Fails as a whole if either one is unusable.
pub async fn read_credentials(location: &SecretsLocation) -> Result<Credentials> {
    let username = read_secret(&location.user_file()).await?;
    let token = read_secret(&location.token_file()).await?;
    Ok(Credentials::new(username, token))
}

async fn read_secret(path: &Path) -> Result<String> {
    let unavailable = |source: io::Error| ProxyError::SecretUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let bytes = tokio::fs::read(path).await.map_err(unavailable)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| unavailable(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    Ok(sanitize(&text))
}

/// Drop every carriage return and line feed, wherever it appears
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mount(user: Option<&str>, token: Option<&str>) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("github")).unwrap();
        if let Some(user) = user {
            std::fs::write(dir.path().join(USER_FILE), user).unwrap();
        }
        if let Some(token) = token {
            std::fs::write(dir.path().join(TOKEN_FILE), token).unwrap();
        }
        dir
    }

    fn location(dir: &tempfile::TempDir) -> SecretsLocation {
        SecretsLocation::parse(&dir.path().to_string_lossy()).unwrap()
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("alice\r\n"), "alice");
        assert_eq!(sanitize("alice\n"), "alice");
        assert_eq!(sanitize("al\rice\n\n"), "alice");
        assert_eq!(sanitize("alice"), "alice");
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_basic_auth_value() {
        let creds = Credentials::new("alice", "tok123");
        assert_eq!(
            creds.basic_auth_value().expose_secret(),
            "YWxpY2U6dG9rMTIz"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let creds = Credentials::new("alice", "tok123");
        let debug = format!("{creds:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("tok123"));
    }

    #[test]
    fn test_parse_plain_path() {
        let loc = SecretsLocation::parse("/run/secrets").unwrap();
        assert_eq!(loc.user_file(), PathBuf::from("/run/secrets/github/user"));
        assert_eq!(loc.token_file(), PathBuf::from("/run/secrets/github/token"));
    }

    #[test]
    fn test_parse_file_url() {
        let loc = SecretsLocation::parse("file:///run/secrets").unwrap();
        assert_eq!(loc.user_file(), PathBuf::from("/run/secrets/github/user"));
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = SecretsLocation::parse("http://example.com/secrets").unwrap_err();
        assert!(matches!(err, ProxyError::UriMalformed(_)));
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_parse_path_containing_scheme_separator() {
        let loc = SecretsLocation::parse("/data/backup://2024").unwrap();
        assert_eq!(
            loc.user_file(),
            PathBuf::from("/data/backup://2024/github/user")
        );

        let loc = SecretsLocation::parse("mounts/a://b").unwrap();
        assert_eq!(loc.token_file(), PathBuf::from("mounts/a://b/github/token"));
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("file:///run/secrets"));
        assert!(has_scheme("http://example.com"));
        assert!(has_scheme("svn+ssh://host/repo"));
        assert!(!has_scheme("/run/secrets"));
        assert!(!has_scheme("/data/backup://2024"));
        assert!(!has_scheme("C:\\secrets"));
    }

    #[test]
    fn test_parse_rejects_remote_file_url() {
        let err = SecretsLocation::parse("file://fileserver/secrets").unwrap_err();
        assert!(matches!(err, ProxyError::UriMalformed(_)));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!(matches!(
            SecretsLocation::parse("  "),
            Err(ProxyError::UriMalformed(_))
        ));
    }

    #[tokio::test]
    async fn test_read_credentials_strips_line_endings() {
        let dir = mount(Some("alice\r\n"), Some("tok123\n"));
        let creds = read_credentials(&location(&dir)).await.unwrap();

        assert_eq!(creds.username(), "alice");
        assert_eq!(
            creds.basic_auth_value().expose_secret(),
            "YWxpY2U6dG9rMTIz"
        );
    }

    #[tokio::test]
    async fn test_missing_token_fails() {
        let dir = mount(Some("alice\n"), None);
        let err = read_credentials(&location(&dir)).await.unwrap_err();

        match err {
            ProxyError::SecretUnavailable { path, source } => {
                assert!(path.ends_with("github/token"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_user_fails() {
        let dir = mount(None, Some("tok123"));
        let err = read_credentials(&location(&dir)).await.unwrap_err();
        assert!(matches!(err, ProxyError::SecretUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_non_utf8_secret_fails() {
        let dir = mount(Some("alice"), None);
        std::fs::write(dir.path().join(TOKEN_FILE), [0xff, 0xfe, 0x00]).unwrap();
        let err = read_credentials(&location(&dir)).await.unwrap_err();

        match err {
            ProxyError::SecretUnavailable { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rotated_secret_is_picked_up() {
        let dir = mount(Some("alice"), Some("old"));
        let loc = location(&dir);
        let before = read_credentials(&loc).await.unwrap().basic_auth_value();

        std::fs::write(dir.path().join(TOKEN_FILE), b"new").unwrap();
        let after = read_credentials(&loc).await.unwrap().basic_auth_value();

        assert_ne!(before.expose_secret(), after.expose_secret());
    }
}
