use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use url::Url;

/// GitURL関連のエラー
#[derive(Debug, Error, PartialEq)]
pub enum GitUrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),

    #[error("Missing repository path: {0}")]
    MissingRepoPath(String),

    #[error("Invalid characters in URL: {0}")]
    InvalidCharacters(String),
}

/// URLの転送方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transport {
    /// `ssh://` もしくは `user@host:path` 形式
    Ssh,
    /// `git://`
    Git,
    /// `http://`
    Http,
    /// `https://`
    Https,
    /// `file://` もしくはローカルパス
    File,
}

impl Transport {
    /// スキーム名からTransportを取得
    fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            "ssh" | "git+ssh" | "ssh+git" => Some(Self::Ssh),
            "git" => Some(Self::Git),
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Git => "git",
            Self::Http => "http",
            Self::Https => "https",
            Self::File => "file",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// clone元となるGit URLの値オブジェクト
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GitUrl {
    /// 入力されたURL文字列（前後の空白を除去済み）
    url: String,

    /// 転送方式
    transport: Transport,

    /// URLに含まれるユーザー名
    user: Option<String>,

    /// ホスト名（ローカルの場合はNone）
    host: Option<String>,

    /// リポジトリパス
    repo_path: String,
}

fn scp_like_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:(?P<user>[^@/:]+)@)?(?P<host>[^@/:]{2,}):(?P<path>[^/].*)$")
            .expect("scp-like URL pattern is valid")
    })
}

impl GitUrl {
    /// 新しいGitUrlインスタンスを作成
    pub fn new(url: &str) -> Result<Self, GitUrlError> {
        let trimmed = url.trim();
        Self::validate(trimmed)?;

        if trimmed.contains("://") {
            return Self::parse_scheme_url(trimmed);
        }

        if let Some(captures) = scp_like_pattern().captures(trimmed) {
            return Ok(Self {
                url: trimmed.to_string(),
                transport: Transport::Ssh,
                user: captures.name("user").map(|m| m.as_str().to_string()),
                host: captures.name("host").map(|m| m.as_str().to_string()),
                repo_path: captures["path"].to_string(),
            });
        }

        // それ以外はローカルパスとして扱う
        Ok(Self {
            url: trimmed.to_string(),
            transport: Transport::File,
            user: None,
            host: None,
            repo_path: trimmed.to_string(),
        })
    }

    /// 空文字と制御文字をチェック
    fn validate(url: &str) -> Result<(), GitUrlError> {
        if url.is_empty() {
            return Err(GitUrlError::InvalidFormat("Empty URL".to_string()));
        }

        if let Some(ch) = url.chars().find(|ch| ch.is_control()) {
            return Err(GitUrlError::InvalidCharacters(format!(
                "Control character detected: {:?}",
                ch
            )));
        }

        Ok(())
    }

    /// `scheme://` 形式のURLを解析
    fn parse_scheme_url(url: &str) -> Result<Self, GitUrlError> {
        let parsed = Url::parse(url).map_err(|_| GitUrlError::InvalidFormat(url.to_string()))?;

        let transport = Transport::from_scheme(parsed.scheme())
            .ok_or_else(|| GitUrlError::UnsupportedScheme(parsed.scheme().to_string()))?;

        let host = parsed.host_str().filter(|h| !h.is_empty()).map(str::to_string);
        if host.is_none() && transport != Transport::File {
            return Err(GitUrlError::MissingHost(url.to_string()));
        }

        let path = parsed.path();
        if path.trim_matches('/').is_empty() {
            return Err(GitUrlError::MissingRepoPath(url.to_string()));
        }

        let user = Some(parsed.username())
            .filter(|u| !u.is_empty())
            .map(str::to_string);

        Ok(Self {
            url: url.to_string(),
            transport,
            user,
            host,
            repo_path: path.strip_prefix('/').unwrap_or(path).to_string(),
        })
    }

    /// 入力されたURL文字列を取得
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// 転送方式を取得
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// URLに含まれるユーザー名を取得
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// ホスト名を取得
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// リポジトリパスを取得
    pub fn repo_path(&self) -> &str {
        &self.repo_path
    }

    /// リポジトリ名を取得（最後のパス要素から `.git` を除いたもの）
    ///
    /// clone先ディレクトリのデフォルト名として使う。
    pub fn repo_name(&self) -> Option<&str> {
        self.repo_path
            .split(&['/', '\\'][..])
            .filter(|segment| !segment.is_empty())
            .last()
            .map(|segment| segment.strip_suffix(".git").unwrap_or(segment))
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}

impl TryFrom<&str> for GitUrl {
    type Error = GitUrlError;

    fn try_from(url: &str) -> Result<Self, Self::Error> {
        GitUrl::new(url)
    }
}
