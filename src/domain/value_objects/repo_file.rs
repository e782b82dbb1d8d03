use crate::common::error::BmoError;
use crate::common::result::BmoResult;
use std::fmt;
use std::str::FromStr;

/// `<repo>/<file>` 形式のファイル指定
///
/// 最初の `/` だけで分割するため、ファイル側に `/` を含んでもよい。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoFileSpec {
    /// リポジトリの短縮名
    pub repository: String,

    /// リポジトリ内の相対パス
    pub file: String,
}

impl RepoFileSpec {
    pub fn parse(token: &str) -> BmoResult<Self> {
        let invalid = |message: &str| {
            BmoError::validation_error("repo/file", message, Some(token.to_string()))
        };

        let (repository, file) = token
            .split_once('/')
            .ok_or_else(|| invalid("expected <repo>/<file>"))?;

        if repository.is_empty() {
            return Err(invalid("repository name is empty"));
        }
        if file.is_empty() {
            return Err(invalid("file path is empty"));
        }

        Ok(Self {
            repository: repository.to_string(),
            file: file.to_string(),
        })
    }

    /// コマンド引数を個々の指定に展開
    ///
    /// 各引数はカンマ区切りで複数の指定を含められる。空の要素は無視する。
    pub fn parse_all<I, S>(args: I) -> BmoResult<Vec<Self>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut specs = Vec::new();
        for arg in args {
            for token in arg.as_ref().split(',').map(str::trim) {
                if !token.is_empty() {
                    specs.push(Self::parse(token)?);
                }
            }
        }
        Ok(specs)
    }
}

impl FromStr for RepoFileSpec {
    type Err = BmoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RepoFileSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repository, self.file)
    }
}
