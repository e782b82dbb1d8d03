use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::Serialize;

/// `git log` と同じ日付書式（例: `Mon Jan 02 15:04:05 2006 -0700`）
pub const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// コミットの作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub email: String,

    /// UNIX時刻（秒）
    pub seconds: i64,

    /// UTCからのオフセット（分）
    pub offset_minutes: i32,
}

impl Signature {
    /// 作者のタイムゾーンでの日時
    pub fn when(&self) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(self.offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset is valid"));
        let utc = Utc
            .timestamp_opt(self.seconds, 0)
            .single()
            .unwrap_or_default();
        utc.with_timezone(&offset)
    }

    /// `DATE_FORMAT` で整形した日時
    pub fn formatted_date(&self) -> String {
        self.when().format(DATE_FORMAT).to_string()
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// 1コミット分の情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    /// 完全なコミットハッシュ（16進）
    pub id: String,
    pub author: Signature,
    pub message: String,
}

impl CommitInfo {
    /// 先頭7文字の短縮ハッシュ
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }

    /// メッセージの1行目（前後の空白を除去）
    pub fn summary(&self) -> &str {
        self.message.split('\n').next().unwrap_or("").trim()
    }
}
