use crate::common::error::{BmoError, RepositoryFailure};
use crate::common::result::BmoResult;
use crate::domain::entities::repository::RepositoryRef;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::debug;

/// ファンアウト実行の設定
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// 同時に実行するワーカー数の上限（Noneの場合はメンバー数）
    pub max_concurrent: Option<usize>,
}

impl ExecutorConfig {
    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// ワーカーが結果エントリを親タスクへ送るためのハンドル
#[derive(Debug)]
pub struct EntrySender<E> {
    index: usize,
    tx: mpsc::UnboundedSender<(usize, E)>,
}

impl<E> EntrySender<E> {
    /// エントリを出力側へ送る
    pub fn send(&self, entry: E) {
        // the receiver lives until every worker has been joined
        let _ = self.tx.send((self.index, entry));
    }
}

/// ファンアウト実行の結果
#[derive(Debug, Default)]
pub struct FanOutReport {
    /// 実行したメンバー数
    pub total: usize,

    /// 失敗したメンバーとそのエラー（メンバーの登録順）
    pub failures: Vec<RepositoryFailure>,
}

impl FanOutReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// コマンドの結果に変換
    ///
    /// 失敗が1件ならそのエラーをそのまま返し、複数なら集約エラーにまとめる。
    pub fn into_result(mut self) -> BmoResult<()> {
        match self.failures.len() {
            0 => Ok(()),
            1 => Err(self.failures.remove(0).error),
            _ => Err(BmoError::RepositoriesFailed {
                total: self.total,
                failures: self.failures,
            }),
        }
    }
}

/// ワークスペースの全メンバーに対して操作を並行実行する
///
/// 各メンバーの操作はブロッキングスレッドで実行され、送られたエントリは
/// 親タスクが1つずつシンクへ書き出す。リポジトリ間の出力順は不定だが、
/// 同じリポジトリ内の順序は保たれる。
#[derive(Debug, Clone, Default)]
pub struct FanOutExecutor {
    config: ExecutorConfig,
}

impl FanOutExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    /// `op` を各メンバーに対して1回ずつ実行する
    ///
    /// メンバーの失敗はすべて `FanOutReport` に集める。シンクへの書き込みが
    /// 失敗した場合はそれ以降の書き込みをやめ、全ワーカーの終了を待ってから
    /// そのエラーを返す。
    pub async fn run<E, Op, Sink>(
        &self,
        members: &[RepositoryRef],
        op: Op,
        mut sink: Sink,
    ) -> BmoResult<FanOutReport>
    where
        E: Send + 'static,
        Op: Fn(&RepositoryRef, &EntrySender<E>) -> BmoResult<()> + Send + Sync + 'static,
        Sink: FnMut(&RepositoryRef, E) -> BmoResult<()>,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, E)>();
        let op = Arc::new(op);
        let semaphore = self
            .config
            .max_concurrent
            .map(|max| Arc::new(Semaphore::new(max.max(1))));

        let tasks: Vec<_> = members
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, repo)| {
                let op = Arc::clone(&op);
                let semaphore = semaphore.clone();
                let sender = EntrySender {
                    index,
                    tx: tx.clone(),
                };

                tokio::spawn(async move {
                    let _permit = match semaphore {
                        Some(semaphore) => Some(semaphore.acquire_owned().await.map_err(|e| {
                            BmoError::internal_error_with_source("failed to acquire worker slot", e)
                        })?),
                        None => None,
                    };

                    tokio::task::spawn_blocking(move || {
                        debug!("Worker started for {}", repo);
                        let result = (*op)(&repo, &sender);
                        debug!("Worker finished for {} (ok: {})", repo, result.is_ok());
                        result
                    })
                    .await
                    .map_err(|e| BmoError::internal_error_with_source("worker panicked", e))?
                })
            })
            .collect();
        drop(tx);

        let mut sink_error = None;
        while let Some((index, entry)) = rx.recv().await {
            if sink_error.is_some() {
                continue;
            }
            if let Err(e) = sink(&members[index], entry) {
                debug!("Output sink failed, draining remaining entries: {}", e);
                sink_error = Some(e);
            }
        }

        let results = join_all(tasks).await;

        let mut report = FanOutReport {
            total: members.len(),
            failures: Vec::new(),
        };
        for (member, joined) in members.iter().zip(results) {
            let outcome = joined
                .map_err(|e| BmoError::internal_error_with_source("worker task failed", e))
                .and_then(|result| result);
            if let Err(error) = outcome {
                report.failures.push(RepositoryFailure {
                    repository: member.short_name(),
                    error,
                });
            }
        }

        match sink_error {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}
