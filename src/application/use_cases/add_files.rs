use super::scm_failure;
use crate::application::services::repository_resolver::{resolve, ResolvedFile};
use crate::application::services::workspace_registry::WorkspaceRegistry;
use crate::common::result::BmoResult;
use crate::domain::value_objects::repo_file::RepoFileSpec;
use crate::infrastructure::scm::SharedScm;
use tracing::debug;

/// `<repo>/<file>` 指定のファイルをステージするユースケース
pub struct AddFilesUseCase {
    scm: SharedScm,
}

impl AddFilesUseCase {
    pub fn new(scm: SharedScm) -> Self {
        Self { scm }
    }

    /// 指定されたファイルを順にステージする
    ///
    /// 最初に失敗した時点で中断し、それまでのステージは取り消さない。
    /// 引数はカンマ区切りで複数の指定を含められる。
    pub fn execute<S: AsRef<str>>(
        &self,
        registry: &WorkspaceRegistry,
        workspace: &str,
        args: &[S],
    ) -> BmoResult<Vec<ResolvedFile>> {
        let workspace = registry.lookup(workspace)?;
        let specs = RepoFileSpec::parse_all(args)?;

        let mut staged = Vec::with_capacity(specs.len());
        for spec in &specs {
            let resolved = resolve(&workspace, spec)?;
            debug!(
                "Staging {} in {}",
                resolved.file.display(),
                resolved.repository.path().display()
            );
            self.scm
                .stage(resolved.repository.path(), &resolved.file)
                .map_err(|e| scm_failure(&resolved.repository, e))?;
            staged.push(resolved);
        }

        Ok(staged)
    }
}
