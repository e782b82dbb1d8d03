use crate::common::error::BmoError;

/// Result alias used throughout the crate
///
/// # Examples
///
/// ```
/// use bmo::common::result::BmoResult;
/// use bmo::common::error::BmoError;
///
/// fn example_function() -> BmoResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> BmoResult<()> {
///     Err(BmoError::internal_error("Something went wrong"))
/// }
/// ```
pub type BmoResult<T> = Result<T, BmoError>;

/// Conversions from `Option` into `BmoResult`
pub trait OptionExt<T> {
    /// Convert `None` into a validation error for `field`
    ///
    /// # Examples
    ///
    /// ```
    /// use bmo::common::result::{BmoResult, OptionExt};
    ///
    /// let none_value: Option<String> = None;
    /// let result: BmoResult<String> = none_value.ok_or_validation_error("field", "required");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> BmoResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> BmoResult<T> {
        self.ok_or_else(|| BmoError::validation_error(field, message, None))
    }
}

/// Conversions from foreign `Result`s into `BmoResult`, attaching context
pub trait ResultExt<T, E> {
    /// Wrap the error as a VCS failure attributed to `repository`
    ///
    /// # Examples
    ///
    /// ```
    /// use bmo::common::result::{BmoResult, ResultExt};
    ///
    /// let result: Result<(), std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::Other, "boom"
    /// ));
    /// let bmo_result: BmoResult<()> = result.with_git_error("unable to open repo", "api");
    /// assert!(bmo_result.unwrap_err().to_string().contains("unable to open repo"));
    /// ```
    fn with_git_error(self, message: impl Into<String>, repository: impl Into<String>) -> BmoResult<T>
    where
        E: std::error::Error + Send + Sync + 'static;

    /// Wrap the error as a file system failure on `path`
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> BmoResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_git_error(self, message: impl Into<String>, repository: impl Into<String>) -> BmoResult<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.map_err(|e| {
            let message = format!("{}: {}", message.into(), e);
            BmoError::git_error_with_source(message, Some(repository.into()), e)
        })
    }

    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> BmoResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| BmoError::filesystem_error_with_source(message, path, e.into()))
    }
}
