use crate::shared::Result;

/// OutputPresenter port for presenting final output
///
/// This port abstracts the output destination (stdout, file, etc.)
/// where the rendered report is written.
pub trait OutputPresenter {
    /// Presents the rendered report
    ///
    /// # Errors
    /// Returns an error if:
    /// - Writing to the output destination fails
    /// - The destination path is rejected for security reasons
    fn present(&self, content: &str) -> Result<()>;
}
