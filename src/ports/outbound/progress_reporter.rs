/// ProgressReporter port for reporting progress during a scan
///
/// Reports go to the user (stderr), never to the report output.
pub trait ProgressReporter {
    /// Reports a progress message
    fn report(&self, message: &str);

    /// Reports progress of a counted phase
    ///
    /// # Arguments
    /// * `current` - Items processed so far
    /// * `total` - Total items in the phase
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a warning that does not stop the scan
    fn report_warning(&self, message: &str);

    /// Reports an error message
    fn report_error(&self, message: &str);

    /// Reports completion of a phase
    fn report_completion(&self, message: &str);
}
