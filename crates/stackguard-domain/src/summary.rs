/// Counts of terminal evaluation states across one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub compliant: u32,
    pub non_compliant: u32,
    pub suppressed: u32,
    pub errors: u32,
    pub suppressed_errors: u32,
    pub not_applicable: u32,
}

impl RunSummary {
    /// Evaluations that produced at least one record.
    pub fn total(&self) -> u32 {
        self.compliant
            + self.non_compliant
            + self.suppressed
            + self.errors
            + self.suppressed_errors
            + self.not_applicable
    }
}
