use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    HeaderFallback,
    HeaderScanUnreadable,
}

/// A non-fatal condition observed while cleaning one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanWarning {
    pub code: WarningCode,
    pub message: String,
    pub file: Option<String>,
    pub header_row: Option<usize>,
}

impl CleanWarning {
    #[must_use]
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            file: None,
            header_row: None,
        }
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = Some(header_row);
        self
    }
}
