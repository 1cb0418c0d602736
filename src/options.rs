use std::str::FromStr;

/// Which of the two document shapes a batch contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    Sales,
    Payment,
}

impl FromStr for Pipeline {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        match spec.trim().to_ascii_lowercase().as_str() {
            "sales" => Ok(Self::Sales),
            "payment" => Ok(Self::Payment),
            other => Err(format!("unknown pipeline '{other}', expected sales or payment")),
        }
    }
}

/// How the header row of each sheet is located.
///
/// `Auto` runs the scored scan; `Fixed(n)` skips exactly `n` rows and treats
/// row `n` as the header. Payment exports default to `Fixed(4)` because their
/// header vocabulary never satisfies the auto-detector's required labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSkip {
    Auto,
    Fixed(usize),
}

impl FromStr for HeaderSkip {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let trimmed = spec.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed
            .parse::<usize>()
            .map(Self::Fixed)
            .map_err(|_| format!("invalid header skip '{spec}', expected 'auto' or a row count"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    pub pipeline: Pipeline,
    /// `None` uses the pipeline default: auto for sales, fixed 4 for payment.
    pub header_skip: Option<HeaderSkip>,
    /// How many leading rows the header scan may inspect.
    pub scan_window: usize,
    pub delimiter: u8,
    /// Sheet name for the XLSX export; `None` uses the pipeline default.
    pub sheet_name: Option<String>,
}

pub(crate) const DEFAULT_SCAN_WINDOW: usize = 60;
pub(crate) const PAYMENT_FIXED_SKIP: usize = 4;

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            pipeline: Pipeline::Sales,
            header_skip: None,
            scan_window: DEFAULT_SCAN_WINDOW,
            delimiter: b',',
            sheet_name: None,
        }
    }
}

impl CleanOptions {
    pub(crate) fn effective_header_skip(&self) -> HeaderSkip {
        self.header_skip.unwrap_or(match self.pipeline {
            Pipeline::Sales => HeaderSkip::Auto,
            Pipeline::Payment => HeaderSkip::Fixed(PAYMENT_FIXED_SKIP),
        })
    }

    /// Sheet name used for XLSX output when none is configured.
    #[must_use]
    pub fn effective_sheet_name(&self) -> &str {
        self.sheet_name.as_deref().unwrap_or(match self.pipeline {
            Pipeline::Sales => "sales",
            Pipeline::Payment => "payment",
        })
    }
}
