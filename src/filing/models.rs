// src/filing/models.rs
use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// The IRS publishes e-file archives starting with this year.
pub const EARLIEST_FILING_YEAR: u32 = 2018;

// Matches "2024_TEOS_XML_01A" inside a directory name, a zip name or a full URL.
static ARCHIVE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})_TEOS_XML_([0-9A-Za-z]+)").expect("Failed to compile ARCHIVE_NAME_RE")
});

/// The filing year and period code a batch of filings was published under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingPeriod {
    pub year: u32,
    pub code: String, // e.g. "01A"
}

impl FilingPeriod {
    pub fn new(year: u32, code: impl Into<String>) -> Self {
        Self { year, code: code.into() }
    }

    /// Reads the period out of an archive name such as
    /// `https://apps.irs.gov/pub/epostcard/990/xml/2024/2024_TEOS_XML_01A.zip`.
    pub fn from_archive_name(name: &str) -> Option<Self> {
        let caps = ARCHIVE_NAME_RE.captures(name)?;
        let year = caps.get(1)?.as_str().parse().ok()?;
        let code = caps.get(2)?.as_str().to_uppercase();
        Some(Self { year, code })
    }

    /// Checks the year against the range the IRS actually publishes.
    pub fn validate_year(&self) -> Result<(), String> {
        let current_year = chrono::Utc::now().year() as u32;
        if self.year < EARLIEST_FILING_YEAR {
            return Err(format!(
                "Invalid year {}. The earliest available year is {}",
                self.year, EARLIEST_FILING_YEAR
            ));
        }
        if self.year > current_year {
            return Err(format!(
                "Invalid year {}. The latest available year is {}",
                self.year, current_year
            ));
        }
        Ok(())
    }
}
