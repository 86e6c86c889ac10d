// src/extractors/record.rs
use crate::extractors::fields::{self, FilingFacts};
use crate::extractors::gender::GenderGuesser;
use crate::extractors::people::PersonGroupStats;
use crate::filing::{FilingDocument, FilingPeriod};
use crate::utils::error::ExtractError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The fixed-schema row produced for one filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRecord {
    pub ein: String, // kept as text, leading zeros matter
    pub org_name: String,
    pub year: u32,
    pub period_code: String,
    pub percentage_women_trustees: Option<f64>,
    pub percentage_women_key_employees: Option<f64>,
    pub whistleblower_policy: Option<bool>,
    pub ceo_reviewed_compensation: Option<bool>,
    pub other_reviewed_compensation: Option<bool>,
    pub male_to_female_pay_ratio: Option<f64>,
    pub president_to_average_pay_ratio: Option<f64>,
}

/// Builds [`OrganizationRecord`]s from parsed filings.
pub struct RecordAssembler {
    guesser: GenderGuesser,
}

impl RecordAssembler {
    pub fn new(guesser: GenderGuesser) -> Self {
        Self { guesser }
    }

    /// Assembles the record for one filing. Only the identity fields can fail;
    /// everything else degrades to `None`.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        doc: &FilingDocument,
        period: &FilingPeriod,
        rng: &mut R,
    ) -> Result<OrganizationRecord, ExtractError> {
        let ein = fields::extract_ein(doc)?;
        let org_name = fields::extract_org_name(doc)?;

        let facts = FilingFacts::from_document(doc);
        let stats = PersonGroupStats::new(&self.guesser);
        let key_employees = facts.key_employees.as_deref();

        let record = OrganizationRecord {
            percentage_women_trustees: stats.trustee_female_percentage(&facts.trustees, rng),
            percentage_women_key_employees: stats.key_employee_female_percentage(key_employees, rng),
            male_to_female_pay_ratio: stats.male_to_female_pay_ratio(key_employees, rng),
            president_to_average_pay_ratio: stats.president_to_average_pay_ratio(&facts),
            whistleblower_policy: facts.whistleblower_policy,
            ceo_reviewed_compensation: facts.ceo_reviewed_compensation,
            other_reviewed_compensation: facts.other_reviewed_compensation,
            ein,
            org_name,
            year: period.year,
            period_code: period.code.clone(),
        };

        tracing::debug!("Assembled record for EIN {} from {}", record.ein, doc.file_name());
        Ok(record)
    }
}
