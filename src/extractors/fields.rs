// src/extractors/fields.rs

// --- Imports ---
use crate::filing::{Element, FilingDocument};
use crate::utils::error::ExtractError;

// --- Tag Names ---
const FILER_TAG: &str = "Filer";
const EIN_TAG: &str = "EIN";
const BUSINESS_NAME_TAG: &str = "BusinessName";
const TOTAL_COMPENSATION_TAG: &str = "CYSalariesCompEmpBnftPaidAmt";
const TOTAL_EMPLOYEES_TAG: &str = "TotalEmployeeCnt";
const WHISTLEBLOWER_POLICY_TAG: &str = "WhistleblowerPolicyInd";
const CEO_COMPENSATION_REVIEW_TAG: &str = "CompensationProcessCEOInd";
const OTHER_COMPENSATION_REVIEW_TAG: &str = "CompensationProcessOtherInd";

// Part VII, Section A: officers, directors, trustees, key employees
const TRUSTEE_GROUP_TAG: &str = "Form990PartVIISectionAGrp";
const PERSON_NAME_TAG: &str = "PersonNm";
const TRUSTEE_OR_DIRECTOR_TAG: &str = "IndividualTrusteeOrDirectorInd";
const COMP_FROM_ORG_TAG: &str = "ReportableCompFromOrgAmt";
const COMP_FROM_RELATED_ORG_TAG: &str = "ReportableCompFromRltdOrgAmt";
const OTHER_COMP_TAG: &str = "OtherCompensationAmt";

// Schedule J: compensation information
const SCHEDULE_J_TAG: &str = "IRS990ScheduleJ";
const KEY_EMPLOYEE_GROUP_TAG: &str = "RltdOrgOfficerTrstKeyEmplGrp";
const KEY_EMPLOYEE_COMP_TAG: &str = "TotalCompensationFilingOrgAmt";

// --- Identity Fields ---

fn filer<'a, 'input>(doc: &'a FilingDocument<'input>) -> Result<Element<'a, 'input>, ExtractError> {
    doc.find(FILER_TAG).ok_or_else(|| ExtractError::MissingFiler {
        file: doc.file_name().to_string(),
    })
}

/// Reads `Filer/EIN` verbatim. EINs are identifiers, leading zeros included.
pub fn extract_ein(doc: &FilingDocument) -> Result<String, ExtractError> {
    let filer = filer(doc)?;
    filer
        .find(EIN_TAG)
        .map(|el| el.text())
        .ok_or_else(|| ExtractError::MissingEin {
            file: doc.file_name().to_string(),
        })
}

/// Reads `Filer/BusinessName`, joining its non-blank name lines with single spaces.
pub fn extract_org_name(doc: &FilingDocument) -> Result<String, ExtractError> {
    let filer = filer(doc)?;
    let business_name = filer
        .find(BUSINESS_NAME_TAG)
        .ok_or_else(|| ExtractError::MissingOrgName {
            file: doc.file_name().to_string(),
        })?;

    let mut lines: Vec<String> = business_name
        .child_elements()
        .map(|line| line.text().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    // Name written directly inside BusinessName.
    if lines.is_empty() {
        let text = business_name.text();
        let text = text.trim();
        if !text.is_empty() {
            lines.push(text.to_string());
        }
    }

    if lines.is_empty() {
        return Err(ExtractError::MissingOrgName {
            file: doc.file_name().to_string(),
        });
    }
    Ok(lines.join(" "))
}

// --- Optional Scalar Fields ---

pub fn extract_total_compensation(doc: &FilingDocument) -> Option<f64> {
    doc.find(TOTAL_COMPENSATION_TAG)
        .and_then(|el| el.number::<f64>())
        .filter(|v| v.is_finite())
}

pub fn extract_total_employees(doc: &FilingDocument) -> Option<i64> {
    doc.find(TOTAL_EMPLOYEES_TAG)
        .and_then(|el| el.number::<i64>())
        .filter(|count| *count >= 0)
}

pub fn extract_whistleblower_policy(doc: &FilingDocument) -> Option<bool> {
    extract_indicator(doc, WHISTLEBLOWER_POLICY_TAG)
}

pub fn extract_ceo_compensation_review(doc: &FilingDocument) -> Option<bool> {
    extract_indicator(doc, CEO_COMPENSATION_REVIEW_TAG)
}

pub fn extract_other_compensation_review(doc: &FilingDocument) -> Option<bool> {
    extract_indicator(doc, OTHER_COMPENSATION_REVIEW_TAG)
}

/// Yes/no indicators are written either as a digit or as `true`/`false`.
fn extract_indicator(doc: &FilingDocument, tag: &str) -> Option<bool> {
    doc.find(tag).map(|el| {
        let text = el.text();
        let text = text.trim();
        text == "1" || text == "true"
    })
}

/// Checkbox indicators in Part VII are written as `X`.
fn is_marked(el: Option<Element>) -> bool {
    el.map(|el| {
        let text = el.text();
        let text = text.trim();
        text.eq_ignore_ascii_case("x") || text == "1" || text.eq_ignore_ascii_case("true")
    })
    .unwrap_or(false)
}

fn amount(entry: Element, tag: &str) -> Option<f64> {
    entry
        .find(tag)
        .and_then(|el| el.number::<f64>())
        .filter(|v| v.is_finite())
}

fn person_name(entry: Element) -> Option<String> {
    entry
        .child_text(PERSON_NAME_TAG)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

// --- Person Entries ---

/// One row of Part VII, Section A.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrusteeEntry {
    pub name: Option<String>,
    pub trustee_or_director: bool,
    pub comp_from_org: Option<f64>,
    pub comp_from_related_orgs: Option<f64>,
    pub other_comp: Option<f64>,
}

impl TrusteeEntry {
    fn from_element(entry: Element) -> Self {
        Self {
            name: person_name(entry),
            trustee_or_director: is_marked(entry.find(TRUSTEE_OR_DIRECTOR_TAG)),
            comp_from_org: amount(entry, COMP_FROM_ORG_TAG),
            comp_from_related_orgs: amount(entry, COMP_FROM_RELATED_ORG_TAG),
            other_comp: amount(entry, OTHER_COMP_TAG),
        }
    }

    /// An individual trustee or director receiving no compensation from any source.
    /// A missing or unparseable amount does not count as zero.
    pub fn is_unpaid_trustee(&self) -> bool {
        self.trustee_or_director
            && self.comp_from_org == Some(0.0)
            && self.comp_from_related_orgs == Some(0.0)
            && self.other_comp == Some(0.0)
    }
}

/// One row of the Schedule J compensation table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyEmployeeEntry {
    pub name: Option<String>,
    pub compensation: Option<f64>,
}

impl KeyEmployeeEntry {
    fn from_element(entry: Element) -> Self {
        Self {
            name: person_name(entry),
            compensation: amount(entry, KEY_EMPLOYEE_COMP_TAG),
        }
    }
}

// --- Typed Per-Filing Representation ---

/// Every optional value the statistics need, read once from a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilingFacts {
    pub total_compensation: Option<f64>,
    pub total_employees: Option<i64>,
    pub whistleblower_policy: Option<bool>,
    pub ceo_reviewed_compensation: Option<bool>,
    pub other_reviewed_compensation: Option<bool>,
    pub trustees: Vec<TrusteeEntry>,
    /// `None` when the filing has no Schedule J.
    pub key_employees: Option<Vec<KeyEmployeeEntry>>,
}

impl FilingFacts {
    pub fn from_document(doc: &FilingDocument) -> Self {
        let trustees: Vec<TrusteeEntry> = doc
            .find_all(TRUSTEE_GROUP_TAG)
            .map(TrusteeEntry::from_element)
            .collect();

        let key_employees = doc.find(SCHEDULE_J_TAG).map(|schedule| {
            schedule
                .find_all(KEY_EMPLOYEE_GROUP_TAG)
                .map(KeyEmployeeEntry::from_element)
                .collect::<Vec<_>>()
        });

        tracing::debug!(
            "{}: {} trustee entries, {} key employee entries",
            doc.file_name(),
            trustees.len(),
            key_employees.as_ref().map_or(0, Vec::len)
        );

        Self {
            total_compensation: extract_total_compensation(doc),
            total_employees: extract_total_employees(doc),
            whistleblower_policy: extract_whistleblower_policy(doc),
            ceo_reviewed_compensation: extract_ceo_compensation_review(doc),
            other_reviewed_compensation: extract_other_compensation_review(doc),
            trustees,
            key_employees,
        }
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_filer(filer: &str, body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<Return xmlns="http://www.irs.gov/efile">
  <ReturnHeader>{}</ReturnHeader>
  <ReturnData>{}</ReturnData>
</Return>"#,
            filer, body
        )
    }

    #[test]
    fn test_ein_is_returned_verbatim() {
        let xml = doc_with_filer("<Filer><EIN>742050021</EIN></Filer>", "");
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();
        assert_eq!(extract_ein(&doc).unwrap(), "742050021");

        let xml = doc_with_filer("<Filer><EIN>012345678</EIN></Filer>", "");
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();
        assert_eq!(extract_ein(&doc).unwrap(), "012345678");
    }

    #[test]
    fn test_multi_line_org_name_is_joined() {
        let filer = r#"<Filer>
          <EIN>840404246</EIN>
          <BusinessName>
            <BusinessNameLine1Txt>HABITAT</BusinessNameLine1Txt>
            <BusinessNameLine2Txt>FOR HUMANITY</BusinessNameLine2Txt>
            <BusinessNameLine3Txt>OF METRO DENVER INC</BusinessNameLine3Txt>
          </BusinessName>
        </Filer>"#;
        let xml = doc_with_filer(filer, "");
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();
        assert_eq!(
            extract_org_name(&doc).unwrap(),
            "HABITAT FOR HUMANITY OF METRO DENVER INC"
        );
    }

    #[test]
    fn test_missing_filer_fails_for_both_identity_fields() {
        let xml = doc_with_filer("", "<TotalEmployeeCnt>3</TotalEmployeeCnt>");
        let doc = FilingDocument::parse("nofiler.xml", &xml).unwrap();

        let err = extract_ein(&doc).unwrap_err();
        assert!(matches!(err, ExtractError::MissingFiler { ref file } if file == "nofiler.xml"));
        let err = extract_org_name(&doc).unwrap_err();
        assert!(matches!(err, ExtractError::MissingFiler { ref file } if file == "nofiler.xml"));
    }

    #[test]
    fn test_missing_identity_children() {
        let xml = doc_with_filer("<Filer><PhoneNum>5555555555</PhoneNum></Filer>", "");
        let doc = FilingDocument::parse("partial.xml", &xml).unwrap();
        assert!(matches!(extract_ein(&doc), Err(ExtractError::MissingEin { .. })));
        assert!(matches!(extract_org_name(&doc), Err(ExtractError::MissingOrgName { .. })));
    }

    #[test]
    fn test_org_name_as_direct_text() {
        let xml = doc_with_filer("<Filer><EIN>1</EIN><BusinessName> ACME INC </BusinessName></Filer>", "");
        let doc = FilingDocument::parse("plain.xml", &xml).unwrap();
        assert_eq!(extract_org_name(&doc).unwrap(), "ACME INC");
    }

    #[test]
    fn test_blank_org_name_is_missing() {
        for filer in [
            "<Filer><EIN>1</EIN><BusinessName/></Filer>",
            "<Filer><EIN>1</EIN><BusinessName><BusinessNameLine1Txt>  </BusinessNameLine1Txt></BusinessName></Filer>",
        ] {
            let xml = doc_with_filer(filer, "");
            let doc = FilingDocument::parse("blank.xml", &xml).unwrap();
            let err = extract_org_name(&doc).unwrap_err();
            assert!(matches!(err, ExtractError::MissingOrgName { ref file } if file == "blank.xml"));
        }
    }

    #[test]
    fn test_negative_employee_count_is_none() {
        let xml = doc_with_filer("", "<TotalEmployeeCnt>-9223372036854775808</TotalEmployeeCnt>");
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();
        assert_eq!(extract_total_employees(&doc), None);
    }

    #[test]
    fn test_optional_scalars() {
        let body = r#"
          <CYSalariesCompEmpBnftPaidAmt>1500000</CYSalariesCompEmpBnftPaidAmt>
          <TotalEmployeeCnt>n/a</TotalEmployeeCnt>
          <WhistleblowerPolicyInd>true</WhistleblowerPolicyInd>
          <CompensationProcessCEOInd>1</CompensationProcessCEOInd>
          <CompensationProcessOtherInd>0</CompensationProcessOtherInd>"#;
        let xml = doc_with_filer("", body);
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();

        assert_eq!(extract_total_compensation(&doc), Some(1_500_000.0));
        assert_eq!(extract_total_employees(&doc), None);
        assert_eq!(extract_whistleblower_policy(&doc), Some(true));
        assert_eq!(extract_ceo_compensation_review(&doc), Some(true));
        assert_eq!(extract_other_compensation_review(&doc), Some(false));
    }

    #[test]
    fn test_absent_optional_scalars_are_none() {
        let xml = doc_with_filer("", "");
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();
        let facts = FilingFacts::from_document(&doc);
        assert_eq!(facts, FilingFacts::default());
    }

    #[test]
    fn test_facts_collect_person_entries() {
        let body = r#"
          <IRS990>
            <Form990PartVIISectionAGrp>
              <PersonNm>JANE DOE</PersonNm>
              <IndividualTrusteeOrDirectorInd>X</IndividualTrusteeOrDirectorInd>
              <ReportableCompFromOrgAmt>0</ReportableCompFromOrgAmt>
              <ReportableCompFromRltdOrgAmt>0</ReportableCompFromRltdOrgAmt>
              <OtherCompensationAmt>0</OtherCompensationAmt>
            </Form990PartVIISectionAGrp>
            <Form990PartVIISectionAGrp>
              <PersonNm>JOHN ROE</PersonNm>
              <OfficerInd>X</OfficerInd>
              <ReportableCompFromOrgAmt>90000</ReportableCompFromOrgAmt>
            </Form990PartVIISectionAGrp>
          </IRS990>
          <IRS990ScheduleJ>
            <RltdOrgOfficerTrstKeyEmplGrp>
              <PersonNm>JOHN Q ROE</PersonNm>
              <TotalCompensationFilingOrgAmt>210000</TotalCompensationFilingOrgAmt>
            </RltdOrgOfficerTrstKeyEmplGrp>
          </IRS990ScheduleJ>"#;
        let xml = doc_with_filer("", body);
        let doc = FilingDocument::parse("f.xml", &xml).unwrap();
        let facts = FilingFacts::from_document(&doc);

        assert_eq!(facts.trustees.len(), 2);
        assert!(facts.trustees[0].is_unpaid_trustee());
        assert!(!facts.trustees[1].is_unpaid_trustee());
        assert_eq!(facts.trustees[1].comp_from_related_orgs, None);

        let key = facts.key_employees.expect("Schedule J present");
        assert_eq!(
            key,
            vec![KeyEmployeeEntry {
                name: Some("JOHN Q ROE".to_string()),
                compensation: Some(210_000.0),
            }]
        );
    }
}
