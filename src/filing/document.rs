// src/filing/document.rs
use crate::utils::error::ExtractError;
use roxmltree::{Document, Node};
use std::str::FromStr;

/// One parsed IRS 990 e-file document.
///
/// Lookups match on the local tag name only, so the `http://www.irs.gov/efile`
/// default namespace carried by every filing never has to be spelled out.
pub struct FilingDocument<'input> {
    file_name: String,
    doc: Document<'input>,
}

impl<'input> FilingDocument<'input> {
    /// Parses `xml`, remembering `file_name` for diagnostics.
    pub fn parse(file_name: impl Into<String>, xml: &'input str) -> Result<Self, ExtractError> {
        let file_name = file_name.into();
        let doc = Document::parse(xml).map_err(|source| ExtractError::Xml {
            file: file_name.clone(),
            source,
        })?;
        tracing::trace!("Parsed {} ({} nodes)", file_name, doc.descendants().count());
        Ok(Self { file_name, doc })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The document root (not the root element).
    pub fn root(&self) -> Element<'_, 'input> {
        Element(self.doc.root())
    }

    /// First descendant element named `tag`, in document order.
    pub fn find(&self, tag: &str) -> Option<Element<'_, 'input>> {
        self.root().find(tag)
    }

    /// All descendant elements named `tag`, in document order.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = Element<'a, 'input>> + 'a {
        self.root().find_all(tag)
    }
}

/// A node of a [`FilingDocument`].
#[derive(Debug, Clone, Copy)]
pub struct Element<'a, 'input>(Node<'a, 'input>);

impl<'a, 'input> Element<'a, 'input> {
    pub fn tag(&self) -> &'a str {
        self.0.tag_name().name()
    }

    pub fn find(&self, tag: &str) -> Option<Element<'a, 'input>> {
        self.0
            .descendants()
            .skip(1)
            .find(|n| n.is_element() && n.tag_name().name() == tag)
            .map(Element)
    }

    pub fn find_all(&self, tag: &'a str) -> impl Iterator<Item = Element<'a, 'input>> + 'a {
        self.0
            .descendants()
            .skip(1)
            .filter(move |n| n.is_element() && n.tag_name().name() == tag)
            .map(Element)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = Element<'a, 'input>> + 'a {
        self.0.children().filter(|n| n.is_element()).map(Element)
    }

    /// Concatenated text of every descendant text node, untrimmed.
    pub fn text(&self) -> String {
        self.0
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect()
    }

    /// Text of the first descendant named `tag`.
    pub fn child_text(&self, tag: &str) -> Option<String> {
        self.find(tag).map(|el| el.text())
    }

    /// Parses the trimmed text as a number. Anything unparseable is `None`.
    pub fn number<T: FromStr>(&self) -> Option<T> {
        let text = self.text();
        match text.trim().parse::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::debug!("Ignoring non-numeric <{}> value '{}'", self.tag(), text.trim());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<Return xmlns="http://www.irs.gov/efile" returnVersion="2021v4.2">
  <ReturnHeader>
    <Filer>
      <EIN>012345678</EIN>
      <BusinessName>
        <BusinessNameLine1Txt>FIRST LINE</BusinessNameLine1Txt>
        <BusinessNameLine2Txt>SECOND LINE</BusinessNameLine2Txt>
      </BusinessName>
    </Filer>
  </ReturnHeader>
  <ReturnData>
    <Amt>12.5</Amt>
    <Amt>oops</Amt>
  </ReturnData>
</Return>"#;

    #[test]
    fn test_find_ignores_default_namespace() {
        let doc = FilingDocument::parse("sample.xml", SAMPLE).unwrap();
        let filer = doc.find("Filer").expect("Filer should be found");
        assert_eq!(filer.child_text("EIN").as_deref(), Some("012345678"));
        assert!(doc.find("Missing").is_none());
        assert_eq!(doc.file_name(), "sample.xml");
    }

    #[test]
    fn test_find_all_in_document_order() {
        let doc = FilingDocument::parse("sample.xml", SAMPLE).unwrap();
        let values: Vec<String> = doc.find_all("Amt").map(|el| el.text()).collect();
        assert_eq!(values, vec!["12.5".to_string(), "oops".to_string()]);
    }

    #[test]
    fn test_number_parsing_is_soft() {
        let doc = FilingDocument::parse("sample.xml", SAMPLE).unwrap();
        let amounts: Vec<Option<f64>> = doc.find_all("Amt").map(|el| el.number::<f64>()).collect();
        assert_eq!(amounts, vec![Some(12.5), None]);
    }

    #[test]
    fn test_child_elements_skip_whitespace() {
        let doc = FilingDocument::parse("sample.xml", SAMPLE).unwrap();
        let name = doc.find("BusinessName").unwrap();
        let tags: Vec<&str> = name.child_elements().map(|el| el.tag()).collect();
        assert_eq!(tags, vec!["BusinessNameLine1Txt", "BusinessNameLine2Txt"]);
    }

    #[test]
    fn test_malformed_xml_names_file() {
        let err = FilingDocument::parse("broken.xml", "<Return><Filer></Return>").err().unwrap();
        assert!(matches!(err, ExtractError::Xml { ref file, .. } if file == "broken.xml"));
    }
}
