//! Extraction policies for configuration fragments.

use std::collections::BTreeSet;

use quick_xml::Reader;
use quick_xml::events::Event;

/// Which resource names to extract from a fragment. One scan, many
/// extraction policies: the analyzer walks the bundle once per policy and
/// dispatches here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsagePolicy {
    /// Key/value-map operations: the map identifier comes from the root
    /// element's `mapIdentifier` attribute, else a nested `MapName` element.
    KvmUsage,

    /// Data-capture policies: every `Capture` block names the collector it
    /// writes to.
    DataCollectorUsage,
}

impl UsagePolicy {
    pub(crate) fn extract(
        self,
        xml: &str,
        used: &mut BTreeSet<String>,
    ) -> Result<(), quick_xml::Error> {
        match self {
            UsagePolicy::KvmUsage => extract_kvm(xml, used),
            UsagePolicy::DataCollectorUsage => extract_data_collectors(xml, used),
        }
    }
}

fn extract_kvm(xml: &str, used: &mut BTreeSet<String>) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if path.is_empty() {
                    if name != b"KeyValueMapOperations" {
                        return Ok(());
                    }
                    for attr in e.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        if attr.key.as_ref() == b"mapIdentifier" {
                            let value = String::from_utf8_lossy(&attr.value).into_owned();
                            if !value.is_empty() {
                                used.insert(value);
                            }
                            return Ok(());
                        }
                    }
                }
                path.push(name);
            }
            Event::Text(t) => {
                // MapName must be a direct child of the root element
                if path.len() == 2 && path[1] == b"MapName" {
                    let text = t.unescape().map_err(quick_xml::Error::from)?;
                    let text = text.trim();
                    if !text.is_empty() {
                        used.insert(text.to_string());
                    }
                    return Ok(());
                }
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Empty(e) => {
                if path.is_empty() {
                    if e.local_name().as_ref() != b"KeyValueMapOperations" {
                        return Ok(());
                    }
                    for attr in e.attributes() {
                        let attr = attr.map_err(quick_xml::Error::from)?;
                        if attr.key.as_ref() == b"mapIdentifier" {
                            let value = String::from_utf8_lossy(&attr.value).into_owned();
                            if !value.is_empty() {
                                used.insert(value);
                            }
                        }
                    }
                    return Ok(());
                }
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn extract_data_collectors(
    xml: &str,
    used: &mut BTreeSet<String>,
) -> Result<(), quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if path.is_empty() && name != b"DataCapture" {
                    return Ok(());
                }
                path.push(name);
            }
            Event::Text(t) => {
                if path.len() == 3 && path[1] == b"Capture" && path[2] == b"DataCollector" {
                    let text = t.unescape().map_err(quick_xml::Error::from)?;
                    let text = text.trim();
                    if !text.is_empty() {
                        used.insert(text.to_string());
                    }
                }
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}
