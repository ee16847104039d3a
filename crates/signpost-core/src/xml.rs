//! Reading progress reports from XML.
//!
//! A report is one XML element, e.g.
//! ```text
//! <start-test id="1002" name="Adds" fullname="Calc.Tests.Adds"/>
//! ```
//! [`parse_fragment`] reads exactly one report. [`ReportReader`] reads a
//! stream of concatenated reports, skipping whitespace, declarations and
//! comments between them.

use crate::error::{ReportError, Result};
use quick_xml::events::{BytesCData, BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::io::BufRead;

/// One XML element with its attributes, direct text content and children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<ReportNode>,
    /// Concatenated text and CDATA directly inside this element.
    pub text: String,
}

impl ReportNode {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        let tag = utf8(start.name().as_ref(), "tag name")?.to_string();
        let mut attributes = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = utf8(attr.key.as_ref(), "attribute name")?.to_string();
            let value = attr.unescape_value()?.into_owned();
            attributes.insert(key, value);
        }
        Ok(Self {
            tag,
            attributes,
            ..Self::default()
        })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&ReportNode> {
        self.children.iter().find(|c| c.tag == tag)
    }
}

fn utf8<'a>(bytes: &'a [u8], what: &str) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|_| ReportError::malformed(format!("{what} is not UTF-8")))
}

fn cdata_text(cdata: BytesCData<'_>) -> Result<String> {
    String::from_utf8(cdata.into_inner().into_owned())
        .map_err(|_| ReportError::malformed("CDATA section is not UTF-8"))
}

/// Parse text holding exactly one report element.
pub fn parse_fragment(text: &str) -> Result<ReportNode> {
    let mut reader = ReportReader::new(text.as_bytes());
    let node = reader
        .next()
        .ok_or_else(|| ReportError::malformed("empty report"))??;
    match reader.next() {
        None => Ok(node),
        Some(Err(e)) => Err(e),
        Some(Ok(extra)) => Err(ReportError::malformed(format!(
            "unexpected second element <{}> after <{}>",
            extra.tag, node.tag
        ))),
    }
}

/// Iterator over the report elements of a stream.
///
/// A syntax error desynchronizes the stream, so the iterator yields the
/// error once and then ends.
pub struct ReportReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    reports_read: usize,
    finished: bool,
}

impl<R: BufRead> ReportReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            reports_read: 0,
            finished: false,
        }
    }

    /// Number of complete reports yielded so far.
    pub fn reports_read(&self) -> usize {
        self.reports_read
    }

    fn next_node(&mut self) -> Result<Option<ReportNode>> {
        let mut open: Vec<ReportNode> = Vec::new();
        loop {
            self.buf.clear();
            let completed = match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    open.push(ReportNode::open(&start)?);
                    None
                }
                Event::Empty(start) => Some(ReportNode::open(&start)?),
                Event::End(_) => Some(
                    open.pop()
                        .ok_or_else(|| ReportError::malformed("closing tag without a report"))?,
                ),
                Event::Text(text) => {
                    push_text(&mut open, &text.unescape()?)?;
                    None
                }
                Event::CData(cdata) => {
                    push_text(&mut open, &cdata_text(cdata)?)?;
                    None
                }
                Event::Eof => {
                    return match open.last() {
                        None => Ok(None),
                        Some(node) => Err(ReportError::malformed(format!(
                            "input ended inside <{}>",
                            node.tag
                        ))),
                    };
                }
                // declarations, comments, processing instructions
                _ => None,
            };

            if let Some(node) = completed {
                match open.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => return Ok(Some(node)),
                }
            }
        }
    }
}

fn push_text(open: &mut [ReportNode], text: &str) -> Result<()> {
    match open.last_mut() {
        Some(node) => node.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(ReportError::malformed(
                "text outside of a report element",
            ))
        }
    }
    Ok(())
}

impl<R: BufRead> Iterator for ReportReader<R> {
    type Item = Result<ReportNode>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_node() {
            Ok(Some(node)) => {
                self.reports_read += 1;
                Some(Ok(node))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
