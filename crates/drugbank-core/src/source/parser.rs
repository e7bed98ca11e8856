//! Streaming parser for the DrugBank XML schema.
//!
//! Only elements in the DrugBank namespace are interpreted. Records are the
//! direct `<drug>` children of the root element; `<drug>` elements nested
//! deeper (pathways, targets) are references, not records.
//!
//! Like an element-tree lookup, each single-valued field takes the first
//! matching direct child, even when that child is empty.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

use super::{SourceError, SourceResult};
use crate::models::{DrugRecord, InteractionEntry};

/// Namespace of the DrugBank schema.
pub const DRUGBANK_NAMESPACE: &str = "http://www.drugbank.ca";

/// Parse every drug record from a DrugBank XML stream.
pub fn parse_records<R: BufRead>(input: R) -> SourceResult<Vec<DrugRecord>> {
    let mut reader = NsReader::from_reader(input);
    let mut parser = RecordParser::default();
    let mut buf = Vec::new();

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        let in_namespace =
            matches!(ns, ResolveResult::Bound(Namespace(uri)) if uri == DRUGBANK_NAMESPACE.as_bytes());

        match event {
            Event::Start(e) => parser.open(&e, in_namespace)?,
            Event::Empty(e) => {
                parser.open(&e, in_namespace)?;
                parser.close();
            }
            Event::End(_) => parser.close(),
            Event::Text(e) => parser.text(&e.unescape()?),
            Event::CData(e) => parser.text(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    parser.finish()
}

/// Elements the parser knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Drug,
    DrugbankId,
    Name,
    Description,
    Indication,
    CasNumber,
    Synonyms,
    Synonym,
    Categories,
    Category,
    DrugInteractions,
    DrugInteraction,
    Other,
}

impl Tag {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"drug" => Tag::Drug,
            b"drugbank-id" => Tag::DrugbankId,
            b"name" => Tag::Name,
            b"description" => Tag::Description,
            b"indication" => Tag::Indication,
            b"cas-number" => Tag::CasNumber,
            b"synonyms" => Tag::Synonyms,
            b"synonym" => Tag::Synonym,
            b"categories" => Tag::Categories,
            b"category" => Tag::Category,
            b"drug-interactions" => Tag::DrugInteractions,
            b"drug-interaction" => Tag::DrugInteraction,
            _ => Tag::Other,
        }
    }
}

/// Record fields filled from element text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    PrimaryId,
    Name,
    Description,
    Indication,
    CasNumber,
    Synonym,
    Category,
    PartnerId,
    PartnerName,
    PartnerDescription,
}

impl Field {
    /// Fields that keep only their first occurrence.
    fn is_single(self) -> bool {
        !matches!(self, Field::Synonym | Field::Category)
    }
}

/// Text being collected for the element at `depth`.
#[derive(Debug)]
struct Capture {
    field: Field,
    depth: usize,
    text: String,
    /// Set once a child element opens; later text is tail text, not content
    sealed: bool,
}

#[derive(Debug, Default)]
struct RecordParser {
    stack: Vec<Tag>,
    saw_root: bool,
    records: Vec<DrugRecord>,
    record: Option<DrugRecord>,
    interaction: Option<InteractionEntry>,
    /// Single-valued fields already claimed in the current record/entry
    claimed: Vec<Field>,
    capture: Option<Capture>,
}

impl RecordParser {
    fn open(&mut self, e: &BytesStart<'_>, in_namespace: bool) -> SourceResult<()> {
        if self.stack.is_empty() {
            if self.saw_root {
                return Err(SourceError::Malformed(
                    "multiple root elements".to_string(),
                ));
            }
            self.saw_root = true;
        }

        if let Some(capture) = self.capture.as_mut() {
            capture.sealed = true;
        }

        let tag = if in_namespace {
            Tag::from_local_name(e.local_name().as_ref())
        } else {
            Tag::Other
        };
        self.stack.push(tag);

        use Tag::*;
        let field = match self.stack.as_slice() {
            [_, Drug] => {
                self.record = Some(DrugRecord {
                    kind: attribute(e, b"type")?,
                    ..DrugRecord::default()
                });
                self.claimed.clear();
                None
            }
            [_, Drug, DrugbankId] => match attribute(e, b"primary")?.as_deref() {
                Some("true") => Some(Field::PrimaryId),
                _ => None,
            },
            [_, Drug, Name] => Some(Field::Name),
            [_, Drug, Description] => Some(Field::Description),
            [_, Drug, Indication] => Some(Field::Indication),
            [_, Drug, CasNumber] => Some(Field::CasNumber),
            [_, Drug, Synonyms, Synonym] => Some(Field::Synonym),
            [_, Drug, Categories, Category, Category] => Some(Field::Category),
            [_, Drug, DrugInteractions, DrugInteraction] => {
                self.interaction = Some(InteractionEntry::default());
                self.claimed.retain(|f| {
                    !matches!(
                        f,
                        Field::PartnerId | Field::PartnerName | Field::PartnerDescription
                    )
                });
                None
            }
            [_, Drug, DrugInteractions, DrugInteraction, DrugbankId] => Some(Field::PartnerId),
            [_, Drug, DrugInteractions, DrugInteraction, Name] => Some(Field::PartnerName),
            [_, Drug, DrugInteractions, DrugInteraction, Description] => {
                Some(Field::PartnerDescription)
            }
            _ => None,
        };

        if let Some(field) = field {
            if field.is_single() {
                if self.claimed.contains(&field) {
                    return Ok(());
                }
                self.claimed.push(field);
            }
            self.capture = Some(Capture {
                field,
                depth: self.stack.len(),
                text: String::new(),
                sealed: false,
            });
        }

        Ok(())
    }

    fn text(&mut self, text: &str) {
        if let Some(capture) = self.capture.as_mut() {
            if !capture.sealed && capture.depth == self.stack.len() {
                capture.text.push_str(text);
            }
        }
    }

    fn close(&mut self) {
        let depth = self.stack.len();
        if self.capture.as_ref().is_some_and(|c| c.depth == depth) {
            if let Some(capture) = self.capture.take() {
                self.store(capture.field, capture.text);
            }
        }

        let tag = self.stack.pop();
        match (depth, tag) {
            (4, Some(Tag::DrugInteraction)) => {
                if let (Some(record), Some(entry)) = (self.record.as_mut(), self.interaction.take()) {
                    record.interactions.push(entry);
                }
            }
            (2, Some(Tag::Drug)) => {
                if let Some(record) = self.record.take() {
                    self.records.push(record);
                }
            }
            _ => {}
        }
    }

    fn store(&mut self, field: Field, text: String) {
        if let Some(entry) = self.interaction.as_mut() {
            match field {
                Field::PartnerId => {
                    entry.partner_id = non_empty(text);
                    return;
                }
                Field::PartnerName => {
                    entry.partner_name = text;
                    return;
                }
                Field::PartnerDescription => {
                    entry.description = text;
                    return;
                }
                _ => {}
            }
        }

        let Some(record) = self.record.as_mut() else {
            return;
        };
        match field {
            Field::PrimaryId => record.primary_id = non_empty(text),
            Field::Name => record.name = Some(text),
            Field::Description => record.description = text,
            Field::Indication => record.indication = text,
            Field::CasNumber => record.cas_number = text,
            Field::Synonym => {
                if !text.is_empty() {
                    record.synonyms.push(text);
                }
            }
            Field::Category => {
                if !text.is_empty() {
                    record.categories.push(text);
                }
            }
            Field::PartnerId | Field::PartnerName | Field::PartnerDescription => {}
        }
    }

    fn finish(self) -> SourceResult<Vec<DrugRecord>> {
        if !self.saw_root {
            return Err(SourceError::Malformed("no root element".to_string()));
        }
        if !self.stack.is_empty() {
            return Err(SourceError::Malformed(format!(
                "unexpected end of document with {} unclosed element(s)",
                self.stack.len()
            )));
        }
        Ok(self.records)
    }
}

/// Value of an unprefixed attribute.
fn attribute(e: &BytesStart<'_>, key: &[u8]) -> SourceResult<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
