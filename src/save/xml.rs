//! XML format.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <gameState>
//!     <difficulty>easy</difficulty>
//!     ...
//!     <cards>
//!         <card>
//!             <id>3</id>
//!             <pairId>2</pairId>
//!             <isFlipped>false</isFlipped>
//!             <isMatched>false</isMatched>
//!         </card>
//!     </cards>
//!     <moveHistory>
//!         <move>Move 1</move>
//!     </moveHistory>
//! </gameState>
//! ```
//!
//! Reading accepts any root element name. Scalars are the root's leaf
//! children; the first occurrence of a name wins.

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesRef, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::codec::FormatCodec;
use super::error::{DecodeError, EncodeError};
use super::fields::{keys, RawCard, RawSave, SaveDocument};
use super::format::SaveFormat;

const INDENT: usize = 4;

/// Element-per-field XML.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlCodec;

impl FormatCodec for XmlCodec {
    fn format(&self) -> SaveFormat {
        SaveFormat::Xml
    }

    fn write(&self, doc: &SaveDocument<'_>) -> Result<Vec<u8>, EncodeError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);

        emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        emit(&mut writer, Event::Start(BytesStart::new(keys::ROOT)))?;

        for (key, value) in &doc.scalars {
            leaf(&mut writer, key, &value.to_string())?;
        }

        emit(&mut writer, Event::Start(BytesStart::new(keys::CARDS)))?;
        for card in doc.cards {
            emit(&mut writer, Event::Start(BytesStart::new(keys::CARD)))?;
            leaf(&mut writer, keys::CARD_ID, &card.id.to_string())?;
            leaf(&mut writer, keys::CARD_PAIR_ID, &card.pair_id.to_string())?;
            leaf(&mut writer, keys::CARD_IS_FLIPPED, &card.is_flipped.to_string())?;
            leaf(&mut writer, keys::CARD_IS_MATCHED, &card.is_matched.to_string())?;
            emit(&mut writer, Event::End(BytesEnd::new(keys::CARD)))?;
        }
        emit(&mut writer, Event::End(BytesEnd::new(keys::CARDS)))?;

        emit(&mut writer, Event::Start(BytesStart::new(keys::MOVE_HISTORY)))?;
        for entry in doc.move_history {
            leaf(&mut writer, keys::MOVE, entry)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new(keys::MOVE_HISTORY)))?;

        emit(&mut writer, Event::End(BytesEnd::new(keys::ROOT)))?;

        let mut out = writer.into_inner();
        out.push(b'\n');
        Ok(out)
    }

    fn read(&self, bytes: &[u8]) -> Result<RawSave, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::unreadable("xml", e))?;
        let mut reader = Reader::from_str(text);

        let mut tree = TreeReader::default();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => tree.open(element_name(&e)),
                Ok(Event::Empty(e)) => {
                    tree.open(element_name(&e));
                    tree.close();
                }
                Ok(Event::End(_)) => tree.close(),
                Ok(Event::Text(t)) => tree.text.push_str(&String::from_utf8_lossy(&t)),
                Ok(Event::CData(c)) => tree.text.push_str(&String::from_utf8_lossy(&c)),
                Ok(Event::GeneralRef(r)) => push_reference(&mut tree.text, &r)?,
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => return Err(DecodeError::unreadable("xml", e)),
            }
        }

        if !tree.saw_root {
            return Err(DecodeError::unreadable("xml", "no root element"));
        }
        if let Some(open) = tree.path.last() {
            return Err(DecodeError::unreadable("xml", format!("unclosed element <{}>", open)));
        }
        Ok(tree.raw)
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodeError> {
    writer.write_event(event).map_err(|e| EncodeError::Xml(e.to_string()))
}

/// `<name>value</name>`
fn leaf(writer: &mut Writer<Vec<u8>>, name: &str, value: &str) -> Result<(), EncodeError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(value)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

/// Append the text a `&...;` reference stands for.
fn push_reference(text: &mut String, r: &BytesRef<'_>) -> Result<(), DecodeError> {
    if let Some(c) = r.resolve_char_ref().map_err(|e| DecodeError::unreadable("xml", e))? {
        text.push(c);
        return Ok(());
    }
    let name = String::from_utf8_lossy(r);
    match resolve_predefined_entity(&name) {
        Some(s) => {
            text.push_str(s);
            Ok(())
        }
        None => Err(DecodeError::unreadable("xml", format!("unknown entity &{};", name))),
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Collects fields and cards while walking the element tree.
#[derive(Default)]
struct TreeReader {
    /// Open elements, root first.
    path: Vec<String>,
    /// Text of the innermost open element.
    text: String,
    card: Option<RawCard>,
    saw_root: bool,
    raw: RawSave,
}

impl TreeReader {
    fn open(&mut self, name: String) {
        self.text.clear();
        self.path.push(name);

        match path_str(&self.path).as_slice() {
            [_] => self.saw_root = true,
            [_, keys::CARDS] => {
                self.raw.cards.get_or_insert_with(Vec::new);
            }
            [_, keys::CARDS, keys::CARD] => self.card = Some(RawCard::default()),
            _ => {}
        }
    }

    fn close(&mut self) {
        let text = std::mem::take(&mut self.text).trim().to_string();

        match path_str(&self.path).as_slice() {
            [_, keys::CARDS] | [_, keys::MOVE_HISTORY] => {}
            [_, name] => {
                let name = name.to_string();
                self.raw.fields.entry(name).or_insert(text);
            }
            [_, keys::CARDS, keys::CARD] => {
                if let (Some(card), Some(cards)) = (self.card.take(), self.raw.cards.as_mut()) {
                    cards.push(card);
                }
            }
            [_, keys::CARDS, keys::CARD, name] => {
                let name = name.to_string();
                if let Some(card) = self.card.as_mut() {
                    card.set(&name, text);
                }
            }
            _ => {}
        }

        self.path.pop();
    }
}

fn path_str(path: &[String]) -> Vec<&str> {
    path.iter().map(String::as_str).collect()
}
