//! Metadata: an ordered list of [`RecordInfo`], serialized as a
//! `<MetaInfo>` XML document encoded UTF-16LE with a trailing `\n\0`.

use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::reader::Reader as XmlReader;
use quick_xml::writer::Writer as XmlWriter;
use std::io::Cursor;

use crate::error::{Result, YxdbError};
use crate::field_type::FieldType;

/// A named, typed column descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub size: Option<i64>,
    pub scale: Option<i64>,
    /// The `description` attribute, captured but never validated.
    pub description: Option<String>,
}

/// An ordered list of [`Field`]s — the schema for one record stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordInfo {
    pub fields: Vec<Field>,
}

/// The full metadata document: an ordered list of [`RecordInfo`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub record_infos: Vec<RecordInfo>,
}

/// Encode [`Metadata`] to its on-disk UTF-16LE byte form, including the
/// trailing newline + NUL sentinels. The returned length is always even.
pub fn encode_metadata(meta: &Metadata) -> Vec<u8> {
    let xml_text = render_xml(meta);
    let mut text = xml_text;
    text.push('\n');
    text.push('\0');

    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    debug_assert_eq!(out.len() % 2, 0);
    out
}

/// Decode a byte window of length `2 * meta_info_length` into [`Metadata`].
pub fn decode_metadata(buf: &[u8], offset: usize) -> Result<Metadata> {
    if buf.len() < 4 {
        return Err(YxdbError::MetadataTruncated {
            offset,
            reason: "fewer than 4 bytes in metadata window",
        });
    }
    if buf.len() % 2 != 0 {
        return Err(YxdbError::MetadataTruncated {
            offset,
            reason: "metadata window has an odd byte length",
        });
    }

    let units: Vec<u16> = buf
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();

    if units.len() < 2 {
        return Err(YxdbError::MetadataTruncated {
            offset,
            reason: "fewer than two UTF-16 code units",
        });
    }
    let (body, trailer) = units.split_at(units.len() - 2);
    if trailer != [0x000A, 0x0000] {
        return Err(YxdbError::MetadataTruncated {
            offset,
            reason: "missing trailing newline + NUL sentinels",
        });
    }

    let text = char::decode_utf16(body.iter().copied())
        .collect::<std::result::Result<String, _>>()
        .map_err(|_| YxdbError::XmlMalformed {
            offset,
            message: "metadata is not valid UTF-16".to_string(),
        })?;

    parse_xml(&text, offset)
}

fn render_xml(meta: &Metadata) -> String {
    let mut buf = Vec::new();
    let mut writer = XmlWriter::new(Cursor::new(&mut buf));

    if meta.record_infos.is_empty() {
        writer
            .write_event(Event::Empty(BytesStart::new("MetaInfo")))
            .expect("writing to an in-memory buffer cannot fail");
        return String::from_utf8(buf).expect("quick_xml only emits UTF-8");
    }

    writer
        .write_event(Event::Start(BytesStart::new("MetaInfo")))
        .expect("writing to an in-memory buffer cannot fail");

    for record_info in &meta.record_infos {
        writer
            .write_event(Event::Start(BytesStart::new("RecordInfo")))
            .unwrap();
        for field in &record_info.fields {
            let mut start = BytesStart::new("Field");
            start.push_attribute(("name", field.name.as_str()));
            start.push_attribute(("type", field.field_type.as_str()));
            if let Some(size) = field.size {
                start.push_attribute(("size", size.to_string().as_str()));
            }
            if let Some(scale) = field.scale {
                start.push_attribute(("scale", scale.to_string().as_str()));
            }
            if let Some(description) = &field.description {
                start.push_attribute(("description", description.as_str()));
            }
            writer.write_event(Event::Empty(start)).unwrap();
        }
        writer
            .write_event(Event::End(BytesEnd::new("RecordInfo")))
            .unwrap();
    }

    writer
        .write_event(Event::End(BytesEnd::new("MetaInfo")))
        .unwrap();

    String::from_utf8(buf).expect("quick_xml only emits UTF-8")
}

fn parse_xml(text: &str, offset: usize) -> Result<Metadata> {
    let mut reader = XmlReader::from_str(text);

    let mut record_infos = Vec::new();
    let mut current_fields: Option<Vec<Field>> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                if name == "RecordInfo" {
                    current_fields = Some(Vec::new());
                } else if name == "Field" {
                    let field = parse_field_attrs(&e, offset)?;
                    if let Some(fields) = current_fields.as_mut() {
                        fields.push(field);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                if name == "RecordInfo" {
                    if let Some(fields) = current_fields.take() {
                        record_infos.push(RecordInfo { fields });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(YxdbError::XmlMalformed {
                    offset,
                    message: e.to_string(),
                })
            }
        }
    }

    Ok(Metadata { record_infos })
}

fn parse_field_attrs(e: &BytesStart, offset: usize) -> Result<Field> {
    let mut name = String::new();
    let mut field_type = FieldType::Unknown;
    let mut size = None;
    let mut scale = None;
    let mut description = None;

    for attr in e.attributes().flatten() {
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        // Attribute values are written through quick_xml's escaper (`&`, `<`,
        // `>`, `"`, `'`); unescape here or `a&amp;b` never round-trips back
        // to `a&b`.
        let value = attr
            .unescape_value()
            .map_err(|e| YxdbError::XmlMalformed { offset, message: e.to_string() })?
            .into_owned();
        match key {
            "name" => name = value,
            "type" => field_type = FieldType::from_str(&value),
            "size" => {
                size = Some(parse_base10(&value, &name, "size", offset)?);
            }
            "scale" => {
                scale = Some(parse_base10(&value, &name, "scale", offset)?);
            }
            "description" => description = Some(value),
            _ => {} // unknown attributes are ignored
        }
    }

    Ok(Field { name, field_type, size, scale, description })
}

fn parse_base10(value: &str, field_name: &str, attribute: &'static str, _offset: usize) -> Result<i64> {
    value.parse::<i64>().map_err(|_| YxdbError::BadFieldAttribute {
        field_name: field_name.to_string(),
        attribute,
        value: value.to_string(),
    })
}
