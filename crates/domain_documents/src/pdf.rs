//! AcroForm filling with lopdf
//!
//! Only three field types are understood: text (`/Tx`), checkbox (`/Btn`)
//! and choice (`/Ch`). Field names are fully qualified, with parent and
//! child names joined by `.`, and `/FT` is inherited from parents when a
//! widget does not carry its own.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::DocumentError;
use crate::form::{FieldKind, FieldValue, FormData, TemplateSpec};

const UNCHECKED: &[u8] = b"Off";

/// A terminal form field
#[derive(Debug, Clone)]
struct FormField {
    id: ObjectId,
    name: String,
    field_type: Option<Vec<u8>>,
}

/// Fills the template's form fields and returns the new PDF bytes
pub fn fill_pdf_bytes(template: &[u8], data: &FormData) -> Result<Vec<u8>, DocumentError> {
    let mut doc = Document::load_mem(template)?;
    let fields = collect_fields(&doc)?;

    for (name, value) in data.iter() {
        let field = fields
            .iter()
            .find(|f| &f.name == name)
            .ok_or_else(|| DocumentError::UnknownField(name.clone()))?;
        match (field.field_type.as_deref(), value) {
            (Some(b"Btn"), FieldValue::Checkbox(checked)) => set_checkbox(&mut doc, field, *checked)?,
            _ => {
                let options = choice_options(&doc, field.id)?;
                let dict = doc.get_object_mut(field.id)?.as_dict_mut()?;
                set_value(dict, field, value, &options)?;
            }
        }
    }

    set_need_appearances(&mut doc)?;
    debug!(fields = data.len(), "Filled form fields");
    save(&mut doc)
}

/// Lists every terminal field with its type name (`Tx`, `Btn`, `Ch`, ...)
pub fn read_form_fields(pdf: &[u8]) -> Result<BTreeMap<String, String>, DocumentError> {
    let doc = Document::load_mem(pdf)?;
    Ok(collect_fields(&doc)?
        .into_iter()
        .map(|f| {
            let field_type = f
                .field_type
                .map(|t| String::from_utf8_lossy(&t).into_owned())
                .unwrap_or_default();
            (f.name, field_type)
        })
        .collect())
}

/// Reads back the current values of the text, checkbox and choice fields
pub fn read_form_values(pdf: &[u8]) -> Result<FormData, DocumentError> {
    let doc = Document::load_mem(pdf)?;
    let mut data = FormData::new();
    for field in collect_fields(&doc)? {
        let dict = doc.get_object(field.id)?.as_dict()?;
        let value = dict.get(b"V").ok();
        data = match field.field_type.as_deref() {
            Some(b"Tx") => data.text(&field.name, value.map(object_text).unwrap_or_default()),
            Some(b"Btn") => {
                let checked = value
                    .and_then(|v| v.as_name().ok())
                    .map_or(false, |n| n != UNCHECKED);
                data.checkbox(&field.name, checked)
            }
            Some(b"Ch") => data.choice(&field.name, value.map(object_text).unwrap_or_default()),
            _ => data,
        };
    }
    Ok(data)
}

/// Builds a one-page PDF whose AcroForm has exactly the template's fields
pub fn blank_form(spec: &TemplateSpec) -> Result<Vec<u8>, DocumentError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut content = format!("BT /F1 16 Tf 50 750 Td ({}) Tj ET\n", escape(&spec.title));
    let mut field_refs = Vec::with_capacity(spec.fields.len());

    for (index, field) in spec.fields.iter().enumerate() {
        let top = 710 - (index as i64 % 30) * 22;
        content.push_str(&format!("BT /F1 9 Tf 50 {} Td ({}) Tj ET\n", top + 4, escape(&field.name)));

        let right = if field.kind == FieldKind::Checkbox { 272 } else { 560 };
        let mut widget = dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => field.kind.pdf_type(),
            "T" => text_object(&field.name),
            "F" => Object::Integer(4),
            "P" => page_id,
            "Rect" => vec![
                Object::Integer(260),
                Object::Integer(top),
                Object::Integer(right),
                Object::Integer(top + 16),
            ],
        };
        match &field.kind {
            FieldKind::Text => {
                widget.set("V", Object::string_literal(""));
            }
            FieldKind::Checkbox => {
                widget.set("V", Object::Name(UNCHECKED.to_vec()));
                widget.set("AS", Object::Name(UNCHECKED.to_vec()));
                widget.set("AP", checkbox_appearance(&mut doc));
            }
            FieldKind::Choice(options) => {
                widget.set("Ff", Object::Integer(1 << 17));
                widget.set(
                    "Opt",
                    options
                        .iter()
                        .map(|o| text_object(o))
                        .collect::<Vec<_>>(),
                );
            }
        }
        field_refs.push(Object::Reference(doc.add_object(widget)));
    }

    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "Annots" => field_refs.clone(),
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );

    let acroform_id = doc.add_object(dictionary! {
        "Fields" => field_refs,
        "NeedAppearances" => Object::Boolean(true),
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => acroform_id,
    });
    doc.trailer.set("Root", catalog_id);

    save(&mut doc)
}

fn save(doc: &mut Document) -> Result<Vec<u8>, DocumentError> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(|e| DocumentError::pdf(e.to_string()))?;
    Ok(bytes)
}

fn type_mismatch(field: &FormField) -> DocumentError {
    DocumentError::UnknownFieldType {
        field: field.name.clone(),
        field_type: field
            .field_type
            .as_ref()
            .map(|t| String::from_utf8_lossy(t).into_owned())
            .unwrap_or_else(|| "none".to_string()),
    }
}

fn set_value(
    dict: &mut Dictionary,
    field: &FormField,
    value: &FieldValue,
    options: &[String],
) -> Result<(), DocumentError> {
    match (field.field_type.as_deref(), value) {
        (Some(b"Tx"), FieldValue::Text(text)) => {
            dict.set("V", text_object(text));
        }
        (Some(b"Ch"), FieldValue::Choice(choice)) => {
            if !options.iter().any(|o| o == choice) {
                return Err(DocumentError::InvalidOption {
                    field: field.name.clone(),
                    value: choice.clone(),
                });
            }
            dict.set("V", text_object(choice));
        }
        _ => return Err(type_mismatch(field)),
    }
    Ok(())
}

/// Checks or clears a checkbox on the field and every one of its widgets
///
/// The on-state is the non-`Off` entry of each widget's `/AP /N`
/// dictionary; templates name it `Yes`, `On`, `1` and so on.
fn set_checkbox(doc: &mut Document, field: &FormField, checked: bool) -> Result<(), DocumentError> {
    let widgets = widget_ids(doc, field.id)?;
    let mut states = Vec::with_capacity(widgets.len());
    for widget in &widgets {
        states.push((*widget, on_state(doc, *widget)?));
    }
    let value = states
        .iter()
        .find_map(|(_, on)| on.clone())
        .ok_or_else(|| type_mismatch(field))?;

    for (widget, on) in states {
        let state = match on {
            Some(on) if checked => on,
            _ => UNCHECKED.to_vec(),
        };
        doc.get_object_mut(widget)?
            .as_dict_mut()?
            .set("AS", Object::Name(state));
    }

    let field_value = if checked { value } else { UNCHECKED.to_vec() };
    doc.get_object_mut(field.id)?
        .as_dict_mut()?
        .set("V", Object::Name(field_value));
    Ok(())
}

/// The widget annotations of a terminal field: its kids without a `/T`, or
/// the field itself when field and widget are merged
fn widget_ids(doc: &Document, id: ObjectId) -> Result<Vec<ObjectId>, DocumentError> {
    let dict = doc.get_object(id)?.as_dict()?;
    let kids = match dict.get(b"Kids") {
        Ok(kids) => resolve(doc, kids)?
            .as_array()?
            .iter()
            .filter_map(|k| k.as_reference().ok())
            .filter(|kid| {
                doc.get_object(*kid)
                    .ok()
                    .and_then(|o| o.as_dict().ok())
                    .map_or(false, |d| !d.has(b"T"))
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    if kids.is_empty() {
        Ok(vec![id])
    } else {
        Ok(kids)
    }
}

fn on_state(doc: &Document, widget: ObjectId) -> Result<Option<Vec<u8>>, DocumentError> {
    let dict = doc.get_object(widget)?.as_dict()?;
    let normal = match dict.get(b"AP") {
        Ok(ap) => match resolve(doc, ap)?.as_dict()?.get(b"N") {
            Ok(normal) => resolve(doc, normal)?,
            Err(_) => return Ok(None),
        },
        Err(_) => return Ok(None),
    };
    let Ok(states) = normal.as_dict() else {
        return Ok(None);
    };
    Ok(states
        .iter()
        .map(|(name, _)| name)
        .find(|name| name.as_slice() != UNCHECKED)
        .cloned())
}

fn checkbox_appearance(doc: &mut Document) -> Dictionary {
    let bbox = || {
        vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(12),
            Object::Integer(16),
        ]
    };
    let on = doc.add_object(Stream::new(
        dictionary! { "Type" => "XObject", "Subtype" => "Form", "BBox" => bbox() },
        b"0 g 2 3 8 10 re f".to_vec(),
    ));
    let off = doc.add_object(Stream::new(
        dictionary! { "Type" => "XObject", "Subtype" => "Form", "BBox" => bbox() },
        Vec::new(),
    ));
    dictionary! {
        "N" => dictionary! { "Yes" => on, "Off" => off },
    }
}

/// Encodes `text` as a PDF text string: literal when ASCII, else UTF-16BE
/// with a byte order mark
fn text_object(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Export values of a choice field's `/Opt` array
fn choice_options(doc: &Document, id: ObjectId) -> Result<Vec<String>, DocumentError> {
    let dict = doc.get_object(id)?.as_dict()?;
    let options = match dict.get(b"Opt") {
        Ok(opt) => resolve(doc, opt)?.as_array()?.clone(),
        Err(_) => return Ok(Vec::new()),
    };
    Ok(options
        .iter()
        .filter_map(|option| match option {
            Object::String(bytes, _) => Some(decode_text(bytes)),
            // [export value, display text]
            Object::Array(pair) => match pair.first() {
                Some(Object::String(bytes, _)) => Some(decode_text(bytes)),
                _ => None,
            },
            _ => None,
        })
        .collect())
}

fn collect_fields(doc: &Document) -> Result<Vec<FormField>, DocumentError> {
    let acroform = match acroform(doc)? {
        Some(dict) => dict,
        None => return Ok(Vec::new()),
    };
    let roots = match acroform.get(b"Fields") {
        Ok(fields) => resolve(doc, fields)?.as_array()?.clone(),
        Err(_) => return Ok(Vec::new()),
    };

    let mut fields = Vec::new();
    for root in &roots {
        walk(doc, root.as_reference()?, None, None, &mut fields, 0)?;
    }
    Ok(fields)
}

fn walk(
    doc: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_type: Option<&[u8]>,
    out: &mut Vec<FormField>,
    depth: usize,
) -> Result<(), DocumentError> {
    if depth > 32 {
        return Err(DocumentError::pdf("form field tree is too deep"));
    }
    let dict = doc.get_object(id)?.as_dict()?;

    let partial = dict.get(b"T").ok().map(object_text);
    let name = match (parent_name, partial) {
        (Some(parent), Some(own)) => Some(format!("{}.{}", parent, own)),
        (None, Some(own)) => Some(own),
        (Some(parent), None) => Some(parent.to_string()),
        (None, None) => None,
    };
    let field_type = dict
        .get(b"FT")
        .ok()
        .and_then(|t| t.as_name().ok())
        .or(inherited_type);

    // Kids that carry a /T are child fields; kids without one are widgets
    let kids: Vec<ObjectId> = match dict.get(b"Kids") {
        Ok(kids) => resolve(doc, kids)?
            .as_array()?
            .iter()
            .filter_map(|k| k.as_reference().ok())
            .collect(),
        Err(_) => Vec::new(),
    };
    let child_fields: Vec<ObjectId> = kids
        .iter()
        .copied()
        .filter(|kid| {
            doc.get_object(*kid)
                .ok()
                .and_then(|o| o.as_dict().ok())
                .map_or(false, |d| d.has(b"T"))
        })
        .collect();

    if child_fields.is_empty() {
        if let Some(name) = name {
            out.push(FormField {
                id,
                name,
                field_type: field_type.map(|t| t.to_vec()),
            });
        }
        return Ok(());
    }

    for kid in child_fields {
        walk(doc, kid, name.as_deref(), field_type, out, depth + 1)?;
    }
    Ok(())
}

fn acroform(doc: &Document) -> Result<Option<&Dictionary>, DocumentError> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let catalog = doc.get_object(root_id)?.as_dict()?;
    match catalog.get(b"AcroForm") {
        Ok(form) => Ok(Some(resolve(doc, form)?.as_dict()?)),
        Err(_) => Ok(None),
    }
}

fn set_need_appearances(doc: &mut Document) -> Result<(), DocumentError> {
    let root_id = doc.trailer.get(b"Root")?.as_reference()?;
    let form_ref = doc
        .get_object(root_id)?
        .as_dict()?
        .get(b"AcroForm")
        .ok()
        .and_then(|f| f.as_reference().ok());

    let form = match form_ref {
        Some(id) => doc.get_object_mut(id)?.as_dict_mut()?,
        None => match doc.get_object_mut(root_id)?.as_dict_mut()?.get_mut(b"AcroForm") {
            Ok(inline) => inline.as_dict_mut()?,
            Err(_) => return Ok(()),
        },
    };
    form.set("NeedAppearances", Object::Boolean(true));
    Ok(())
}

fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, DocumentError> {
    match object {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

fn object_text(object: &Object) -> String {
    match object {
        Object::String(bytes, _) => decode_text(bytes),
        Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        _ => String::new(),
    }
}

/// PDF text strings are either UTF-16BE with a BOM or a single-byte encoding
fn decode_text(bytes: &[u8]) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    String::from_utf8_lossy(bytes).into_owned()
}

fn escape(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii())
        .flat_map(|c| match c {
            '(' | ')' | '\\' => vec!['\\', c],
            _ => vec![c],
        })
        .collect()
}
