//! KML export flow: validate the geodetic origin typed into the export
//! panel, project the traverse, build the document and hand it to the
//! browser as a download.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Document, HtmlElement, HtmlInputElement, Url};

use crate::state::State;

const KML_MIME: &str = "application/vnd.google-earth.kml+xml";

/// Wire the export button; validation errors land in the `exportError`
/// element instead of an alert so the panel can style them.
pub fn attach_export(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    if let Some(btn) = doc.get_element_by_id("exportKml") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let s = st.borrow();
            let message = match run_export(&s) {
                Ok(()) => String::new(),
                Err(m) => m,
            };
            set_error_text(&s.document, &message);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }
    Ok(())
}

fn set_error_text(document: &Document, message: &str) {
    if let Some(el) = document.get_element_by_id("exportError")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(message);
    }
}

fn input_value(document: &Document, id: &str) -> String {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|el| el.value())
        .unwrap_or_default()
}

/// Accept both decimal separators; registries around here type commas.
fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().replace(',', ".").parse().ok()
}

fn run_export(state: &State) -> Result<(), String> {
    let lat = parse_decimal(&input_value(&state.document, "kmlLat"))
        .filter(|v| (-90.0..=90.0).contains(v))
        .ok_or("Latitude inv\u{e1}lida. Use graus decimais entre -90 e 90.")?;
    let lng = parse_decimal(&input_value(&state.document, "kmlLng"))
        .filter(|v| (-180.0..=180.0).contains(v))
        .ok_or("Longitude inv\u{e1}lida. Use graus decimais entre -180 e 180.")?;
    if state.segments.is_empty() {
        return Err("Nenhum segmento definido para exportar.".into());
    }

    let vertices = kml_core::project(&state.segments, lat, lng)
        .ok_or("Coordenadas de origem fora do intervalo.")?;

    let reg = &state.registration;
    let name = match reg.name.trim() {
        "" => "Matr\u{ed}cula",
        n => n,
    };
    let mut desc_parts: Vec<String> = Vec::new();
    if !reg.registration_number.trim().is_empty() {
        desc_parts.push(format!("Matr\u{ed}cula {}", reg.registration_number.trim()));
    }
    if !reg.location.trim().is_empty() {
        desc_parts.push(reg.location.trim().to_string());
    }
    let description = desc_parts.join(" \u{b7} ");
    let description = (!description.is_empty()).then_some(description.as_str());

    let kml = kml_core::build_kml(name, description, &vertices);
    download_kml(&state.document, &export_filename(reg.name.trim()), &kml)
        .map_err(|_| "Falha ao gerar o arquivo KML.".to_string())
}

/// Filename for the download: sanitized user name, or the plain fallback
/// when no name was typed. The accented display default never reaches the
/// sanitizer, so an unnamed parcel saves as `matricula.kml`.
fn export_filename(trimmed_name: &str) -> String {
    if trimmed_name.is_empty() {
        "matricula".to_string()
    } else {
        sanitize_filename(trimmed_name)
    }
}

/// Keep only filesystem-safe characters, as the web client did.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "matricula".to_string()
    } else {
        cleaned
    }
}

/// Package the document as a KML blob and trigger a client-side save,
/// appending the extension when missing.
pub fn download_kml(document: &Document, filename: &str, content: &str) -> Result<(), JsValue> {
    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));
    let props = BlobPropertyBag::new();
    props.set_type(KML_MIME);
    let blob = Blob::new_with_str_sequence_and_options(&parts, &props)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    let name = if filename.ends_with(".kml") {
        filename.to_string()
    } else {
        format!("{filename}.kml")
    };
    a.set_attribute("download", &name)?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_downloads_as_plain_matricula() {
        assert_eq!(export_filename(""), "matricula");
    }

    #[test]
    fn user_name_is_sanitized_for_the_filesystem() {
        assert_eq!(export_filename("Fazenda S\u{e3}o Jos\u{e9}"), "Fazenda_S_o_Jos_");
        assert_eq!(export_filename("lote-12_B"), "lote-12_B");
    }

    #[test]
    fn all_underscore_results_fall_back() {
        assert_eq!(sanitize_filename("\u{b7}\u{b7}\u{b7}"), "matricula");
    }
}
