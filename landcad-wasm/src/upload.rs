//! File-input loading of a parcel record JSON (segments plus registration
//! metadata), mirroring what the list/detail backend would deliver.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, FileReader, HtmlInputElement};

use crate::models::LandRecord;
use crate::state::State;
use crate::utils::log;
use crate::{editor, fit_view_state};

/// Wires up the file input handler for loading parcel JSON files.
pub fn attach_file_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(input) = doc.get_element_by_id("file") else {
        return Ok(());
    };
    let input: HtmlInputElement = input.dyn_into()?;
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(files) = input_for_closure.files() else {
            log("No file list on input");
            return;
        };
        let Some(file) = files.item(0) else {
            log("No file selected");
            return;
        };
        let Ok(reader) = FileReader::new() else {
            return;
        };
        let st2 = st.clone();
        let reader_for_closure = reader.clone();
        let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_ev: Event| {
            let text = reader_for_closure
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            if text.is_empty() {
                log("Selected file is empty or unreadable");
                return;
            }
            match serde_json::from_str::<LandRecord>(&text) {
                Ok(record) => {
                    let mut s = st2.borrow_mut();
                    editor::seed(&mut s, record);
                    s.last_segment_count = s.segments.len();
                    fit_view_state(&mut s);
                }
                Err(e) => {
                    log(&format!("Failed to parse land record: {e}"));
                    let _ = st2.borrow().window.alert_with_message(
                        "N\u{e3}o foi poss\u{ed}vel ler o arquivo. Verifique o formato JSON.",
                    );
                }
            }
        }));
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        if let Err(e) = reader.read_as_text(&file) {
            log(&format!("Failed to read file: {:?}", e));
        }
        onload.forget();
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}
