use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, MouseEvent, Window};

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(s));
}

/// Match the canvas backing store to its CSS box and device pixel ratio so
/// the drawing never stretches.
pub fn sync_canvas_size(window: &Window, canvas: &HtmlCanvasElement) {
    let dpr = window.device_pixel_ratio();
    let rect = canvas.get_bounding_client_rect();
    let target_w = (rect.width().max(1.0) * dpr).round().clamp(1.0, 10_000.0) as u32;
    let target_h = (rect.height().max(1.0) * dpr).round().clamp(1.0, 10_000.0) as u32;
    if canvas.width() != target_w {
        canvas.set_width(target_w);
    }
    if canvas.height() != target_h {
        canvas.set_height(target_h);
    }
}

/// Mouse event position in canvas backing-store pixels, correct even when
/// CSS scales the canvas element.
pub fn event_canvas_coords(e: &MouseEvent, canvas: &HtmlCanvasElement) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    let x = (e.client_x() as f64 - rect.left()) * canvas.width() as f64 / rect.width().max(1.0);
    let y = (e.client_y() as f64 - rect.top()) * canvas.height() as f64 / rect.height().max(1.0);
    (x, y)
}

/// Absolute URL for a served asset, honoring the optional
/// `window.__BASE_URL` the host page may set when the app is mounted
/// under a path prefix.
pub fn asset_url(path: &str) -> String {
    let p = path.trim();
    if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") {
        return p.to_string();
    }
    let base = web_sys::window()
        .and_then(|w| {
            let v = js_sys::Reflect::get(&w, &JsValue::from_str("__BASE_URL")).ok()?;
            v.as_string()
        })
        .unwrap_or_else(|| "/".to_string());
    let base = if base.ends_with('/') {
        base
    } else {
        format!("{}/", base)
    };
    format!("{}{}", base, p.trim_start_matches('/'))
}

/// Fetch a text resource, trying fallback URLs in order.
pub async fn fetch_text(window: &Window, urls: &[&str]) -> Option<String> {
    for url in urls {
        let resp_value =
            match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(url)).await {
                Ok(v) => v,
                Err(_) => continue,
            };
        let resp: web_sys::Response = match resp_value.dyn_into() {
            Ok(r) => r,
            Err(_) => continue,
        };
        if !resp.ok() {
            continue;
        }
        if let Ok(text_promise) = resp.text()
            && let Ok(text_js) = wasm_bindgen_futures::JsFuture::from(text_promise).await
            && let Some(s) = text_js.as_string()
        {
            return Some(s);
        }
    }
    None
}

/// Simple `?a=b&c=d` query string lookup used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}
