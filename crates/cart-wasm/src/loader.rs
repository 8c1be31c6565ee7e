//! Injects the hosted checkout script into the document.

use async_trait::async_trait;
use cart_core::ScriptLoader;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, HtmlScriptElement, Node};

/// Global installed by the checkout script
pub const WIDGET_GLOBAL: &str = "Razorpay";

/// Check whether the checkout script's global is already on `window`
pub fn widget_global_present() -> bool {
    web_sys::window()
        .map(|window| js_sys::Reflect::has(&window, &JsValue::from_str(WIDGET_GLOBAL)).unwrap_or(false))
        .unwrap_or(false)
}

/// Loads the checkout script on demand. Readiness is judged by the global
/// the script installs, never by a remembered flag.
pub struct BrowserScriptLoader {
    src: String,
}

impl BrowserScriptLoader {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    /// Append a `<script>` tag, wait for its load or error event, then check
    /// that the script actually installed its global.
    async fn inject(&self) -> Result<bool, JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;

        let script: HtmlScriptElement = document.create_element("script")?.dyn_into()?;
        script.set_src(&self.src);
        script.set_async(true);

        let (tx, rx) = oneshot::channel::<bool>();
        let tx = Rc::new(RefCell::new(Some(tx)));
        let on_load = {
            let tx = tx.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(true);
                }
            })
        };
        let on_error = {
            let tx = tx.clone();
            Closure::<dyn FnMut()>::new(move || {
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(false);
                }
            })
        };
        script.set_onload(Some(on_load.as_ref().unchecked_ref()));
        script.set_onerror(Some(on_error.as_ref().unchecked_ref()));

        let parent: Node = match document.head() {
            Some(head) => head.into(),
            None => document
                .body()
                .ok_or_else(|| JsValue::from_str("document has no head or body"))?
                .into(),
        };
        parent.append_child(&script)?;

        let loaded = rx.await.unwrap_or(false);
        script.set_onload(None);
        script.set_onerror(None);

        let installed = loaded && widget_global_present();
        if loaded && !installed {
            console::error_1(
                &format!("{} loaded without defining window.{}", self.src, WIDGET_GLOBAL).into(),
            );
        }
        if !installed {
            // leave no dead tag behind so the next attempt injects afresh
            script.remove();
        }
        Ok(installed)
    }
}

#[async_trait(?Send)]
impl ScriptLoader for BrowserScriptLoader {
    async fn ensure_loaded(&self) -> bool {
        if widget_global_present() {
            return true;
        }

        match self.inject().await {
            Ok(true) => true,
            Ok(false) => {
                console::error_1(&format!("Failed to load checkout script: {}", self.src).into());
                false
            }
            Err(e) => {
                console::error_2(&"Error injecting checkout script:".into(), &e);
                false
            }
        }
    }
}
