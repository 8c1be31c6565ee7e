//! The hosted payment modal, opened through the checkout script's global.

use crate::loader::WIDGET_GLOBAL;
use cart_core::{
    CartError, CartResult, PaymentWidget, WidgetHandle, WidgetOptions, WidgetResponder,
    WidgetResponse,
};
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::console;

/// Callbacks handed to the modal; kept alive until the next attempt
struct ModalCallbacks {
    _handler: Closure<dyn FnMut(JsValue)>,
    _dismiss: Closure<dyn FnMut()>,
}

#[derive(Default)]
pub struct RazorpayWidget {
    callbacks: RefCell<Option<ModalCallbacks>>,
}

impl RazorpayWidget {
    pub fn new() -> Self {
        Self::default()
    }

    fn open_modal(&self, options: WidgetOptions) -> Result<WidgetHandle, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window available"))?;
        let constructor: js_sys::Function =
            js_sys::Reflect::get(&window, &JsValue::from_str(WIDGET_GLOBAL))?.dyn_into()?;

        let config = options.serialize(&Serializer::json_compatible())?;

        let (responder, handle) = WidgetHandle::channel();
        let slot: Rc<RefCell<Option<WidgetResponder>>> = Rc::new(RefCell::new(Some(responder)));

        let handler = {
            let slot = slot.clone();
            Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
                let Some(responder) = slot.borrow_mut().take() else {
                    return;
                };
                match serde_wasm_bindgen::from_value::<WidgetResponse>(value) {
                    Ok(response) => {
                        if let Err(e) = responder.complete(response) {
                            console::error_1(&e.to_string().into());
                        }
                    }
                    // dropping the responder ends the attempt as dismissed
                    Err(e) => console::error_1(&format!("Unexpected widget response: {}", e).into()),
                }
            })
        };
        let dismiss = {
            let slot = slot.clone();
            Closure::<dyn FnMut()>::new(move || {
                slot.borrow_mut().take();
            })
        };

        let modal = js_sys::Object::new();
        js_sys::Reflect::set(&modal, &JsValue::from_str("ondismiss"), dismiss.as_ref())?;
        js_sys::Reflect::set(&config, &JsValue::from_str("handler"), handler.as_ref())?;
        js_sys::Reflect::set(&config, &JsValue::from_str("modal"), &modal)?;

        let instance = js_sys::Reflect::construct(&constructor, &js_sys::Array::of1(&config))?;
        let open: js_sys::Function =
            js_sys::Reflect::get(&instance, &JsValue::from_str("open"))?.dyn_into()?;
        open.call0(&instance)?;

        self.callbacks.replace(Some(ModalCallbacks {
            _handler: handler,
            _dismiss: dismiss,
        }));
        Ok(handle)
    }
}

impl PaymentWidget for RazorpayWidget {
    fn open(&self, options: WidgetOptions) -> CartResult<WidgetHandle> {
        self.open_modal(options)
            .map_err(|e| CartError::Widget(crate::describe(&e)))
    }
}
