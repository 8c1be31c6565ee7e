//! # cart-wasm
//!
//! WebAssembly bindings for the storefront cart page.
//!
//! This crate provides the browser side of the page:
//! - Injecting the hosted checkout script on demand
//! - Opening the payment modal and relaying its result
//! - Blocking alerts and client-side navigation
//! - `CartPageHandle`, the JS-facing page object
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { CartPageHandle } from 'cart-wasm';
//!
//! await init();
//!
//! const page = new CartPageHandle({
//!   apiBaseUrl: 'http://localhost:8080',
//!   checkout: { key: 'rzp_test_xxx' },
//! });
//! page.setChrome((count, user) => headerHtml(count, user), () => footerHtml());
//!
//! await page.load();
//! root.innerHTML = page.render();
//!
//! await page.increment(42);
//! const state = await page.checkout();
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build crates/cart-wasm --target web
//! ```

pub mod host;
pub mod loader;
pub mod widget;

pub use host::BrowserHost;
pub use loader::BrowserScriptLoader;
pub use widget::RazorpayWidget;

use cart_core::{
    CartError, CartPage, CartResult, CheckoutOrchestrator, CheckoutSettings, PageChrome,
    PlainChrome, ProductId,
};
use cart_http::{ClientConfig, HttpCartBackend, DEFAULT_API_BASE_URL};
use js_sys::{Function, Promise};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

type BrowserCheckout = CheckoutOrchestrator<BrowserScriptLoader, RazorpayWidget, BrowserHost>;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    log(&format!("cart-wasm {} ready", version()));
}

/// Options accepted by the `CartPageHandle` constructor
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub checkout: Option<CheckoutSettings>,
}

impl BrowserConfig {
    pub fn into_client_config(self) -> CartResult<ClientConfig> {
        let config = ClientConfig::new(
            self.api_base_url
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        )
        .with_checkout(self.checkout.unwrap_or_default());
        config.validate()?;
        Ok(config)
    }
}

/// Order summary as handed to JS
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    username: String,
    item_count: usize,
    unit_count: u64,
    subtotal: String,
    shipping: String,
    grand_total: String,
}

/// Header/footer supplied by the host application
#[derive(Default)]
struct JsChrome {
    header: Option<Function>,
    footer: Option<Function>,
}

impl PageChrome for JsChrome {
    fn header(&self, cart_count: u64, username: &str) -> String {
        match &self.header {
            Some(header) => header
                .call2(&JsValue::NULL, &JsValue::from_f64(cart_count as f64), &username.into())
                .ok()
                .and_then(|html| html.as_string())
                .unwrap_or_default(),
            None => PlainChrome.header(cart_count, username),
        }
    }

    fn footer(&self) -> String {
        match &self.footer {
            Some(footer) => footer
                .call0(&JsValue::NULL)
                .ok()
                .and_then(|html| html.as_string())
                .unwrap_or_default(),
            None => PlainChrome.footer(),
        }
    }
}

/// Best-effort text for a JS exception
pub(crate) fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn to_js(error: CartError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn busy() -> JsValue {
    JsValue::from_str("another cart action is still running")
}

/// The cart page as seen from JavaScript. Async methods return Promises.
#[wasm_bindgen]
pub struct CartPageHandle {
    page: Rc<RefCell<CartPage<HttpCartBackend>>>,
    checkout: Rc<RefCell<BrowserCheckout>>,
    chrome: JsChrome,
}

#[wasm_bindgen]
impl CartPageHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<CartPageHandle, JsValue> {
        let options: BrowserConfig = if options.is_undefined() || options.is_null() {
            BrowserConfig::default()
        } else {
            serde_wasm_bindgen::from_value(options)?
        };
        let config = options.into_client_config().map_err(to_js)?;
        let settings = config.checkout.clone();
        let backend = HttpCartBackend::new(config).map_err(to_js)?;

        let checkout = CheckoutOrchestrator::new(
            BrowserScriptLoader::new(settings.script_url.clone()),
            RazorpayWidget::new(),
            BrowserHost,
            settings,
        );

        Ok(Self {
            page: Rc::new(RefCell::new(CartPage::new(backend))),
            checkout: Rc::new(RefCell::new(checkout)),
            chrome: JsChrome::default(),
        })
    }

    /// Use the host application's header and footer renderers
    #[wasm_bindgen(js_name = setChrome)]
    pub fn set_chrome(&mut self, header: Option<Function>, footer: Option<Function>) {
        self.chrome = JsChrome { header, footer };
    }

    /// Fetch the cart from the backend
    pub fn load(&self) -> Promise {
        let page = self.page.clone();
        future_to_promise(async move {
            let mut page = page.try_borrow_mut().map_err(|_| busy())?;
            page.load().await;
            Ok::<JsValue, JsValue>(JsValue::UNDEFINED)
        })
    }

    /// Resolves to `true` if the cart changed
    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&self, product_id: JsValue) -> Promise {
        let page = self.page.clone();
        future_to_promise(async move {
            let product_id: ProductId = serde_wasm_bindgen::from_value(product_id)?;
            let mut page = page.try_borrow_mut().map_err(|_| busy())?;
            Ok::<JsValue, JsValue>(JsValue::from_bool(page.remove_item(&product_id).await))
        })
    }

    /// Resolves to `true` if the cart changed
    #[wasm_bindgen(js_name = changeQuantity)]
    pub fn change_quantity(&self, product_id: JsValue, quantity: i32) -> Promise {
        let page = self.page.clone();
        future_to_promise(async move {
            let product_id: ProductId = serde_wasm_bindgen::from_value(product_id)?;
            let mut page = page.try_borrow_mut().map_err(|_| busy())?;
            let changed = page.change_quantity(&product_id, i64::from(quantity)).await;
            Ok::<JsValue, JsValue>(JsValue::from_bool(changed))
        })
    }

    pub fn increment(&self, product_id: JsValue) -> Promise {
        let page = self.page.clone();
        future_to_promise(async move {
            let product_id: ProductId = serde_wasm_bindgen::from_value(product_id)?;
            let mut page = page.try_borrow_mut().map_err(|_| busy())?;
            Ok::<JsValue, JsValue>(JsValue::from_bool(page.increment(&product_id).await))
        })
    }

    pub fn decrement(&self, product_id: JsValue) -> Promise {
        let page = self.page.clone();
        future_to_promise(async move {
            let product_id: ProductId = serde_wasm_bindgen::from_value(product_id)?;
            let mut page = page.try_borrow_mut().map_err(|_| busy())?;
            Ok::<JsValue, JsValue>(JsValue::from_bool(page.decrement(&product_id).await))
        })
    }

    /// Run one checkout attempt. Resolves to the state it ended in.
    pub fn checkout(&self) -> Promise {
        let page = self.page.clone();
        let checkout = self.checkout.clone();
        future_to_promise(async move {
            let page = page.try_borrow().map_err(|_| busy())?;
            let mut checkout = checkout.try_borrow_mut().map_err(|_| busy())?;
            let state = page.checkout(&mut *checkout).await;
            Ok::<JsValue, JsValue>(JsValue::from_str(state.as_str()))
        })
    }

    /// Current checkout state
    #[wasm_bindgen(getter, js_name = checkoutState)]
    pub fn checkout_state(&self) -> Result<String, JsValue> {
        let checkout = self.checkout.try_borrow().map_err(|_| busy())?;
        Ok(checkout.state().to_string())
    }

    /// Page markup for the current cart
    pub fn render(&self) -> Result<String, JsValue> {
        let page = self.page.try_borrow().map_err(|_| busy())?;
        Ok(page.render(&self.chrome))
    }

    /// Order summary: counts and formatted amounts
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        let page = self.page.try_borrow().map_err(|_| busy())?;
        let totals = page.totals();
        let summary = Summary {
            username: page.username().to_string(),
            item_count: totals.item_count,
            unit_count: totals.unit_count,
            subtotal: totals.subtotal.display(),
            shipping: totals.shipping.display(),
            grand_total: totals.grand_total.display(),
        };
        Ok(summary.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
