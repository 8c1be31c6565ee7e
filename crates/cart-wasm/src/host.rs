//! Alerts and client-side navigation on the real page.

use cart_core::PageHost;
use wasm_bindgen::JsValue;
use web_sys::{console, Event, Window};

pub struct BrowserHost;

impl BrowserHost {
    /// Push the route onto the history stack and let the router react
    fn push_route(window: &Window, route: &str) -> Result<(), JsValue> {
        window
            .history()?
            .push_state_with_url(&JsValue::NULL, "", Some(route))?;
        window.dispatch_event(&Event::new("popstate")?)?;
        Ok(())
    }
}

impl PageHost for BrowserHost {
    fn alert(&self, message: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = window.alert_with_message(message) {
            console::error_2(&"Error showing alert:".into(), &e);
        }
    }

    fn navigate(&self, route: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(e) = Self::push_route(&window, route) {
            console::warn_2(&"History navigation failed, reloading:".into(), &e);
            if let Err(e) = window.location().set_href(route) {
                console::error_2(&"Error navigating:".into(), &e);
            }
        }
    }
}
