//! Browser bindings (wasm32 only).
//!
//! # Responsibilities
//! - Implement `History` over `window.history` / `window.location`
//! - Feed `popstate` events and document clicks into a `Router`

use url::Url;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlAnchorElement, MouseEvent};

use crate::error::NavigationError;
use crate::navigation::controller::Router;
use crate::navigation::history::History;
use crate::navigation::link::{LinkActivation, LinkDisposition, Modifiers};

/// `History` backed by the page's session history.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHistory;

impl BrowserHistory {
    fn history(&self) -> Option<web_sys::History> {
        web_sys::window()?.history().ok()
    }
}

impl History for BrowserHistory {
    fn location(&self) -> Result<Url, NavigationError> {
        let href = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        Url::parse(&href).map_err(|source| NavigationError::InvalidUrl { target: href, source })
    }

    fn push_state(&self, url: &Url) {
        let result = self
            .history()
            .map(|h| h.push_state_with_url(&JsValue::NULL, "", Some(url.as_str())));
        if !matches!(result, Some(Ok(()))) {
            tracing::warn!(url = %url, "history.pushState failed");
        }
    }

    fn replace_state(&self, url: &Url) {
        let result = self
            .history()
            .map(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(url.as_str())));
        if !matches!(result, Some(Ok(()))) {
            tracing::warn!(url = %url, "history.replaceState failed");
        }
    }
}

/// Listen for back/forward and in-app link clicks for the lifetime of the
/// page.
pub fn install_listeners<V: 'static>(router: &Router<V>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

    let popstate_router = router.clone();
    let on_popstate = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        if let Err(e) = popstate_router.handle_popstate() {
            tracing::warn!(error = %e, "Handling popstate failed");
        }
    });
    window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())?;
    on_popstate.forget();

    let click_router = router.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if event.default_prevented() {
            return;
        }
        let Some(activation) = link_activation(&event) else {
            return;
        };
        if let LinkDisposition::Intercepted(outcome) = click_router.activate_link(&activation) {
            event.prevent_default();
            tracing::debug!(href = %activation.href, ?outcome, "Link intercepted");
        }
    });
    document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    Ok(())
}

fn link_activation(event: &Event) -> Option<LinkActivation> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let element = event.target()?.dyn_into::<Element>().ok()?;
    let anchor = element
        .closest("a[href]")
        .ok()
        .flatten()?
        .dyn_into::<HtmlAnchorElement>()
        .ok()?;

    let target = anchor.target();
    Some(LinkActivation {
        href: anchor.href(),
        button: mouse.button(),
        modifiers: Modifiers {
            ctrl: mouse.ctrl_key(),
            meta: mouse.meta_key(),
            shift: mouse.shift_key(),
            alt: mouse.alt_key(),
        },
        target: (!target.is_empty()).then_some(target),
        download: anchor.has_attribute("download"),
    })
}
