//! In-app link interception.
//!
//! # Responsibilities
//! - Decide whether a link activation becomes a router navigation or is
//!   left to the browser
//!
//! # Design Decisions
//! - Only plain primary-button clicks are intercepted; anything that asks
//!   for a new tab, a download or another frame keeps browser behaviour
//! - Same-origin only, compared against the configured origin
//! - A link that only changes the fragment of the current page is left to
//!   the browser so it can scroll

use url::Url;

use crate::navigation::state::NavigationOutcome;

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

/// A click on an anchor, as reported by the DOM.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkActivation {
    /// `href` attribute, absolute or relative to the current URL.
    pub href: String,
    /// `MouseEvent.button`; 0 is the primary button.
    pub button: i16,
    pub modifiers: Modifiers,
    pub target: Option<String>,
    pub download: bool,
}

impl LinkActivation {
    /// A plain primary-button click.
    pub fn primary(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }
}

/// What the caller must do with the DOM event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDisposition {
    /// The router handled it; call `preventDefault`.
    Intercepted(NavigationOutcome),
    /// Let the browser follow the link.
    BrowserDefault,
}

impl LinkDisposition {
    pub fn is_intercepted(&self) -> bool {
        matches!(self, LinkDisposition::Intercepted(_))
    }
}

/// The URL to navigate to, or `None` if the browser should handle the click.
pub(crate) fn intercept_target(link: &LinkActivation, origin: &Url, current: &Url) -> Option<Url> {
    if link.button != 0 || link.modifiers.any() || link.download {
        return None;
    }
    if let Some(target) = link.target.as_deref() {
        if !target.is_empty() && target != "_self" {
            return None;
        }
    }

    let url = current.join(&link.href).ok()?;
    if url.origin() != origin.origin() {
        return None;
    }
    let fragment_only = url.fragment().is_some()
        && url.path() == current.path()
        && url.query() == current.query();
    if fragment_only {
        return None;
    }
    Some(url)
}
