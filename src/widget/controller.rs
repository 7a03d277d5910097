use std::sync::Arc;

use tracing::{debug, error, info};

use crate::dom::document::NodeId;
use crate::error::{ConfigError, SubmitError};
use crate::host::events::{Delivery, EventKind, PageEvent, Propagation};
use crate::host::hooks::{HistoryFn, Hook, HookTable, ListenerRole, OverlayId, TimerId, TimerTag};
use crate::host::overlay::{Overlay, ToastKind};
use crate::host::page::{Cursor, HostPage, ListenerHost};
use crate::selection::model::SelectionState;
use crate::selection::session::SelectionSession;
use crate::submit::builder::{build_report, now_ms};
use crate::submit::transport::{HttpTransport, PendingSubmission, SubmissionRequest, Transport};
use crate::widget::config::WidgetConfig;
use crate::widget::visibility::{PathRules, Visibility, evaluate_visibility};

pub const HOST_ELEMENT_ID: &str = "feedback-widget-host";

pub const TOAST_DURATION_MS: u64 = 3000;

pub const SUCCESS_MESSAGE: &str = "Thanks! Your feedback was sent.";
pub const FAILURE_MESSAGE: &str = "Sorry, we couldn't send your feedback. Please try again later.";

/// Free-text input shown after picking (or for page-level feedback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    pub text: String,
    pub privacy_notice: String,
}

/// Everything one running widget owns on the page. Dropping it without
/// `teardown` would leak hooks, so only `WidgetController::destroy` ends it.
struct WidgetSession {
    host: NodeId,
    hooks: HookTable,
    selection: SelectionSession,
    visibility: Visibility,
    panel_open: bool,
    editor: Option<Editor>,
    pending: Vec<PendingSubmission>,
}

impl WidgetSession {
    fn teardown(&mut self, page: &mut HostPage) {
        self.selection.clear(page);
        self.editor = None;
        self.panel_open = false;
        let undone = self.hooks.teardown(page);
        page.document.detach(self.host);
        page.cursor = Cursor::Default;
        debug!(undone, "widget hooks removed");
    }
}

/// Lifecycle, visibility policy and UI wiring of the feedback widget.
pub struct WidgetController {
    config: WidgetConfig,
    rules: PathRules,
    transport: Arc<dyn Transport>,
    session: Option<WidgetSession>,
}

impl WidgetController {
    /// Validate `config` and mount the widget on `page`.
    ///
    /// On a configuration error nothing is installed on the page.
    pub fn init(config: WidgetConfig, page: &mut HostPage) -> Result<Self, ConfigError> {
        Self::init_with_transport(config, page, Arc::new(HttpTransport::default()))
    }

    pub fn init_with_transport(
        config: WidgetConfig,
        page: &mut HostPage,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ConfigError> {
        let rules = config
            .validate()
            .and_then(|_| {
                PathRules::compile(
                    config.include_paths.as_deref(),
                    config.exclude_paths.as_deref(),
                )
            })
            .map_err(|e| {
                error!(error = %e, "feedback widget not initialised");
                e
            })?;

        let mut controller = Self {
            config,
            rules,
            transport,
            session: None,
        };
        controller.mount(page);
        Ok(controller)
    }

    fn mount(&mut self, page: &mut HostPage) {
        let parent = page
            .document
            .body()
            .or_else(|| page.document.document_element())
            .unwrap_or_else(|| page.document.root());
        let host = page
            .document
            .append_element(parent, "div", &[("id", HOST_ELEMENT_ID)]);

        let mut hooks = HookTable::new();
        hooks.push(Hook::History(page.patch_history(HistoryFn::PushState)));
        hooks.push(Hook::History(page.patch_history(HistoryFn::ReplaceState)));
        hooks.push(Hook::Listener(
            page.add_listener(&[EventKind::PopState], ListenerRole::PopState),
        ));
        hooks.push(Hook::Listener(
            page.add_listener(&[EventKind::KeyDown], ListenerRole::EscapeKey),
        ));

        self.session = Some(WidgetSession {
            host,
            hooks,
            selection: SelectionSession::new(Some(host)),
            visibility: Visibility::Visible,
            panel_open: false,
            editor: None,
            pending: vec![],
        });

        self.refresh_visibility(page);
        info!(path = page.path(), visible = self.is_visible(), "feedback widget initialised");
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn is_destroyed(&self) -> bool {
        self.session.is_none()
    }

    pub fn host_element(&self) -> Option<NodeId> {
        self.session.as_ref().map(|s| s.host)
    }

    pub fn visibility(&self) -> Option<&Visibility> {
        self.session.as_ref().map(|s| &s.visibility)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility().map(Visibility::is_visible).unwrap_or(false)
    }

    pub fn is_open(&self) -> bool {
        self.session.as_ref().map(|s| s.panel_open).unwrap_or(false)
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.session.as_ref()?.editor.as_ref()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.session
            .as_ref()
            .map(|s| s.selection.state().clone())
            .unwrap_or(SelectionState::Idle)
    }

    pub fn pending_submissions(&self) -> usize {
        self.session.as_ref().map(|s| s.pending.len()).unwrap_or(0)
    }

    pub fn logo_url(&self) -> Option<&str> {
        self.config.logo_url.as_deref()
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    /// Re-run path rules and the sensitivity check against the current URL.
    pub fn refresh_visibility(&mut self, page: &mut HostPage) {
        let visibility =
            evaluate_visibility(&self.rules, self.config.allow_on_sensitive_pages, page);
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if !visibility.is_visible() {
            session.selection.clear(page);
            session.editor = None;
            session.panel_open = false;
            page.document.set_attribute(session.host, "hidden", "");
        } else {
            page.document.remove_attribute(session.host, "hidden");
        }

        if visibility != session.visibility {
            debug!(?visibility, path = page.path(), "widget visibility changed");
        }
        session.visibility = visibility;
    }

    // ------------------------------------------------------------------
    // UI actions
    // ------------------------------------------------------------------

    /// Open the widget menu. No-op when already open, hidden or destroyed.
    pub fn open(&mut self) -> bool {
        let visible = self.is_visible();
        match self.session.as_mut() {
            Some(session) if visible && !session.panel_open => {
                session.panel_open = true;
                true
            }
            _ => false,
        }
    }

    /// Close menu and editor, dropping any selection.
    pub fn close(&mut self, page: &mut HostPage) {
        if let Some(session) = self.session.as_mut() {
            session.selection.clear(page);
            session.editor = None;
            session.panel_open = false;
        }
    }

    /// "Select an element" from the menu.
    pub fn start_picking(&mut self, page: &mut HostPage) -> bool {
        if !self.is_visible() {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.editor = None;
        session.panel_open = false;
        session.selection.begin_picking(page)
    }

    /// "Feedback on this page": editor without a picked element.
    pub fn open_page_feedback(&mut self, page: &mut HostPage) -> bool {
        if !self.is_visible() {
            return false;
        }
        let notice = self.config.privacy_notice_text().to_string();
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.selection.clear(page);
        session.panel_open = false;
        session.editor = Some(Editor {
            text: String::new(),
            privacy_notice: notice,
        });
        true
    }

    pub fn set_feedback_text(&mut self, text: &str) {
        if let Some(editor) = self.session.as_mut().and_then(|s| s.editor.as_mut()) {
            editor.text = text.to_string();
        }
    }

    /// Cancel: drop the selection, close the editor, give the page back.
    pub fn cancel(&mut self, page: &mut HostPage) {
        self.close(page);
    }

    /// Submit the editor text.
    pub fn submit(&mut self, page: &mut HostPage) -> Result<(), SubmitError> {
        let text = self.editor().map(|e| e.text.clone()).unwrap_or_default();
        self.send_feedback(page, &text)
    }

    /// Build the report and start delivery.
    ///
    /// The editor closes before the network call starts; the outcome only
    /// shows up later as a toast (see [`Self::pump`]).
    pub fn send_feedback(&mut self, page: &mut HostPage, text: &str) -> Result<(), SubmitError> {
        if text.trim().is_empty() {
            return Err(SubmitError::EmptyFeedback);
        }

        let options = self.config.serialize_options();
        let endpoint = self.config.resolved_endpoint().to_string();
        let api_key = self.config.api_key.clone();
        let transport = Arc::clone(&self.transport);
        let Some(session) = self.session.as_mut() else {
            return Err(SubmitError::NotRunning);
        };

        let selected = session
            .selection
            .selection()
            .map(|s| (s.element, s.descriptor.clone()));
        let report = build_report(
            page,
            selected.as_ref().map(|(el, d)| (*el, Some(d.as_str()))),
            text,
            &options,
            now_ms(),
        );

        // Optimistic close.
        session.selection.clear(page);
        session.editor = None;
        session.panel_open = false;

        let request = match SubmissionRequest::new(&endpoint, &api_key, &report) {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "could not encode feedback report");
                show_toast(session, page, ToastKind::Error, FAILURE_MESSAGE);
                return Err(e);
            }
        };

        info!(endpoint = %endpoint, page_level = report.is_page_level(), "sending feedback");
        session
            .pending
            .push(PendingSubmission::spawn(transport, request));
        Ok(())
    }

    /// Surface finished deliveries as toasts. Returns how many finished.
    pub fn pump(&mut self, page: &mut HostPage) -> usize {
        let Some(session) = self.session.as_mut() else {
            return 0;
        };

        let mut finished = Vec::new();
        let mut still_pending = Vec::new();
        for pending in session.pending.drain(..) {
            match pending.try_result() {
                Some(result) => finished.push(result),
                None => still_pending.push(pending),
            }
        }
        session.pending = still_pending;

        for result in &finished {
            report_outcome(session, page, result);
        }
        finished.len()
    }

    /// Block until every in-flight delivery has finished, then surface them.
    pub fn flush_submissions(&mut self, page: &mut HostPage) -> Vec<Result<(), SubmitError>> {
        let Some(session) = self.session.as_mut() else {
            return vec![];
        };

        let results: Vec<_> = session
            .pending
            .drain(..)
            .map(PendingSubmission::wait)
            .collect();
        for result in &results {
            report_outcome(session, page, result);
        }
        results
    }

    // ------------------------------------------------------------------
    // Event loop plumbing
    // ------------------------------------------------------------------

    /// Deliver a page event through the page's listeners (ours included).
    pub fn dispatch(&mut self, page: &mut HostPage, event: &PageEvent) -> Delivery {
        page.dispatch(event, self)
    }

    pub fn advance(&mut self, page: &mut HostPage, ms: u64) {
        page.advance(ms, self);
    }

    /// Remove everything the widget installed. Safe to call repeatedly.
    pub fn destroy(&mut self, page: &mut HostPage) -> bool {
        match self.session.take() {
            Some(mut session) => {
                session.teardown(page);
                info!("feedback widget destroyed");
                true
            }
            None => false,
        }
    }
}

fn report_outcome(session: &mut WidgetSession, page: &mut HostPage, result: &Result<(), SubmitError>) {
    match result {
        Ok(()) => show_toast(session, page, ToastKind::Success, SUCCESS_MESSAGE),
        Err(e) => {
            error!(error = %e, "feedback submission failed");
            show_toast(session, page, ToastKind::Error, FAILURE_MESSAGE);
        }
    }
}

fn show_toast(session: &mut WidgetSession, page: &mut HostPage, toast: ToastKind, message: &str) {
    let overlay = page.add_overlay(Overlay::Toast {
        toast,
        message: message.to_string(),
    });
    let timer = page.set_timeout(TOAST_DURATION_MS, TimerTag::DismissToast(overlay));
    session.hooks.push(Hook::Overlay(overlay));
    session.hooks.push(Hook::Timer(timer));
}

fn dismiss_toast(session: &mut WidgetSession, page: &mut HostPage, timer: TimerId, overlay: OverlayId) {
    session.hooks.forget(Hook::Timer(timer));
    session.hooks.release(page, Hook::Overlay(overlay));
}

impl ListenerHost for WidgetController {
    fn handle_event(
        &mut self,
        page: &mut HostPage,
        role: ListenerRole,
        event: &PageEvent,
    ) -> Propagation {
        let notice = self.config.privacy_notice_text().to_string();
        let Some(session) = self.session.as_mut() else {
            return Propagation::Continue;
        };

        match role {
            ListenerRole::PopState => {
                self.handle_navigation(page);
                Propagation::Continue
            }
            ListenerRole::InteractionGuard => session.selection.guard(page, event),
            ListenerRole::PickHover => match event.target {
                Some(target) => session.selection.on_hover(page, target),
                None => Propagation::Continue,
            },
            ListenerRole::PickClick => {
                let Some(target) = event.target else {
                    return Propagation::Continue;
                };
                let propagation = session.selection.on_click(page, target);
                if session.selection.selection().is_some() && session.editor.is_none() {
                    session.editor = Some(Editor {
                        text: String::new(),
                        privacy_notice: notice,
                    });
                }
                propagation
            }
            ListenerRole::PickResize => session.selection.on_resize(page),
            ListenerRole::EscapeKey => {
                let is_escape = event.key.as_ref().map(|k| k.is_escape()).unwrap_or(false);
                if is_escape && (session.selection.state().is_picking() || session.editor.is_some()) {
                    debug!("escape: closing picker/editor");
                    session.selection.clear(page);
                    session.editor = None;
                }
                Propagation::Continue
            }
        }
    }

    fn handle_timer(&mut self, page: &mut HostPage, timer: TimerId, tag: TimerTag) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match tag {
            TimerTag::ArmPicking => session.selection.arm(page, timer),
            TimerTag::DismissToast(overlay) => dismiss_toast(session, page, timer, overlay),
        }
    }

    /// Client-side route change: a pick in progress is abandoned, then
    /// visibility is recomputed for the new path.
    fn handle_navigation(&mut self, page: &mut HostPage) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.selection.state().is_idle() || session.editor.is_some() {
            debug!("navigation: cancelling selection");
        }
        session.selection.clear(page);
        session.editor = None;
        self.refresh_visibility(page);
    }
}
