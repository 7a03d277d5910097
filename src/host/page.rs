use std::collections::BTreeMap;

use url::Url;

use crate::dom::document::Document;
use crate::dom::geometry::Viewport;
use crate::dom::snapshot::PageSnapshot;
use crate::error::SnapshotError;
use crate::host::events::{Delivery, EventKind, PageEvent, Propagation};
use crate::host::hooks::{HistoryFn, ListenerId, ListenerRole, OverlayId, PatchId, TimerId, TimerTag};
use crate::host::overlay::Overlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
}

/// The widget side of the page: receives routed events, timers and
/// navigation notifications.
pub trait ListenerHost {
    fn handle_event(
        &mut self,
        page: &mut HostPage,
        role: ListenerRole,
        event: &PageEvent,
    ) -> Propagation;

    fn handle_timer(&mut self, page: &mut HostPage, timer: TimerId, tag: TimerTag);

    fn handle_navigation(&mut self, page: &mut HostPage);
}

#[derive(Debug, Clone)]
struct InstalledListener {
    id: ListenerId,
    kinds: Vec<EventKind>,
    role: ListenerRole,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    id: TimerId,
    due_ms: u64,
    tag: TimerTag,
}

/// A live page: its document plus the global state a widget can touch.
///
/// Everything the widget installs (listeners, history patches, timers,
/// overlays) is recorded here so tests can see exactly what is left behind.
#[derive(Debug)]
pub struct HostPage {
    pub document: Document,
    pub viewport: Viewport,
    pub user_agent: String,
    pub cursor: Cursor,
    location: Url,
    back_stack: Vec<Url>,
    now_ms: u64,
    next_handle: u64,
    listeners: Vec<InstalledListener>,
    history_patches: Vec<(PatchId, HistoryFn)>,
    timers: Vec<PendingTimer>,
    overlays: BTreeMap<OverlayId, Overlay>,
}

impl HostPage {
    pub fn new(document: Document, location: Url) -> Self {
        Self {
            document,
            viewport: Viewport::default(),
            user_agent: String::new(),
            cursor: Cursor::Default,
            location,
            back_stack: vec![],
            now_ms: 0,
            next_handle: 1,
            listeners: vec![],
            history_patches: vec![],
            timers: vec![],
            overlays: BTreeMap::new(),
        }
    }

    pub fn from_snapshot(snapshot: &PageSnapshot) -> Result<Self, SnapshotError> {
        let location = Url::parse(&snapshot.url).map_err(|e| SnapshotError::InvalidUrl {
            url: snapshot.url.clone(),
            source: e,
        })?;

        let mut page = Self::new(snapshot.to_document(), location);
        page.viewport = snapshot.viewport;
        page.user_agent = snapshot.user_agent.clone();
        Ok(page)
    }

    fn next_handle(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    // ------------------------------------------------------------------
    // Location & clock
    // ------------------------------------------------------------------

    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn path(&self) -> &str {
        self.location.path()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn add_listener(&mut self, kinds: &[EventKind], role: ListenerRole) -> ListenerId {
        let id = ListenerId(self.next_handle());
        self.listeners.push(InstalledListener {
            id,
            kinds: kinds.to_vec(),
            role,
        });
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listener(&self, role: ListenerRole) -> bool {
        self.listeners.iter().any(|l| l.role == role)
    }

    /// Run installed listeners for `event` in installation order.
    pub fn dispatch(&mut self, event: &PageEvent, host: &mut dyn ListenerHost) -> Delivery {
        let matching: Vec<(ListenerId, ListenerRole)> = self
            .listeners
            .iter()
            .filter(|l| l.kinds.contains(&event.kind))
            .map(|l| (l.id, l.role))
            .collect();

        for (id, role) in matching {
            // A previous handler may have removed this one.
            if !self.listeners.iter().any(|l| l.id == id) {
                continue;
            }
            if host.handle_event(self, role, event) == Propagation::Stop {
                return Delivery::Suppressed;
            }
        }

        Delivery::Default
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn patch_history(&mut self, function: HistoryFn) -> PatchId {
        let id = PatchId(self.next_handle());
        self.history_patches.push((id, function));
        id
    }

    pub fn unpatch_history(&mut self, id: PatchId) -> bool {
        let before = self.history_patches.len();
        self.history_patches.retain(|(p, _)| *p != id);
        self.history_patches.len() != before
    }

    pub fn is_history_patched(&self) -> bool {
        !self.history_patches.is_empty()
    }

    pub fn push_state(&mut self, url: &str, host: &mut dyn ListenerHost) -> Result<(), url::ParseError> {
        let next = self.location.join(url)?;
        let previous = std::mem::replace(&mut self.location, next);
        self.back_stack.push(previous);
        self.notify_patched(HistoryFn::PushState, host);
        Ok(())
    }

    pub fn replace_state(&mut self, url: &str, host: &mut dyn ListenerHost) -> Result<(), url::ParseError> {
        self.location = self.location.join(url)?;
        self.notify_patched(HistoryFn::ReplaceState, host);
        Ok(())
    }

    /// Browser back button: restores the previous entry and fires `popstate`.
    pub fn go_back(&mut self, host: &mut dyn ListenerHost) -> Delivery {
        match self.back_stack.pop() {
            Some(previous) => {
                self.location = previous;
                self.dispatch(&PageEvent::new(EventKind::PopState, None), host)
            }
            None => Delivery::Default,
        }
    }

    fn notify_patched(&mut self, function: HistoryFn, host: &mut dyn ListenerHost) {
        let patched = self.history_patches.iter().any(|(_, f)| *f == function);
        if patched {
            host.handle_navigation(self);
        }
    }

    // ------------------------------------------------------------------
    // Timers
    // ------------------------------------------------------------------

    pub fn set_timeout(&mut self, delay_ms: u64, tag: TimerTag) -> TimerId {
        let id = TimerId(self.next_handle());
        self.timers.push(PendingTimer {
            id,
            due_ms: self.now_ms + delay_ms,
            tag,
        });
        id
    }

    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Move the clock forward, firing due timers in due order.
    pub fn advance(&mut self, ms: u64, host: &mut dyn ListenerHost) {
        let target = self.now_ms + ms;

        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.due_ms <= target)
                .min_by_key(|(_, t)| (t.due_ms, t.id))
                .map(|(i, _)| i);

            let Some(index) = next else { break };
            let timer = self.timers.remove(index);
            self.now_ms = self.now_ms.max(timer.due_ms);
            host.handle_timer(self, timer.id, timer.tag);
        }

        self.now_ms = target;
    }

    // ------------------------------------------------------------------
    // Overlays
    // ------------------------------------------------------------------

    pub fn add_overlay(&mut self, overlay: Overlay) -> OverlayId {
        let id = OverlayId(self.next_handle());
        self.overlays.insert(id, overlay);
        id
    }

    pub fn update_overlay(&mut self, id: OverlayId, overlay: Overlay) -> bool {
        match self.overlays.get_mut(&id) {
            Some(slot) => {
                *slot = overlay;
                true
            }
            None => false,
        }
    }

    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        self.overlays.remove(&id).is_some()
    }

    pub fn overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&id)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &Overlay> {
        self.overlays.values()
    }

    pub fn toasts(&self) -> Vec<&Overlay> {
        self.overlays.values().filter(|o| o.is_toast()).collect()
    }
}
