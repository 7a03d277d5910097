use tracing::debug;

use crate::dom::document::NodeId;
use crate::dom::geometry::Rect;
use crate::host::events::{EventKind, PageEvent, Propagation, SUPPRESSED_DURING_PICK};
use crate::host::hooks::{Hook, HookTable, ListenerRole, OverlayId, TimerId, TimerTag};
use crate::host::overlay::Overlay;
use crate::host::page::{Cursor, HostPage};
use crate::locator::descriptor::describe_element;
use crate::page::origin::is_cross_origin_embed;
use crate::selection::model::{
    EMBED_TOOLTIP, PICK_ARM_DELAY_MS, Selection, SelectionState,
};

const TOOLTIP_HEIGHT: f64 = 24.0;

/// Element-picking state machine: Idle → Picking → Selected → Idle.
///
/// Owns everything it installs on the page. The interaction guard lives in
/// its own table because it outlasts picking: it stays up while a selection
/// is being described and comes down with `clear`.
#[derive(Debug)]
pub struct SelectionSession {
    state: SelectionState,
    hovered: Option<NodeId>,
    widget_host: Option<NodeId>,
    guard_hooks: HookTable,
    pick_hooks: HookTable,
    hover_overlay: Option<OverlayId>,
    tooltip: Option<OverlayId>,
    selection_overlay: Option<OverlayId>,
}

impl SelectionSession {
    pub fn new(widget_host: Option<NodeId>) -> Self {
        Self {
            state: SelectionState::Idle,
            hovered: None,
            widget_host,
            guard_hooks: HookTable::new(),
            pick_hooks: HookTable::new(),
            hover_overlay: None,
            tooltip: None,
            selection_overlay: None,
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.state.selection()
    }

    pub fn selected_element(&self) -> Option<NodeId> {
        self.selection().map(|s| s.element)
    }

    /// Hooks currently installed by this session.
    pub fn installed_hooks(&self) -> usize {
        self.guard_hooks.len() + self.pick_hooks.len() + usize::from(self.selection_overlay.is_some())
    }

    fn in_widget(&self, page: &HostPage, node: NodeId) -> bool {
        self.widget_host
            .map(|host| page.document.contains(host, node))
            .unwrap_or(false)
    }

    // ------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------

    /// Enter pick mode. Returns false (and does nothing) if already picking.
    pub fn begin_picking(&mut self, page: &mut HostPage) -> bool {
        if self.state.is_picking() {
            return false;
        }

        if self.guard_hooks.is_empty() {
            let guard = page.add_listener(SUPPRESSED_DURING_PICK, ListenerRole::InteractionGuard);
            self.guard_hooks.push(Hook::Listener(guard));
        }

        let timer = page.set_timeout(PICK_ARM_DELAY_MS, TimerTag::ArmPicking);
        self.pick_hooks.push(Hook::Timer(timer));

        page.cursor = Cursor::Crosshair;
        self.state = SelectionState::Picking { armed: false };
        debug!("selection: picking");
        true
    }

    /// Arm-delay timer fired: install hover, click and resize listeners.
    pub fn arm(&mut self, page: &mut HostPage, timer: TimerId) {
        self.pick_hooks.forget(Hook::Timer(timer));

        if self.state != (SelectionState::Picking { armed: false }) {
            return;
        }

        let hover = page.add_listener(&[EventKind::PointerOver], ListenerRole::PickHover);
        let click = page.add_listener(&[EventKind::Click], ListenerRole::PickClick);
        let resize = page.add_listener(&[EventKind::Resize], ListenerRole::PickResize);
        self.pick_hooks.push(Hook::Listener(hover));
        self.pick_hooks.push(Hook::Listener(click));
        self.pick_hooks.push(Hook::Listener(resize));

        self.state = SelectionState::Picking { armed: true };
        debug!("selection: pick listeners armed");
    }

    /// Picking → Selected. Replaces any earlier selection and its highlight.
    pub fn select(&mut self, page: &mut HostPage, element: NodeId) {
        self.pick_hooks.teardown(page);
        self.hover_overlay = None;
        self.tooltip = None;
        self.hovered = None;

        if let Some(old) = self.selection_overlay.take() {
            page.remove_overlay(old);
        }
        let rect = page.document.rect(element);
        self.selection_overlay = Some(page.add_overlay(Overlay::SelectionHighlight { rect }));
        page.cursor = Cursor::Default;

        let descriptor = describe_element(&page.document, element);
        debug!(%descriptor, "selection: element selected");

        self.state = SelectionState::Selected(Selection {
            element,
            descriptor,
        });
    }

    /// Back to Idle from any state, undoing every page change this session made.
    pub fn clear(&mut self, page: &mut HostPage) {
        self.pick_hooks.teardown(page);
        self.guard_hooks.teardown(page);
        if let Some(overlay) = self.selection_overlay.take() {
            page.remove_overlay(overlay);
        }
        self.hover_overlay = None;
        self.tooltip = None;
        self.hovered = None;
        page.cursor = Cursor::Default;

        if !self.state.is_idle() {
            debug!("selection: idle");
        }
        self.state = SelectionState::Idle;
    }

    // ------------------------------------------------------------------
    // Listener bodies
    // ------------------------------------------------------------------

    /// Swallow page input while picking, except allow-listed keys and
    /// anything aimed at the widget itself.
    pub fn guard(&self, page: &HostPage, event: &PageEvent) -> Propagation {
        if let Some(target) = event.target {
            if self.in_widget(page, target) {
                return Propagation::Continue;
            }
        }
        if let Some(key) = &event.key {
            if key.passes_pick_guard() {
                return Propagation::Continue;
            }
        }
        Propagation::Stop
    }

    pub fn on_hover(&mut self, page: &mut HostPage, target: NodeId) -> Propagation {
        if self.state != (SelectionState::Picking { armed: true }) {
            return Propagation::Continue;
        }

        if self.in_widget(page, target) {
            self.hide_hover(page);
            self.hide_tooltip(page);
            self.hovered = None;
            return Propagation::Continue;
        }

        self.hovered = Some(target);
        let rect = page.document.rect(target);

        if is_cross_origin_embed(page, target) {
            self.hide_hover(page);
            self.show_tooltip(page, rect);
            return Propagation::Continue;
        }

        self.hide_tooltip(page);
        let overlay = Overlay::HoverHighlight { rect };
        match self.hover_overlay {
            Some(id) => {
                page.update_overlay(id, overlay);
            }
            None => {
                let id = page.add_overlay(overlay);
                self.pick_hooks.push(Hook::Overlay(id));
                self.hover_overlay = Some(id);
            }
        }
        Propagation::Continue
    }

    /// Selection click. Stops the event whenever it lands on the page so the
    /// page never half-handles a pick click.
    pub fn on_click(&mut self, page: &mut HostPage, target: NodeId) -> Propagation {
        if self.state != (SelectionState::Picking { armed: true }) {
            return Propagation::Continue;
        }
        if self.in_widget(page, target) {
            return Propagation::Continue;
        }
        if !page.document.is_element(target) {
            return Propagation::Stop;
        }
        if is_cross_origin_embed(page, target) {
            debug!("selection: ignoring click on cross-origin embed");
            return Propagation::Stop;
        }

        self.select(page, target);
        Propagation::Stop
    }

    /// Geometry captured so far would be stale after a resize.
    pub fn on_resize(&mut self, page: &mut HostPage) -> Propagation {
        if self.state.is_picking() {
            debug!("selection: resize cancelled picking");
            self.clear(page);
        }
        Propagation::Continue
    }

    fn hide_hover(&mut self, page: &mut HostPage) {
        if let Some(id) = self.hover_overlay.take() {
            self.pick_hooks.release(page, Hook::Overlay(id));
        }
    }

    fn show_tooltip(&mut self, page: &mut HostPage, near: Rect) {
        let overlay = Overlay::Tooltip {
            rect: Rect::new(near.x, (near.y - TOOLTIP_HEIGHT).max(0.0), near.width, TOOLTIP_HEIGHT),
            text: EMBED_TOOLTIP.to_string(),
        };
        match self.tooltip {
            Some(id) => {
                page.update_overlay(id, overlay);
            }
            None => {
                let id = page.add_overlay(overlay);
                self.pick_hooks.push(Hook::Overlay(id));
                self.tooltip = Some(id);
            }
        }
    }

    fn hide_tooltip(&mut self, page: &mut HostPage) {
        if let Some(id) = self.tooltip.take() {
            self.pick_hooks.release(page, Hook::Overlay(id));
        }
    }
}
