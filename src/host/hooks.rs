use crate::host::page::HostPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PatchId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

/// Which widget handler a page listener routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerRole {
    InteractionGuard,
    PickHover,
    PickClick,
    PickResize,
    EscapeKey,
    PopState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryFn {
    PushState,
    ReplaceState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTag {
    ArmPicking,
    DismissToast(OverlayId),
}

/// Anything the widget installed on the host page and must undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    Listener(ListenerId),
    History(PatchId),
    Timer(TimerId),
    Overlay(OverlayId),
}

/// Registered-handler table. Every install goes through here so that
/// `teardown` can restore the page in one pass.
#[derive(Debug, Default)]
pub struct HookTable {
    hooks: Vec<Hook>,
}

impl HookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hook: Hook) {
        self.hooks.push(hook);
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn contains(&self, hook: Hook) -> bool {
        self.hooks.contains(&hook)
    }

    /// Undo a single hook now and forget it.
    pub fn release(&mut self, page: &mut HostPage, hook: Hook) {
        if let Some(pos) = self.hooks.iter().position(|h| *h == hook) {
            self.hooks.remove(pos);
            undo(page, hook);
        }
    }

    /// Forget a hook the page already dropped on its own (a fired timer).
    pub fn forget(&mut self, hook: Hook) {
        self.hooks.retain(|h| *h != hook);
    }

    /// Undo every hook, newest first. Returns how many were undone.
    pub fn teardown(&mut self, page: &mut HostPage) -> usize {
        let mut undone = 0;
        while let Some(hook) = self.hooks.pop() {
            undo(page, hook);
            undone += 1;
        }
        undone
    }
}

fn undo(page: &mut HostPage, hook: Hook) {
    match hook {
        Hook::Listener(id) => {
            page.remove_listener(id);
        }
        Hook::History(id) => {
            page.unpatch_history(id);
        }
        Hook::Timer(id) => {
            page.clear_timeout(id);
        }
        Hook::Overlay(id) => {
            page.remove_overlay(id);
        }
    }
}
