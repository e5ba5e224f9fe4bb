//! Generic popup menu with typed item actions.
//!
//! A [`ContextMenu`] owns groups of toggleable items. While visible it covers
//! the viewport with a [`MenuOverlay`] shared by every menu of the same
//! screen; clicks that land on the overlay dismiss the menu.
//!
//! Showing and hiding take effect at once for input. The popup fades in and
//! out over a few [`ContextMenu::tick`] frames for drawing only.

use indexmap::IndexMap;
use std::cell::Cell;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayState {
    pub visible: bool,
    pub width: u16,
    pub height: u16,
}

/// Handle to the full-viewport click catcher. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MenuOverlay {
    state: Rc<Cell<OverlayState>>,
}

impl MenuOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cover(&self, width: u16, height: u16) {
        self.state.set(OverlayState {
            visible: true,
            width,
            height,
        });
    }

    pub fn release(&self) {
        self.state.set(OverlayState::default());
    }

    pub fn is_visible(&self) -> bool {
        self.state.get().visible
    }

    pub fn state(&self) -> OverlayState {
        self.state.get()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuArea {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl MenuArea {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem<A> {
    pub label: String,
    pub on: bool,
    pub action: A,
}

impl<A> MenuItem<A> {
    pub fn new(label: impl Into<String>, on: bool, action: A) -> Self {
        MenuItem {
            label: label.into(),
            on,
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuGroup<A> {
    pub label: String,
    /// Render the label as a header above the items.
    pub display_label: bool,
    pub items: IndexMap<String, MenuItem<A>>,
}

impl<A> MenuGroup<A> {
    pub fn new(label: impl Into<String>) -> Self {
        MenuGroup {
            label: label.into(),
            display_label: false,
            items: IndexMap::new(),
        }
    }

    pub fn with_header(mut self) -> Self {
        self.display_label = true;
        self
    }

    pub fn item(mut self, id: impl Into<String>, item: MenuItem<A>) -> Self {
        self.items.insert(id.into(), item);
        self
    }
}

/// Frames of the show/hide fade.
pub const FADE_FRAMES: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fade {
    In { frame: u8 },
    /// Still drawn at `area` after being hidden.
    Out { area: MenuArea, frame: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Hidden,
    Visible(MenuArea),
}

/// Input the menu reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    OverlayClick,
    OverlayRightClick,
    MenuRightClick,
    Activate { group: String, item: String },
}

/// One line of the rendered menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Header {
        label: String,
    },
    Item {
        group: String,
        id: String,
        label: String,
        on: bool,
        first: bool,
        last: bool,
        selected: bool,
    },
}

const ITEM_MARKER_WIDTH: usize = 4;

pub struct ContextMenu<A> {
    groups: IndexMap<String, MenuGroup<A>>,
    overlay: MenuOverlay,
    state: MenuState,
    fade: Option<Fade>,
    cursor: usize,
}

impl<A: Clone> ContextMenu<A> {
    pub fn new(overlay: MenuOverlay) -> Self {
        ContextMenu {
            groups: IndexMap::new(),
            overlay,
            state: MenuState::Hidden,
            fade: None,
            cursor: 0,
        }
    }

    pub fn add_group(&mut self, id: impl Into<String>, group: MenuGroup<A>) {
        self.groups.insert(id.into(), group);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
        self.cursor = 0;
    }

    pub fn group(&self, id: &str) -> Option<&MenuGroup<A>> {
        self.groups.get(id)
    }

    pub fn item(&self, group: &str, item: &str) -> Option<&MenuItem<A>> {
        self.groups.get(group)?.items.get(item)
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.state, MenuState::Visible(_))
    }

    pub fn area(&self) -> Option<MenuArea> {
        match self.state {
            MenuState::Visible(area) => Some(area),
            MenuState::Hidden => None,
        }
    }

    pub fn fade(&self) -> Option<Fade> {
        self.fade
    }

    /// Where the popup is drawn: its area while visible or fading out.
    pub fn drawn_area(&self) -> Option<MenuArea> {
        match self.fade {
            Some(Fade::Out { area, .. }) => Some(area),
            _ => self.area(),
        }
    }

    /// Opacity of the popup, 0.0 to 1.0.
    pub fn fade_level(&self) -> f32 {
        let frames = f32::from(FADE_FRAMES);
        match (self.fade, self.is_visible()) {
            (Some(Fade::In { frame }), _) => f32::from(frame + 1) / frames,
            (Some(Fade::Out { frame, .. }), _) => 1.0 - f32::from(frame + 1) / frames,
            (None, true) => 1.0,
            (None, false) => 0.0,
        }
    }

    /// Advance the fade by one frame. Returns true while fading.
    pub fn tick(&mut self) -> bool {
        self.fade = match self.fade {
            Some(Fade::In { frame }) if frame + 1 < FADE_FRAMES => Some(Fade::In { frame: frame + 1 }),
            Some(Fade::Out { area, frame }) if frame + 1 < FADE_FRAMES => Some(Fade::Out {
                area,
                frame: frame + 1,
            }),
            _ => None,
        };
        self.fade.is_some()
    }

    pub fn overlay(&self) -> &MenuOverlay {
        &self.overlay
    }

    /// Outer size of the popup including a one-cell border.
    pub fn size(&self) -> (u16, u16) {
        let entries = self.entries();
        let widest = entries
            .iter()
            .map(|e| match e {
                MenuEntry::Header { label } => label.width(),
                MenuEntry::Item { label, .. } => label.width() + ITEM_MARKER_WIDTH,
            })
            .max()
            .unwrap_or(0);
        let width = u16::try_from(widest + 2).unwrap_or(u16::MAX);
        let height = u16::try_from(entries.len() + 2).unwrap_or(u16::MAX);
        (width, height)
    }

    /// Open at `(x, y)`, shifted so the popup stays inside the viewport.
    pub fn show(&mut self, position: (u16, u16), viewport: (u16, u16)) {
        let (width, height) = self.size();
        let width = width.min(viewport.0);
        let height = height.min(viewport.1);
        let x = position.0.min(viewport.0.saturating_sub(width));
        let y = position.1.min(viewport.1.saturating_sub(height));

        self.overlay.cover(viewport.0, viewport.1);
        self.state = MenuState::Visible(MenuArea {
            x,
            y,
            width,
            height,
        });
        self.fade = Some(Fade::In { frame: 0 });
        self.cursor = 0;
    }

    pub fn hide(&mut self) {
        if let MenuState::Visible(area) = self.state {
            self.overlay.release();
            self.fade = Some(Fade::Out { area, frame: 0 });
        }
        self.state = MenuState::Hidden;
    }

    pub fn set_item_on(&mut self, group: &str, item: &str) -> bool {
        self.set_item(group, item, true)
    }

    pub fn set_item_off(&mut self, group: &str, item: &str) -> bool {
        self.set_item(group, item, false)
    }

    fn set_item(&mut self, group: &str, item: &str, on: bool) -> bool {
        match self.groups.get_mut(group).and_then(|g| g.items.get_mut(item)) {
            Some(entry) => {
                entry.on = on;
                true
            }
            None => false,
        }
    }

    /// Apply an input event. Activating an item hides the menu and yields
    /// its action; every dismissal event just hides it.
    pub fn handle_event(&mut self, event: MenuEvent) -> Option<A> {
        if !self.is_visible() {
            return None;
        }
        match event {
            MenuEvent::OverlayClick | MenuEvent::OverlayRightClick | MenuEvent::MenuRightClick => {
                self.hide();
                None
            }
            MenuEvent::Activate { group, item } => {
                let action = self.item(&group, &item).map(|i| i.action.clone())?;
                self.hide();
                Some(action)
            }
        }
    }

    fn item_ids(&self) -> Vec<(String, String)> {
        self.groups
            .iter()
            .flat_map(|(gid, g)| g.items.keys().map(move |iid| (gid.clone(), iid.clone())))
            .collect()
    }

    pub fn move_down(&mut self) {
        let len = self.item_ids().len();
        if self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn selected(&self) -> Option<(String, String)> {
        self.item_ids().into_iter().nth(self.cursor)
    }

    pub fn activate_selected(&mut self) -> Option<A> {
        let (group, item) = self.selected()?;
        self.handle_event(MenuEvent::Activate { group, item })
    }

    /// Lines to draw, top to bottom.
    pub fn entries(&self) -> Vec<MenuEntry> {
        let mut entries = Vec::new();
        let mut index = 0;
        for (gid, group) in &self.groups {
            if group.display_label {
                entries.push(MenuEntry::Header {
                    label: group.label.clone(),
                });
            }
            let count = group.items.len();
            for (i, (iid, item)) in group.items.iter().enumerate() {
                entries.push(MenuEntry::Item {
                    group: gid.clone(),
                    id: iid.clone(),
                    label: item.label.clone(),
                    on: item.on,
                    first: i == 0,
                    last: i + 1 == count,
                    selected: index == self.cursor,
                });
                index += 1;
            }
        }
        entries
    }

    /// Map a screen cell inside the popup to the item drawn there.
    pub fn item_at(&self, x: u16, y: u16) -> Option<(String, String)> {
        let area = self.area()?;
        if !area.contains(x, y) || y == area.y || y + 1 >= area.y + area.height {
            return None;
        }
        let row = usize::from(y - area.y - 1);
        match self.entries().into_iter().nth(row)? {
            MenuEntry::Item { group, id, .. } => Some((group, id)),
            MenuEntry::Header { .. } => None,
        }
    }

    /// Translate a mouse click at `(x, y)` into a menu event.
    pub fn click(&mut self, x: u16, y: u16, right: bool) -> Option<A> {
        let area = self.area()?;
        let event = if !area.contains(x, y) {
            if right {
                MenuEvent::OverlayRightClick
            } else {
                MenuEvent::OverlayClick
            }
        } else if right {
            MenuEvent::MenuRightClick
        } else {
            let (group, item) = self.item_at(x, y)?;
            MenuEvent::Activate { group, item }
        };
        self.handle_event(event)
    }
}
