use bitflags::bitflags;
use keyboard_types::{Code, Key, Location, Modifiers};
use smol_str::SmolStr;

/// An input event delivered by the host to the editor.
#[derive(Debug, Clone)]
pub enum UiEvent {
    MouseDown(PointerEvent),
    MouseUp(PointerEvent),
    Click(PointerEvent),
    /// A touch tap. Dispatched in addition to (not instead of) the synthesized mouse events.
    Tap(PointerEvent),
    KeyPress(KeyEvent),
    /// A clipboard copy. `None` when the platform gives no access to the clipboard payload.
    Copy(Option<ClipboardData>),
    Focus,
    Blur,
    ResizeWindow,
    FullscreenStateChanged(bool),
}

impl UiEvent {
    /// Returns the name of the event ("mousedown", "keypress", "copy", etc)
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::MouseDown { .. } => "mousedown",
            UiEvent::MouseUp { .. } => "mouseup",
            UiEvent::Click { .. } => "click",
            UiEvent::Tap { .. } => "tap",
            UiEvent::KeyPress { .. } => "keypress",
            UiEvent::Copy { .. } => "copy",
            UiEvent::Focus => "focus",
            UiEvent::Blur => "blur",
            UiEvent::ResizeWindow => "resizewindow",
            UiEvent::FullscreenStateChanged(_) => "fullscreenstatechanged",
        }
    }

    /// Focus, blur and resize notifications have no default action to prevent.
    pub fn is_cancelable(&self) -> bool {
        !matches!(
            self,
            UiEvent::Focus
                | UiEvent::Blur
                | UiEvent::ResizeWindow
                | UiEvent::FullscreenStateChanged(_)
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseEventButton {
    #[default]
    Main = 0,
    Auxiliary = 1,
    Secondary = 2,
    Fourth = 3,
    Fifth = 4,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MouseEventButtons: u8 {
        const None = 0b0000_0000;
        const Primary = 0b0000_0001;
        const Secondary = 0b0000_0010;
        const Auxiliary = 0b0000_0100;
        const Fourth = 0b0000_1000;
        const Fifth = 0b0001_0000;
    }
}

impl From<MouseEventButton> for MouseEventButtons {
    fn from(value: MouseEventButton) -> Self {
        match value {
            MouseEventButton::Main => Self::Primary,
            MouseEventButton::Auxiliary => Self::Auxiliary,
            MouseEventButton::Secondary => Self::Secondary,
            MouseEventButton::Fourth => Self::Fourth,
            MouseEventButton::Fifth => Self::Fifth,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PointerEvent {
    /// The node the host hit-tested the pointer to
    pub target: usize,
    pub client_x: f32,
    pub client_y: f32,
    pub button: MouseEventButton,
    pub buttons: MouseEventButtons,
    pub mods: Modifiers,
}

impl PointerEvent {
    pub fn new(target: usize, client_x: f32, client_y: f32) -> Self {
        Self {
            target,
            client_x,
            client_y,
            button: MouseEventButton::Main,
            buttons: MouseEventButtons::Primary,
            mods: Modifiers::empty(),
        }
    }

    pub fn with_mods(mut self, mods: Modifiers) -> Self {
        self.mods = mods;
        self
    }

    pub fn shift_key(&self) -> bool {
        self.mods.contains(Modifiers::SHIFT)
    }
}

#[derive(Clone, Debug)]
pub struct KeyEvent {
    pub key: Key,
    pub code: Code,
    pub modifiers: Modifiers,
    pub location: Location,
    pub is_auto_repeating: bool,
    pub is_composing: bool,
    pub text: Option<SmolStr>,
}

impl KeyEvent {
    /// A plain character key press without modifiers
    pub fn character(text: &str) -> Self {
        Self {
            key: Key::Character(text.to_string()),
            code: Code::Unidentified,
            modifiers: Modifiers::empty(),
            location: Location::Standard,
            is_auto_repeating: false,
            is_composing: false,
            text: Some(SmolStr::new(text)),
        }
    }

    /// Whether any of shift, ctrl, alt or meta is held
    pub fn modifier_pressed(&self) -> bool {
        self.modifiers.intersects(
            Modifiers::SHIFT | Modifiers::CONTROL | Modifiers::ALT | Modifiers::META,
        )
    }
}

/// The payload of a clipboard event, keyed by mime type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipboardData {
    items: Vec<(String, String)>,
}

impl ClipboardData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_data(&mut self) {
        self.items.clear();
    }

    pub fn set_data(&mut self, mime: &str, data: impl Into<String>) {
        let data = data.into();
        match self.items.iter_mut().find(|(m, _)| m == mime) {
            Some(item) => item.1 = data,
            None => self.items.push((mime.to_string(), data)),
        }
    }

    pub fn get_data(&self, mime: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(m, _)| m == mime)
            .map(|(_, data)| data.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// What a single listener asks for after seeing a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HandlerResult {
    #[default]
    Continue,
    /// Cancel the default action. Ignored for non-cancelable notifications.
    PreventDefault,
}

/// The folded result of dispatching one notification to every listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchOutcome {
    #[default]
    Proceed,
    DefaultPrevented,
}

impl DispatchOutcome {
    pub fn is_default_prevented(self) -> bool {
        matches!(self, Self::DefaultPrevented)
    }

    /// Combine two outcomes: once prevented, always prevented.
    pub fn and(self, other: DispatchOutcome) -> DispatchOutcome {
        if self.is_default_prevented() || other.is_default_prevented() {
            Self::DefaultPrevented
        } else {
            Self::Proceed
        }
    }
}

impl From<HandlerResult> for DispatchOutcome {
    fn from(value: HandlerResult) -> Self {
        match value {
            HandlerResult::Continue => Self::Proceed,
            HandlerResult::PreventDefault => Self::DefaultPrevented,
        }
    }
}

/// The result of hit testing a point against the document's boxes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitResult {
    /// The node_id of the node identified as the hit target
    pub node_id: usize,
    /// The x coordinate of the hit within the hit target's border-box
    pub x: f32,
    /// The y coordinate of the hit within the hit target's border-box
    pub y: f32,
}
