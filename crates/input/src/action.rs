use std::collections::HashSet;

/// A control the viewer responds to, independent of the physical key bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Move along the look direction.
    Forward,
    /// Move against the look direction.
    Back,
    StrafeLeft,
    StrafeRight,
    /// Fly straight up.
    Ascend,
    /// Fly straight down, stopping on solid ground.
    Descend,
    /// Close the window.
    Exit,
}

/// Controls currently held down.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Control>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, control: Control, pressed: bool) {
        if pressed {
            self.held.insert(control);
        } else {
            self.held.remove(&control);
        }
    }

    pub fn press(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn release(&mut self, control: Control) {
        self.set(control, false);
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.held.clear();
    }
}
