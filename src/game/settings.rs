//! In-device configuration menu: a cursor over a wrapping list of setting
//! entries, edited with the two team buttons while the machine is in the
//! settings state. Values live in memory until the exit entry commits them
//! to the settings store.

use tracing::{error, info};

use crate::persistence::{SettingsStore, StorageError};

/// Named objective locations this node can be configured to represent.
///
/// `None` is the load-failure sentinel and is never offered while cycling;
/// `Alpha` is the recovery default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ControlPoint {
    None,
    Alpha,
    Bravo,
    Charlie,
    Delta,
    Echo,
}

impl ControlPoint {
    pub const RECOVERY_DEFAULT: ControlPoint = ControlPoint::Alpha;

    /// Next selectable control point, wrapping and skipping the sentinel.
    pub fn cycle(self) -> Self {
        match self {
            ControlPoint::None => ControlPoint::Alpha,
            ControlPoint::Alpha => ControlPoint::Bravo,
            ControlPoint::Bravo => ControlPoint::Charlie,
            ControlPoint::Charlie => ControlPoint::Delta,
            ControlPoint::Delta => ControlPoint::Echo,
            ControlPoint::Echo => ControlPoint::Alpha,
        }
    }

    /// Short label that fits on a 4-digit display.
    pub fn label(self) -> &'static str {
        match self {
            ControlPoint::None => "NONE",
            ControlPoint::Alpha => "A",
            ControlPoint::Bravo => "B",
            ControlPoint::Charlie => "C",
            ControlPoint::Delta => "D",
            ControlPoint::Echo => "E",
        }
    }
}

/// Entries of the settings menu, in cursor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    ControlPoint,
    Beep,
    Exit,
}

impl SettingKind {
    pub fn next(self) -> Self {
        match self {
            SettingKind::ControlPoint => SettingKind::Beep,
            SettingKind::Beep => SettingKind::Exit,
            SettingKind::Exit => SettingKind::ControlPoint,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SettingKind::ControlPoint => "CP",
            SettingKind::Beep => "BEEP",
            SettingKind::Exit => "EXIT",
        }
    }
}

/// The configurable values themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Setting {
    pub control_point: ControlPoint,
    pub beep: bool,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            control_point: ControlPoint::RECOVERY_DEFAULT,
            beep: true,
        }
    }
}

/// Cursor plus in-memory values. Load/save go through the store; a failed
/// load falls back to defaults instead of blocking entry into the menu.
#[derive(Debug)]
pub struct SettingsMenu {
    cursor: SettingKind,
    value: Setting,
}

impl Default for SettingsMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsMenu {
    pub fn new() -> Self {
        Self {
            cursor: SettingKind::ControlPoint,
            value: Setting::default(),
        }
    }

    /// Reset the cursor and reload persisted values, substituting defaults
    /// for anything the store cannot produce.
    pub fn enter(&mut self, store: &dyn SettingsStore) {
        self.cursor = SettingKind::ControlPoint;

        match store.load_control_point() {
            Ok(control_point) => self.value.control_point = control_point,
            Err(e) => {
                error!(
                    "Failed to load control point ({e}), falling back to {:?}",
                    ControlPoint::RECOVERY_DEFAULT
                );
                self.value.control_point = ControlPoint::RECOVERY_DEFAULT;
            }
        }

        match store.load_beep() {
            Ok(beep) => self.value.beep = beep,
            Err(e) => {
                error!("Failed to load beep flag ({e}), falling back to ON");
                self.value.beep = true;
            }
        }

        info!("Settings loaded: {:?}", self.value);
    }

    /// Move the cursor to the next entry, wrapping past the exit entry.
    pub fn advance(&mut self) -> SettingKind {
        self.cursor = self.cursor.next();
        info!("Current setting: {:?}", self.cursor);
        self.cursor
    }

    /// Mutate the value under the cursor: the control point cycles, the
    /// beep flag toggles. The exit entry has no in-memory effect; commit
    /// handling belongs to the caller.
    pub fn modify_current(&mut self) {
        match self.cursor {
            SettingKind::ControlPoint => {
                self.value.control_point = self.value.control_point.cycle();
                info!("Control point now {:?}", self.value.control_point);
            }
            SettingKind::Beep => {
                self.value.beep = !self.value.beep;
                info!("Beep now {}", beep_label(self.value.beep));
            }
            SettingKind::Exit => {}
        }
    }

    /// Write both values back through the store.
    pub fn save(&self, store: &dyn SettingsStore) -> Result<(), StorageError> {
        store.save_control_point(self.value.control_point)?;
        store.save_beep(self.value.beep)?;
        info!("Settings saved: {:?}", self.value);
        Ok(())
    }

    pub fn cursor(&self) -> SettingKind {
        self.cursor
    }

    pub fn value(&self) -> Setting {
        self.value
    }

    /// Display label for the value under the cursor.
    pub fn current_value_label(&self) -> &'static str {
        match self.cursor {
            SettingKind::ControlPoint => self.value.control_point.label(),
            SettingKind::Beep => beep_label(self.value.beep),
            SettingKind::Exit => "EXIT",
        }
    }
}

pub fn beep_label(beep: bool) -> &'static str {
    if beep {
        "ON"
    } else {
        "OFF"
    }
}
