//! User-controlled doodle state: doodle mode and the active color.
//!
//! UI controls mutate this only through its setters; nothing else in the
//! layer reads ambient globals.

use crate::stroke::InkColor;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// The selectable ink colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette {
    swatches: Vec<InkColor>,
}

impl Default for Palette {
    fn default() -> Self {
        let swatches = [
            Color::from_rgba8(0, 0, 0, 255),
            Color::from_rgba8(239, 68, 68, 255),   // Red
            Color::from_rgba8(59, 130, 246, 255),  // Blue
            Color::from_rgba8(34, 197, 94, 255),   // Green
            Color::from_rgba8(234, 179, 8, 255),   // Yellow
            Color::from_rgba8(168, 85, 247, 255),  // Purple
        ];
        Self {
            swatches: swatches.into_iter().map(InkColor::from).collect(),
        }
    }
}

impl Palette {
    pub fn new(swatches: Vec<InkColor>) -> Self {
        Self { swatches }
    }

    pub fn swatches(&self) -> &[InkColor] {
        &self.swatches
    }

    pub fn get(&self, index: usize) -> Option<&InkColor> {
        self.swatches.get(index)
    }

    /// Index of a color in the palette.
    pub fn position(&self, color: &InkColor) -> Option<usize> {
        self.swatches.iter().position(|c| c == color)
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}

/// Doodle mode flag plus the color used for the next stroke.
#[derive(Debug, Clone)]
pub struct DoodleSession {
    doodle_mode: bool,
    color: InkColor,
    palette: Palette,
    /// Index of the selected swatch, if the color came from the palette.
    selected: Option<usize>,
}

impl DoodleSession {
    /// Start with doodle mode off and the first swatch selected.
    pub fn new(palette: Palette) -> Self {
        let color = palette.get(0).cloned().unwrap_or_default();
        let selected = (!palette.is_empty()).then_some(0);
        Self {
            doodle_mode: false,
            color,
            palette,
            selected,
        }
    }

    pub fn is_doodle_mode(&self) -> bool {
        self.doodle_mode
    }

    pub fn set_doodle_mode(&mut self, active: bool) {
        self.doodle_mode = active;
    }

    /// Flip doodle mode, returning the new value.
    pub fn toggle_doodle_mode(&mut self) -> bool {
        self.doodle_mode = !self.doodle_mode;
        self.doodle_mode
    }

    pub fn color(&self) -> &InkColor {
        &self.color
    }

    /// Set the active color. Takes effect from the next stroke.
    pub fn set_color(&mut self, color: InkColor) {
        self.selected = self.palette.position(&color);
        self.color = color;
    }

    /// Select a palette swatch by index. Returns `false` if out of range.
    pub fn select_swatch(&mut self, index: usize) -> bool {
        let Some(color) = self.palette.get(index).cloned() else {
            return false;
        };
        self.color = color;
        self.selected = Some(index);
        true
    }

    pub fn selected_swatch(&self) -> Option<usize> {
        self.selected
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl Default for DoodleSession {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}
