//! Editor styling and the colour palette offered by the node toolbox.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Swatches shown in the toolbox colour picker.
pub const COLOR_PALETTE: [Color32; 10] = [
    Color32::from_rgb(0xff, 0x69, 0x00),
    Color32::from_rgb(0xfc, 0xb9, 0x00),
    Color32::from_rgb(0x7b, 0xdc, 0xb5),
    Color32::from_rgb(0x00, 0xd0, 0x84),
    Color32::from_rgb(0x8e, 0xd1, 0xfc),
    Color32::from_rgb(0x06, 0x93, 0xe3),
    Color32::from_rgb(0xab, 0xb8, 0xc3),
    Color32::from_rgb(0xeb, 0x14, 0x4c),
    Color32::from_rgb(0xf7, 0x8d, 0xa7),
    Color32::from_rgb(0x99, 0x00, 0xef),
];

/// Visual styling configuration for the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorStyle {
    pub canvas_background: Color32,
    pub grid_dot: Color32,
    pub node_border: Color32,
    pub selected_stroke: Color32,
    /// Outline of nodes that can receive the connection being dragged.
    pub target_highlight: Color32,
    /// Outline of nodes explained by a selected magic node.
    pub explained_highlight: Color32,
    pub temporary_stroke: Color32,
    pub handle: Color32,
    pub tag_background: Color32,
    pub tag_text: Color32,
    pub edge: Color32,
    pub selected_edge: Color32,
    pub magic_background: Color32,
    pub font_size: f32,
}

impl Default for EditorStyle {
    fn default() -> Self {
        Self {
            canvas_background: Color32::from_gray(245),
            grid_dot: Color32::from_gray(200),
            node_border: Color32::from_gray(190),
            selected_stroke: Color32::from_rgb(0x06, 0x93, 0xe3),
            target_highlight: Color32::from_rgb(0x00, 0xd0, 0x84),
            explained_highlight: Color32::from_rgb(0x99, 0x00, 0xef),
            temporary_stroke: Color32::from_gray(120),
            handle: Color32::from_gray(90),
            tag_background: Color32::from_rgb(0x33, 0x33, 0x33),
            tag_text: Color32::WHITE,
            edge: Color32::from_gray(140),
            selected_edge: Color32::from_rgb(0x06, 0x93, 0xe3),
            magic_background: Color32::from_rgb(0xf4, 0xee, 0xff),
            font_size: 14.0,
        }
    }
}
