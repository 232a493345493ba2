//! Text box placement suggestions for caption templates.
//!
//! Coordinates are percentages of the template image. Well-known
//! templates have hand-tuned layouts; anything else gets a layout picked
//! from its aspect ratio.

use serde::Serialize;
use tracing::warn;

use crate::caption::{ImgflipClient, Template};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPosition {
    pub x: u8,
    pub y: u8,
    pub width: u8,
    pub height: u8,
    pub score: f32,
    pub reason: &'static str,
}

fn pos(x: u8, y: u8, width: u8, height: u8, score: f32, reason: &'static str) -> TextPosition {
    TextPosition {
        x,
        y,
        width,
        height,
        score,
        reason,
    }
}

/// What is known about a template that has no hand-tuned layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemplateLookup {
    Found { width: u32, height: u32 },
    Unknown,
    /// The catalogue could not be fetched
    Unavailable,
}

/// Hand-tuned layouts for popular templates.
pub fn known_positions(template_id: &str) -> Option<Vec<TextPosition>> {
    let positions = match template_id {
        // Drake
        "181913649" => vec![
            pos(55, 15, 40, 25, 0.95, "Top right text area for \"No\" option"),
            pos(55, 55, 40, 25, 0.95, "Bottom right text area for \"Yes\" option"),
        ],
        // Distracted boyfriend
        "112126428" => vec![
            pos(65, 10, 30, 15, 0.9, "Other woman label"),
            pos(25, 75, 25, 15, 0.9, "Boyfriend label"),
            pos(5, 60, 25, 15, 0.85, "Girlfriend label"),
        ],
        // Two buttons
        "87743020" => vec![
            pos(15, 25, 25, 15, 0.9, "Left button text"),
            pos(60, 25, 25, 15, 0.9, "Right button text"),
            pos(35, 75, 30, 15, 0.8, "Person reaction"),
        ],
        // Expanding brain
        "93895088" => vec![
            pos(55, 12, 40, 15, 0.9, "Level 1 text"),
            pos(55, 32, 40, 15, 0.9, "Level 2 text"),
            pos(55, 52, 40, 15, 0.9, "Level 3 text"),
            pos(55, 72, 40, 15, 0.9, "Level 4 text"),
        ],
        // Gru's plan
        "131940431" => vec![
            pos(20, 15, 35, 15, 0.85, "Panel 1: The plan"),
            pos(65, 15, 30, 15, 0.85, "Panel 2: Execute plan"),
            pos(20, 60, 35, 15, 0.85, "Panel 3: Unexpected result"),
            pos(65, 60, 30, 15, 0.85, "Panel 4: Gru reaction"),
        ],
        // Running away balloon
        "131087935" => vec![
            pos(15, 70, 20, 12, 0.8, "Person label"),
            pos(25, 10, 15, 10, 0.9, "Balloon 1"),
            pos(45, 8, 15, 10, 0.9, "Balloon 2"),
            pos(65, 12, 15, 10, 0.9, "Balloon 3"),
            pos(85, 15, 15, 10, 0.85, "Balloon 4"),
        ],
        "55311130" => vec![
            pos(25, 75, 50, 15, 0.9, "Bottom text for situation"),
            pos(30, 10, 40, 12, 0.8, "Top text for context"),
        ],
        // Woman yelling at cat
        "188390779" => vec![
            pos(15, 15, 30, 15, 0.9, "Woman's argument"),
            pos(65, 15, 30, 15, 0.9, "Cat's response"),
        ],
        // Surprised Pikachu
        "155067746" => vec![
            pos(25, 10, 50, 15, 0.9, "Setup text"),
            pos(25, 75, 50, 15, 0.9, "Surprised reaction context"),
        ],
        // Change my mind
        "129242436" => vec![
            pos(35, 25, 45, 20, 0.95, "Sign text with controversial statement"),
            pos(15, 75, 30, 12, 0.7, "Optional context text"),
        ],
        _ => return None,
    };
    Some(positions)
}

/// Layout chosen from catalogue information alone.
pub fn heuristic_positions(lookup: TemplateLookup) -> Vec<TextPosition> {
    match lookup {
        TemplateLookup::Found { width, height } if height > 0 => {
            let aspect = width as f32 / height as f32;
            if aspect > 1.5 {
                vec![
                    pos(10, 15, 35, 20, 0.8, "Left side text"),
                    pos(55, 15, 35, 20, 0.8, "Right side text"),
                ]
            } else if aspect < 0.8 {
                vec![
                    pos(20, 10, 60, 15, 0.8, "Top text"),
                    pos(20, 45, 60, 15, 0.75, "Middle text"),
                    pos(20, 80, 60, 15, 0.8, "Bottom text"),
                ]
            } else {
                vec![
                    pos(15, 10, 70, 15, 0.85, "Top text area"),
                    pos(15, 75, 70, 15, 0.85, "Bottom text area"),
                ]
            }
        }
        TemplateLookup::Found { .. } | TemplateLookup::Unknown => vec![
            pos(10, 10, 80, 15, 0.7, "Top text area"),
            pos(10, 75, 80, 15, 0.7, "Bottom text area"),
        ],
        TemplateLookup::Unavailable => vec![
            pos(10, 10, 80, 15, 0.6, "Fallback top text"),
            pos(10, 75, 80, 15, 0.6, "Fallback bottom text"),
        ],
    }
}

pub fn lookup_in(catalogue: &[Template], template_id: &str) -> TemplateLookup {
    catalogue
        .iter()
        .find(|t| t.id == template_id)
        .map_or(TemplateLookup::Unknown, |t| TemplateLookup::Found {
            width: t.width,
            height: t.height,
        })
}

/// Known layout if there is one, otherwise a heuristic from the catalogue.
pub async fn suggest_positions(client: &ImgflipClient, template_id: &str) -> Vec<TextPosition> {
    if let Some(positions) = known_positions(template_id) {
        return positions;
    }

    let lookup = match client.templates().await {
        Ok(catalogue) => lookup_in(&catalogue, template_id),
        Err(e) => {
            warn!("Error fetching template info: {}", e);
            TemplateLookup::Unavailable
        }
    };

    heuristic_positions(lookup)
}
