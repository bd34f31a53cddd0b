use serde::{Deserialize, Serialize};

use crate::game::PlayerId;

/// Identity of a player seated in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub color: PlayerColor,
}

impl Player {
    /// Default identity for the zero-based seat `slot`: sequential id,
    /// "Player N" name, palette color by slot.
    pub fn for_slot(slot: usize) -> Self {
        Self {
            id: slot as PlayerId + 1,
            display_name: format!("Player {}", slot + 1),
            color: PlayerColor::for_slot(slot),
        }
    }
}

/// Trail and head color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for PlayerColor {
    fn default() -> Self {
        Self::PALETTE[0]
    }
}

impl PlayerColor {
    /// Seat colors, chosen to stay distinct on a dark arena.
    pub const PALETTE: &[PlayerColor] = &[
        PlayerColor {
            r: 255,
            g: 64,
            b: 64,
        }, // Red
        PlayerColor {
            r: 64,
            g: 224,
            b: 255,
        }, // Cyan
        PlayerColor {
            r: 255,
            g: 221,
            b: 51,
        }, // Yellow
        PlayerColor {
            r: 102,
            g: 255,
            b: 102,
        }, // Green
        PlayerColor {
            r: 204,
            g: 102,
            b: 255,
        }, // Violet
        PlayerColor {
            r: 255,
            g: 153,
            b: 51,
        }, // Orange
        PlayerColor {
            r: 255,
            g: 102,
            b: 204,
        }, // Pink
        PlayerColor {
            r: 240,
            g: 240,
            b: 240,
        }, // White
    ];

    pub fn for_slot(slot: usize) -> Self {
        Self::PALETTE[slot % Self::PALETTE.len()]
    }
}
