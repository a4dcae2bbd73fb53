//! Interfaces for the collaborators the router drives.
//!
//! The dispatch core never touches a concrete widget or socket. Every
//! surface it updates and the connection it queries are injected trait
//! objects, so the whole decode/route path runs against stubs in tests.

use serde_json::Value;
use thiserror::Error;

/// Error raised by an individual key handler.
///
/// Handler failures never propagate past the routing loop; the engine
/// logs them with the offending key and value and moves on.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The payload did not match the shape the handler expects.
    #[error("payload shape mismatch: {0}")]
    Payload(#[from] serde_json::Error),
    /// Any other handler-specific failure.
    #[error("{0}")]
    Other(String),
}

/// Result type for key handlers.
pub type HandlerResult = Result<(), HandlerError>;

/// Display style for text shown in the scene window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    /// Ordinary message text.
    Plain,
    /// Tagged game output.
    Out,
    /// Error text.
    Err,
    /// System notice.
    Sys,
    /// Prompt update.
    Prompt,
    /// Debug output.
    Debug,
}

/// The scrolling scene text window.
pub trait SceneWindow: Send + Sync {
    /// Append a line of game text.
    fn display_text(&self, text: &str, style: TextStyle);
    /// Replace the current scene description (room look result).
    fn set_scene(&self, scene: &Value);
}

/// The top-level UI shell: popups, status display, lifecycle
/// notifications. Also the alert surface used for initialization
/// failures.
pub trait UiShell: Send + Sync {
    /// Show a user-visible modal alert.
    fn popup_alert(&self, message: &str);
    /// Show a titled popup message.
    fn popup_message(&self, title: &str, content: &str);
    /// An object entered the current room.
    fn object_moved_in(&self, objects: &Value);
    /// An object left the current room.
    fn object_moved_out(&self, objects: &Value);
    /// Another player came online.
    fn player_online(&self, player: &Value);
    /// Another player went offline.
    fn player_offline(&self, player: &Value);
    /// Update the character status display.
    fn set_status(&self, status: &Value);
    /// Start a skill cooldown (`cd`/`gcd` are absolute timestamps).
    fn set_skill_cooldown(&self, skill: &str, cd: f64, gcd: f64);
    /// Play a skill cast effect.
    fn set_skill_cast(&self, cast: &Value);
    /// Show an experience gain.
    fn show_exp_gain(&self, exp: i64);
    /// Show the result of picking up objects.
    fn show_loot(&self, result: &Value);
    /// Open the combat window for a fight the character joined.
    fn show_combat(&self, combat: &Value);
    /// The account logged in.
    fn on_login(&self, info: &Value);
    /// The account logged out.
    fn on_logout(&self, info: &Value);
    /// The account took control of a character.
    fn on_puppet(&self, info: &Value);
    /// The account released its character.
    fn on_unpuppet(&self, info: &Value);
    /// The password change completed; close the dialog.
    fn close_password_window(&self);
    /// Whether the combat window is currently shown. Consulted to keep
    /// dialogue popups from covering a fight.
    fn is_combat_visible(&self) -> bool;
    /// The connection came up.
    fn on_connection_open(&self);
    /// The connection went away.
    fn on_connection_close(&self);
}

/// Login screen.
pub trait LoginWindow: Send + Sync {
    /// Set the game name shown on the login screen.
    fn set_game_name(&self, name: &str);
    /// Set the connection welcome screen content.
    fn set_connection_screen(&self, screen: &Value);
}

/// Inventory panel.
pub trait InventoryWindow: Send + Sync {
    /// Replace the inventory listing.
    fn set_inventory(&self, items: &Value);
    /// Show one object's details inside the panel.
    fn show_object(&self, object: &Value);
}

/// Skills panel.
pub trait SkillsWindow: Send + Sync {
    /// Replace the skill listing.
    fn set_skills(&self, skills: &Value);
    /// Show one skill's details inside the panel.
    fn show_skill(&self, skill: &Value);
}

/// Quests panel.
pub trait QuestsWindow: Send + Sync {
    /// Replace the quest listing.
    fn set_quests(&self, quests: &Value);
    /// Show one quest's details inside the panel.
    fn show_quest(&self, quest: &Value);
}

/// Character sheet: equipment slots and worn items.
pub trait CharDataWindow: Send + Sync {
    /// Set the equipment slot layout.
    fn set_equipment_positions(&self, positions: &Value);
    /// Set the currently worn equipment.
    fn set_equipments(&self, equipments: &Value);
}

/// Combat window.
pub trait CombatWindow: Send + Sync {
    /// Start or refresh a fight.
    fn set_combat(&self, desc: &str, timeout: u32, characters: &Value);
    /// Set the available combat commands.
    fn set_commands(&self, commands: &Value);
    /// The fight ended.
    fn finish(&self, result: &Value);
}

/// Character selection screen.
pub trait CharSelectWindow: Send + Sync {
    /// Replace the list of the account's characters.
    fn set_characters(&self, characters: &Value);
    /// Set the maximum number of characters the account may create.
    fn set_max_number(&self, max: u32);
}

/// Character creation screen.
pub trait NewCharWindow: Send + Sync {
    /// A new character was created.
    fn on_character_created(&self, info: &Value);
}

/// Chat channels and conversations.
pub trait ConversationWindow: Send + Sync {
    /// Replace the list of available channels.
    fn set_channels(&self, channels: &Value);
    /// Append one conversation message.
    fn add_message(&self, message: &Value);
}

/// Client-side map knowledge store.
pub trait MapStore: Send + Sync {
    /// The character moved.
    fn set_current_location(&self, location: &Value);
    /// Reveal a newly discovered map area.
    fn reveal_map(&self, area: &Value);
    /// Replace the full revealed-map data.
    fn set_map_data(&self, data: &Value);
}

/// Main game window chrome (shop overlay etc.).
pub trait GameWindow: Send + Sync {
    /// Open a shop.
    fn show_shop(&self, shop: &Value);
}

/// Modal object inspection popup, the fallback when an object look
/// result carries no recognized context tag.
pub trait ObjectPopup: Send + Sync {
    /// Show one object's details.
    fn show_object(&self, object: &Value);
}

/// Modal dialogue popup.
pub trait DialoguePopup: Send + Sync {
    /// Load dialogue sentences.
    fn set_dialogue(&self, dialogue: &Value);
    /// Whether any sentence is loaded.
    fn has_dialogue(&self) -> bool;
    /// Show the popup.
    fn show(&self);
}

/// Static key → string lookup for user-facing labels. Implementations
/// live with the UI layer.
pub trait Localizer: Send + Sync {
    /// Translate a label key, returning the key itself when unknown.
    fn tr(&self, key: &str) -> String;
}

/// Connection state as reported by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Connected and usable.
    Open,
    /// Not connected.
    Closed,
}

/// Outbound send failure.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection is down or was never established.
    #[error("transport is not connected")]
    NotConnected,
}

/// The persistent connection, as the router sees it.
///
/// Connect and reconnect policy live with the implementation; the
/// router only queries state and queues outbound commands.
pub trait Transport: Send + Sync {
    /// Current connection state.
    fn state(&self) -> ConnectionState;

    /// Queue a command line for the server. Framing is the
    /// implementation's concern.
    ///
    /// # Errors
    /// Returns an error when the connection is down.
    fn send_command(&self, command: &str) -> Result<(), SendError>;
}
