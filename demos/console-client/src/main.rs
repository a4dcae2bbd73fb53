//! Line-oriented console demo for the Mudlink client.
//!
//! Run with: cargo run -p console-client-demo -- ws://127.0.0.1:8001/websocket
//!
//! Connects to a game server, routes every inbound message through the
//! dispatch engine into stdout-printing collaborators, and forwards
//! stdin lines as player commands.

use std::sync::Arc;

use anyhow::Context as _;
use mudlink_core::traits::{
    CharDataWindow, CharSelectWindow, CombatWindow, ConversationWindow, DialoguePopup, GameWindow,
    InventoryWindow, Localizer, LoginWindow, MapStore, NewCharWindow, ObjectPopup, QuestsWindow,
    SceneWindow, SkillsWindow, TextStyle, Transport, UiShell,
};
use mudlink_dispatch::{DispatchEngine, UiHandles, build_table};
use mudlink_transport::{TransportAdapter, WsClient};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prints every routed update to stdout.
struct ConsoleUi;

fn brief(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

impl SceneWindow for ConsoleUi {
    fn display_text(&self, text: &str, style: TextStyle) {
        let prefix = match style {
            TextStyle::Plain => "",
            TextStyle::Out => "[out] ",
            TextStyle::Err => "[err] ",
            TextStyle::Sys => "[sys] ",
            TextStyle::Prompt => "[prompt] ",
            TextStyle::Debug => "[debug] ",
        };
        println!("{prefix}{text}");
    }

    fn set_scene(&self, scene: &Value) {
        let name = scene.get("name").map_or_else(String::new, brief);
        let desc = scene.get("desc").map_or_else(String::new, brief);
        println!("== {name} ==");
        if !desc.is_empty() {
            println!("{desc}");
        }
    }
}

impl UiShell for ConsoleUi {
    fn popup_alert(&self, message: &str) {
        println!("!! {message}");
    }
    fn popup_message(&self, title: &str, content: &str) {
        println!("[{title}] {content}");
    }
    fn object_moved_in(&self, objects: &Value) {
        println!("* arrived: {}", brief(objects));
    }
    fn object_moved_out(&self, objects: &Value) {
        println!("* left: {}", brief(objects));
    }
    fn player_online(&self, player: &Value) {
        println!("* online: {}", brief(player));
    }
    fn player_offline(&self, player: &Value) {
        println!("* offline: {}", brief(player));
    }
    fn set_status(&self, status: &Value) {
        println!("[status] {status}");
    }
    fn set_skill_cooldown(&self, skill: &str, cd: f64, gcd: f64) {
        println!("[cooldown] {skill} cd={cd} gcd={gcd}");
    }
    fn set_skill_cast(&self, cast: &Value) {
        println!("[cast] {}", brief(cast));
    }
    fn show_exp_gain(&self, exp: i64) {
        println!("* you gain {exp} exp");
    }
    fn show_loot(&self, result: &Value) {
        println!("* you get: {}", brief(result));
    }
    fn show_combat(&self, combat: &Value) {
        println!("* combat begins: {}", brief(combat));
    }
    fn on_login(&self, _info: &Value) {
        println!("* logged in");
    }
    fn on_logout(&self, _info: &Value) {
        println!("* logged out");
    }
    fn on_puppet(&self, info: &Value) {
        println!("* now playing: {}", brief(info));
    }
    fn on_unpuppet(&self, _info: &Value) {
        println!("* left character");
    }
    fn close_password_window(&self) {
        println!("* password changed");
    }
    fn is_combat_visible(&self) -> bool {
        false
    }
    fn on_connection_open(&self) {
        println!("-- connected --");
    }
    fn on_connection_close(&self) {
        println!("-- connection closed --");
    }
}

impl LoginWindow for ConsoleUi {
    fn set_game_name(&self, name: &str) {
        println!("== {name} ==");
    }
    fn set_connection_screen(&self, screen: &Value) {
        println!("{}", brief(screen));
    }
}

impl InventoryWindow for ConsoleUi {
    fn set_inventory(&self, items: &Value) {
        println!("[inventory] {items}");
    }
    fn show_object(&self, object: &Value) {
        println!("[inventory] {}", brief(object));
    }
}

impl SkillsWindow for ConsoleUi {
    fn set_skills(&self, skills: &Value) {
        println!("[skills] {skills}");
    }
    fn show_skill(&self, skill: &Value) {
        println!("[skills] {}", brief(skill));
    }
}

impl QuestsWindow for ConsoleUi {
    fn set_quests(&self, quests: &Value) {
        println!("[quests] {quests}");
    }
    fn show_quest(&self, quest: &Value) {
        println!("[quests] {}", brief(quest));
    }
}

impl CharDataWindow for ConsoleUi {
    fn set_equipment_positions(&self, positions: &Value) {
        println!("[equipment slots] {positions}");
    }
    fn set_equipments(&self, equipments: &Value) {
        println!("[equipment] {equipments}");
    }
}

impl CombatWindow for ConsoleUi {
    fn set_combat(&self, desc: &str, timeout: u32, characters: &Value) {
        println!("[combat] {desc} (timeout {timeout}s) vs {characters}");
    }
    fn set_commands(&self, commands: &Value) {
        println!("[combat commands] {commands}");
    }
    fn finish(&self, result: &Value) {
        println!("[combat over] {result}");
    }
}

impl CharSelectWindow for ConsoleUi {
    fn set_characters(&self, characters: &Value) {
        println!("[characters] {characters}");
    }
    fn set_max_number(&self, max: u32) {
        println!("[characters] up to {max}");
    }
}

impl NewCharWindow for ConsoleUi {
    fn on_character_created(&self, info: &Value) {
        println!("* character created: {}", brief(info));
    }
}

impl ConversationWindow for ConsoleUi {
    fn set_channels(&self, channels: &Value) {
        println!("[channels] {channels}");
    }
    fn add_message(&self, message: &Value) {
        println!("[chat] {}", brief(message));
    }
}

impl MapStore for ConsoleUi {
    fn set_current_location(&self, location: &Value) {
        println!("[map] at {}", brief(location));
    }
    fn reveal_map(&self, area: &Value) {
        println!("[map] revealed {}", brief(area));
    }
    fn set_map_data(&self, _data: &Value) {
        println!("[map] loaded");
    }
}

impl GameWindow for ConsoleUi {
    fn show_shop(&self, shop: &Value) {
        println!("[shop] {shop}");
    }
}

impl ObjectPopup for ConsoleUi {
    fn show_object(&self, object: &Value) {
        println!("[look] {}", brief(object));
    }
}

impl DialoguePopup for ConsoleUi {
    fn set_dialogue(&self, dialogue: &Value) {
        println!("[dialogue] {}", brief(dialogue));
    }
    fn has_dialogue(&self) -> bool {
        false
    }
    fn show(&self) {}
}

impl Localizer for ConsoleUi {
    fn tr(&self, key: &str) -> String {
        key.to_string()
    }
}

fn ui_handles(ui: &Arc<ConsoleUi>) -> UiHandles {
    UiHandles {
        shell: Arc::clone(ui) as _,
        scene: Arc::clone(ui) as _,
        login: Arc::clone(ui) as _,
        inventory: Arc::clone(ui) as _,
        skills: Arc::clone(ui) as _,
        quests: Arc::clone(ui) as _,
        char_data: Arc::clone(ui) as _,
        combat: Arc::clone(ui) as _,
        char_select: Arc::clone(ui) as _,
        new_char: Arc::clone(ui) as _,
        conversation: Arc::clone(ui) as _,
        map: Arc::clone(ui) as _,
        game: Arc::clone(ui) as _,
        object_popup: Arc::clone(ui) as _,
        dialogue_popup: Arc::clone(ui) as _,
        lang: Arc::clone(ui) as _,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "console_client_demo=info,mudlink_transport=info".into()),
        )
        .init();

    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ws://127.0.0.1:8001/websocket".to_string());

    let ui = Arc::new(ConsoleUi);
    let engine = Arc::new(DispatchEngine::new(build_table(&ui_handles(&ui))));
    let client = Arc::new(WsClient::new());

    // The socket delivers events from its own task; queue them so the
    // main loop dispatches one at a time, in arrival order.
    let (event_tx, mut event_rx) = tokio::sync::mpsc::unbounded_channel();
    client
        .connect(&url, move |event| {
            let _ = event_tx.send(event);
        })
        .await
        .with_context(|| format!("connecting to {url}"))?;

    let adapter = TransportAdapter::start(
        Arc::clone(&client) as Arc<dyn Transport>,
        engine,
        Arc::clone(&ui) as Arc<dyn UiShell>,
        Arc::clone(&ui) as Arc<dyn Localizer>,
    )?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = event_rx.recv() => match event {
                Some(event) => adapter.on_event(event),
                None => break,
            },
            line = lines.next_line() => match line? {
                Some(line) => {
                    let command = line.trim();
                    if command.is_empty() {
                        continue;
                    }
                    if let Err(e) = client.send_command(command) {
                        tracing::warn!("command not sent: {e}");
                    }
                }
                None => break,
            },
        }
    }

    Ok(())
}
