//! Default key bindings: every message key the game server emits, wired
//! to the injected UI collaborators.

use std::sync::Arc;

use mudlink_core::traits::{
    CharDataWindow, CharSelectWindow, CombatWindow, ConversationWindow, DialoguePopup, GameWindow,
    InventoryWindow, Localizer, LoginWindow, MapStore, NewCharWindow, ObjectPopup, QuestsWindow,
    SceneWindow, SkillsWindow, TextStyle, UiShell,
};
use serde::Deserialize;
use serde_json::Value;

use crate::registry::HandlerTable;

/// The UI collaborator bundle handed to the binding layer at startup.
#[derive(Clone)]
pub struct UiHandles {
    /// Top-level shell: popups, status, lifecycle.
    pub shell: Arc<dyn UiShell>,
    /// Scrolling scene text.
    pub scene: Arc<dyn SceneWindow>,
    /// Login screen.
    pub login: Arc<dyn LoginWindow>,
    /// Inventory panel.
    pub inventory: Arc<dyn InventoryWindow>,
    /// Skills panel.
    pub skills: Arc<dyn SkillsWindow>,
    /// Quests panel.
    pub quests: Arc<dyn QuestsWindow>,
    /// Character sheet.
    pub char_data: Arc<dyn CharDataWindow>,
    /// Combat window.
    pub combat: Arc<dyn CombatWindow>,
    /// Character selection screen.
    pub char_select: Arc<dyn CharSelectWindow>,
    /// Character creation screen.
    pub new_char: Arc<dyn NewCharWindow>,
    /// Chat channels.
    pub conversation: Arc<dyn ConversationWindow>,
    /// Map knowledge store.
    pub map: Arc<dyn MapStore>,
    /// Game window chrome.
    pub game: Arc<dyn GameWindow>,
    /// Object inspection popup.
    pub object_popup: Arc<dyn ObjectPopup>,
    /// Dialogue popup.
    pub dialogue_popup: Arc<dyn DialoguePopup>,
    /// Label lookup.
    pub lang: Arc<dyn Localizer>,
}

/// Combat setup pushed when a fight starts or the client rejoins one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CombatInfo {
    desc: String,
    timeout: u32,
    characters: Value,
}

/// Cooldown timestamps for one skill cast.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SkillCooldown {
    skill: String,
    cd: f64,
    gcd: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ExpGain {
    exp: i64,
}

/// Best-effort text for display keys; the wire does not guarantee
/// strings.
fn display_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Build the full handler table over the given collaborators.
///
/// Unknown keys fall back to plain scene text, matching the server's
/// habit of inventing keys before the client learns them.
#[must_use]
pub fn build_table(ui: &UiHandles) -> HandlerTable {
    let scene = Arc::clone(&ui.scene);
    let mut table = HandlerTable::new(Box::new(move |value| {
        scene.display_text(&display_text(value), TextStyle::Plain);
        Ok(())
    }));

    register_text(&mut table, ui);
    register_account(&mut table, ui);
    register_scene(&mut table, ui);
    register_character(&mut table, ui);
    register_combat(&mut table, ui);
    register_social(&mut table, ui);
    register_map(&mut table, ui);

    table
}

fn register_text(table: &mut HandlerTable, ui: &UiHandles) {
    let scene = Arc::clone(&ui.scene);
    table.register("msg", move |value, _| {
        scene.display_text(&display_text(value), TextStyle::Plain);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    let lang = Arc::clone(&ui.lang);
    table.register("alert", move |value, _| {
        shell.popup_message(&lang.tr("Alert"), &display_text(value));
        Ok(())
    });

    for (key, style) in [
        ("out", TextStyle::Out),
        ("err", TextStyle::Err),
        ("sys", TextStyle::Sys),
        ("debug", TextStyle::Debug),
        ("prompt", TextStyle::Prompt),
    ] {
        let scene = Arc::clone(&ui.scene);
        table.register(key, move |value, _| {
            scene.display_text(&display_text(value), style);
            Ok(())
        });
    }
}

fn register_account(table: &mut HandlerTable, ui: &UiHandles) {
    let login = Arc::clone(&ui.login);
    table.register("game_name", move |value, _| {
        let name: String = serde_json::from_value(value.clone())?;
        login.set_game_name(&name);
        Ok(())
    });

    let login = Arc::clone(&ui.login);
    table.register("conn_screen", move |value, _| {
        login.set_connection_screen(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("login", move |value, _| {
        shell.on_login(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("logout", move |value, _| {
        shell.on_logout(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("puppet", move |value, _| {
        shell.on_puppet(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("unpuppet", move |value, _| {
        shell.on_unpuppet(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("pw_changed", move |_, _| {
        shell.close_password_window();
        Ok(())
    });

    let char_select = Arc::clone(&ui.char_select);
    table.register("char_all", move |value, _| {
        char_select.set_characters(value);
        Ok(())
    });

    let char_select = Arc::clone(&ui.char_select);
    table.register("max_char", move |value, _| {
        let max: u32 = serde_json::from_value(value.clone())?;
        char_select.set_max_number(max);
        Ok(())
    });

    let new_char = Arc::clone(&ui.new_char);
    table.register("char_created", move |value, _| {
        new_char.on_character_created(value);
        Ok(())
    });

    // The server re-sends the character list separately; nothing to
    // update here.
    table.register("char_deleted", |_, _| Ok(()));
}

fn register_scene(table: &mut HandlerTable, ui: &UiHandles) {
    let scene = Arc::clone(&ui.scene);
    table.register("look_around", move |value, _| {
        scene.set_scene(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("obj_moved_in", move |value, _| {
        shell.object_moved_in(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("obj_moved_out", move |value, _| {
        shell.object_moved_out(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("player_online", move |value, _| {
        shell.player_online(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("player_offline", move |value, _| {
        shell.player_offline(value);
        Ok(())
    });

    let inventory = Arc::clone(&ui.inventory);
    let skills = Arc::clone(&ui.skills);
    let quests = Arc::clone(&ui.quests);
    let popup = Arc::clone(&ui.object_popup);
    table.register("look_obj", move |value, context| {
        match context {
            Some("inventory") => inventory.show_object(value),
            Some("skills") => skills.show_skill(value),
            Some("quests") => quests.show_quest(value),
            _ => popup.show_object(value),
        }
        Ok(())
    });

    let dialogue = Arc::clone(&ui.dialogue_popup);
    let shell = Arc::clone(&ui.shell);
    table.register("dialogue", move |value, _| {
        dialogue.set_dialogue(value);
        if dialogue.has_dialogue() && !shell.is_combat_visible() {
            dialogue.show();
        }
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("get_objects", move |value, _| {
        shell.show_loot(value);
        Ok(())
    });

    let game = Arc::clone(&ui.game);
    table.register("shop", move |value, _| {
        game.show_shop(value);
        Ok(())
    });
}

fn register_character(table: &mut HandlerTable, ui: &UiHandles) {
    let shell = Arc::clone(&ui.shell);
    table.register("status", move |value, _| {
        shell.set_status(value);
        Ok(())
    });

    let char_data = Arc::clone(&ui.char_data);
    table.register("equipment_pos", move |value, _| {
        char_data.set_equipment_positions(value);
        Ok(())
    });

    let char_data = Arc::clone(&ui.char_data);
    table.register("equipments", move |value, _| {
        char_data.set_equipments(value);
        Ok(())
    });

    let inventory = Arc::clone(&ui.inventory);
    table.register("inventory", move |value, _| {
        inventory.set_inventory(value);
        Ok(())
    });

    let skills = Arc::clone(&ui.skills);
    table.register("skills", move |value, _| {
        skills.set_skills(value);
        Ok(())
    });

    let quests = Arc::clone(&ui.quests);
    table.register("quests", move |value, _| {
        quests.set_quests(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("skill_cd", move |value, _| {
        let cooldown: SkillCooldown = serde_json::from_value(value.clone())?;
        shell.set_skill_cooldown(&cooldown.skill, cooldown.cd, cooldown.gcd);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("skill_cast", move |value, _| {
        shell.set_skill_cast(value);
        Ok(())
    });

    let shell = Arc::clone(&ui.shell);
    table.register("get_exp", move |value, _| {
        let gain: ExpGain = serde_json::from_value(value.clone())?;
        shell.show_exp_gain(gain.exp);
        Ok(())
    });
}

fn register_combat(table: &mut HandlerTable, ui: &UiHandles) {
    let shell = Arc::clone(&ui.shell);
    table.register("joined_combat", move |value, _| {
        shell.show_combat(value);
        Ok(())
    });

    let combat = Arc::clone(&ui.combat);
    table.register("combat_finish", move |value, _| {
        combat.finish(value);
        Ok(())
    });

    let combat = Arc::clone(&ui.combat);
    table.register("combat_info", move |value, _| {
        let info: CombatInfo = serde_json::from_value(value.clone())?;
        combat.set_combat(&info.desc, info.timeout, &info.characters);
        Ok(())
    });

    let combat = Arc::clone(&ui.combat);
    table.register("combat_commands", move |value, _| {
        combat.set_commands(value);
        Ok(())
    });
}

fn register_social(table: &mut HandlerTable, ui: &UiHandles) {
    let conversation = Arc::clone(&ui.conversation);
    table.register("channels", move |value, _| {
        conversation.set_channels(value);
        Ok(())
    });

    let conversation = Arc::clone(&ui.conversation);
    table.register("conversation", move |value, _| {
        conversation.add_message(value);
        Ok(())
    });
}

fn register_map(table: &mut HandlerTable, ui: &UiHandles) {
    let map = Arc::clone(&ui.map);
    table.register("current_location", move |value, _| {
        map.set_current_location(value);
        Ok(())
    });

    let map = Arc::clone(&ui.map);
    table.register("reveal_map", move |value, _| {
        map.reveal_map(value);
        Ok(())
    });

    let map = Arc::clone(&ui.map);
    table.register("revealed_map", move |value, _| {
        map.set_map_data(value);
        Ok(())
    });
}
