use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PluginConfig {
    pub debug: bool,
    /// Seconds between two placements by the same player.
    pub cooldown_duration: f32,
    pub keybind_id: u32,
    pub refresh_button_id: u32,
    pub backend_url: String,
    pub api_token: String,
    /// Played at the spray position; empty disables the sound.
    pub sound_path: String,
    /// Seconds a placed spray stays in the world.
    pub spray_lifetime: f32,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            debug: false,
            cooldown_duration: 15.0,
            keybind_id: 206,
            refresh_button_id: 207,
            backend_url: "http://127.0.0.1:8787".to_string(),
            api_token: String::new(),
            sound_path: "spray.ogg".to_string(),
            spray_lifetime: 300.0,
        }
    }
}

impl PluginConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs_f32(self.cooldown_duration.max(0.0))
    }

    pub fn lifetime(&self) -> Duration {
        Duration::from_secs_f32(self.spray_lifetime.max(0.0))
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Translation {
    pub settings_group_header: String,
    pub keybind_setting_label: String,
    pub keybind_setting_hint_description: String,
    pub refresh_button_label: String,
    pub refresh_button_hint_description: String,
    /// `{remaining}` is replaced with the seconds left.
    pub ability_on_cooldown: String,
    pub ability_used: String,
    pub no_spray_set: String,
    pub refresh_requested: String,
    /// `{remaining}` is replaced with the seconds left.
    pub refresh_on_cooldown: String,
}

impl Default for Translation {
    fn default() -> Self {
        Translation {
            settings_group_header: "Spray".to_string(),
            keybind_setting_label: "Place a spray!".to_string(),
            keybind_setting_hint_description:
                "Press this key to place a spray on the wall you are looking at.".to_string(),
            refresh_button_label: "Refresh spray".to_string(),
            refresh_button_hint_description: "Reload your spray after changing it on the dashboard."
                .to_string(),
            ability_on_cooldown: "<color=yellow>Your Spray is on cooldown! ({remaining}s)</color>"
                .to_string(),
            ability_used: "<color=green>Spray has been placed!</color>".to_string(),
            no_spray_set: "<color=red>You have no spray set!</color>".to_string(),
            refresh_requested: "<color=green>Your spray is being refreshed.</color>".to_string(),
            refresh_on_cooldown: "<color=yellow>Please wait {remaining}s before refreshing again.</color>"
                .to_string(),
        }
    }
}

/// Fill in a `{remaining}` placeholder, rounded to a tenth of a second.
pub fn format_remaining(template: &str, remaining: Duration) -> String {
    template.replace("{remaining}", &format!("{:.1}", remaining.as_secs_f32()))
}
