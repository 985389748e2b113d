use super::{
    config::{PluginConfig, Translation},
    host::{Host, SettingEntry},
};

pub fn spray_settings(config: &PluginConfig, translation: &Translation) -> Vec<SettingEntry> {
    vec![
        SettingEntry::GroupHeader {
            label: translation.settings_group_header.clone(),
        },
        SettingEntry::Keybind {
            id: config.keybind_id,
            label: translation.keybind_setting_label.clone(),
            hint: translation.keybind_setting_hint_description.clone(),
        },
        SettingEntry::Button {
            id: config.refresh_button_id,
            label: translation.refresh_button_label.clone(),
            hint: translation.refresh_button_hint_description.clone(),
        },
    ]
}

/// Append the spray entries to whatever the server already defines.
pub fn register<H: Host>(host: &mut H, config: &PluginConfig, translation: &Translation) {
    let mut settings = host.defined_settings();
    settings.extend(spray_settings(config, translation));
    host.set_defined_settings(settings);
}

pub fn unregister<H: Host>(host: &mut H, config: &PluginConfig, translation: &Translation) {
    let ours = spray_settings(config, translation);
    let settings = host
        .defined_settings()
        .into_iter()
        .filter(|entry| !ours.contains(entry))
        .collect();
    host.set_defined_settings(settings);
}
