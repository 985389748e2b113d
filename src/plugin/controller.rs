//! Per-player spray bookkeeping: cooldowns, the artwork cache and the one live
//! spray each player may have.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use super::{
    config::{format_remaining, PluginConfig, Translation},
    fetch::{FetchOutcome, FetchReceiver, Fetcher},
    host::{Host, PlayerId, UserId},
    layers::{layer_name, PLACEABLE_MASK},
    render::{split_lines, InstanceStatus, SprayInstance},
    settings,
};

pub const MAX_SPRAY_DISTANCE: f32 = 2.5;
pub const REFRESH_COOLDOWN: Duration = Duration::from_secs(5);
const HINT_SECS: f32 = 3.0;
const COOLDOWN_HINT_SECS: f32 = 5.0;

/// Downloaded artwork. An empty record means "looked, found nothing".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CachedSpray {
    pub frames: Vec<String>,
}

impl CachedSpray {
    pub fn is_empty(&self) -> bool {
        self.frames
            .first()
            .map_or(true, |frame| split_lines(frame).is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaceOutcome {
    /// Unknown, dead or disarmed player.
    Ignored,
    OnCooldown(Duration),
    NoSurface,
    NoSpray,
    Placed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefreshOutcome {
    Ignored,
    OnCooldown(Duration),
    Requested,
}

fn remaining(until: Option<&Instant>, now: Instant) -> Option<Duration> {
    until
        .and_then(|until| until.checked_duration_since(now))
        .filter(|left| !left.is_zero())
}

pub struct SprayController<F> {
    config: PluginConfig,
    translation: Translation,
    fetcher: F,
    outcomes: FetchReceiver,
    cache: HashMap<UserId, CachedSpray>,
    cooldowns: HashMap<PlayerId, Instant>,
    refresh_cooldowns: HashMap<PlayerId, Instant>,
    active: HashMap<PlayerId, SprayInstance>,
}

impl<F: Fetcher> SprayController<F> {
    pub fn new(
        config: PluginConfig,
        translation: Translation,
        fetcher: F,
        outcomes: FetchReceiver,
    ) -> Self {
        SprayController {
            config,
            translation,
            fetcher,
            outcomes,
            cache: HashMap::new(),
            cooldowns: HashMap::new(),
            refresh_cooldowns: HashMap::new(),
            active: HashMap::new(),
        }
    }

    pub fn start<H: Host>(&mut self, host: &mut H) {
        settings::register(host, &self.config, &self.translation);
        log::info!("spray feature started");
    }

    /// Tear down every live spray and forget all per-player state.
    pub fn stop<H: Host>(&mut self, host: &mut H) {
        for (_, instance) in self.active.drain() {
            instance.destroy(host);
        }
        self.cache.clear();
        self.cooldowns.clear();
        self.refresh_cooldowns.clear();
        settings::unregister(host, &self.config, &self.translation);
        log::info!("spray feature stopped");
    }

    pub fn on_player_joined(&mut self, user_id: &UserId) {
        log::debug!("fetching spray for {}", user_id);
        self.fetcher.fetch(user_id);
    }

    pub fn on_setting_value<H: Host>(
        &mut self,
        host: &mut H,
        player: PlayerId,
        setting_id: u32,
        pressed: bool,
        now: Instant,
    ) {
        if !pressed {
            return;
        }
        if setting_id == self.config.keybind_id {
            self.place_spray(host, player, now);
        } else if setting_id == self.config.refresh_button_id {
            self.refresh_spray(host, player, now);
        }
    }

    pub fn place_spray<H: Host>(
        &mut self,
        host: &mut H,
        player_id: PlayerId,
        now: Instant,
    ) -> PlaceOutcome {
        let Some(player) = host.player(player_id) else {
            return PlaceOutcome::Ignored;
        };
        if !player.alive || player.disarmed {
            return PlaceOutcome::Ignored;
        }

        if let Some(left) = remaining(self.cooldowns.get(&player_id), now) {
            let hint = format_remaining(&self.translation.ability_on_cooldown, left);
            host.send_hint(player_id, &hint, COOLDOWN_HINT_SECS);
            return PlaceOutcome::OnCooldown(left);
        }

        let hit = host
            .raycast(player.eye, player.forward, MAX_SPRAY_DISTANCE, PLACEABLE_MASK)
            .filter(|hit| hit.player.is_none());
        let Some(hit) = hit else {
            return PlaceOutcome::NoSurface;
        };
        if self.config.debug {
            log::debug!("spray hit layer {} ({})", layer_name(hit.layer), hit.layer);
        }

        let frames = match self.cache.get(&player.user_id) {
            Some(cached) if !cached.is_empty() => &cached.frames,
            _ => {
                host.send_hint(player_id, &self.translation.no_spray_set, HINT_SECS);
                return PlaceOutcome::NoSpray;
            }
        };

        if let Some(previous) = self.active.remove(&player_id) {
            previous.destroy(host);
        }
        let instance = SprayInstance::spawn(host, &hit, frames, now, self.config.lifetime());
        self.active.insert(player_id, instance);

        if !self.config.sound_path.is_empty() {
            host.play_sound(&self.config.sound_path, hit.point);
        }
        self.cooldowns.insert(player_id, now + self.config.cooldown());
        host.show_hit_marker(player_id);
        host.send_hint(player_id, &self.translation.ability_used, HINT_SECS);
        PlaceOutcome::Placed
    }

    /// Re-download the player's artwork, at most once per [`REFRESH_COOLDOWN`].
    pub fn refresh_spray<H: Host>(
        &mut self,
        host: &mut H,
        player_id: PlayerId,
        now: Instant,
    ) -> RefreshOutcome {
        let Some(player) = host.player(player_id) else {
            return RefreshOutcome::Ignored;
        };

        if let Some(left) = remaining(self.refresh_cooldowns.get(&player_id), now) {
            let hint = format_remaining(&self.translation.refresh_on_cooldown, left);
            host.send_hint(player_id, &hint, HINT_SECS);
            return RefreshOutcome::OnCooldown(left);
        }

        self.fetcher.fetch(&player.user_id);
        self.refresh_cooldowns
            .insert(player_id, now + REFRESH_COOLDOWN);
        host.send_hint(player_id, &self.translation.refresh_requested, HINT_SECS);
        RefreshOutcome::Requested
    }

    /// Advance one game-loop step: absorb finished downloads, then move every
    /// live spray along.
    pub fn tick<H: Host>(&mut self, host: &mut H, now: Instant) {
        self.receive_fetches();

        let ended: Vec<PlayerId> = self
            .active
            .iter_mut()
            .filter_map(|(player, instance)| match instance.tick(host, now) {
                InstanceStatus::Live => None,
                status => {
                    log::debug!("spray of player {:?} ended: {:?}", player, status);
                    Some(*player)
                }
            })
            .collect();
        for player in ended {
            if let Some(instance) = self.active.remove(&player) {
                instance.destroy(host);
            }
        }
    }

    fn receive_fetches(&mut self) {
        while let Ok(FetchOutcome { user_id, result }) = self.outcomes.try_recv() {
            let cached = match result {
                Ok(frames) => {
                    log::debug!("cached {} frame(s) for {}", frames.len(), user_id);
                    CachedSpray { frames }
                }
                Err(e) => {
                    log::warn!("failed to fetch spray for {}: {}", user_id, e);
                    CachedSpray::default()
                }
            };
            self.cache.insert(user_id, cached);
        }
    }

    pub fn cached(&self, user_id: &UserId) -> Option<&CachedSpray> {
        self.cache.get(user_id)
    }

    pub fn active_spray(&self, player: PlayerId) -> Option<&SprayInstance> {
        self.active.get(&player)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}
