//! The seam between the spray feature and the game it runs inside.
//!
//! Everything the feature does to the world goes through [`Host`]: looking up
//! players, raycasting, spawning text elements, playing sounds and showing
//! hints. The game-side adapter implements it; tests use a recording fake.

use glam::{Quat, Vec2, Vec3};

use super::layers::LayerMask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u32);

/// Platform-qualified account id, e.g. `76561198000000000@steam`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Express a world transform relative to `self`.
    pub fn to_local(&self, world: Transform) -> Transform {
        let inv = self.rotation.inverse();
        Transform {
            position: inv * (world.position - self.position),
            rotation: inv * world.rotation,
        }
    }

    /// Inverse of [`Transform::to_local`].
    pub fn to_world(&self, local: Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * local.position,
            rotation: self.rotation * local.rotation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub user_id: UserId,
    pub alive: bool,
    pub disarmed: bool,
    pub eye: Vec3,
    pub forward: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
    pub layer: u8,
    pub surface: SurfaceId,
    /// Set when the collider belongs to a player.
    pub player: Option<PlayerId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub transform: Transform,
    pub scale: Vec3,
    pub display_size: Vec2,
    pub text: String,
}

/// Entries in the per-server settings menu.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingEntry {
    GroupHeader { label: String },
    Keybind { id: u32, label: String, hint: String },
    Button { id: u32, label: String, hint: String },
}

impl SettingEntry {
    pub fn id(&self) -> Option<u32> {
        match self {
            SettingEntry::GroupHeader { .. } => None,
            SettingEntry::Keybind { id, .. } | SettingEntry::Button { id, .. } => Some(*id),
        }
    }
}

pub trait Host {
    fn player(&self, id: PlayerId) -> Option<PlayerView>;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit>;

    /// Current world transform of a surface, `None` once it no longer exists.
    fn surface_transform(&self, surface: SurfaceId) -> Option<Transform>;

    fn spawn_text(&mut self, spec: &TextSpec) -> TextId;
    fn set_text(&mut self, id: TextId, text: &str);
    fn set_text_transform(&mut self, id: TextId, transform: Transform);
    fn destroy_text(&mut self, id: TextId);

    fn play_sound(&mut self, path: &str, position: Vec3);
    fn send_hint(&mut self, player: PlayerId, message: &str, duration_secs: f32);
    fn show_hit_marker(&mut self, player: PlayerId);

    fn defined_settings(&self) -> Vec<SettingEntry>;
    fn set_defined_settings(&mut self, settings: Vec<SettingEntry>);
}
