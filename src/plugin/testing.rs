//! Recording stand-ins for the game and the backend.

use std::{cell::RefCell, collections::BTreeMap, collections::HashMap, rc::Rc};

use glam::Vec3;

use super::{
    fetch::Fetcher,
    host::{
        Host, PlayerId, PlayerView, RaycastHit, SettingEntry, SurfaceId, TextId, TextSpec,
        Transform, UserId,
    },
    layers::LayerMask,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeText {
    pub text: String,
    pub transform: Transform,
    pub scale: Vec3,
}

#[derive(Debug, Default)]
pub struct FakeHost {
    pub players: HashMap<PlayerId, PlayerView>,
    /// What the next raycast hits, before mask and range are applied.
    pub hit: Option<RaycastHit>,
    pub rays: RefCell<Vec<(Vec3, Vec3, f32, LayerMask)>>,
    surfaces: HashMap<SurfaceId, Transform>,
    next_surface: u64,
    next_text: u64,
    texts: BTreeMap<TextId, FakeText>,
    pub destroyed: Vec<TextId>,
    pub sounds: Vec<(String, Vec3)>,
    pub hints: Vec<(PlayerId, String)>,
    pub hit_markers: Vec<PlayerId>,
    pub settings: Vec<SettingEntry>,
}

impl FakeHost {
    pub fn add_player(&mut self, id: u32, user_id: &str) -> PlayerId {
        let id = PlayerId(id);
        self.players.insert(
            id,
            PlayerView {
                id,
                user_id: UserId(user_id.to_string()),
                alive: true,
                disarmed: false,
                eye: Vec3::new(0.0, 1.0, 2.0),
                forward: -Vec3::Z,
            },
        );
        id
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut PlayerView {
        self.players.get_mut(&id).expect("unknown player")
    }

    pub fn add_surface(&mut self, transform: Transform) -> SurfaceId {
        self.next_surface += 1;
        let id = SurfaceId(self.next_surface);
        self.surfaces.insert(id, transform);
        id
    }

    pub fn move_surface(&mut self, id: SurfaceId, transform: Transform) {
        self.surfaces.insert(id, transform);
    }

    pub fn remove_surface(&mut self, id: SurfaceId) {
        self.surfaces.remove(&id);
    }

    /// A wall one unit in front of the default eye position.
    pub fn aim_at_wall(&mut self) -> SurfaceId {
        let surface = self.add_surface(Transform::IDENTITY);
        self.hit = Some(RaycastHit {
            point: Vec3::new(0.0, 1.0, 1.0),
            normal: Vec3::Z,
            distance: 1.0,
            layer: 0,
            surface,
            player: None,
        });
        surface
    }

    pub fn text(&self, id: TextId) -> &FakeText {
        self.texts.get(&id).expect("text was destroyed")
    }

    pub fn live_texts(&self) -> Vec<TextId> {
        self.texts.keys().copied().collect()
    }

    pub fn last_hint(&self) -> Option<&str> {
        self.hints.last().map(|(_, hint)| hint.as_str())
    }
}

impl Host for FakeHost {
    fn player(&self, id: PlayerId) -> Option<PlayerView> {
        self.players.get(&id).cloned()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        self.rays
            .borrow_mut()
            .push((origin, direction, max_distance, mask));
        self.hit
            .filter(|hit| hit.distance <= max_distance && mask.contains(hit.layer))
    }

    fn surface_transform(&self, surface: SurfaceId) -> Option<Transform> {
        self.surfaces.get(&surface).copied()
    }

    fn spawn_text(&mut self, spec: &TextSpec) -> TextId {
        self.next_text += 1;
        let id = TextId(self.next_text);
        self.texts.insert(
            id,
            FakeText {
                text: spec.text.clone(),
                transform: spec.transform,
                scale: spec.scale,
            },
        );
        id
    }

    fn set_text(&mut self, id: TextId, text: &str) {
        if let Some(fake) = self.texts.get_mut(&id) {
            fake.text = text.to_string();
        }
    }

    fn set_text_transform(&mut self, id: TextId, transform: Transform) {
        if let Some(fake) = self.texts.get_mut(&id) {
            fake.transform = transform;
        }
    }

    fn destroy_text(&mut self, id: TextId) {
        if self.texts.remove(&id).is_some() {
            self.destroyed.push(id);
        }
    }

    fn play_sound(&mut self, path: &str, position: Vec3) {
        self.sounds.push((path.to_string(), position));
    }

    fn send_hint(&mut self, player: PlayerId, message: &str, _duration_secs: f32) {
        self.hints.push((player, message.to_string()));
    }

    fn show_hit_marker(&mut self, player: PlayerId) {
        self.hit_markers.push(player);
    }

    fn defined_settings(&self) -> Vec<SettingEntry> {
        self.settings.clone()
    }

    fn set_defined_settings(&mut self, settings: Vec<SettingEntry>) {
        self.settings = settings;
    }
}

/// Records which users were asked for; tests push outcomes themselves.
#[derive(Debug, Default, Clone)]
pub struct FakeFetcher {
    pub requests: Rc<RefCell<Vec<UserId>>>,
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, user_id: &UserId) {
        self.requests.borrow_mut().push(user_id.clone());
    }
}
