//! Physics layers the spray raycast may or may not land on.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Layer {
    Default = 0,
    TransparentFx = 1,
    Player = 8,
    Hitbox = 13,
    InvisibleCollider = 16,
    Ragdoll = 17,
    Cctv = 18,
    Grenade = 20,
    Door = 27,
    Skybox = 28,
    Fence = 29,
}

impl Layer {
    pub fn from_index(index: u8) -> Option<Layer> {
        match index {
            0 => Some(Layer::Default),
            1 => Some(Layer::TransparentFx),
            8 => Some(Layer::Player),
            13 => Some(Layer::Hitbox),
            16 => Some(Layer::InvisibleCollider),
            17 => Some(Layer::Ragdoll),
            18 => Some(Layer::Cctv),
            20 => Some(Layer::Grenade),
            27 => Some(Layer::Door),
            28 => Some(Layer::Skybox),
            29 => Some(Layer::Fence),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Default => "Default",
            Layer::TransparentFx => "TransparentFX",
            Layer::Player => "Player",
            Layer::Hitbox => "Hitbox",
            Layer::InvisibleCollider => "InvisibleCollider",
            Layer::Ragdoll => "Ragdoll",
            Layer::Cctv => "CCTV",
            Layer::Grenade => "Grenade",
            Layer::Door => "Door",
            Layer::Skybox => "Skybox",
            Layer::Fence => "Fence",
        }
    }
}

pub fn layer_name(index: u8) -> &'static str {
    Layer::from_index(index).map_or("Unknown", |layer| layer.name())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub const fn without(self, layers: &[Layer]) -> LayerMask {
        let mut bits = self.0;
        let mut i = 0;
        while i < layers.len() {
            bits &= !(1 << layers[i] as u8);
            i += 1;
        }
        LayerMask(bits)
    }

    pub fn contains(&self, index: u8) -> bool {
        index < 32 && self.0 & (1 << index) != 0
    }
}

/// Layers a spray can never be placed on. Doors are fair game.
pub const IGNORED_LAYERS: [Layer; 9] = [
    Layer::TransparentFx,
    Layer::Player,
    Layer::Hitbox,
    Layer::InvisibleCollider,
    Layer::Ragdoll,
    Layer::Cctv,
    Layer::Grenade,
    Layer::Skybox,
    Layer::Fence,
];

pub const PLACEABLE_MASK: LayerMask = LayerMask::ALL.without(&IGNORED_LAYERS);
