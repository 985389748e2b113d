//! Turning cached artwork into text elements on a surface.
//!
//! A [`SprayInstance`] owns the text elements of one placement. It is advanced
//! once per server tick: it follows its surface, reveals one more line, and for
//! animated sprays swaps frames at a fixed rate. Dropping it out of the
//! controller (via [`SprayInstance::destroy`]) is what stops it; there is no
//! separate flag to poll.

use std::time::{Duration, Instant};

use glam::{Mat3, Quat, Vec2, Vec3};

use super::host::{Host, RaycastHit, SurfaceId, TextId, TextSpec, Transform};

pub const TEXT_SCALE: Vec3 = Vec3::new(0.05, 0.07, 1.0);
pub const DISPLAY_SIZE: Vec2 = Vec2::new(100_000.0, 100_000.0);
/// Distance off the surface, keeps the text from z-fighting with it.
pub const SURFACE_OFFSET: f32 = 0.01;
pub const LINE_SPACING: f32 = 0.02;
pub const FRAME_INTERVAL: Duration = Duration::from_millis(200);

/// Non-blank lines of a text block.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Split every frame into lines and pad or cut them to the first frame's line
/// count, so line slots stay valid across frame swaps.
pub fn normalize_frames(frames: &[String]) -> Vec<Vec<String>> {
    let mut split: Vec<Vec<String>> = frames.iter().map(|frame| split_lines(frame)).collect();
    let Some(line_count) = split.first().map(Vec::len) else {
        return split;
    };
    for frame in split.iter_mut() {
        frame.resize(line_count, String::new());
    }
    split
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Centre of the text block, already lifted off the surface.
    pub origin: Vec3,
    pub rotation: Quat,
    pub up: Vec3,
}

/// Orientation for text lying flat on a surface with the given normal.
pub fn placement_basis(point: Vec3, normal: Vec3) -> Placement {
    let normal = normal.normalize_or_zero();
    let forward = -normal;
    let mut right = Vec3::Y.cross(forward).normalize_or_zero();
    if right == Vec3::ZERO {
        // Floors and ceilings
        right = Vec3::X;
    }
    let up = forward.cross(right).normalize_or_zero();
    Placement {
        origin: point + normal * SURFACE_OFFSET,
        rotation: Quat::from_mat3(&Mat3::from_cols(right, up, forward)),
        up,
    }
}

/// Line centres, first line on top, block centred on `placement.origin`.
pub fn line_positions(placement: &Placement, count: usize) -> Vec<Vec3> {
    let half = count.saturating_sub(1) as f32 / 2.0;
    (0..count)
        .map(|i| placement.origin + placement.up * ((half - i as f32) * LINE_SPACING))
        .collect()
}

#[derive(Debug)]
struct RenderedLine {
    id: TextId,
    /// Relative to the anchor surface, or world space when unanchored.
    local: Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceStatus {
    Live,
    Expired,
    SurfaceLost,
}

#[derive(Debug)]
pub struct SprayInstance {
    anchor: Option<SurfaceId>,
    lines: Vec<RenderedLine>,
    frames: Vec<Vec<String>>,
    revealed: usize,
    frame: usize,
    next_frame_at: Option<Instant>,
    expires_at: Instant,
}

impl SprayInstance {
    /// Create one empty text element per line of the first frame at the hit
    /// point.
    pub fn spawn<H: Host>(
        host: &mut H,
        hit: &RaycastHit,
        frames: &[String],
        now: Instant,
        lifetime: Duration,
    ) -> Self {
        let frames = normalize_frames(frames);
        let placement = placement_basis(hit.point, hit.normal);
        let line_count = frames.first().map_or(0, Vec::len);
        let surface = host.surface_transform(hit.surface);

        let lines = line_positions(&placement, line_count)
            .into_iter()
            .map(|position| {
                let world = Transform::new(position, placement.rotation);
                let id = host.spawn_text(&TextSpec {
                    transform: world,
                    scale: TEXT_SCALE,
                    display_size: DISPLAY_SIZE,
                    text: String::new(),
                });
                let local = match surface {
                    Some(surface) => surface.to_local(world),
                    None => world,
                };
                RenderedLine { id, local }
            })
            .collect();

        SprayInstance {
            anchor: surface.map(|_| hit.surface),
            lines,
            frames,
            revealed: 0,
            frame: 0,
            next_frame_at: None,
            expires_at: now + lifetime,
        }
    }

    pub fn text_ids(&self) -> impl Iterator<Item = TextId> + '_ {
        self.lines.iter().map(|line| line.id)
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    pub fn current_frame(&self) -> usize {
        self.frame
    }

    pub fn fully_revealed(&self) -> bool {
        self.revealed >= self.lines.len()
    }

    pub fn tick<H: Host>(&mut self, host: &mut H, now: Instant) -> InstanceStatus {
        if now >= self.expires_at {
            return InstanceStatus::Expired;
        }

        if let Some(anchor) = self.anchor {
            let Some(surface) = host.surface_transform(anchor) else {
                return InstanceStatus::SurfaceLost;
            };
            for line in &self.lines {
                host.set_text_transform(line.id, surface.to_world(line.local));
            }
        }

        if !self.fully_revealed() {
            let line = &self.lines[self.revealed];
            host.set_text(line.id, &self.frames[self.frame][self.revealed]);
            self.revealed += 1;
            if self.fully_revealed() && self.is_animated() {
                self.next_frame_at = Some(now + FRAME_INTERVAL);
            }
            return InstanceStatus::Live;
        }

        if let Some(next_frame_at) = self.next_frame_at {
            if now >= next_frame_at {
                self.frame = (self.frame + 1) % self.frames.len();
                for (line, text) in self.lines.iter().zip(&self.frames[self.frame]) {
                    host.set_text(line.id, text);
                }
                self.next_frame_at = Some(now + FRAME_INTERVAL);
            }
        }

        InstanceStatus::Live
    }

    pub fn destroy<H: Host>(self, host: &mut H) {
        for line in self.lines {
            host.destroy_text(line.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::testing::FakeHost;

    fn frames(line_counts: &[usize]) -> Vec<String> {
        line_counts
            .iter()
            .enumerate()
            .map(|(f, &n)| {
                (0..n)
                    .map(|l| format!("f{f}l{l}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect()
    }

    fn wall_hit(host: &mut FakeHost) -> RaycastHit {
        let surface = host.add_surface(Transform::IDENTITY);
        RaycastHit {
            point: Vec3::new(0.0, 1.0, 0.0),
            normal: Vec3::Z,
            distance: 1.0,
            layer: 0,
            surface,
            player: None,
        }
    }

    #[test]
    fn splits_non_blank_lines() {
        assert_eq!(split_lines("a\n\n  \nb\r\nc\n"), vec!["a", "b", "c"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn short_frames_are_padded() {
        let normalized = normalize_frames(&frames(&[5, 3, 5]));
        assert!(normalized.iter().all(|frame| frame.len() == 5));
        assert_eq!(normalized[1][2], "f1l2");
        assert_eq!(normalized[1][3], "");
        assert_eq!(normalized[1][4], "");
    }

    #[test]
    fn long_frames_are_cut() {
        let normalized = normalize_frames(&frames(&[2, 4]));
        assert_eq!(normalized[1], vec!["f1l0", "f1l1"]);
        assert!(normalize_frames(&[]).is_empty());
    }

    #[test]
    fn wall_basis() {
        let placement = placement_basis(Vec3::ZERO, Vec3::Z);
        assert!(placement.origin.abs_diff_eq(Vec3::new(0.0, 0.0, SURFACE_OFFSET), 1e-6));
        assert!(placement.up.abs_diff_eq(Vec3::Y, 1e-6));
        assert!((placement.rotation * Vec3::Z).abs_diff_eq(-Vec3::Z, 1e-5));
    }

    #[test]
    fn floor_basis_falls_back_to_world_x() {
        let placement = placement_basis(Vec3::ZERO, Vec3::Y);
        assert!((placement.rotation * Vec3::Z).abs_diff_eq(-Vec3::Y, 1e-5));
        assert!((placement.rotation * Vec3::X).abs_diff_eq(Vec3::X, 1e-5));
        assert!(placement.rotation.is_normalized());
    }

    #[test]
    fn lines_are_centred() {
        let placement = placement_basis(Vec3::ZERO, Vec3::Z);
        let positions = line_positions(&placement, 3);
        assert!(positions[0].y > positions[1].y && positions[1].y > positions[2].y);
        let centre = positions.iter().copied().sum::<Vec3>() / 3.0;
        assert!(centre.abs_diff_eq(placement.origin, 1e-6));
        assert!((positions[0].y - positions[1].y - LINE_SPACING).abs() < 1e-6);
    }

    #[test]
    fn reveals_one_line_per_tick() {
        let mut host = FakeHost::default();
        let hit = wall_hit(&mut host);
        let now = Instant::now();
        let mut spray = SprayInstance::spawn(
            &mut host,
            &hit,
            &frames(&[3]),
            now,
            Duration::from_secs(300),
        );
        let ids: Vec<TextId> = spray.text_ids().collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| host.text(*id).text.is_empty()));

        spray.tick(&mut host, now);
        assert_eq!(host.text(ids[0]).text, "f0l0");
        assert!(host.text(ids[1]).text.is_empty());

        spray.tick(&mut host, now);
        spray.tick(&mut host, now);
        assert!(spray.fully_revealed());
        assert_eq!(host.text(ids[2]).text, "f0l2");
        assert!(!spray.is_animated());
    }

    #[test]
    fn animation_loops_at_fixed_rate() {
        let mut host = FakeHost::default();
        let hit = wall_hit(&mut host);
        let t0 = Instant::now();
        let mut spray = SprayInstance::spawn(
            &mut host,
            &hit,
            &frames(&[2, 1]),
            t0,
            Duration::from_secs(300),
        );
        let ids: Vec<TextId> = spray.text_ids().collect();
        spray.tick(&mut host, t0);
        spray.tick(&mut host, t0);
        assert!(spray.fully_revealed());

        // Not yet due
        spray.tick(&mut host, t0 + Duration::from_millis(100));
        assert_eq!(spray.current_frame(), 0);

        spray.tick(&mut host, t0 + FRAME_INTERVAL);
        assert_eq!(spray.current_frame(), 1);
        assert_eq!(host.text(ids[0]).text, "f1l0");
        assert_eq!(host.text(ids[1]).text, "");

        spray.tick(&mut host, t0 + FRAME_INTERVAL * 2);
        assert_eq!(spray.current_frame(), 0);
        assert_eq!(host.text(ids[1]).text, "f0l1");
    }

    #[test]
    fn follows_moving_surface() {
        let mut host = FakeHost::default();
        let hit = wall_hit(&mut host);
        let now = Instant::now();
        let mut spray = SprayInstance::spawn(
            &mut host,
            &hit,
            &frames(&[1]),
            now,
            Duration::from_secs(300),
        );
        let id = spray.text_ids().next().unwrap();
        let before = host.text(id).transform.position;

        host.move_surface(hit.surface, Transform::new(Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY));
        assert_eq!(spray.tick(&mut host, now), InstanceStatus::Live);
        let after = host.text(id).transform.position;
        assert!(after.abs_diff_eq(before + Vec3::new(2.0, 0.0, 0.0), 1e-5));

        host.remove_surface(hit.surface);
        assert_eq!(spray.tick(&mut host, now), InstanceStatus::SurfaceLost);
    }

    #[test]
    fn expires_and_destroys() {
        let mut host = FakeHost::default();
        let hit = wall_hit(&mut host);
        let now = Instant::now();
        let mut spray = SprayInstance::spawn(
            &mut host,
            &hit,
            &frames(&[2]),
            now,
            Duration::from_secs(300),
        );
        assert_eq!(
            spray.tick(&mut host, now + Duration::from_secs(299)),
            InstanceStatus::Live
        );
        assert_eq!(
            spray.tick(&mut host, now + Duration::from_secs(300)),
            InstanceStatus::Expired
        );
        spray.destroy(&mut host);
        assert!(host.live_texts().is_empty());
        assert_eq!(host.destroyed.len(), 2);
    }
}
