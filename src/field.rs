//! The particle field.
//!
//! A [`Field`] owns a flat set of particles sized for one surface. Each
//! tick every particle is stepped by [`step_particle`]:
//!
//! 1. primary particles inside the pointer bubble are nudged away from it,
//!    never while they sit inside the inner margin,
//! 2. the constant velocity is added,
//! 3. anything that left the viewport by more than its radius is wrapped
//!    to the opposite edge.
//!
//! Rendering is a separate pass ([`Field::render`]): every particle as a
//! filled dot, then a line between each pair of primaries closer than the
//! link threshold, fading linearly with squared distance.
//!
//! The link pass is O(n²) over primaries. Primary count scales with
//! viewport area (one per 15000 px² by default), so this stays in the tens
//! to low hundreds for real screens.

use crate::config::FieldConfig;
use crate::particle::{Particle, ParticleKind};
use crate::pointer::PointerState;
use crate::spawn::SpawnContext;
use crate::surface::Surface;
use glam::Vec2;

/// A proximity line between two primary particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    /// Index of the first endpoint in [`Field::particles`].
    pub a: usize,
    /// Index of the second endpoint, always greater than `a`.
    pub b: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub distance_sq: f32,
    /// `1 - distance_sq / falloff`, unclamped.
    pub raw_opacity: f32,
}

impl Link {
    /// Opacity actually drawn, clamped to `[0, 1]`.
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.raw_opacity.clamp(0.0, 1.0)
    }
}

/// Wrap a particle that left `[-r, size + r]` on either axis.
pub fn wrap(particle: &mut Particle, width: f32, height: f32) {
    let r = particle.radius;
    let p = &mut particle.position;

    if p.x > width + r {
        p.x = -r;
    }
    if p.x < -r {
        p.x = width + r;
    }
    if p.y > height + r {
        p.y = -r;
    }
    if p.y < -r {
        p.y = height + r;
    }
}

/// Push a particle away from `pointer` by a fixed step per axis.
///
/// Only applies inside `pointer_radius + radius` of the pointer. Each axis
/// direction is suppressed once the particle is at or beyond the inner
/// margin (`radius * inner_margin_factor`) on the side it would move
/// towards.
pub fn steer(particle: &mut Particle, pointer: Vec2, width: f32, height: f32, config: &FieldConfig) {
    let r = particle.radius;
    if pointer.distance(particle.position) >= config.pointer_radius + r {
        return;
    }

    let margin = r * config.inner_margin_factor;
    let step = config.nudge_step;
    let p = &mut particle.position;

    if pointer.x < p.x && p.x < width - margin {
        p.x += step;
    }
    if pointer.x > p.x && p.x > margin {
        p.x -= step;
    }
    if pointer.y < p.y && p.y < height - margin {
        p.y += step;
    }
    if pointer.y > p.y && p.y > margin {
        p.y -= step;
    }
}

/// Advance one particle by one tick.
///
/// Pure with respect to everything but `particle`, so it can be exercised
/// without a field or a surface.
pub fn step_particle(
    particle: &mut Particle,
    pointer: Option<Vec2>,
    width: f32,
    height: f32,
    config: &FieldConfig,
) {
    if particle.is_primary() {
        if let Some(pointer) = pointer {
            steer(particle, pointer, width, height, config);
        }
    }

    particle.position += particle.velocity;
    wrap(particle, width, height);
}

/// The full particle set for one surface size.
#[derive(Debug)]
pub struct Field {
    width: u32,
    height: u32,
    config: FieldConfig,
    pointer: PointerState,
    spawner: SpawnContext,
    particles: Vec<Particle>,
}

impl Field {
    /// Create and populate a field for a `width` x `height` surface.
    pub fn new(width: u32, height: u32, config: FieldConfig, pointer: PointerState) -> Self {
        let spawner = SpawnContext::new(config.seed);
        let mut field = Self {
            width,
            height,
            config,
            pointer,
            spawner,
            particles: Vec::new(),
        };
        field.reinitialize();
        field
    }

    /// Discard every particle and draw a fresh set for the current size.
    ///
    /// A zero width or height yields an empty field.
    pub fn reinitialize(&mut self) {
        self.particles.clear();

        if self.width == 0 || self.height == 0 {
            log::debug!(
                "Field {}x{} is degenerate, no particles spawned",
                self.width,
                self.height
            );
            return;
        }

        let (w, h) = (self.width as f32, self.height as f32);
        let primary = self.config.primary_count(self.width, self.height);
        let ambient = self.config.ambient_count as usize;
        self.particles.reserve(primary + ambient);

        let base = self.config.base_color;
        for _ in 0..primary {
            let p = self
                .spawner
                .particle(ParticleKind::Primary, &self.config.primary, base, w, h);
            self.particles.push(p);
        }
        for _ in 0..ambient {
            let p = self
                .spawner
                .particle(ParticleKind::Ambient, &self.config.ambient, base, w, h);
            self.particles.push(p);
        }

        log::debug!(
            "Field {}x{} initialized: {} primary, {} ambient",
            self.width,
            self.height,
            primary,
            ambient
        );
    }

    /// Adopt a new surface size and repopulate from scratch.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.reinitialize();
    }

    /// Step every particle once.
    pub fn step(&mut self) {
        let pointer = self.pointer.position();
        let (w, h) = (self.width as f32, self.height as f32);
        for particle in &mut self.particles {
            step_particle(particle, pointer, w, h, &self.config);
        }
    }

    /// Visit every link between distinct primaries, each unordered pair once.
    pub fn for_each_link(&self, mut f: impl FnMut(Link)) {
        let threshold = self.config.link_threshold_sq(self.width, self.height);
        let falloff = self.config.link_falloff;

        for (a, pa) in self.particles.iter().enumerate() {
            if !pa.is_primary() {
                continue;
            }
            for (b, pb) in self.particles.iter().enumerate().skip(a + 1) {
                if !pb.is_primary() {
                    continue;
                }
                let distance_sq = pa.position.distance_squared(pb.position);
                if distance_sq < threshold {
                    f(Link {
                        a,
                        b,
                        from: pa.position,
                        to: pb.position,
                        distance_sq,
                        raw_opacity: 1.0 - distance_sq / falloff,
                    });
                }
            }
        }
    }

    /// All current links, collected.
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        self.for_each_link(|link| links.push(link));
        links
    }

    /// Draw dots for every particle, then the proximity links.
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) {
        for p in &self.particles {
            surface.fill_circle(p.position, p.radius, p.color);
        }

        let base = self.config.base_color;
        let width = self.config.link_width;
        self.for_each_link(|link| {
            surface.stroke_line(link.from, link.to, base.with_alpha(link.opacity()), width);
        });
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts and tests that place particles by hand.
    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn primary_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_primary()).count()
    }

    pub fn ambient_count(&self) -> usize {
        self.particles.len() - self.primary_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Rgba;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn primary_at(x: f32, y: f32, radius: f32) -> Particle {
        Particle::new(
            Vec2::new(x, y),
            Vec2::new(0.2, 0.1),
            radius,
            Rgba::new(88, 166, 255, 0.5),
            ParticleKind::Primary,
        )
    }

    fn seeded() -> FieldConfig {
        FieldConfig::default().with_seed(1234)
    }

    #[test]
    fn test_wrap_right_edge() {
        let mut p = primary_at(302.5, 50.0, 2.0);
        wrap(&mut p, 300.0, 150.0);
        assert_eq!(p.position.x, -2.0);
        assert_eq!(p.position.y, 50.0);
    }

    #[test]
    fn test_wrap_left_and_top() {
        let mut p = primary_at(-2.5, -3.0, 2.0);
        wrap(&mut p, 300.0, 150.0);
        assert_eq!(p.position, Vec2::new(302.0, 152.0));
    }

    #[test]
    fn test_wrap_inside_band_is_noop() {
        let mut p = primary_at(301.0, -1.0, 2.0);
        wrap(&mut p, 300.0, 150.0);
        assert_eq!(p.position, Vec2::new(301.0, -1.0));
    }

    #[test]
    fn test_no_pointer_is_pure_translation() {
        let config = FieldConfig::default();
        let mut p = primary_at(100.0, 80.0, 2.0);
        step_particle(&mut p, None, 800.0, 600.0, &config);
        assert_eq!(p.position, Vec2::new(100.0, 80.0) + p.velocity);
    }

    #[test]
    fn test_steer_away_from_pointer() {
        let config = FieldConfig::default();
        // pointer up-left of the particle: pushed right and down
        let mut p = primary_at(400.0, 300.0, 2.0);
        steer(&mut p, Vec2::new(380.0, 290.0), 800.0, 600.0, &config);
        assert_eq!(p.position, Vec2::new(402.0, 302.0));

        // pointer down-right: pushed left and up
        let mut p = primary_at(400.0, 300.0, 2.0);
        steer(&mut p, Vec2::new(420.0, 310.0), 800.0, 600.0, &config);
        assert_eq!(p.position, Vec2::new(398.0, 298.0));
    }

    #[test]
    fn test_steer_applied_before_translation() {
        let config = FieldConfig::default();
        let mut p = primary_at(400.0, 300.0, 2.0);
        step_particle(&mut p, Some(Vec2::new(380.0, 290.0)), 800.0, 600.0, &config);
        assert!((p.position.x - 402.2).abs() < 1e-4);
        assert!((p.position.y - 302.1).abs() < 1e-4);
    }

    #[test]
    fn test_steer_outside_bubble() {
        let config = FieldConfig::default();
        let mut p = primary_at(400.0, 300.0, 2.0);
        // exactly pointer_radius + radius away: not inside
        steer(&mut p, Vec2::new(248.0, 300.0), 800.0, 600.0, &config);
        assert_eq!(p.position, Vec2::new(400.0, 300.0));
    }

    #[test]
    fn test_steer_same_axis_coordinate_not_moved() {
        let config = FieldConfig::default();
        let mut p = primary_at(400.0, 300.0, 2.0);
        steer(&mut p, Vec2::new(400.0, 250.0), 800.0, 600.0, &config);
        assert_eq!(p.position, Vec2::new(400.0, 302.0));
    }

    #[test]
    fn test_steer_blocked_at_inner_margin() {
        let config = FieldConfig::default();
        // radius 2 → margin 20; particle exactly on the right margin
        let mut p = primary_at(780.0, 300.0, 2.0);
        steer(&mut p, Vec2::new(760.0, 300.0), 800.0, 600.0, &config);
        assert_eq!(p.position.x, 780.0);

        // and exactly on the left margin
        let mut p = primary_at(20.0, 300.0, 2.0);
        steer(&mut p, Vec2::new(40.0, 300.0), 800.0, 600.0, &config);
        assert_eq!(p.position.x, 20.0);

        // top margin with the pointer below
        let mut p = primary_at(400.0, 20.0, 2.0);
        steer(&mut p, Vec2::new(400.0, 60.0), 800.0, 600.0, &config);
        assert_eq!(p.position.y, 20.0);
    }

    #[test]
    fn test_ambient_ignores_pointer() {
        let config = FieldConfig::default();
        let mut p = primary_at(400.0, 300.0, 1.0);
        p.kind = ParticleKind::Ambient;
        step_particle(&mut p, Some(Vec2::new(401.0, 301.0)), 800.0, 600.0, &config);
        assert_eq!(p.position, Vec2::new(400.0, 300.0) + p.velocity);
    }

    #[test]
    fn test_counts_300x150() {
        let field = Field::new(300, 150, seeded(), PointerState::new());
        assert_eq!(field.primary_count(), 3);
        assert_eq!(field.ambient_count(), 100);
    }

    #[test]
    fn test_degenerate_field_is_empty() {
        for (w, h) in [(0, 600), (800, 0), (0, 0)] {
            let mut field = Field::new(w, h, seeded(), PointerState::new());
            assert!(field.particles().is_empty());
            field.step();
            let mut surface = RecordingSurface::new();
            field.render(&mut surface);
            assert!(surface.commands.is_empty());
        }
    }

    #[test]
    fn test_resize_repopulates() {
        let mut field = Field::new(800, 600, seeded(), PointerState::new());
        assert_eq!(field.primary_count(), 32);
        let before: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();

        field.resize(400, 300);
        assert_eq!((field.width(), field.height()), (400, 300));
        assert_eq!(field.primary_count(), 8);
        assert_eq!(field.ambient_count(), 100);
        let after: Vec<Vec2> = field.particles().iter().map(|p| p.position).collect();
        assert_ne!(before[..8], after[..8]);
    }

    #[test]
    fn test_spawn_positions_inset() {
        let field = Field::new(1280, 720, seeded(), PointerState::new());
        for p in field.particles() {
            assert!(p.position.x >= p.radius * 2.0);
            assert!(p.position.x <= 1280.0 - p.radius * 2.0);
            assert!(p.position.y >= p.radius * 2.0);
            assert!(p.position.y <= 720.0 - p.radius * 2.0);
        }
    }

    #[test]
    fn test_link_threshold_and_opacity() {
        // 900x900 → threshold (100)² = 10000
        let mut field = Field::new(900, 900, seeded().with_ambient_count(0), PointerState::new());
        let particles = field.particles_mut();
        particles.clear();
        particles.push(primary_at(100.0, 100.0, 1.0));
        particles.push(primary_at(160.0, 180.0, 1.0)); // d² = 3600 + 6400 = 10000, not linked
        particles.push(primary_at(130.0, 140.0, 1.0)); // d² to first = 900 + 1600 = 2500

        let links = field.links();
        assert_eq!(links.len(), 2);

        let first = links.iter().find(|l| l.a == 0 && l.b == 2).unwrap();
        assert_eq!(first.distance_sq, 2500.0);
        assert!((first.raw_opacity - (1.0 - 2500.0 / 20000.0)).abs() < 1e-6);

        let second = links.iter().find(|l| l.a == 1 && l.b == 2).unwrap();
        assert_eq!(second.distance_sq, 2500.0);
        assert!(links.iter().all(|l| !(l.a == 0 && l.b == 1)));
    }

    #[test]
    fn test_link_opacity_clamped() {
        // Large surface: threshold far above the falloff, so raw opacity goes negative
        let mut field = Field::new(3600, 3600, seeded().with_ambient_count(0), PointerState::new());
        let particles = field.particles_mut();
        particles.clear();
        particles.push(primary_at(0.0, 0.0, 1.0));
        particles.push(primary_at(200.0, 0.0, 1.0)); // d² = 40000 < 160000

        let links = field.links();
        assert_eq!(links.len(), 1);
        assert!((links[0].raw_opacity - (-1.0)).abs() < 1e-6);
        assert_eq!(links[0].opacity(), 0.0);

        let mut surface = RecordingSurface::new();
        field.render(&mut surface);
        match surface.lines().next() {
            Some(DrawCommand::Line { color, width, .. }) => {
                assert_eq!(color.a, 0.0);
                assert_eq!(*width, 1.0);
            }
            other => panic!("expected a line, got {:?}", other),
        };
    }

    #[test]
    fn test_ambient_never_linked() {
        let mut field = Field::new(900, 900, seeded(), PointerState::new());
        let particles = field.particles_mut();
        particles.clear();
        particles.push(primary_at(100.0, 100.0, 1.0));
        let mut dust = primary_at(101.0, 100.0, 1.0);
        dust.kind = ParticleKind::Ambient;
        particles.push(dust);

        assert!(field.links().is_empty());
    }

    #[test]
    fn test_coincident_distinct_primaries_linked_once() {
        let mut field = Field::new(900, 900, seeded(), PointerState::new());
        let particles = field.particles_mut();
        particles.clear();
        particles.push(primary_at(50.0, 50.0, 1.0));
        particles.push(primary_at(50.0, 50.0, 1.0));

        let links = field.links();
        assert_eq!(links.len(), 1);
        assert_eq!((links[0].a, links[0].b), (0, 1));
        assert_eq!(links[0].opacity(), 1.0);
    }

    #[test]
    fn test_render_dots_then_links() {
        let mut field = Field::new(900, 900, seeded(), PointerState::new());
        let particles = field.particles_mut();
        particles.clear();
        particles.push(primary_at(10.0, 10.0, 1.5));
        particles.push(primary_at(20.0, 10.0, 2.5));

        let mut surface = RecordingSurface::new();
        field.render(&mut surface);
        assert_eq!(surface.commands.len(), 3);
        assert!(matches!(surface.commands[0], DrawCommand::Circle { radius, .. } if radius == 1.5));
        assert!(matches!(surface.commands[1], DrawCommand::Circle { radius, .. } if radius == 2.5));
        assert!(matches!(surface.commands[2], DrawCommand::Line { .. }));
    }

    #[test]
    fn test_step_uses_shared_pointer() {
        let pointer = PointerState::new();
        let mut field = Field::new(800, 600, seeded(), pointer.clone());
        let particles = field.particles_mut();
        particles.clear();
        particles.push(primary_at(400.0, 300.0, 2.0));

        pointer.set(Vec2::new(380.0, 290.0));
        field.step();
        let p = &field.particles()[0];
        assert!((p.position.x - 402.2).abs() < 1e-4);
        assert!((p.position.y - 302.1).abs() < 1e-4);
    }
}
