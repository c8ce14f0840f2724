//! Integration of the physics world with a renderer
//!
//! [`Game`] owns the world, hands out object ids, and mirrors every object
//! into the renderer. Ids only ever grow; the physics core never recycles
//! them on its own, so a monotonic counter is enough.

use kartbox_physics::{translation, ObjectId, PhysicsWorld, WorldConfig};

use crate::renderer::Renderer;

/// Id of the static ground slab every scene starts with
pub const GROUND_ID: ObjectId = 0;

const GROUND_POSITION: [f32; 3] = [0.0, -8.0, -35.0];
const GROUND_HALF_EXTENTS: [f32; 3] = [10.0, 1.0, 10.0];

/// Game state: the physics world plus the renderer mirror
pub struct Game<R: Renderer> {
    physics: PhysicsWorld,
    renderer: R,
    last_id: ObjectId,
}

impl<R: Renderer> Game<R> {
    /// Create a game with default physics configuration
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, WorldConfig::default())
    }

    /// Create a game and seed the static ground slab
    pub fn with_config(mut renderer: R, config: WorldConfig) -> Self {
        let physics = PhysicsWorld::with_config(config);
        let [x, y, z] = GROUND_POSITION;
        let ground = translation(x, y, z);
        physics.add_box(GROUND_ID, ground, 0.0, GROUND_HALF_EXTENTS);
        renderer.add(GROUND_ID, ground);
        Self {
            physics,
            renderer,
            last_id: GROUND_ID,
        }
    }

    /// Drop a dynamic cube at the given position; mass scales with volume
    pub fn add_cube(&mut self, x: f32, y: f32, z: f32, scale: f32) -> ObjectId {
        let id = self.new_id();
        let transform = translation(x, y, z);
        self.physics
            .add_box(id, transform, scale * scale * scale, [scale, scale, scale]);
        self.renderer.add(id, transform);
        log::info!("cube {id} added at ({x}, {y}, {z}) scale {scale}");
        id
    }

    /// Drop a vehicle at the given position
    pub fn add_car(&mut self, x: f32, y: f32, z: f32) -> ObjectId {
        let id = self.new_id();
        let transform = translation(x, y, z);
        self.physics.add_vehicle(id, transform);
        self.renderer.add(id, transform);
        log::info!("car {id} added at ({x}, {y}, {z})");
        id
    }

    /// Remove an object from both the world and the renderer
    pub fn remove_cube(&mut self, id: ObjectId) {
        self.renderer.remove(id);
        self.physics.remove(id);
    }

    /// Forward all pose changes since the last call to the renderer
    ///
    /// Returns the number of transforms forwarded.
    pub fn pump_changes(&mut self) -> usize {
        let changes = self.physics.get_and_reset_changes();
        let count = changes.len();
        for (id, transform) in changes {
            self.renderer.set_transform(id, transform);
        }
        count
    }

    /// The underlying physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    fn new_id(&mut self) -> ObjectId {
        self.last_id += 1;
        self.last_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::NullRenderer;
    use kartbox_physics::{translation_of, Transform};

    /// Renderer double that records every call it receives
    #[derive(Default)]
    struct RecordingRenderer {
        added: Vec<ObjectId>,
        moved: Vec<ObjectId>,
        removed: Vec<ObjectId>,
    }

    impl Renderer for &mut RecordingRenderer {
        fn add(&mut self, id: ObjectId, _transform: Transform) {
            self.added.push(id);
        }
        fn set_transform(&mut self, id: ObjectId, _transform: Transform) {
            self.moved.push(id);
        }
        fn remove(&mut self, id: ObjectId) {
            self.removed.push(id);
        }
    }

    #[test]
    fn test_ground_is_seeded() {
        let mut renderer = RecordingRenderer::default();
        let game = Game::new(&mut renderer);
        game.physics().single_step();
        assert!(game.physics().debug_dump().contains("#0 static box"));

        drop(game);
        assert_eq!(renderer.added, vec![GROUND_ID]);
    }

    #[test]
    fn test_ids_are_monotonic_and_unique() {
        let mut game = Game::new(NullRenderer);
        let first = game.add_cube(0.0, 15.0, -35.0, 0.5);
        let second = game.add_cube(1.0, 17.0, -34.0, 0.5);
        let third = game.add_car(0.0, 2.0, -35.0);

        assert!(GROUND_ID < first);
        assert!(first < second && second < third);

        // Removal does not make the game reuse an id
        game.remove_cube(second);
        let fourth = game.add_cube(0.0, 20.0, -35.0, 0.5);
        assert!(third < fourth);
    }

    #[test]
    fn test_pump_changes_forwards_moving_cubes_only() {
        let mut renderer = RecordingRenderer::default();
        let mut game = Game::new(&mut renderer);
        let cube = game.add_cube(0.0, 15.0, -35.0, 0.5);

        game.physics().single_step();
        let forwarded = game.pump_changes();
        assert_eq!(forwarded, 1);

        drop(game);
        assert_eq!(renderer.moved, vec![cube]);
    }

    #[test]
    fn test_cube_mass_scales_with_volume() {
        // A 2x cube weighs 8x: visible through the solver's mass report
        let mut game = Game::new(NullRenderer);
        let cube = game.add_cube(0.0, 15.0, -35.0, 2.0);
        game.physics().single_step();

        let dump = game.physics().debug_dump();
        let line = dump
            .lines()
            .find(|line| line.contains(&format!("#{cube} ")))
            .expect("cube must be listed");
        assert!(line.contains("mass: 8.000"), "unexpected line: {line}");
    }

    #[test]
    fn test_removed_cube_stops_reporting() {
        let mut renderer = RecordingRenderer::default();
        let mut game = Game::new(&mut renderer);
        let cube = game.add_cube(0.0, 15.0, -35.0, 0.5);

        game.physics().single_step();
        game.remove_cube(cube);
        game.physics().single_step();
        game.pump_changes();

        drop(game);
        assert_eq!(renderer.removed, vec![cube]);
        assert!(!renderer.moved.contains(&cube));
    }

    #[test]
    fn test_falling_cube_loses_height() {
        let mut game = Game::new(NullRenderer);
        let cube = game.add_cube(0.0, 15.0, -35.0, 0.5);

        for _ in 0..60 {
            game.physics().single_step();
        }
        let changes = game.physics().get_and_reset_changes();
        let height = translation_of(changes.get(&cube).expect("cube must move")).y;
        assert!(height < 15.0);
    }
}
