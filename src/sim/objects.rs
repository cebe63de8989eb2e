//! Entity registry
//!
//! Owns every live object of a level. Engines borrow the registry mutably
//! for a tick and may change entity fields in place, but balls and
//! power-ups are only ever created or destroyed through the registry.

use glam::Vec2;

use super::geometry::Rect;
use super::level::{GridSize, LevelDescriptor};
use super::state::{Ball, Brick, Paddle, PlayField, Powerup, PowerupKind, Wall};
use crate::consts::*;
use crate::error::SimError;

/// Brick cells stored column-major, so iteration order has the row
/// varying fastest
#[derive(Debug, Clone, Default)]
pub struct BrickGrid {
    columns: u32,
    rows: u32,
    bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Every cell of the grid, all broken except `active`
    fn build(field: &PlayField, grid: GridSize, active: &[(u32, u32)]) -> Self {
        let width = field.width / grid.columns as f32;
        let mut bricks = Vec::with_capacity(grid.columns as usize * grid.rows as usize);
        for column in 0..grid.columns {
            for row in 0..grid.rows {
                bricks.push(Brick {
                    column,
                    row,
                    rect: Rect::new(
                        column as f32 * width,
                        row as f32 * BRICK_HEIGHT,
                        width,
                        BRICK_HEIGHT,
                    ),
                    broken: true,
                });
            }
        }

        let mut grid = Self {
            columns: grid.columns,
            rows: grid.rows,
            bricks,
        };
        for &(column, row) in active {
            if let Some(brick) = grid.get_mut(column, row) {
                brick.broken = false;
            }
        }
        grid
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    fn index(&self, column: u32, row: u32) -> Option<usize> {
        (column < self.columns && row < self.rows)
            .then(|| column as usize * self.rows as usize + row as usize)
    }

    pub fn get(&self, column: u32, row: u32) -> Option<&Brick> {
        self.index(column, row).map(|i| &self.bricks[i])
    }

    pub fn get_mut(&mut self, column: u32, row: u32) -> Option<&mut Brick> {
        self.index(column, row).map(move |i| &mut self.bricks[i])
    }

    /// All cells in scan order
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.is_active()).count()
    }
}

/// Split borrow of the registry's collections for a single pass.
///
/// Slices let callers change entities but not the collections' lengths.
pub struct EntitiesMut<'a> {
    pub field: &'a PlayField,
    pub paddle: &'a mut Paddle,
    pub balls: &'a mut [Ball],
    pub walls: &'a [Wall],
    pub bricks: &'a mut BrickGrid,
    pub powerups: &'a mut [Powerup],
}

/// Canonical owner of all live objects
#[derive(Debug, Clone)]
pub struct ObjectManager {
    field: PlayField,
    paddle: Paddle,
    balls: Vec<Ball>,
    walls: Vec<Wall>,
    bricks: BrickGrid,
    powerups: Vec<Powerup>,
    next_id: u32,
}

impl ObjectManager {
    /// An empty registry for a field; call [`init_all`](Self::init_all)
    /// before simulating
    pub fn new(field: PlayField) -> Self {
        Self {
            paddle: Paddle::new(&field),
            field,
            balls: Vec::new(),
            walls: Vec::new(),
            bricks: BrickGrid::default(),
            powerups: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild every collection for a level.
    ///
    /// Without a descriptor the first `DEFAULT_ACTIVE_ROWS` rows start
    /// active. An invalid descriptor leaves the registry unchanged.
    pub fn init_all(&mut self, level: Option<&LevelDescriptor>) -> Result<(), SimError> {
        let (grid, active) = match level {
            Some(level) => (level.validate(&self.field)?, level.active.clone()),
            None => {
                let grid = GridSize::for_field(&self.field);
                let rows = DEFAULT_ACTIVE_ROWS.min(grid.rows);
                let active = (0..grid.columns)
                    .flat_map(|column| (0..rows).map(move |row| (column, row)))
                    .collect::<Vec<_>>();
                (grid, active)
            }
        };

        self.next_id = 1;
        self.paddle = Paddle::new(&self.field);
        self.walls = Wall::boundary(&self.field);
        self.bricks = BrickGrid::build(&self.field, grid, &active);
        self.powerups.clear();
        self.balls.clear();

        let launch = Vec2::new(BALL_LAUNCH_ANGLE.sin(), BALL_LAUNCH_ANGLE.cos()) * BALL_START_SPEED;
        self.add_ball(self.field.center(), launch, BALL_RADIUS);

        log::info!(
            "Level {} loaded: {}x{} grid, {} active bricks",
            level.and_then(|l| l.name.as_deref()).unwrap_or("<default>"),
            grid.columns,
            grid.rows,
            self.bricks.active_count()
        );
        Ok(())
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_ball(&mut self, pos: Vec2, vel: Vec2, radius: f32) -> u32 {
        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos, vel, radius));
        id
    }

    /// Remove a ball by id; remaining balls keep their order
    pub fn remove_ball(&mut self, id: u32) -> Option<Ball> {
        let index = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(index))
    }

    pub fn add_powerup(&mut self, kind: PowerupKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.powerups.push(Powerup::new(id, kind, pos));
        id
    }

    /// Remove a power-up by id; remaining power-ups keep their order
    pub fn remove_powerup(&mut self, id: u32) -> Option<Powerup> {
        let index = self.powerups.iter().position(|p| p.id == id)?;
        Some(self.powerups.remove(index))
    }

    pub fn field(&self) -> &PlayField {
        &self.field
    }

    pub fn paddle(&self) -> &Paddle {
        &self.paddle
    }

    pub fn paddle_mut(&mut self) -> &mut Paddle {
        &mut self.paddle
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    pub fn ball_count(&self) -> usize {
        self.balls.len()
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn bricks(&self) -> &BrickGrid {
        &self.bricks
    }

    pub fn bricks_mut(&mut self) -> &mut BrickGrid {
        &mut self.bricks
    }

    pub fn active_brick_count(&self) -> usize {
        self.bricks.active_count()
    }

    pub fn powerups(&self) -> &[Powerup] {
        &self.powerups
    }

    /// Borrow all collections at once for an engine pass
    pub fn entities_mut(&mut self) -> EntitiesMut<'_> {
        EntitiesMut {
            field: &self.field,
            paddle: &mut self.paddle,
            balls: &mut self.balls,
            walls: &self.walls,
            bricks: &mut self.bricks,
            powerups: &mut self.powerups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(level: Option<&LevelDescriptor>) -> ObjectManager {
        let mut objects = ObjectManager::new(PlayField::default());
        objects.init_all(level).unwrap();
        objects
    }

    #[test]
    fn test_init_all_default_layout() {
        let objects = loaded(None);
        assert_eq!(objects.bricks().columns(), BRICK_COLUMNS);
        assert_eq!(objects.bricks().rows(), 30);
        assert_eq!(objects.bricks().len(), 10 * 30);
        assert_eq!(
            objects.active_brick_count(),
            (BRICK_COLUMNS * DEFAULT_ACTIVE_ROWS) as usize
        );
        assert_eq!(objects.ball_count(), 1);
        assert_eq!(objects.walls().len(), 3);
        assert!(objects.powerups().is_empty());

        let ball = &objects.balls()[0];
        assert_eq!(ball.pos, objects.field().center());
        assert_eq!(ball.radius, BALL_RADIUS);
    }

    #[test]
    fn test_init_all_row_zero_only() {
        let level = LevelDescriptor::with_rows([0]);
        let objects = loaded(Some(&level));
        assert_eq!(objects.active_brick_count(), 10);
        for brick in objects.bricks().iter() {
            assert_eq!(brick.broken, brick.row != 0);
        }
    }

    #[test]
    fn test_init_all_is_idempotent() {
        let level = LevelDescriptor::with_rows([0, 2, 4]);
        let mut objects = loaded(Some(&level));
        objects.add_powerup(PowerupKind::SlowBall, Vec2::new(10.0, 10.0));
        objects.add_ball(Vec2::ZERO, Vec2::ONE, BALL_RADIUS);
        let first = objects.active_brick_count();

        objects.init_all(Some(&level)).unwrap();
        assert_eq!(objects.active_brick_count(), first);
        assert_eq!(objects.ball_count(), 1);
        assert_eq!(objects.walls().len(), 3);
        assert!(objects.powerups().is_empty());
        assert_eq!(objects.balls()[0].id, 1);
    }

    #[test]
    fn test_invalid_descriptor_leaves_state_untouched() {
        let mut objects = loaded(None);
        objects.bricks_mut().get_mut(0, 0).unwrap().broken = true;
        let before = objects.active_brick_count();

        let bad = LevelDescriptor {
            active: vec![(42, 0)],
            ..Default::default()
        };
        assert!(matches!(
            objects.init_all(Some(&bad)),
            Err(SimError::InvalidLevelDescriptor(_))
        ));
        assert_eq!(objects.active_brick_count(), before);
    }

    #[test]
    fn test_oversized_grid_is_rejected_without_building() {
        let mut objects = loaded(None);
        let huge = LevelDescriptor {
            columns: Some(1 << 31),
            rows: Some(2),
            ..Default::default()
        };
        assert!(matches!(
            objects.init_all(Some(&huge)),
            Err(SimError::InvalidLevelDescriptor(_))
        ));
        assert_eq!(objects.bricks().columns(), BRICK_COLUMNS);
        assert_eq!(objects.bricks().len(), 10 * 30);
    }

    #[test]
    fn test_grid_scan_order_row_fastest() {
        let objects = loaded(None);
        let cells: Vec<_> = objects.bricks().iter().take(3).map(|b| (b.column, b.row)).collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (0, 2)]);
        let brick = objects.bricks().get(3, 2).unwrap();
        assert_eq!((brick.column, brick.row), (3, 2));
        assert_eq!(brick.rect.min, Vec2::new(240.0, 40.0));
        assert!(objects.bricks().get(10, 0).is_none());
    }

    #[test]
    fn test_add_remove_by_id() {
        let mut objects = loaded(None);
        let a = objects.add_ball(Vec2::ZERO, Vec2::ONE, BALL_RADIUS);
        let b = objects.add_ball(Vec2::ONE, Vec2::ONE, BALL_RADIUS);
        assert_eq!(objects.remove_ball(a).map(|ball| ball.id), Some(a));
        assert!(objects.remove_ball(a).is_none());
        assert_eq!(objects.balls().last().map(|ball| ball.id), Some(b));

        let p = objects.add_powerup(PowerupKind::ExtraBall, Vec2::ZERO);
        assert_eq!(objects.powerups().len(), 1);
        assert_eq!(objects.remove_powerup(p).map(|p| p.kind), Some(PowerupKind::ExtraBall));
        assert!(objects.powerups().is_empty());
    }
}
