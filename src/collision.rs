/// Collision detection and response for Nhembi Survivor
///
/// Everything in this module is a pure function over [`Rect`]s. Nothing here owns
/// state: the level owns its static collision tiles, the phase owns its entities,
/// and both hand slices to these functions every tick.
///
/// # Architecture
///
/// - `Collidable` trait: implemented by entities that expose world bounds
/// - AABB queries: intersection, ratio-relaxed overlap, centre-distance tests
/// - Axis-separated resolution: move along X and clamp, then along Y and clamp
///
/// # Axis separation
///
/// Resolving both axes at once makes an entity sliding along a wall snag on
/// every tile seam. Moving one axis at a time and clamping to the edge that
/// blocks the direction of travel keeps the entity flush against walls while the
/// other axis keeps moving freely.
use crate::geometry::{Rect, Vec2};

/// Trait for entities that participate in collision queries.
///
/// # Example
///
/// ```ignore
/// impl Collidable for Pickup {
///     fn get_bounds(&self) -> Rect {
///         self.rect
///     }
/// }
/// ```
pub trait Collidable {
    /// Returns the axis-aligned bounding box used for collision.
    fn get_bounds(&self) -> Rect;
}

impl Collidable for Rect {
    fn get_bounds(&self) -> Rect {
        *self
    }
}

/// Checks if two axis-aligned bounding boxes intersect.
///
/// Two rectangles intersect if they overlap on both the X and Y axes. Shared
/// edges do not count as an intersection.
///
/// # Example
///
/// ```ignore
/// let player_bounds = Rect::new(10.0, 10.0, 32.0, 32.0);
/// let enemy_bounds = Rect::new(20.0, 20.0, 32.0, 32.0);
/// assert!(aabb_intersect(&player_bounds, &enemy_bounds));
/// ```
pub fn aabb_intersect(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.x + b.w && a.x + a.w > b.x;
    let y_overlap = a.y < b.y + b.h && a.y + a.h > b.y;

    x_overlap && y_overlap
}

/// Relaxed overlap test: both rectangles are shrunk about their centres by
/// `ratio` before testing.
///
/// Used for contact damage so that sprites have to visibly overlap before an
/// enemy lands a hit. A ratio of `1.0` is a plain AABB test.
pub fn collide_rect_ratio(a: &Rect, b: &Rect, ratio: f32) -> bool {
    aabb_intersect(&a.scaled_about_center(ratio), &b.scaled_about_center(ratio))
}

/// Centre-distance test, used for bullets against the player.
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) <= radius
}

/// Returns true if `rect` overlaps any of the obstacles.
pub fn any_overlap<'a, I>(rect: &Rect, obstacles: I) -> bool
where
    I: IntoIterator<Item = &'a Rect>,
{
    obstacles.into_iter().any(|o| aabb_intersect(rect, o))
}

/// Indices of the entities whose bounds intersect `rect`.
///
/// # Example
///
/// ```ignore
/// for index in overlapping_indices(&player.body(), &pickups) {
///     log::debug!("player touched pickup {}", index);
/// }
/// ```
pub fn overlapping_indices<T: Collidable>(rect: &Rect, entities: &[T]) -> Vec<usize> {
    entities
        .iter()
        .enumerate()
        .filter(|(_, other)| aabb_intersect(rect, &other.get_bounds()))
        .map(|(index, _)| index)
        .collect()
}

/// Overlap shorter than this along an axis counts as touching, not intersecting.
///
/// Clamping computes `edge - size` in floats, which can leave a body one ulp
/// inside the obstacle it was clamped to.
pub const CONTACT_EPSILON: f32 = 1e-3;

fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    a_min < b_max - CONTACT_EPSILON && a_max > b_min + CONTACT_EPSILON
}

/// Sweeps the span `[min, min + size)` by `delta` against `blockers` (their
/// extent along the same axis) and returns the new `min`.
///
/// Only blockers wholly ahead of the starting span can stop the move, so a body
/// that already overlaps something is never snapped across it.
fn sweep_axis<I>(min: f32, size: f32, delta: f32, blockers: I) -> f32
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let target = min + delta;
    if delta > 0.0 {
        let front = min + size;
        let nearest = blockers
            .into_iter()
            .filter(|&(b_min, _)| b_min >= front - CONTACT_EPSILON && b_min < front + delta)
            .map(|(b_min, _)| b_min)
            .fold(f32::INFINITY, f32::min);
        target.min((nearest - size).max(min))
    } else if delta < 0.0 {
        let nearest = blockers
            .into_iter()
            .filter(|&(_, b_max)| b_max <= min + CONTACT_EPSILON && b_max > target)
            .map(|(_, b_max)| b_max)
            .fold(f32::NEG_INFINITY, f32::max);
        target.max(nearest.min(min))
    } else {
        min
    }
}

/// Moves `rect` by `dx`, stopping at the first obstacle in the way.
///
/// The whole path is swept, so a fast move cannot tunnel through a tile to
/// reach one behind it. Obstacles the body only grazes on the Y axis (within
/// [`CONTACT_EPSILON`]) or already overlaps do not block.
pub fn resolve_axis_x<'a, I>(rect: Rect, dx: f32, obstacles: I) -> Rect
where
    I: IntoIterator<Item = &'a Rect>,
{
    let blockers = obstacles
        .into_iter()
        .filter(|o| spans_overlap(rect.top(), rect.bottom(), o.top(), o.bottom()))
        .map(|o| (o.left(), o.right()));

    let mut moved = rect;
    moved.x = sweep_axis(rect.x, rect.w, dx, blockers);
    moved
}

/// Y counterpart of [`resolve_axis_x`].
pub fn resolve_axis_y<'a, I>(rect: Rect, dy: f32, obstacles: I) -> Rect
where
    I: IntoIterator<Item = &'a Rect>,
{
    let blockers = obstacles
        .into_iter()
        .filter(|o| spans_overlap(rect.left(), rect.right(), o.left(), o.right()))
        .map(|o| (o.top(), o.bottom()));

    let mut moved = rect;
    moved.y = sweep_axis(rect.y, rect.h, dy, blockers);
    moved
}

/// Axis-separated move: X first, then Y, each clamped against `obstacles`.
///
/// # Example
///
/// ```ignore
/// let walls = [Rect::new(48.0, 0.0, 16.0, 64.0)];
/// let body = Rect::new(20.0, 10.0, 24.0, 24.0);
/// let moved = move_and_collide(body, Vec2::new(10.0, 5.0), walls.iter());
/// assert_eq!(moved.right(), 48.0); // blocked on X
/// assert_eq!(moved.y, 15.0);       // free on Y
/// ```
pub fn move_and_collide<'a, I>(rect: Rect, delta: Vec2, obstacles: I) -> Rect
where
    I: IntoIterator<Item = &'a Rect>,
    I::IntoIter: Clone,
{
    let obstacles = obstacles.into_iter();
    let after_x = resolve_axis_x(rect, delta.x, obstacles.clone());
    resolve_axis_y(after_x, delta.y, obstacles)
}
