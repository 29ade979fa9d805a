//! Collision shapes and shape-vs-shape overlap
//!
//! Shapes are defined in body-local space, centered on the body position,
//! y-up. Three kinds exist:
//! - `Rect`: axis-aligned box (trigger volumes, ground)
//! - `Polygon`: convex outline (rocks)
//! - `Mask`: pixel-accurate solidity mask derived from a texture (player)
//!
//! Collision shapes never rotate; the player's tilt is visual only.

use std::sync::Arc;

use glam::Vec2;

use crate::cross;

/// A convex polygon with counter-clockwise vertices
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
}

impl ConvexPolygon {
    /// Build from vertices in either winding. Returns `None` if the outline
    /// is degenerate or not convex.
    pub fn new(mut vertices: Vec<Vec2>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }

        let area = signed_area(&vertices);
        if area.abs() < f32::EPSILON {
            return None;
        }
        if area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            if cross(b - a, c - b) < 0.0 {
                return None;
            }
        }

        Some(Self { vertices })
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Point containment (boundary counts as inside)
    pub fn contains(&self, p: Vec2) -> bool {
        self.edges().all(|(a, b)| cross(b - a, p - a) >= 0.0)
    }

    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn half_extents(&self) -> Vec2 {
        self.vertices
            .iter()
            .fold(Vec2::ZERO, |acc, v| acc.max(v.abs()))
    }

    fn flipped_vertically(&self) -> Self {
        // Mirroring reverses winding; reverse again to stay CCW
        let mut vertices: Vec<Vec2> = self.vertices.iter().map(|v| Vec2::new(v.x, -v.y)).collect();
        vertices.reverse();
        Self { vertices }
    }

    fn translated(&self, offset: Vec2) -> Vec<Vec2> {
        self.vertices.iter().map(|v| *v + offset).collect()
    }
}

fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    (0..n)
        .map(|i| cross(vertices[i], vertices[(i + 1) % n]))
        .sum::<f32>()
        * 0.5
}

/// Pixel solidity mask, one point per pixel, rows stored bottom-up
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMask {
    width: u32,
    height: u32,
    solid: Vec<bool>,
}

impl PixelMask {
    /// Build from a predicate over (column, row), row 0 at the bottom
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let mut solid = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                solid.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            solid,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of solid pixels
    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|&&s| s).count()
    }

    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.solid[(y * self.width + x) as usize]
    }

    fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32) * 0.5
    }

    /// Solidity at a body-local point
    pub fn contains(&self, p: Vec2) -> bool {
        let local = p + self.half_extents();
        if local.x < 0.0 || local.y < 0.0 {
            return false;
        }
        self.is_solid(local.x as u32, local.y as u32)
    }

    /// Local center of pixel (x, y)
    fn pixel_center(&self, x: u32, y: u32) -> Vec2 {
        Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - self.half_extents()
    }

    fn flipped_vertically(&self) -> Self {
        Self::from_fn(self.width, self.height, |x, y| {
            self.is_solid(x, self.height - 1 - y)
        })
    }
}

/// A body's collision shape
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { half_extents: Vec2 },
    Polygon(ConvexPolygon),
    Mask(Arc<PixelMask>),
}

impl Shape {
    pub fn rect(width: f32, height: f32) -> Self {
        Shape::Rect {
            half_extents: Vec2::new(width, height) * 0.5,
        }
    }

    /// Half size of the local bounding box
    pub fn half_extents(&self) -> Vec2 {
        match self {
            Shape::Rect { half_extents } => *half_extents,
            Shape::Polygon(poly) => poly.half_extents(),
            Shape::Mask(mask) => mask.half_extents(),
        }
    }

    /// Full bounding box size
    pub fn size(&self) -> Vec2 {
        self.half_extents() * 2.0
    }

    /// Whether a body-local point is inside the shape
    pub fn contains_local(&self, p: Vec2) -> bool {
        match self {
            Shape::Rect { half_extents } => {
                p.x.abs() <= half_extents.x && p.y.abs() <= half_extents.y
            }
            Shape::Polygon(poly) => poly.contains(p),
            Shape::Mask(mask) => mask.contains(p),
        }
    }

    /// Upside-down copy (used for the hanging rock)
    pub fn flipped_vertically(&self) -> Self {
        match self {
            Shape::Rect { .. } => self.clone(),
            Shape::Polygon(poly) => Shape::Polygon(poly.flipped_vertically()),
            Shape::Mask(mask) => Shape::Mask(Arc::new(mask.flipped_vertically())),
        }
    }

    fn world_polygon(&self, pos: Vec2) -> Option<Vec<Vec2>> {
        match self {
            Shape::Rect { half_extents } => {
                let h = *half_extents;
                Some(vec![
                    pos + Vec2::new(-h.x, -h.y),
                    pos + Vec2::new(h.x, -h.y),
                    pos + Vec2::new(h.x, h.y),
                    pos + Vec2::new(-h.x, h.y),
                ])
            }
            Shape::Polygon(poly) => Some(poly.translated(pos)),
            Shape::Mask(_) => None,
        }
    }
}

/// World-space axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn of(shape: &Shape, pos: Vec2) -> Self {
        let h = shape.half_extents();
        Self {
            min: pos - h,
            max: pos + h,
        }
    }

    /// Strict overlap: touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    fn intersection(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }
}

/// Test two placed shapes for overlap
pub fn shapes_overlap(a: &Shape, pos_a: Vec2, b: &Shape, pos_b: Vec2) -> bool {
    let box_a = Aabb::of(a, pos_a);
    let box_b = Aabb::of(b, pos_b);
    if !box_a.overlaps(&box_b) {
        return false;
    }

    match (a, b) {
        (Shape::Rect { .. }, Shape::Rect { .. }) => true,
        (Shape::Mask(mask), _) => mask_overlaps(mask, pos_a, b, pos_b, &box_a.intersection(&box_b)),
        (_, Shape::Mask(mask)) => mask_overlaps(mask, pos_b, a, pos_a, &box_a.intersection(&box_b)),
        _ => match (a.world_polygon(pos_a), b.world_polygon(pos_b)) {
            (Some(pa), Some(pb)) => polygons_overlap(&pa, &pb),
            _ => false,
        },
    }
}

/// Any solid mask pixel inside `region` whose center lies in `other`
fn mask_overlaps(
    mask: &PixelMask,
    pos: Vec2,
    other: &Shape,
    other_pos: Vec2,
    region: &Aabb,
) -> bool {
    let origin = pos - mask.half_extents();
    let lo = (region.min - origin).max(Vec2::ZERO).floor();
    let hi = (region.max - origin)
        .min(Vec2::new(mask.width as f32, mask.height as f32))
        .ceil();

    for y in lo.y as u32..hi.y as u32 {
        for x in lo.x as u32..hi.x as u32 {
            if !mask.is_solid(x, y) {
                continue;
            }
            let world = pos + mask.pixel_center(x, y);
            if other.contains_local(world - other_pos) {
                return true;
            }
        }
    }
    false
}

/// Separating axis test for two convex CCW polygons
fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    !has_separating_axis(a, b) && !has_separating_axis(b, a)
}

fn has_separating_axis(poly: &[Vec2], other: &[Vec2]) -> bool {
    let n = poly.len();
    (0..n).any(|i| {
        let edge = poly[(i + 1) % n] - poly[i];
        let axis = Vec2::new(edge.y, -edge.x);
        let (min_a, max_a) = project(poly, axis);
        let (min_b, max_b) = project(other, axis);
        max_a <= min_b || max_b <= min_a
    })
}

fn project(poly: &[Vec2], axis: Vec2) -> (f32, f32) {
    poly.iter().fold((f32::MAX, f32::MIN), |(lo, hi), v| {
        let d = v.dot(axis);
        (lo.min(d), hi.max(d))
    })
}
