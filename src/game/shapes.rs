//! Block Shapes
//!
//! Immutable cube-offset tables. Blocks share their shape through an `Arc`,
//! so a catalogue can hand the same shape to any number of blocks.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use super::config::ConfigError;

/// Local cube offsets of a block, relative to its pivot.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    cubes: Arc<[Vec3]>,
}

impl Shape {
    pub fn new(cubes: impl Into<Arc<[Vec3]>>) -> Self {
        Self {
            cubes: cubes.into(),
        }
    }

    /// A single cube at the pivot (debris blocks).
    pub fn unit_cube() -> Self {
        Self::new(vec![Vec3::ZERO])
    }

    pub fn cubes(&self) -> &[Vec3] {
        &self.cubes
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }
}

const T_CUBES: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

const I_CUBES: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(2.0, 0.0, 0.0),
];

const S_CUBES: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 0.0),
];

const L_CUBES: [Vec3; 4] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(-1.0, 0.0, 0.0),
    Vec3::new(-2.0, 0.0, 0.0),
    Vec3::new(0.0, 1.0, 0.0),
];

/// The set of shapes falling blocks are drawn from, uniformly.
#[derive(Clone, Debug)]
pub struct ShapeCatalogue {
    shapes: Vec<Shape>,
}

impl Default for ShapeCatalogue {
    fn default() -> Self {
        Self::tetrominoes()
    }
}

impl ShapeCatalogue {
    /// The four stacking shapes: T, I, S and L.
    pub fn tetrominoes() -> Self {
        Self {
            shapes: [T_CUBES, I_CUBES, S_CUBES, L_CUBES]
                .into_iter()
                .map(|cubes| Shape::new(cubes.to_vec()))
                .collect(),
        }
    }

    /// Custom catalogue; every shape needs at least one cube.
    pub fn new(shapes: Vec<Shape>) -> Result<Self, ConfigError> {
        if shapes.is_empty() || shapes.iter().any(Shape::is_empty) {
            return Err(ConfigError::EmptyShapeCatalogue);
        }
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Pick one shape uniformly at random.
    pub fn choose(&self, rng: &mut impl Rng) -> Shape {
        self.shapes[rng.gen_range(0..self.shapes.len())].clone()
    }

    /// Largest cube count of any shape.
    pub fn max_cubes(&self) -> usize {
        self.shapes.iter().map(Shape::len).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_tetrominoes_have_four_cubes() {
        let catalogue = ShapeCatalogue::tetrominoes();
        assert_eq!(catalogue.shapes().len(), 4);
        assert!(catalogue.shapes().iter().all(|s| s.len() == 4));
        assert_eq!(catalogue.max_cubes(), 4);
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        assert!(matches!(
            ShapeCatalogue::new(Vec::new()),
            Err(ConfigError::EmptyShapeCatalogue)
        ));
        assert!(ShapeCatalogue::new(vec![Shape::new(Vec::<Vec3>::new())]).is_err());
    }

    #[test]
    fn test_choose_covers_every_shape() {
        let catalogue = ShapeCatalogue::tetrominoes();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let shape = catalogue.choose(&mut rng);
            let index = catalogue.shapes().iter().position(|s| *s == shape).unwrap();
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
