//! Consumption Rule
//!
//! Once per flight tick the stack tries to eat from the single debris object
//! whose pose is nearest. Any of that object's blocks whose world position is
//! within the eat radius of the stack is removed; an object left with no
//! blocks is removed from the world.

use glam::Vec3;

use super::object::CompositeObject;

/// Outcome of one consumption check.
#[derive(Debug)]
pub struct ConsumeReport {
    /// Index (before any removal) of the object that was tested
    pub object: usize,
    /// Blocks eaten this tick
    pub eaten: usize,
    /// The tested object, if it was emptied and removed
    pub removed: Option<CompositeObject>,
}

/// Index of the object whose pose position is nearest `point`. Ties go to the earliest.
pub fn nearest(objects: &[CompositeObject], point: Vec3) -> Option<usize> {
    objects
        .iter()
        .enumerate()
        .map(|(i, o)| (i, o.pose.position.distance(point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// Run the consumption rule against `debris` for a stack at `stack_position`.
///
/// Returns `None` when there is no debris.
pub fn consume_nearest(
    stack_position: Vec3,
    debris: &mut Vec<CompositeObject>,
    radius: f32,
) -> Option<ConsumeReport> {
    let index = nearest(debris, stack_position)?;
    let object = &mut debris[index];

    let eaten: Vec<usize> = object
        .blocks()
        .iter()
        .enumerate()
        .filter(|(_, block)| object.world_position(block).distance(stack_position) < radius)
        .map(|(i, _)| i)
        .collect();
    let eaten = object.remove_blocks(&eaten);

    let removed = if object.is_empty() {
        Some(debris.remove(index))
    } else {
        None
    };

    Some(ConsumeReport {
        object: index,
        eaten,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::block::Block;
    use crate::game::shapes::Shape;
    use crate::math::{FreePose, GridPose};

    fn debris_at(position: Vec3, local: &[Vec3]) -> CompositeObject {
        let mut object = CompositeObject::new(8);
        object.pose = FreePose::at(position);
        for &p in local {
            object.push_block(Block::new(Shape::unit_cube(), GridPose::at(p)));
        }
        object
    }

    #[test]
    fn test_nearest_prefers_first_on_tie() {
        let objects = vec![
            debris_at(Vec3::new(3.0, 0.0, 0.0), &[Vec3::ZERO]),
            debris_at(Vec3::new(-3.0, 0.0, 0.0), &[Vec3::ZERO]),
        ];
        assert_eq!(nearest(&objects, Vec3::ZERO), Some(0));
        assert_eq!(nearest(&[], Vec3::ZERO), None);
    }

    #[test]
    fn test_emptied_object_is_removed() {
        let mut debris = vec![debris_at(Vec3::new(0.5, 0.0, 0.0), &[Vec3::ZERO])];
        let report = consume_nearest(Vec3::ZERO, &mut debris, 1.0).unwrap();
        assert_eq!(report.eaten, 1);
        assert!(report.removed.is_some());
        assert!(debris.is_empty());
    }

    #[test]
    fn test_block_exactly_at_radius_survives() {
        let mut debris = vec![debris_at(Vec3::new(1.0, 0.0, 0.0), &[Vec3::ZERO])];
        let report = consume_nearest(Vec3::ZERO, &mut debris, 1.0).unwrap();
        assert_eq!(report.eaten, 0);
        assert_eq!(debris.len(), 1);
    }
}
