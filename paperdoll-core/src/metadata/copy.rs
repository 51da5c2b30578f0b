use super::schema::FrameMetadata;

/// A single copyable field group of [`FrameMetadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    HeadSprite,
    HeadOffset,
    OverrideHeadDirection,
    HeadInFrontOfTorso,
    WeaponBackPosition,
    WeaponBackRotation,
    WeaponBackInFrontOfTorso,
    WeaponVisible,
}

impl MetadataField {
    /// Fields describing the holstered weapon, shared between skins.
    pub const WEAPON_BACK: [MetadataField; 4] = [
        MetadataField::WeaponBackPosition,
        MetadataField::WeaponBackRotation,
        MetadataField::WeaponBackInFrontOfTorso,
        MetadataField::WeaponVisible,
    ];

    pub fn copy(self, from: &FrameMetadata, to: &mut FrameMetadata) {
        match self {
            MetadataField::HeadSprite => to.head_sprite_override = from.head_sprite_override,
            MetadataField::HeadOffset => to.head_offset = from.head_offset,
            MetadataField::OverrideHeadDirection => to.override_head_direction = from.override_head_direction,
            MetadataField::HeadInFrontOfTorso => to.head_in_front_of_torso = from.head_in_front_of_torso,
            MetadataField::WeaponBackPosition => to.weapon_back_position = from.weapon_back_position,
            MetadataField::WeaponBackRotation => to.weapon_back_rotation = from.weapon_back_rotation,
            MetadataField::WeaponBackInFrontOfTorso => {
                to.weapon_back_in_front_of_torso = from.weapon_back_in_front_of_torso
            }
            MetadataField::WeaponVisible => to.weapon_visible = from.weapon_visible,
        }
    }
}

/// Copy `fields` from each record of `from` onto the record at the same
/// position in `to`. Stops at the shorter list; returns the records touched.
pub fn copy_fields(from: &[FrameMetadata], to: &mut [FrameMetadata], fields: &[MetadataField]) -> usize {
    if from.len() != to.len() {
        log::warn!(
            "mismatched metadata counts: source has {}, destination has {}; copying up to the shorter list",
            from.len(),
            to.len()
        );
    }
    let mut touched = 0;
    for (src, dst) in from.iter().zip(to.iter_mut()) {
        for field in fields {
            field.copy(src, dst);
        }
        touched += 1;
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Point;

    fn armed(rotation: f32) -> FrameMetadata {
        FrameMetadata {
            head_offset: Point::new(9, 9),
            weapon_back_position: Point::new(3, -2),
            weapon_back_rotation: rotation,
            weapon_back_in_front_of_torso: true,
            weapon_visible: false,
            ..FrameMetadata::default()
        }
    }

    #[test]
    fn copies_only_selected_fields() {
        let from = vec![armed(45.0)];
        let mut to = vec![FrameMetadata::default()];
        assert_eq!(copy_fields(&from, &mut to, &MetadataField::WEAPON_BACK), 1);

        assert_eq!(to[0].weapon_back_position, Point::new(3, -2));
        assert_eq!(to[0].weapon_back_rotation, 45.0);
        assert!(to[0].weapon_back_in_front_of_torso);
        assert!(!to[0].weapon_visible);
        // untouched
        assert_eq!(to[0].head_offset, Point::new(0, 18));
    }

    #[test]
    fn clamps_to_shorter_list() {
        let from = vec![armed(1.0), armed(2.0), armed(3.0)];
        let mut to = vec![FrameMetadata::default(); 2];
        assert_eq!(copy_fields(&from, &mut to, &[MetadataField::WeaponBackRotation]), 2);
        assert_eq!(to[1].weapon_back_rotation, 2.0);

        let mut longer = vec![FrameMetadata::default(); 4];
        assert_eq!(copy_fields(&from[..1], &mut longer, &[MetadataField::WeaponBackRotation]), 1);
        assert_eq!(longer[1].weapon_back_rotation, 0.0);
    }
}
