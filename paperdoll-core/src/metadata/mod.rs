//! XML sidecar metadata: one record per frame, in frame order.

pub mod copy;
pub mod schema;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{SheetError, SheetResult};
use schema::{FrameMetadataDoc, LegMetadataDoc};

pub use copy::{copy_fields, MetadataField};
pub use schema::{FrameMetadata, LegFrameMetadata, Point};

pub fn frame_metadata_from_str(s: &str) -> Result<Vec<FrameMetadata>, quick_xml::DeError> {
    let doc: FrameMetadataDoc = quick_xml::de::from_str(s)?;
    Ok(doc.frames)
}

pub fn leg_metadata_from_str(s: &str) -> Result<Vec<LegFrameMetadata>, quick_xml::DeError> {
    let doc: LegMetadataDoc = quick_xml::de::from_str(s)?;
    Ok(doc.frames)
}

/// Serialize without indentation or an XML declaration.
pub fn frame_metadata_to_string(frames: &[FrameMetadata]) -> SheetResult<String> {
    to_xml(&FrameMetadataDoc { frames: frames.to_vec() })
}

pub fn leg_metadata_to_string(frames: &[LegFrameMetadata]) -> SheetResult<String> {
    to_xml(&LegMetadataDoc { frames: frames.to_vec() })
}

pub fn load_frame_metadata<P: AsRef<Path>>(path: P) -> SheetResult<Vec<FrameMetadata>> {
    let doc: FrameMetadataDoc = load_doc(path.as_ref())?;
    Ok(doc.frames)
}

pub fn load_leg_metadata<P: AsRef<Path>>(path: P) -> SheetResult<Vec<LegFrameMetadata>> {
    let doc: LegMetadataDoc = load_doc(path.as_ref())?;
    Ok(doc.frames)
}

pub fn save_frame_metadata<P: AsRef<Path>>(path: P, frames: &[FrameMetadata]) -> SheetResult<()> {
    write_doc(path.as_ref(), &frame_metadata_to_string(frames)?)
}

pub fn save_leg_metadata<P: AsRef<Path>>(path: P, frames: &[LegFrameMetadata]) -> SheetResult<()> {
    write_doc(path.as_ref(), &leg_metadata_to_string(frames)?)
}

fn load_doc<D: DeserializeOwned>(path: &Path) -> SheetResult<D> {
    if !path.is_file() {
        return Err(SheetError::NotFound { path: path.to_path_buf() });
    }
    let data = std::fs::read_to_string(path)
        .map_err(|source| SheetError::Io { path: path.to_path_buf(), source })?;
    let doc = quick_xml::de::from_str(&data)
        .map_err(|e| SheetError::Parse { path: path.to_path_buf(), message: e.to_string() })?;
    log::debug!("loaded metadata from '{}'", path.display());
    Ok(doc)
}

fn to_xml<T: Serialize>(doc: &T) -> SheetResult<String> {
    quick_xml::se::to_string(doc).map_err(|e| SheetError::Serialize(e.to_string()))
}

fn write_doc(path: &Path, xml: &str) -> SheetResult<()> {
    std::fs::write(path, xml).map_err(|source| SheetError::Io { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TORSO_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ArrayOfSpriteData xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <SpriteData>
    <headSprite>3</headSprite>
    <headOffset><x>2</x><y>20</y></headOffset>
    <overrideHeadDirection>true</overrideHeadDirection>
    <headInFrontOfTorso>false</headInFrontOfTorso>
    <weaponBackPosition><x>-4</x><y>7</y></weaponBackPosition>
    <weaponBackRotation>12.5</weaponBackRotation>
    <weaponBackInFrontOfTorso>true</weaponBackInFrontOfTorso>
    <weaponVisible>false</weaponVisible>
  </SpriteData>
  <SpriteData>
    <headOffset><x>-1</x><y>17</y></headOffset>
  </SpriteData>
  <SpriteData/>
</ArrayOfSpriteData>"#;

    #[test]
    fn parses_full_and_partial_records() {
        let frames = frame_metadata_from_str(TORSO_XML).unwrap();
        assert_eq!(frames.len(), 3);

        let first = &frames[0];
        assert_eq!(first.head_sprite_override, 3);
        assert_eq!(first.head_offset, Point::new(2, 20));
        assert!(first.override_head_direction);
        assert!(!first.head_in_front_of_torso);
        assert_eq!(first.weapon_back_position, Point::new(-4, 7));
        assert_eq!(first.weapon_back_rotation, 12.5);
        assert!(first.weapon_back_in_front_of_torso);
        assert!(!first.weapon_visible);

        let second = &frames[1];
        assert_eq!(second.head_offset, Point::new(-1, 17));
        assert!(second.head_in_front_of_torso);
        assert!(second.weapon_visible);

        assert_eq!(frames[2], FrameMetadata::default());
    }

    #[test]
    fn incomplete_head_offset_keeps_default_coordinates() {
        let xml = "<ArrayOfSpriteData>\
                   <SpriteData><headOffset><x>2</x></headOffset></SpriteData>\
                   <SpriteData><headOffset/></SpriteData>\
                   <SpriteData><headOffset><y>-3</y></headOffset></SpriteData>\
                   </ArrayOfSpriteData>";
        let frames = frame_metadata_from_str(xml).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].head_offset, Point::new(2, 18));
        assert_eq!(frames[1].head_offset, Point::new(0, 18));
        assert_eq!(frames[2].head_offset, Point::new(0, -3));
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let xml = "<ArrayOfSpriteData><SpriteData><comment>hi</comment><headInFrontOfTorso>false</headInFrontOfTorso></SpriteData></ArrayOfSpriteData>";
        let frames = frame_metadata_from_str(xml).unwrap();
        assert_eq!(frames.len(), 1);
        assert!(!frames[0].head_in_front_of_torso);
        assert_eq!(frames[0].head_offset, Point::new(0, 18));
    }

    #[test]
    fn parses_leg_records() {
        let xml = "<ArrayOfSpriteDataLegs>\
            <SpriteDataLegs><torsoOffset><x>1</x><y>-3</y></torsoOffset></SpriteDataLegs>\
            <SpriteDataLegs/>\
            </ArrayOfSpriteDataLegs>";
        let legs = leg_metadata_from_str(xml).unwrap();
        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].torso_offset, Point::new(1, -3));
        assert_eq!(legs[1].torso_offset, Point::default());
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(frame_metadata_from_str("<ArrayOfSpriteData><SpriteData>").is_err());
    }

    #[test]
    fn writes_every_field_on_one_line() {
        let xml = frame_metadata_to_string(&[FrameMetadata::default()]).unwrap();
        assert!(!xml.contains('\n'));
        assert!(xml.starts_with("<ArrayOfSpriteData>"));
        assert!(xml.contains("<SpriteData><headSprite>-1</headSprite>"));
        assert!(xml.contains("<headOffset><x>0</x><y>18</y></headOffset>"));
        assert!(xml.contains("<overrideHeadDirection>false</overrideHeadDirection>"));
        assert!(xml.contains("<headInFrontOfTorso>true</headInFrontOfTorso>"));
        assert!(xml.contains("<weaponBackRotation>"));
        assert!(xml.contains("<weaponVisible>true</weaponVisible>"));
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let frames = vec![
            FrameMetadata {
                head_sprite_override: 7,
                head_offset: Point::new(-3, 21),
                override_head_direction: true,
                head_in_front_of_torso: false,
                weapon_back_position: Point::new(5, -6),
                weapon_back_rotation: -33.25,
                weapon_back_in_front_of_torso: true,
                weapon_visible: false,
            },
            FrameMetadata::default(),
        ];
        let xml = frame_metadata_to_string(&frames).unwrap();
        assert_eq!(frame_metadata_from_str(&xml).unwrap(), frames);

        let legs = vec![
            LegFrameMetadata { torso_offset: Point::new(0, 2) },
            LegFrameMetadata { torso_offset: Point::new(-1, 0) },
        ];
        let xml = leg_metadata_to_string(&legs).unwrap();
        assert!(xml.starts_with("<ArrayOfSpriteDataLegs>"));
        assert_eq!(leg_metadata_from_str(&xml).unwrap(), legs);
    }

    #[test]
    fn file_round_trip_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TorsoSpriteData.xml");
        assert!(matches!(load_frame_metadata(&path), Err(SheetError::NotFound { .. })));

        let frames = vec![FrameMetadata { weapon_back_rotation: 90.0, ..FrameMetadata::default() }];
        save_frame_metadata(&path, &frames).unwrap();
        assert_eq!(load_frame_metadata(&path).unwrap(), frames);
    }

    #[test]
    fn malformed_file_reports_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("LegSpriteData.xml");
        std::fs::write(&path, "<ArrayOfSpriteDataLegs><SpriteDataLegs>").unwrap();
        match load_leg_metadata(&path) {
            Err(SheetError::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
