use serde::{Deserialize, Deserializer, Serialize};

/// Integer pixel offset as stored in the sidecar files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }
}

impl From<Point> for glam::IVec2 {
    fn from(p: Point) -> Self { glam::IVec2::new(p.x, p.y) }
}

impl From<glam::IVec2> for Point {
    fn from(v: glam::IVec2) -> Self { Self { x: v.x, y: v.y } }
}

/// Placement data for one torso or weapon-torso frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FrameMetadata {
    /// Head frame to use instead of the facing default; negative means none.
    #[serde(rename = "headSprite")]
    pub head_sprite_override: i32,
    #[serde(deserialize_with = "head_offset_or_default")]
    pub head_offset: Point,
    pub override_head_direction: bool,
    pub head_in_front_of_torso: bool,
    pub weapon_back_position: Point,
    pub weapon_back_rotation: f32,
    pub weapon_back_in_front_of_torso: bool,
    pub weapon_visible: bool,
}

impl Default for FrameMetadata {
    fn default() -> Self {
        Self {
            head_sprite_override: -1,
            head_offset: DEFAULT_HEAD_OFFSET,
            override_head_direction: false,
            head_in_front_of_torso: true,
            weapon_back_position: Point::default(),
            weapon_back_rotation: 0.0,
            weapon_back_in_front_of_torso: false,
            weapon_visible: true,
        }
    }
}

const DEFAULT_HEAD_OFFSET: Point = Point::new(0, 18);

/// A `headOffset` element missing one or both coordinates keeps the default
/// for the missing ones.
fn head_offset_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Point, D::Error> {
    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct PartialPoint {
        x: Option<i32>,
        y: Option<i32>,
    }

    let p = PartialPoint::deserialize(deserializer)?;
    Ok(Point::new(p.x.unwrap_or(DEFAULT_HEAD_OFFSET.x), p.y.unwrap_or(DEFAULT_HEAD_OFFSET.y)))
}

/// Placement data for one leg frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegFrameMetadata {
    pub torso_offset: Point,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "ArrayOfSpriteData")]
pub(crate) struct FrameMetadataDoc {
    #[serde(rename = "SpriteData", default)]
    pub frames: Vec<FrameMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename = "ArrayOfSpriteDataLegs")]
pub(crate) struct LegMetadataDoc {
    #[serde(rename = "SpriteDataLegs", default)]
    pub frames: Vec<LegFrameMetadata>,
}
