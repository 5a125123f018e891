//! Element names, attribute grammars and the image table.

use std::collections::HashMap;
use std::path::Path;

use super::error::DecodeError;
use crate::schema::AnimationSet;

/// Recognized document elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    AnimSet,
    Images,
    Image,
    Anim,
    Frame,
}

impl Element {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"animset" => Some(Element::AnimSet),
            b"images" => Some(Element::Images),
            b"image" => Some(Element::Image),
            b"anim" => Some(Element::Anim),
            b"frame" => Some(Element::Frame),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::AnimSet => "animset",
            Element::Images => "images",
            Element::Image => "image",
            Element::Anim => "anim",
            Element::Frame => "frame",
        }
    }
}

pub const ATTR_ID: &str = "id";
pub const ATTR_SOURCE: &str = "source";
pub const ATTR_CENTER: &str = "center";
pub const ATTR_SIZE: &str = "size";
pub const ATTR_TIME_FRAMES: &str = "timeFrames";
pub const ATTR_TIME_RATE: &str = "timeRate";
pub const ATTR_IMAGE_ID: &str = "imageid";

/// Format a number in the shortest form that parses back to the same value.
pub fn format_number(v: f32) -> String {
    v.to_string()
}

/// Format a pair as `a,b`.
pub fn format_pair((a, b): (f32, f32)) -> String {
    format!("{},{}", a, b)
}

pub fn parse_number(
    element: Element,
    attribute: &'static str,
    value: &str,
) -> Result<f32, DecodeError> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|_| DecodeError::InvalidNumber {
            element: element.name(),
            attribute,
            value: value.to_string(),
        })
}

pub fn parse_id(element: Element, attribute: &'static str, value: &str) -> Result<u32, DecodeError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| DecodeError::InvalidNumber {
            element: element.name(),
            attribute,
            value: value.to_string(),
        })
}

/// Parse exactly two comma-separated numbers.
pub fn parse_pair(
    element: Element,
    attribute: &'static str,
    value: &str,
) -> Result<(f32, f32), DecodeError> {
    let mut parts = value.split(',');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => Ok((
            parse_number(element, attribute, a)?,
            parse_number(element, attribute, b)?,
        )),
        _ => Err(DecodeError::InvalidPair {
            element: element.name(),
            attribute,
            value: value.to_string(),
        }),
    }
}

/// Append `.extension` to `name` unless it already ends with it.
///
/// The comparison ignores ASCII case, so `Walk.ANIMSET` is left alone.
pub fn normalize_file_name(name: &str, extension: &str) -> String {
    let has_extension = Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
    if has_extension {
        name.to_string()
    } else {
        format!("{}.{}", name, extension)
    }
}

/// Distinct image paths of an animation set with dense ids.
///
/// Ids follow first-seen order over every frame of every animation, with
/// animations in set order. Paths are compared as strings, so two spellings
/// of the same file get two ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageTable {
    paths: Vec<String>,
    ids: HashMap<String, u32>,
}

impl ImageTable {
    pub fn from_set(set: &AnimationSet) -> Self {
        let mut table = Self::default();
        for frame in set.frames() {
            table.intern(&frame.image);
        }
        table
    }

    /// Return the id for `path`, adding it if unseen.
    pub fn intern(&mut self, path: &str) -> u32 {
        if let Some(&id) = self.ids.get(path) {
            return id;
        }
        let id = self.paths.len() as u32;
        self.paths.push(path.to_string());
        self.ids.insert(path.to_string(), id);
        id
    }

    pub fn id_of(&self, path: &str) -> Option<u32> {
        self.ids.get(path).copied()
    }

    pub fn path_of(&self, id: u32) -> Option<&str> {
        self.paths.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `(id, path)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.paths
            .iter()
            .enumerate()
            .map(|(i, p)| (i as u32, p.as_str()))
    }
}
