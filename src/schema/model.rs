//! Value types for animation sets.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One still image of an animation: a region of a source image shown for a
/// fixed amount of time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Pivot point of the frame, as an offset into the source image.
    pub center: (f32, f32),
    /// Extent (width, height) of the region on the source image.
    pub size: (f32, f32),
    /// Number of ticks the frame is displayed for.
    pub time_frames: f32,
    /// Ticks per time unit. Display time is `time_frames / time_rate`.
    pub time_rate: f32,
    /// Path to the source image.
    pub image: String,
}

impl Frame {
    pub fn new(
        image: impl Into<String>,
        center: (f32, f32),
        size: (f32, f32),
        time_frames: f32,
        time_rate: f32,
    ) -> Self {
        Self {
            center,
            size,
            time_frames,
            time_rate,
            image: image.into(),
        }
    }

    /// Display time in the consumer's time unit.
    #[inline]
    pub fn duration(&self) -> f32 {
        self.time_frames / self.time_rate
    }
}

/// An ordered sequence of frames, in playback order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub frames: Vec<Frame>,
}

impl Animation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of all frame durations.
    pub fn duration(&self) -> f32 {
        self.frames.iter().map(Frame::duration).sum()
    }
}

impl FromIterator<Frame> for Animation {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

/// Named animations, kept in insertion order.
///
/// The order is the order animations are written in, and the order they are
/// read back in. Re-inserting an existing name replaces the animation but
/// keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimationSet {
    animations: IndexMap<String, Animation>,
}

impl AnimationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an animation, returning the one previously stored under `name`.
    pub fn insert(&mut self, name: impl Into<String>, animation: Animation) -> Option<Animation> {
        self.animations.insert(name.into(), animation)
    }

    pub fn get(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.animations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// Animations in set order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Animation)> {
        self.animations.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animations.keys().map(String::as_str)
    }

    /// Total number of frames across all animations.
    pub fn frame_count(&self) -> usize {
        self.animations.values().map(Animation::len).sum()
    }

    /// Every frame of every animation, animations in set order.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.animations.values().flat_map(|a| a.frames.iter())
    }

    /// Distinct image paths in first-seen order.
    pub fn image_paths(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.frames()
            .map(|f| f.image.as_str())
            .filter(|path| seen.insert(*path))
            .collect()
    }
}

impl FromIterator<(String, Animation)> for AnimationSet {
    fn from_iter<I: IntoIterator<Item = (String, Animation)>>(iter: I) -> Self {
        Self {
            animations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a AnimationSet {
    type Item = (&'a String, &'a Animation);
    type IntoIter = indexmap::map::Iter<'a, String, Animation>;

    fn into_iter(self) -> Self::IntoIter {
        self.animations.iter()
    }
}
