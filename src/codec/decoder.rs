//! Reading animation sets.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::error::DecodeError;
use super::format::{
    ATTR_CENTER, ATTR_ID, ATTR_IMAGE_ID, ATTR_SIZE, ATTR_SOURCE, ATTR_TIME_FRAMES, ATTR_TIME_RATE,
    Element, parse_id, parse_number, parse_pair,
};
use crate::paths::{absolutize, normalize_lexically};
use crate::schema::{Animation, AnimationSet, CodecConfig, DuplicatePolicy, Frame, PathMode};

/// Decode `directory/name` with the default configuration.
///
/// `name` is used as given; no extension is added.
pub fn decode<D: AsRef<Path>>(directory: D, name: &str) -> Result<AnimationSet, DecodeError> {
    decode_with(directory, name, &CodecConfig::default())
}

/// Decode `directory/name`.
pub fn decode_with<D: AsRef<Path>>(
    directory: D,
    name: &str,
    config: &CodecConfig,
) -> Result<AnimationSet, DecodeError> {
    let directory = directory.as_ref();
    let path = directory.join(name);

    let file = File::open(&path)?;
    let set = decode_from_reader(BufReader::new(file), config, directory)?;

    info!(
        "Read {} animations ({} frames) from {}",
        set.len(),
        set.frame_count(),
        path.display()
    );
    Ok(set)
}

/// Decode a document held in memory.
pub fn decode_str(
    text: &str,
    config: &CodecConfig,
    input_dir: &Path,
) -> Result<AnimationSet, DecodeError> {
    decode_from_reader(text.as_bytes(), config, input_dir)
}

/// Decode a document from `reader`.
///
/// `input_dir` is the directory the document was read from; relative image
/// sources are resolved against it under [`PathMode::RelativeToOutput`].
/// Either the whole document decodes or an error is returned.
pub fn decode_from_reader<R: BufRead>(
    reader: R,
    config: &CodecConfig,
    input_dir: &Path,
) -> Result<AnimationSet, DecodeError> {
    config.validate()?;

    let mut state = DecodeState::new(config, input_dir)?;
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => state.open(&e, false)?,
            Event::Empty(e) => state.open(&e, true)?,
            Event::End(e) => state.close(e.name().as_ref())?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    state.finish()
}

/// Required and optional attributes of one element.
struct Attributes {
    element: Element,
    pairs: Vec<(String, String)>,
}

impl Attributes {
    fn read(element: Element, e: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let mut pairs = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            pairs.push((key, value));
        }
        Ok(Self { element, pairs })
    }

    fn required(&self, name: &'static str) -> Result<&str, DecodeError> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
            .ok_or(DecodeError::MissingAttribute {
                element: self.element.name(),
                attribute: name,
            })
    }

    fn number(&self, name: &'static str) -> Result<f32, DecodeError> {
        parse_number(self.element, name, self.required(name)?)
    }

    fn id(&self, name: &'static str) -> Result<u32, DecodeError> {
        parse_id(self.element, name, self.required(name)?)
    }

    fn pair(&self, name: &'static str) -> Result<(f32, f32), DecodeError> {
        parse_pair(self.element, name, self.required(name)?)
    }
}

/// Cursor state for one decode.
struct DecodeState<'a> {
    config: &'a CodecConfig,
    /// Absolute input directory, when sources are resolved against it.
    base_dir: Option<PathBuf>,
    images: HashMap<u32, String>,
    /// Animation currently being filled, with its name.
    current: Option<(String, Animation)>,
    /// Names of open elements, root first.
    open: Vec<String>,
    seen_root: bool,
    set: AnimationSet,
}

impl<'a> DecodeState<'a> {
    fn new(config: &'a CodecConfig, input_dir: &Path) -> Result<Self, DecodeError> {
        let base_dir = match config.path_mode {
            PathMode::RelativeToOutput => Some(absolutize(input_dir)?),
            PathMode::RelativeToWorkingDir | PathMode::Verbatim => None,
        };

        Ok(Self {
            config,
            base_dir,
            images: HashMap::new(),
            current: None,
            open: Vec::new(),
            seen_root: false,
            set: AnimationSet::new(),
        })
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), DecodeError> {
        let raw_name = e.name();
        let name = String::from_utf8_lossy(raw_name.as_ref()).into_owned();
        let element = Element::from_name(raw_name.as_ref());

        if self.open.is_empty() {
            if self.seen_root || element != Some(Element::AnimSet) {
                return Err(DecodeError::UnexpectedRoot(name));
            }
            self.seen_root = true;
        } else {
            match element {
                Some(Element::AnimSet) => {
                    return Err(DecodeError::UnexpectedRoot(name));
                }
                Some(Element::Images) => {}
                Some(Element::Image) => self.on_image(&Attributes::read(Element::Image, e)?)?,
                Some(Element::Anim) => self.on_anim(&Attributes::read(Element::Anim, e)?)?,
                Some(Element::Frame) => self.on_frame(&Attributes::read(Element::Frame, e)?)?,
                None => warn!("Ignoring unknown element <{}>", name),
            }
        }

        if empty {
            if element == Some(Element::Anim) {
                self.commit_animation()?;
            }
        } else {
            self.open.push(name);
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<(), DecodeError> {
        self.open.pop();
        if Element::from_name(name) == Some(Element::Anim) {
            self.commit_animation()?;
        }
        Ok(())
    }

    fn on_image(&mut self, attrs: &Attributes) -> Result<(), DecodeError> {
        let id = attrs.id(ATTR_ID)?;
        let source = self.resolve_source(attrs.required(ATTR_SOURCE)?);

        match self.images.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(source);
            }
            Entry::Occupied(mut slot) => match self.config.duplicate_images {
                DuplicatePolicy::Reject => return Err(DecodeError::DuplicateImage(id)),
                DuplicatePolicy::LastWins => {
                    warn!("Image id {} redefined as {:?}", id, source);
                    slot.insert(source);
                }
            },
        }
        Ok(())
    }

    fn on_anim(&mut self, attrs: &Attributes) -> Result<(), DecodeError> {
        let name = attrs.required(ATTR_ID)?.to_string();
        if let Some((outer, _)) = &self.current {
            return Err(DecodeError::NestedAnimation {
                outer: outer.clone(),
                inner: name,
            });
        }
        self.current = Some((name, Animation::new()));
        Ok(())
    }

    fn on_frame(&mut self, attrs: &Attributes) -> Result<(), DecodeError> {
        let Some((_, animation)) = self.current.as_mut() else {
            return Err(DecodeError::FrameOutsideAnimation);
        };

        let center = attrs.pair(ATTR_CENTER)?;
        let size = attrs.pair(ATTR_SIZE)?;
        let time_frames = attrs.number(ATTR_TIME_FRAMES)?;
        let time_rate = attrs.number(ATTR_TIME_RATE)?;
        let image_id = attrs.id(ATTR_IMAGE_ID)?;
        let image = self
            .images
            .get(&image_id)
            .ok_or(DecodeError::UnknownImage(image_id))?;

        animation.push(Frame {
            center,
            size,
            time_frames,
            time_rate,
            image: image.clone(),
        });
        Ok(())
    }

    fn commit_animation(&mut self) -> Result<(), DecodeError> {
        let Some((name, animation)) = self.current.take() else {
            return Ok(());
        };

        if self.set.contains(&name) {
            match self.config.duplicate_animations {
                DuplicatePolicy::Reject => return Err(DecodeError::DuplicateAnimation(name)),
                DuplicatePolicy::LastWins => warn!("Animation {:?} redefined, keeping the last", name),
            }
        }
        debug!("Read animation {:?} ({} frames)", name, animation.len());
        self.set.insert(name, animation);
        Ok(())
    }

    fn resolve_source(&self, source: &str) -> String {
        match &self.base_dir {
            Some(base) => normalize_lexically(&base.join(source))
                .to_string_lossy()
                .into_owned(),
            None => source.to_string(),
        }
    }

    fn finish(self) -> Result<AnimationSet, DecodeError> {
        if let Some(name) = self.open.last() {
            return Err(DecodeError::Truncated(name.clone()));
        }
        if !self.seen_root {
            return Err(DecodeError::MissingRoot);
        }
        debug!("Resolved {} image entries", self.images.len());
        Ok(self.set)
    }
}
