//! Writing animation sets.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use super::error::EncodeError;
use super::format::{
    ATTR_CENTER, ATTR_ID, ATTR_IMAGE_ID, ATTR_SIZE, ATTR_SOURCE, ATTR_TIME_FRAMES, ATTR_TIME_RATE,
    Element, ImageTable, format_number, format_pair, normalize_file_name,
};
use crate::paths::{absolutize, relative_path};
use crate::schema::{AnimationSet, CodecConfig, PathMode};

/// Counts from one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    pub animation_count: usize,
    pub frame_count: usize,
    pub image_count: usize,
}

impl std::fmt::Display for EncodeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} animations, {} frames, {} images",
            self.animation_count, self.frame_count, self.image_count
        )
    }
}

/// Encode `set` to `directory/name` with the default configuration.
///
/// `name` gets the `.animset` extension appended if it does not already
/// carry it. Returns the path written.
pub fn encode<D: AsRef<Path>>(
    set: &AnimationSet,
    directory: D,
    name: &str,
) -> Result<PathBuf, EncodeError> {
    encode_with(set, directory, name, &CodecConfig::default())
}

/// Encode `set` to `directory/name`.
///
/// The directory must already exist. An existing file is overwritten. On
/// error the file may be left partially written.
pub fn encode_with<D: AsRef<Path>>(
    set: &AnimationSet,
    directory: D,
    name: &str,
    config: &CodecConfig,
) -> Result<PathBuf, EncodeError> {
    config.validate()?;

    let directory = directory.as_ref();
    let path = directory.join(normalize_file_name(name, &config.extension));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    let stats = encode_to_writer(set, &mut writer, config, directory)?;
    writer.flush()?;

    info!("Wrote {} to {}", stats, path.display());
    Ok(path)
}

/// Encode `set` as a document on `writer`.
///
/// `output_dir` is the directory the document will live in; image paths are
/// made relative to it under [`PathMode::RelativeToOutput`].
pub fn encode_to_writer<W: Write>(
    set: &AnimationSet,
    writer: W,
    config: &CodecConfig,
    output_dir: &Path,
) -> Result<EncodeStats, EncodeError> {
    let table = ImageTable::from_set(set);
    let sources = SourceResolver::new(config.path_mode, output_dir)?;

    if config.indent > 0 {
        let mut xml = Writer::new_with_indent(writer, b' ', config.indent);
        write_document(&mut xml, set, &table, &sources)?;
    } else {
        let mut xml = Writer::new(writer);
        write_document(&mut xml, set, &table, &sources)?;
    }

    Ok(EncodeStats {
        animation_count: set.len(),
        frame_count: set.frame_count(),
        image_count: table.len(),
    })
}

fn write_document<W: Write>(
    xml: &mut Writer<W>,
    set: &AnimationSet,
    table: &ImageTable,
    sources: &SourceResolver,
) -> Result<(), EncodeError> {
    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    xml.write_event(Event::Start(BytesStart::new(Element::AnimSet.name())))?;

    // Images
    if table.is_empty() {
        xml.write_event(Event::Empty(BytesStart::new(Element::Images.name())))?;
    } else {
        xml.write_event(Event::Start(BytesStart::new(Element::Images.name())))?;
        for (id, path) in table.iter() {
            let id = id.to_string();
            let source = sources.source_for(path)?;
            let image = BytesStart::new(Element::Image.name())
                .with_attributes([(ATTR_ID, id.as_str()), (ATTR_SOURCE, source.as_str())]);
            xml.write_event(Event::Empty(image))?;
        }
        xml.write_event(Event::End(BytesEnd::new(Element::Images.name())))?;
    }
    debug!("Wrote {} image entries", table.len());

    // Animations
    for (name, animation) in set.iter() {
        let anim = BytesStart::new(Element::Anim.name()).with_attributes([(ATTR_ID, name)]);
        if animation.is_empty() {
            xml.write_event(Event::Empty(anim))?;
            continue;
        }

        xml.write_event(Event::Start(anim))?;
        for (i, frame) in animation.frames.iter().enumerate() {
            let image_id = table
                .id_of(&frame.image)
                .ok_or_else(|| EncodeError::UnindexedImage {
                    animation: name.to_string(),
                    frame: i,
                })?;

            let center = format_pair(frame.center);
            let size = format_pair(frame.size);
            let time_frames = format_number(frame.time_frames);
            let time_rate = format_number(frame.time_rate);
            let image_id = image_id.to_string();

            let element = BytesStart::new(Element::Frame.name()).with_attributes([
                (ATTR_CENTER, center.as_str()),
                (ATTR_SIZE, size.as_str()),
                (ATTR_TIME_FRAMES, time_frames.as_str()),
                (ATTR_TIME_RATE, time_rate.as_str()),
                (ATTR_IMAGE_ID, image_id.as_str()),
            ]);
            xml.write_event(Event::Empty(element))?;
        }
        xml.write_event(Event::End(BytesEnd::new(Element::Anim.name())))?;
        debug!("Wrote animation {:?} ({} frames)", name, animation.len());
    }

    xml.write_event(Event::End(BytesEnd::new(Element::AnimSet.name())))?;
    Ok(())
}

/// Turns frame image paths into `source` attribute values.
enum SourceResolver {
    Verbatim,
    RelativeTo(PathBuf),
}

impl SourceResolver {
    fn new(mode: PathMode, output_dir: &Path) -> io::Result<Self> {
        Ok(match mode {
            PathMode::Verbatim => SourceResolver::Verbatim,
            PathMode::RelativeToOutput => SourceResolver::RelativeTo(absolutize(output_dir)?),
            PathMode::RelativeToWorkingDir => {
                SourceResolver::RelativeTo(absolutize(&std::env::current_dir()?)?)
            }
        })
    }

    fn source_for(&self, image: &str) -> io::Result<String> {
        match self {
            SourceResolver::Verbatim => Ok(image.to_string()),
            SourceResolver::RelativeTo(base) => {
                Ok(relative_path(absolutize(Path::new(image))?, base))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Animation, Frame};
    use std::fs;
    use tempfile::tempdir;

    fn idle_set() -> AnimationSet {
        let mut set = AnimationSet::new();
        set.insert(
            "idle",
            Animation::new()
                .with_frame(Frame::new("/sprites/idle.png", (0.0, 0.0), (16.0, 16.0), 4.0, 60.0))
                .with_frame(Frame::new("/sprites/idle.png", (8.0, 0.0), (16.0, 16.0), 4.0, 60.0)),
        );
        set
    }

    fn encode_verbatim(set: &AnimationSet) -> String {
        let config = CodecConfig::with_path_mode(PathMode::Verbatim);
        let mut out = Vec::new();
        encode_to_writer(set, &mut out, &config, Path::new("/")).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_encode_idle_document() {
        let text = encode_verbatim(&idle_set());

        assert_eq!(text.matches("<image ").count(), 1);
        assert!(text.contains(r#"<image id="0" source="/sprites/idle.png"/>"#));
        assert_eq!(text.matches(r#"<anim id="idle">"#).count(), 1);
        assert!(text.contains(
            r#"<frame center="0,0" size="16,16" timeFrames="4" timeRate="60" imageid="0"/>"#
        ));
        assert!(text.contains(
            r#"<frame center="8,0" size="16,16" timeFrames="4" timeRate="60" imageid="0"/>"#
        ));
    }

    #[test]
    fn test_sections_in_order() {
        let text = encode_verbatim(&idle_set());
        let images = text.find("<images>").unwrap();
        let anim = text.find("<anim ").unwrap();
        assert!(images < anim);
        assert!(text.trim_end().ends_with("</animset>"));
    }

    #[test]
    fn test_dedup_across_animations() {
        let mut set = idle_set();
        set.insert(
            "walk",
            Animation::new()
                .with_frame(Frame::new("/sprites/walk.png", (0.0, 0.0), (16.0, 16.0), 2.0, 60.0))
                .with_frame(Frame::new("/sprites/idle.png", (0.0, 0.0), (16.0, 16.0), 2.0, 60.0)),
        );

        let text = encode_verbatim(&set);
        assert_eq!(text.matches("source=\"/sprites/idle.png\"").count(), 1);
        assert!(text.contains(r#"<image id="1" source="/sprites/walk.png"/>"#));
        assert_eq!(text.matches("imageid=\"0\"").count(), 3);
        assert_eq!(text.matches("imageid=\"1\"").count(), 1);
    }

    #[test]
    fn test_empty_set_and_animation() {
        let text = encode_verbatim(&AnimationSet::new());
        assert!(text.contains("<images/>"));

        let mut set = AnimationSet::new();
        set.insert("empty", Animation::new());
        let text = encode_verbatim(&set);
        assert!(text.contains(r#"<anim id="empty"/>"#));
    }

    #[test]
    fn test_attribute_escaping() {
        let mut set = AnimationSet::new();
        set.insert(
            "a<b>&\"c\"",
            Animation::new().with_frame(Frame::new("/x&y.png", (0.0, 0.0), (1.0, 1.0), 1.0, 1.0)),
        );
        let text = encode_verbatim(&set);
        assert!(text.contains("source=\"/x&amp;y.png\""));
        assert!(!text.contains("a<b>"));
    }

    #[test]
    fn test_single_line_output() {
        let config = CodecConfig {
            indent: 0,
            path_mode: PathMode::Verbatim,
            ..CodecConfig::default()
        };
        let mut out = Vec::new();
        encode_to_writer(&idle_set(), &mut out, &config, Path::new("/")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("<animset><images><image"));
    }

    #[test]
    fn test_relative_to_output_dir() {
        let dir = tempdir().unwrap();
        let sprites = dir.path().join("sprites");
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();

        let image = sprites.join("hero.png").to_string_lossy().into_owned();
        let mut set = AnimationSet::new();
        set.insert(
            "hero",
            Animation::new().with_frame(Frame::new(image, (0.0, 0.0), (8.0, 8.0), 1.0, 30.0)),
        );

        let path = encode(&set, &out, "hero").unwrap();
        let text = fs::read_to_string(path).unwrap();
        let expected = Path::new("..").join("sprites").join("hero.png");
        assert!(text.contains(&format!("source=\"{}\"", expected.display())));
    }

    #[test]
    fn test_extension_normalization() {
        let dir = tempdir().unwrap();
        let set = idle_set();

        let path = encode(&set, dir.path(), "walk").unwrap();
        assert_eq!(path.file_name().unwrap(), "walk.animset");

        let path = encode(&set, dir.path(), "walk.animset").unwrap();
        assert_eq!(path.file_name().unwrap(), "walk.animset");
        assert!(!dir.path().join("walk.animset.animset").exists());
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("idle.animset");
        fs::write(&path, "stale contents that are much longer than nothing at all").unwrap();

        encode(&AnimationSet::new(), dir.path(), "idle").unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(!text.contains("stale"));
        assert!(text.contains("<animset>"));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("does").join("not").join("exist");
        let err = encode(&idle_set(), &missing, "idle").unwrap_err();
        assert!(matches!(err, EncodeError::Io(_)));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let dir = tempdir().unwrap();
        let config = CodecConfig {
            extension: String::new(),
            ..CodecConfig::default()
        };
        let err = encode_with(&idle_set(), dir.path(), "idle", &config).unwrap_err();
        assert!(matches!(err, EncodeError::Config(_)));
    }
}
