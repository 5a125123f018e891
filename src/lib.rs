//! Animset - Sprite animation sets and their `.animset` file format.
//!
//! An animation set is a collection of named animations, each a sequence of
//! frames cut from source images. The codec writes a set to a small XML
//! document in which every image path appears once, and reads it back.
//!
//! # Architecture
//!
//! - `schema`: The data model ([`AnimationSet`], [`Animation`], [`Frame`]) and
//!   [`CodecConfig`]
//! - `codec`: Encoding and decoding of documents
//! - `paths`: Relative path computation for image sources
//!
//! # Example
//!
//! ```rust,no_run
//! use animset::{Animation, AnimationSet, Frame, decode, encode};
//!
//! let mut set = AnimationSet::new();
//! set.insert(
//!     "idle",
//!     Animation::new()
//!         .with_frame(Frame::new("/game/sprites/idle.png", (0.0, 0.0), (16.0, 16.0), 4.0, 60.0))
//!         .with_frame(Frame::new("/game/sprites/idle.png", (8.0, 0.0), (16.0, 16.0), 4.0, 60.0)),
//! );
//!
//! let path = encode(&set, "/game/anims", "hero")?;
//! assert_eq!(path.file_name().unwrap(), "hero.animset");
//!
//! let loaded = decode("/game/anims", "hero.animset")?;
//! assert_eq!(loaded, set);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod paths;
pub mod schema;

// Re-export commonly used types
pub use codec::{DecodeError, DecodeErrorKind, EncodeError, decode, decode_with, encode, encode_with};
pub use paths::relative_path;
pub use schema::{Animation, AnimationSet, CodecConfig, DuplicatePolicy, Frame, PathMode};
