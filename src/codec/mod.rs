//! Encoding and decoding of `.animset` documents.
//!
//! # File Format
//!
//! An `.animset` file is an XML document with an image table followed by
//! the animations. Frames refer to images by table id, so each image path
//! is written once no matter how many frames use it:
//!
//! ```text
//! <animset>
//!   <images>
//!     <image id="0" source="sprites/hero.png"/>
//!   </images>
//!   <anim id="walk">
//!     <frame center="X,Y" size="W,H" timeFrames="N" timeRate="R" imageid="0"/>
//!   </anim>
//! </animset>
//! ```
//!
//! Image ids are dense, starting at 0, in the order images are first used.
//! How `source` relates to the frame's image path depends on
//! [`PathMode`](crate::schema::PathMode).

mod decoder;
mod encoder;
mod error;
mod format;

pub use decoder::{decode, decode_from_reader, decode_str, decode_with};
pub use encoder::{EncodeStats, encode, encode_to_writer, encode_with};
pub use error::{DecodeError, DecodeErrorKind, EncodeError};
pub use format::{Element, ImageTable, normalize_file_name};
