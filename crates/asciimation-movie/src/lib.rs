//! Asciimation-Movie: parsing of pre-recorded ASCII-art movies.
//!
//! A movie file is gzip-compressed text made of 14-line blocks. The first
//! line of a block is the frame delay in tenths of a second, the other
//! thirteen lines are the frame itself.
//!
//! - **Frames**: [`Frame`] pairs a delay with a pre-serialized JSON payload
//! - **Movies**: [`Movie`] is the immutable, ordered frame sequence
//! - **Loading**: [`load_movie`] and [`parse_movie`] build a [`Movie`]
//!
//! # Examples
//!
//! ```
//! use asciimation_movie::parse_movie;
//! use std::io::Cursor;
//!
//! let mut text = String::from("5\n");
//! for row in 0..13 {
//!     text.push_str(&format!("row {row}\n"));
//! }
//!
//! let movie = parse_movie(Cursor::new(text)).unwrap();
//! assert_eq!(movie.len(), 1);
//! assert_eq!(movie.frames()[0].delay().as_millis(), 500);
//! ```

pub mod error;
pub mod frame;
pub mod loader;
pub mod movie;

pub use error::{MovieError, Result};
pub use frame::{escape_html, Frame, FrameMessage};
pub use loader::{load_movie, parse_movie, BLOCK_LINES};
pub use movie::Movie;
