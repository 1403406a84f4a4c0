//! Common types and utilities shared across the wavefinder services.
//!
//! Everything in this crate is pure: grid snapping, longitude conventions,
//! slice assembly and wind vector math. Network access lives in `griddap`.

pub mod assemble;
pub mod bbox;
pub mod grid;
pub mod slice;
pub mod time;
pub mod velocity;
pub mod wind;

pub use assemble::{assemble, AssembledGrid};
pub use bbox::{BboxError, BoundingBox, GridBox};
pub use grid::{LonRange, LonSpan, GRID_STEP, MAX_LON_360};
pub use slice::{MissingColumn, Slice, SliceColumns, WindColumns, WindRow, WindSlice};
pub use time::{TimeExpr, TimeParseError};
pub use velocity::{velocity_records, VelocityHeader, VelocityRecord, WindComponent};
pub use wind::WindVector;
