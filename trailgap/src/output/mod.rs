//! Candidate records and their serialization.
//!
//! Records are written as RFC 8142 GeoJSON text sequences: each record is an
//! ASCII record separator, one compact GeoJSON Feature and a newline.

mod record;
mod writer;

pub use record::{OutputRecord, PointGeometry, RecordProperties};
pub use writer::{GeoJsonSeqWriter, OutputError, RecordSink, RECORD_SEPARATOR};
