//! # sos-io
//!
//! NetCDF access for SoS prior overwrites: read and write exchange files,
//! load the priors JSON that feeds the exchange-file builder, and open a
//! canonical SoS file for in-place cell writes.
//!
//! ```text
//! priors.json ──load_priors──▶ PriorsInput ──write_exchange──▶ exchange.nc
//! exchange.nc ──read_exchange──▶ ExchangeFile { metadata, Vec<PriorRecord> }
//! sos_dir/run_type/sos_file ──SosFile::open──▶ put_cell / get_cell
//! ```

mod error;
mod exchange_read;
mod exchange_write;
mod netcdf_read;
mod priors;
mod record;
mod sos_file;
mod validate;

pub use error::IoError;
pub use exchange_read::{ExchangeFile, ExchangeMetadata, locate_sos_file, read_exchange};
pub use exchange_write::{PackConfig, write_exchange};
pub use priors::{DataType, PriorEntry, PriorValues, PriorsInput, load_priors};
pub use record::{PriorRecord, RecordKey};
pub use sos_file::SosFile;
