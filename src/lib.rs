//! De novo genome assembly from short reads with two independent strategies: a
//! de Bruijn graph over (k-1)-mers and overlap-layout-consensus over read pairs.

pub mod config;
pub mod error;
pub mod eval;
pub mod graph;
pub mod io;
pub mod kmer;
pub mod pipeline;

pub use config::{AlphabetPolicy, AssemblyConfig, DbgConfig, OlcConfig};
pub use error::{AssemblyError, Result};
pub use io::read::Read;
pub use pipeline::assemble::{DbgAssembler, OlcAssembler};
