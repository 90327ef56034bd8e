pub mod analyzer;
pub mod reader;
pub mod table;
pub mod writer;

pub use analyzer::{detect_target_langs, status_column, validate_headers, OutputSchema};
pub use reader::CsvStreamReader;
pub use table::{Row, Table};
pub use writer::{render_csv, CsvStreamWriter};
