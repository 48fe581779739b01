/// Чтение и запись CSV

pub mod loader;
pub mod writer;

pub use loader::CsvLoader;
pub use writer::CsvWriter;
