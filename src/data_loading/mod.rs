pub mod data_loader; // Strategy trait + Dataset
pub mod csv_data_loader;
pub mod json_data_loader;
pub mod factory;

pub use data_loader::{DataLoader, Dataset};
pub use csv_data_loader::CsvDataLoader;
pub use json_data_loader::JsonDataLoader;
pub use factory::DataLoaderFactory;
