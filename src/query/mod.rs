pub mod catalog;

pub use catalog::{GroupAverage, QueryCatalog, StudentAverage, StudentScore, TOP_STUDENTS_LIMIT};
