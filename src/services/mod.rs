pub mod bitmap;
pub mod catalog;
pub mod printer;
pub mod receipt;
pub mod scanner;
pub mod token;
