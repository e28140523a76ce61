pub mod ni;
