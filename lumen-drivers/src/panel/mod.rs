//! Display panel drivers

pub mod init_table;
pub mod st7701;

pub use init_table::InitCommand;
pub use st7701::{InitStep, PanelState, St7701, St7701Error};
