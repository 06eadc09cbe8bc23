//! Workbook access: loading sheets with calamine and locating layout fields.

mod locator;
mod workbook;

pub use locator::{find_labelled_row, CellLocator};
pub use workbook::{Sheet, Workbook};
