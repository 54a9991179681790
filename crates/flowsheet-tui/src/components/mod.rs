pub mod bin_list;
pub mod catalog_browser;
pub mod flowsheet_log;
pub mod flowsheet_search;
pub mod help_overlay;
pub mod rotation_table;

pub use bin_list::BinList;
pub use catalog_browser::CatalogBrowser;
pub use flowsheet_log::FlowsheetLog;
pub use flowsheet_search::FlowsheetSearch;
pub use help_overlay::HelpOverlay;
pub use rotation_table::RotationTable;
