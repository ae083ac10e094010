pub mod catalog_display;
pub mod catalog_grid;
pub mod catalog_header;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use catalog_display::{CatalogDisplay, CatalogDisplayProps, ERROR_ICON};
pub use catalog_grid::{CatalogGrid, CatalogGridProps, TILE_HEIGHT, TILE_WIDTH};
pub use catalog_header::{CatalogHeader, CatalogHeaderProps};
pub use search_bar::{SearchBar, SearchBarProps};
