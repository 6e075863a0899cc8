pub mod display_options;
pub mod table;

pub use display_options::{DisplayOptions, is_fullscreen_capable};
pub use table::TableDisplay;

impl DisplayOptions {
    /// Table formatter configured from these options
    pub fn table_display(&self) -> TableDisplay {
        let display = TableDisplay::new().with_colors(!self.no_color);
        match self.max_width {
            Some(width) => display.with_max_width(width),
            None => display,
        }
    }
}
