// Color palette shared by the render functions
use ratatui::style::Color;

/// Titles, the selected row and the progress gauge label
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(97, 175, 239);
/// Destructive actions and the confirmation dialog
pub const ACCENT_PRIMARY: Color = Color::Rgb(224, 108, 117);
/// Progress and the current book marker
pub const ACCENT_SECONDARY: Color = Color::Rgb(152, 195, 121);
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
pub const TEXT_SECONDARY: Color = Color::Rgb(127, 132, 142);
pub const BG_DARK: Color = Color::Rgb(40, 44, 52);
pub const BORDER_COLOR: Color = Color::Rgb(92, 99, 112);
/// Sizes above the move limit
pub const WARNING: Color = Color::Red;
