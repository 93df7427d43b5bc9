use ratatui::style::Color;

/// Runtime theme for the stats page
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey1: Color,
    pub grey2: Color,

    // Semantic colors
    pub accent: Color,
    pub card_border: Color,
    pub card_border_active: Color,
    pub heading: Color,
}

impl Default for Theme {
    fn default() -> Self {
        // Gruvbox Dark
        Self {
            bg0: Color::Rgb(0x28, 0x28, 0x28),
            bg1: Color::Rgb(0x32, 0x30, 0x2f),
            bg2: Color::Rgb(0x45, 0x40, 0x3d),
            fg0: Color::Rgb(0xd4, 0xbe, 0x98),
            fg1: Color::Rgb(0xdd, 0xc7, 0xa1),
            grey1: Color::Rgb(0x92, 0x83, 0x74),
            grey2: Color::Rgb(0xa8, 0x99, 0x84),
            accent: Color::Rgb(0x89, 0xb4, 0x82),
            card_border: Color::Rgb(0x50, 0x49, 0x45),
            card_border_active: Color::Rgb(0xd8, 0xa6, 0x57),
            heading: Color::Rgb(0xe7, 0x8a, 0x4e),
        }
    }
}
