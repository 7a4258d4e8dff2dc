use ratatui::style::Color;
use term_color_support::ColorSupport;

/// Tile colors, picked by `group % PALETTE.len()`.
pub const PALETTE: [(u8, u8, u8); 9] = [
    (150, 200, 255), // light blue
    (97, 215, 164),  // light green
    (0, 125, 50),    // dark green
    (23, 149, 195),  // light ocean
    (81, 85, 141),   // light purple
    (147, 3, 167),   // purple
    (241, 109, 149), // jindalle
    (255, 180, 115), // tangerine
    (166, 147, 0),   // olive
];

pub const BACKGROUND: (u8, u8, u8) = (3, 54, 73); // dark turquoise
pub const BORDER: (u8, u8, u8) = (0, 50, 255); // bright blue
pub const OPENED: (u8, u8, u8) = (255, 255, 255);
pub const TEXT_DARK: (u8, u8, u8) = (0, 0, 0);
pub const TEXT_LIGHT: (u8, u8, u8) = (255, 255, 255);

// Basic ANSI colors with their Windows Terminal (Campbell) RGB values
const ANSI16: [(Color, (u8, u8, u8)); 16] = [
    (Color::Black, (12, 12, 12)),
    (Color::Red, (197, 15, 31)),
    (Color::Green, (19, 161, 14)),
    (Color::Yellow, (193, 156, 0)),
    (Color::Blue, (0, 55, 218)),
    (Color::Magenta, (136, 23, 152)),
    (Color::Cyan, (58, 150, 221)),
    (Color::Gray, (204, 204, 204)),
    (Color::DarkGray, (118, 118, 118)),
    (Color::LightRed, (231, 72, 86)),
    (Color::LightGreen, (22, 198, 12)),
    (Color::LightYellow, (249, 241, 165)),
    (Color::LightBlue, (59, 120, 255)),
    (Color::LightMagenta, (180, 0, 158)),
    (Color::LightCyan, (97, 214, 214)),
    (Color::White, (242, 242, 242)),
];

// Channel levels of the xterm 6x6x6 color cube
const CUBE: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// Terminal capability tiers, probed once per run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed,
    Basic,
}

impl Depth {
    pub fn detect() -> Depth {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed
        } else {
            Depth::Basic
        }
    }
}

fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let d = |x: u8, y: u8| (x as i32 - y as i32).pow(2) as u32;
    d(a.0, b.0) + d(a.1, b.1) + d(a.2, b.2)
}

fn cube_level(c: u8) -> usize {
    CUBE.iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v as i32 - c as i32).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Maps RGB palette entries onto whatever the terminal can show.
pub trait TermMatch {
    fn term_match(self, depth: Depth) -> Color;
}

impl TermMatch for (u8, u8, u8) {
    fn term_match(self, depth: Depth) -> Color {
        match depth {
            Depth::TrueColor => Color::Rgb(self.0, self.1, self.2),
            Depth::Indexed => {
                let (r, g, b) = (cube_level(self.0), cube_level(self.1), cube_level(self.2));
                Color::Indexed((16 + 36 * r + 6 * g + b) as u8)
            }
            Depth::Basic => ANSI16
                .iter()
                .min_by_key(|(_, rgb)| distance(self, *rgb))
                .map(|(c, _)| *c)
                .unwrap_or(Color::Reset),
        }
    }
}

/// Tile color for a group id
pub fn group_color(group: u128, depth: Depth) -> Color {
    PALETTE[(group % PALETTE.len() as u128) as usize].term_match(depth)
}
