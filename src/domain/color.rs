// Palette colors and their canonical rank

/// Fixed chart palette, in rank order.
pub const PALETTE: [Color; 5] = [
    Color::Blue,
    Color::Red,
    Color::Green,
    Color::Orange,
    Color::Black,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Red,
    Green,
    Orange,
    Black,
}

impl Color {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Color::Blue => [0, 116, 217],
            Color::Red => [255, 65, 54],
            Color::Green => [46, 204, 64],
            Color::Orange => [255, 133, 27],
            Color::Black => [51, 51, 51],
        }
    }
}

/// Color for the expression submitted at `index`, wrapping around the palette.
pub fn palette_color(index: usize) -> Color {
    PALETTE[index % PALETTE.len()]
}

/// Position of `color` within the palette; lower ranks render first.
pub fn color_rank(color: Color) -> usize {
    match color {
        Color::Blue => 0,
        Color::Red => 1,
        Color::Green => 2,
        Color::Orange => 3,
        Color::Black => 4,
    }
}
