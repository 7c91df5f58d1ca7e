/// An sRGB color, toolkit independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// Colors applied to the editor surface and the window chrome around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
    pub cursor: Rgb,
    pub selection: Rgb,
    pub chrome: Rgb,
    pub chrome_text: Rgb,
    pub chrome_hover: Rgb,
}

pub const LIGHT: Palette = Palette {
    background: Rgb::WHITE,
    foreground: Rgb::BLACK,
    cursor: Rgb::BLACK,
    selection: Rgb(173, 216, 230),
    chrome: Rgb(240, 240, 240),
    chrome_text: Rgb::BLACK,
    chrome_hover: Rgb(200, 200, 200),
};

pub const DARK: Palette = Palette {
    background: Rgb(0x2b, 0x2b, 0x2b),
    foreground: Rgb::WHITE,
    cursor: Rgb::WHITE,
    selection: Rgb(70, 70, 100),
    chrome: Rgb(35, 35, 35),
    chrome_text: Rgb(220, 220, 220),
    chrome_hover: Rgb(60, 60, 60),
};

/// Light/dark mode for the whole window. Passed explicitly to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeState {
    is_dark: bool,
}

impl ThemeState {
    pub fn new(is_dark: bool) -> Self {
        Self { is_dark }
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    /// Flip between light and dark; returns the new value of `is_dark`.
    pub fn toggle(&mut self) -> bool {
        self.is_dark = !self.is_dark;
        self.is_dark
    }

    pub fn palette(&self) -> Palette {
        if self.is_dark { DARK } else { LIGHT }
    }
}
