//! Font style selection

/// Bold/italic selector for one of the four font slots
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
}

impl FontStyle {
    pub const NORMAL: FontStyle = FontStyle::new(false, false);
    pub const BOLD: FontStyle = FontStyle::new(true, false);
    pub const ITALIC: FontStyle = FontStyle::new(false, true);
    pub const BOLD_ITALIC: FontStyle = FontStyle::new(true, true);

    pub const ALL: [FontStyle; 4] = [Self::NORMAL, Self::BOLD, Self::ITALIC, Self::BOLD_ITALIC];

    pub const fn new(bold: bool, italic: bool) -> Self {
        Self { bold, italic }
    }

    /// Slot index: normal 0, bold 1, italic 2, bold-italic 3
    pub const fn index(self) -> usize {
        (self.bold as usize) | ((self.italic as usize) << 1)
    }
}

/// Cell attributes that change how characters are drawn
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextAttrs {
    /// Draw block elements, sextants and triangles as separated mosaics,
    /// with a blank line along the left and bottom of every 2x3 sub-block
    pub separated_mosaic: bool,
}

impl TextAttrs {
    pub const NONE: TextAttrs = TextAttrs {
        separated_mosaic: false,
    };
    pub const SEPARATED_MOSAIC: TextAttrs = TextAttrs {
        separated_mosaic: true,
    };
}
