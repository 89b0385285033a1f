use palette::Srgb;

/// Stroke used for a day's route line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    pub color: Srgb<u8>,
    pub weight: f32,
    pub opacity: f32,
}

impl LineStyle {
    pub fn new(color: Srgb<u8>, weight: f32, opacity: f32) -> Self {
        Self {
            color,
            weight,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Directional arrow glyph repeated along a route line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowSymbol {
    pub color: Srgb<u8>,
    pub scale: f32,
    /// Distance between glyphs along the line
    pub repeat_px: u32,
    /// Distance from the start of the line to the first glyph
    pub offset_px: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerStyle {
    pub fill: Srgb<u8>,
    pub label_color: Srgb<u8>,
    pub scale: f32,
}

/// Emphasis for the active day versus the rest
#[derive(Clone, Debug, PartialEq)]
pub struct RouteTheme {
    pub active_line: LineStyle,
    pub inactive_line: LineStyle,
    pub active_marker: MarkerStyle,
    pub inactive_marker: MarkerStyle,
    pub arrow_repeat_px: u32,
}

impl RouteTheme {
    pub fn line(&self, active: bool) -> LineStyle {
        if active {
            self.active_line
        } else {
            self.inactive_line
        }
    }

    pub fn marker(&self, active: bool) -> MarkerStyle {
        if active {
            self.active_marker
        } else {
            self.inactive_marker
        }
    }

    pub fn arrows(&self, active: bool) -> ArrowSymbol {
        let line = self.line(active);
        ArrowSymbol {
            color: line.color,
            scale: if active { 3.0 } else { 2.0 },
            repeat_px: self.arrow_repeat_px,
            offset_px: self.arrow_repeat_px / 2,
        }
    }
}

impl Default for RouteTheme {
    fn default() -> Self {
        let highlight = Srgb::new(0x25, 0x63, 0xeb);
        let muted = Srgb::new(0x94, 0xa3, 0xb8);
        let white = Srgb::new(0xff, 0xff, 0xff);

        Self {
            active_line: LineStyle::new(highlight, 6.0, 1.0),
            inactive_line: LineStyle::new(muted, 3.0, 0.5),
            active_marker: MarkerStyle {
                fill: highlight,
                label_color: white,
                scale: 1.2,
            },
            inactive_marker: MarkerStyle {
                fill: muted,
                label_color: white,
                scale: 1.0,
            },
            arrow_repeat_px: 100,
        }
    }
}

/// `#rrggbb` for hosts that take CSS colours
pub fn hex(color: Srgb<u8>) -> String {
    format!("#{:x}", color)
}
