use tracker_core::Metric;

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED:   Self = Self { r: 0xe7, g: 0x4c, b: 0x3c }; // #e74c3c
    pub const BLUE:  Self = Self { r: 0x34, g: 0x98, b: 0xdb }; // #3498db
    pub const GREEN: Self = Self { r: 0x2e, g: 0xcc, b: 0x71 }; // #2ecc71

    /// Line colour of a metric's chart panel.
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Subscribers => Self::RED,
            Metric::Views       => Self::BLUE,
            Metric::Videos      => Self::GREEN,
        }
    }

    /// CSS-style `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Wrap `text` in a 24-bit ANSI foreground colour escape.
    pub fn paint(self, text: &str) -> String {
        format!("\x1b[38;2;{};{};{}m{text}\x1b[0m", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_matches_palette() {
        assert_eq!(Color::for_metric(Metric::Subscribers).to_hex(), "#e74c3c");
        assert_eq!(Color::for_metric(Metric::Views).to_hex(), "#3498db");
        assert_eq!(Color::for_metric(Metric::Videos).to_hex(), "#2ecc71");
    }

    #[test]
    fn paint_resets_after_text() {
        let s = Color::GREEN.paint("ok");
        assert!(s.starts_with("\x1b[38;2;46;204;113m"));
        assert!(s.ends_with("ok\x1b[0m"));
    }
}
