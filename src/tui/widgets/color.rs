use ratatui::style::Color;

/// Palette offered by the color picker, as #RRGGBB
pub const TASK_COLOR_PALETTE: &[&str] = &[
    "#b624ff", "#ff69b4", "#ff4747", "#ff8c42", "#ffd23f", "#b7ff42",
    "#3ae836", "#2ec4b6", "#3da5ff", "#5061ff", "#8d5a97", "#f2a7c3",
    "#ffffff", "#9e9e9e", "#343434", "#000000",
];

/// Parse a color string into a ratatui Color
/// Supports named colors (black, red, ..., darkgray, lightred, ...)
/// and hex format: #RRGGBB or #RGB.
/// Returns Color::White as default for unrecognized colors
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => parse_hex_color(&s).unwrap_or(Color::White),
    }
}

/// Parse hex color format (#RRGGBB or #RGB)
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            // Short form: #RGB -> #RRGGBB
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Color::Rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
        }
        _ => None,
    }
}

/// Relative luminance of an RGB color (WCAG formula), 0.0 dark to 1.0 light
fn calculate_luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Get an appropriate foreground color for text on a given background color
/// Returns black for light backgrounds, white for dark backgrounds
pub fn get_contrast_text_color(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) => {
            if calculate_luminance(r, g, b) < 0.5 {
                Color::White
            } else {
                Color::Black
            }
        }
        Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray => Color::White,
        _ => Color::Black,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_and_hex_colors() {
        assert_eq!(parse_color("Red"), Color::Red);
        assert_eq!(parse_color("#ff0080"), Color::Rgb(255, 0, 128));
        assert_eq!(parse_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(parse_color("#zzzzzz"), Color::White);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn palette_entries_are_valid_hex() {
        for color in TASK_COLOR_PALETTE {
            assert!(parse_hex_color(color).is_some(), "{color}");
        }
    }

    #[test]
    fn contrast_text_flips_on_brightness() {
        assert_eq!(get_contrast_text_color(Color::Rgb(255, 255, 255)), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Rgb(20, 20, 20)), Color::White);
        assert_eq!(get_contrast_text_color(Color::Blue), Color::White);
    }
}
