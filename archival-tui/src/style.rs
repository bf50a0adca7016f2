//! Colours for the workstation chrome, configured as HSV and converted for ratatui.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// HSV color representation (hue 0-1, saturation 0-1, value 0-1).
pub type Hsv = [f32; 3];

macro_rules! style_fields {
    ($(($field:ident, $fn_name:ident, $default:expr)),* $(,)?) => {
        /// Style configuration with HSV colors for the workstation chrome.
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
        #[serde(default)]
        pub struct Style {
            $(
                #[doc = concat!("HSV colour for ", stringify!($fn_name))]
                pub $field: Hsv,
            )*
        }
        impl Default for Style {
            fn default() -> Self {
                Self {
                    $($field: $default,)*
                }
            }
        }
        impl Style {
            $(
                pub fn $fn_name(&self) -> Color {
                    hsv_to_color(self.$field)
                }
            )*
        }
    }
}

style_fields![
    (background_hsv, background, [0.11, 0.08, 0.16]),
    (paper_hsv, paper, [0.12, 0.07, 0.88]),
    (ink_hsv, ink, [0.11, 0.10, 0.17]),
    (muted_hsv, muted, [0.11, 0.05, 0.55]),
    (accent_hsv, accent, [0.04, 1.0, 1.0]),
    (signal_hsv, signal, [0.58, 0.80, 0.85]),
    (terminal_hsv, terminal, [0.11, 0.10, 0.12]),
];

/// Converts HSV to ratatui's Color, gamma-corrected to match how the colours look elsewhere.
pub fn hsv_to_color([h, s, v]: Hsv) -> Color {
    #![allow(clippy::many_single_char_names)]
    let h = (h.fract() + 1.0).fract(); // wrap
    let s = s.clamp(0.0, 1.0);

    let f = h * 6.0 - (h * 6.0).floor();
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let [r, g, b] = match (h * 6.0).floor() as i32 % 6 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    };

    Color::Rgb(
        gamma_u8_from_linear_f32(r),
        gamma_u8_from_linear_f32(g),
        gamma_u8_from_linear_f32(b),
    )
}

fn gamma_u8_from_linear_f32(l: f32) -> u8 {
    if l <= 0.0 {
        0
    } else if l <= 0.0031308 {
        fast_round(3294.6 * l)
    } else if l <= 1.0 {
        fast_round(269.025 * l.powf(1.0 / 2.4) - 14.025)
    } else {
        255
    }
}

fn fast_round(r: f32) -> u8 {
    (r + 0.5) as _ // rust does a saturating cast since 1.45
}

/// Mixes `fg` over `bg` at the given opacity. Terminals have no alpha, so faded cards are
/// drawn by pulling their colours towards the desk.
pub fn blend(fg: Color, bg: Color, opacity: f32) -> Color {
    let (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) = (fg, bg) else {
        return if opacity >= 0.5 { fg } else { bg };
    };
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |f: u8, b: u8| (b as f32 + (f as f32 - b as f32) * opacity).round() as u8;
    Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
}

pub fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}
