//! Serialises a frame of iteration counts as ANSI 256-colour terminal cells.

use std::io::{self, Write};

use crate::palette::Palette;
use crate::render::PixelBuffer;

/// SGR reset, written at the end of every row.
pub const RESET: &str = "\x1b[0m";

const CELL: &[u8] = b" ";

/// Writes one space per pixel on a coloured background, one line per row.
/// The colour escape is only repeated when the colour changes within a row.
pub fn write_frame<W: Write>(
    out: &mut W,
    frame: &PixelBuffer,
    palette: &Palette,
    max_iter: u32,
) -> io::Result<()> {
    for row in frame.rows() {
        let mut current = None;
        for &count in row {
            let colour = palette.colour_for(count, max_iter);
            if current != Some(colour) {
                write!(out, "\x1b[48;5;{colour}m")?;
                current = Some(colour);
            }
            out.write_all(CELL)?;
        }
        writeln!(out, "{RESET}")?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::render::render_frame;
    use test_log::test;

    fn rendered(config: &RenderConfig) -> String {
        let frame = render_frame(config).unwrap();
        let mut out = Vec::new();
        write_frame(&mut out, &frame, config.palette(), config.max_iter()).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn small() -> RenderConfig {
        RenderConfig::builder()
            .width(24)
            .height(10)
            .max_iter(64)
            .build()
            .unwrap()
    }

    #[test]
    fn one_line_per_row_each_reset() {
        let text = rendered(&small());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 10);
        assert!(text.ends_with("\x1b[0m\n"));
        for line in lines {
            assert!(line.ends_with(RESET));
            assert!(line.starts_with("\x1b[48;5;"));
            assert_eq!(line.matches(' ').count(), 24);
        }
    }

    #[test]
    fn only_palette_colours_are_emitted() {
        let config = small();
        let text = rendered(&config);

        for escape in text.split("\x1b[48;5;").skip(1) {
            let colour: u8 = escape[..escape.find('m').unwrap()].parse().unwrap();
            assert!(config.palette().colours().contains(&colour));
        }
    }

    #[test]
    fn runs_of_one_colour_share_an_escape() {
        let config = RenderConfig::builder()
            .width(8)
            .height(1)
            .custom_palette(vec![16u8, 17, 18, 19, 20, 21, 22, 23])
            .build()
            .unwrap();
        let frame = PixelBuffer::from_counts(8, 1, vec![10_000, 10_000, 0, 0, 0, 1, 7, 10_000]);

        let mut out = Vec::new();
        write_frame(&mut out, &frame, config.palette(), 10_000).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[48;5;16m  \x1b[48;5;17m   \x1b[48;5;18m \x1b[48;5;17m \x1b[48;5;16m \x1b[0m\n"
        );
    }

    #[test]
    fn full_colour_preset_renders() {
        let config = small().to_builder().full_colours().build().unwrap();
        let text = rendered(&config);
        assert_eq!(text.lines().count(), 10);
        // The interior of the set is black in the full preset.
        assert!(text.contains("\x1b[48;5;0m"));
    }
}
