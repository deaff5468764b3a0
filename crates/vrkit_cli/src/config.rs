use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vrkit_models::{PositionF, RectF, RectI, SizeF, SizeI};

/// `vrkit` - VR overlay layout tools.
///
/// Converts overlay placements between editor-surface pixels and the
/// normalized VR layout space, searches for free overlay positions, and
/// replays shared-state snapshots through the live auto-connect computation.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Pixel size of the editor surface, as `WIDTHxHEIGHT`.
    ///
    /// All screen rectangles are interpreted relative to this surface.
    #[arg(long, global = true, env = "VRKIT_EDITOR_SURFACE", default_value = "1920x1080", value_parser = parse_surface)]
    pub surface: SizeI,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Canonical backing-texture rect for a normalized VR size.
    TextureSize {
        /// Normalized size as `W,H`.
        #[arg(long, value_parser = parse_size_f)]
        size: SizeF,
    },

    /// Convert a screen rect on the editor surface to a VR layout.
    ToVr {
        /// Screen rect as `X,Y,W,H` in pixels.
        #[arg(long, value_parser = parse_rect_i)]
        rect: RectI,
    },

    /// Convert a VR pose and size to a screen rect on the editor surface.
    ToScreen {
        /// Widget centre as `X,EYE_Y`.
        #[arg(long, value_parser = parse_position_f, allow_hyphen_values = true)]
        pose: PositionF,

        /// Normalized size as `W,H`.
        #[arg(long, value_parser = parse_size_f)]
        size: SizeF,
    },

    /// Find free positions for new overlays inside a container.
    Place {
        /// Container rect as `X,Y,W,H`.
        #[arg(long, value_parser = parse_rect_f, allow_hyphen_values = true)]
        container: RectF,

        /// Size of each overlay to place, as `W,H`.
        #[arg(long, value_parser = parse_size_f)]
        size: SizeF,

        /// Preferred position as `X,Y`; defaults to the container centre.
        #[arg(long, value_parser = parse_position_f, allow_hyphen_values = true)]
        anchor: Option<PositionF>,

        /// Already occupied rects as `X,Y,W,H`; may be repeated.
        #[arg(long, value_parser = parse_rect_f, allow_hyphen_values = true)]
        occupied: Vec<RectF>,

        /// Search on a 0.1 grid (normalized space) instead of whole pixels.
        #[arg(long)]
        floating: bool,

        /// How many overlays to place, one after another.
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Recompute canonical VR backing rects in a dashboard JSON file.
    RefreshDashboard {
        file: PathBuf,
    },

    /// Replay a JSON array of shared app state snapshots through the live
    /// auto-connect computation.
    AutoConnect {
        file: PathBuf,
    },
}

fn parse_numbers<const N: usize>(value: &str, sep: char, what: &str) -> Result<[f64; N], String> {
    let parts: Vec<&str> = value.split(sep).map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {what}, got '{value}'"));
    }

    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid number '{part}' in '{value}': {e}"))?;
    }
    Ok(out)
}

fn to_len(value: f64, original: &str) -> Result<u32, String> {
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(format!("'{original}' must contain whole non-negative sizes"));
    }
    Ok(value as u32)
}

fn to_coord(value: f64, original: &str) -> Result<i32, String> {
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(format!("'{original}' must contain whole pixel positions"));
    }
    Ok(value as i32)
}

pub fn parse_surface(value: &str) -> Result<SizeI, String> {
    let [w, h] = parse_numbers::<2>(value, 'x', "WIDTHxHEIGHT")?;
    Ok(SizeI::new(to_len(w, value)?, to_len(h, value)?))
}

pub fn parse_size_f(value: &str) -> Result<SizeF, String> {
    let [w, h] = parse_numbers::<2>(value, ',', "W,H")?;
    Ok(SizeF::new(w, h))
}

pub fn parse_position_f(value: &str) -> Result<PositionF, String> {
    let [x, y] = parse_numbers::<2>(value, ',', "X,Y")?;
    Ok(PositionF::new(x, y))
}

pub fn parse_rect_f(value: &str) -> Result<RectF, String> {
    let [x, y, w, h] = parse_numbers::<4>(value, ',', "X,Y,W,H")?;
    Ok(RectF::new(x, y, w, h))
}

pub fn parse_rect_i(value: &str) -> Result<RectI, String> {
    let [x, y, w, h] = parse_numbers::<4>(value, ',', "X,Y,W,H")?;
    Ok(RectI::new(
        to_coord(x, value)?,
        to_coord(y, value)?,
        to_len(w, value)?,
        to_len(h, value)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_surface("1920x1080"), Ok(SizeI::new(1920, 1080)));
        assert_eq!(parse_rect_i("-5, 10, 20, 30"), Ok(RectI::new(-5, 10, 20, 30)));
        assert_eq!(parse_position_f("-0.5,0.375"), Ok(PositionF::new(-0.5, 0.375)));
        assert_eq!(parse_rect_f("-1,-1,2,2"), Ok(RectF::new(-1.0, -1.0, 2.0, 2.0)));

        assert!(parse_surface("1920").is_err());
        assert!(parse_rect_i("0,0,-1,5").is_err());
        assert!(parse_rect_i("0.5,0,1,5").is_err());
        assert!(parse_size_f("a,b").is_err());
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let config = Config::try_parse_from([
            "vrkit",
            "--surface",
            "1000x800",
            "to-screen",
            "--pose",
            "-0.5,0.375",
            "--size",
            "0.5,0.25",
        ])
        .unwrap();

        assert_eq!(config.surface, SizeI::new(1000, 800));
        match config.command {
            Command::ToScreen { pose, size } => {
                assert_eq!(pose, PositionF::new(-0.5, 0.375));
                assert_eq!(size, SizeF::new(0.5, 0.25));
            }
            other => panic!("unexpected command {other:?}"),
        }

        let config = Config::try_parse_from([
            "vrkit", "place", "--container", "0,0,100,100", "--size", "10,10", "--occupied",
            "40,40,20,20", "--occupied", "0,0,5,5",
        ])
        .unwrap();
        match config.command {
            Command::Place { occupied, count, floating, anchor, .. } => {
                assert_eq!(occupied.len(), 2);
                assert_eq!(count, 1);
                assert!(!floating);
                assert!(anchor.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
