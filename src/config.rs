// Command line configuration for the painting window.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::brush::{BrushKind, CircleBrush, LetterBrush, SquareBrush};
use crate::error::Error;
use crate::stroke::DEFAULT_ALPHA;

/// Paint over an image with brushes that pick up its colors
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source image to paint from (PNG, JPEG, ...)
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Initial window width in pixels
    #[arg(long, default_value_t = 800)]
    pub width: usize,

    /// Initial window height in pixels
    #[arg(long, default_value_t = 600)]
    pub height: usize,

    /// Alpha (0-255) every brush instance is painted with
    #[arg(short = 'a', long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: u8,

    /// Brush to start with
    #[arg(short = 'b', long, value_enum, default_value_t = BrushChoice::Square)]
    pub brush: BrushChoice,

    /// Start with color inversion on
    #[arg(short = 'i', long)]
    pub invert: bool,

    /// Start with the source image shown under the painting
    #[arg(long)]
    pub background: bool,

    /// Seed for brush jitter and letters (random if omitted)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Where exports are written; the strokes-only export gets a `_strokes` suffix
    #[arg(short = 'o', long, value_name = "FILE", default_value = "painting.png")]
    pub out: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum BrushChoice {
    Circle,
    Square,
    Letter,
}

impl From<BrushChoice> for BrushKind {
    fn from(choice: BrushChoice) -> Self {
        match choice {
            BrushChoice::Circle => CircleBrush.into(),
            BrushChoice::Square => SquareBrush.into(),
            BrushChoice::Letter => LetterBrush.into(),
        }
    }
}

impl Args {
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Config(format!("window size {}x{} is empty", self.width, self.height)));
        }
        Ok(())
    }

    /// Export target for a composite with or without the source image under it.
    pub fn export_path(&self, with_background: bool) -> PathBuf {
        if with_background {
            return self.out.clone();
        }
        let stem = self.out.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "painting".into());
        let ext = self.out.extension().map(|e| e.to_string_lossy().into_owned()).unwrap_or_else(|| "png".into());
        self.out.with_file_name(format!("{stem}_strokes.{ext}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brush::Brush;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["impressionist", "photo.jpg"]).unwrap();
        assert_eq!(args.image, PathBuf::from("photo.jpg"));
        assert_eq!((args.width, args.height), (800, 600));
        assert_eq!(args.alpha, 150);
        assert_eq!(args.brush, BrushChoice::Square);
        assert!(!args.invert && !args.background);
        assert_eq!(args.seed, None);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn brush_and_toggles_parse() {
        let args = Args::try_parse_from([
            "impressionist", "photo.jpg", "--brush", "letter", "--invert", "--background", "--alpha", "200", "--seed", "7",
        ])
        .unwrap();
        assert_eq!(BrushKind::from(args.brush).name(), "letter");
        assert!(args.invert && args.background);
        assert_eq!(args.alpha, 200);
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn out_of_range_alpha_is_rejected() {
        assert!(Args::try_parse_from(["impressionist", "photo.jpg", "--alpha", "300"]).is_err());
    }

    #[test]
    fn empty_window_is_rejected() {
        let args = Args::try_parse_from(["impressionist", "photo.jpg", "--width", "0"]).unwrap();
        assert!(matches!(args.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn strokes_only_export_gets_a_suffix() {
        let args = Args::try_parse_from(["impressionist", "photo.jpg", "-o", "out/art.png"]).unwrap();
        assert_eq!(args.export_path(true), PathBuf::from("out/art.png"));
        assert_eq!(args.export_path(false), PathBuf::from("out/art_strokes.png"));
    }
}
