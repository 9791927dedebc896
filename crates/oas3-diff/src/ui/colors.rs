use std::io::IsTerminal;

use clap::{
  ValueEnum,
  builder::styling::{Color as ClapColor, RgbColor, Style, Styles},
};
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
  Always,
  Auto,
  Never,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeMode {
  Dark,
  Light,
  Auto,
}

#[derive(Debug, Clone, Copy)]
pub enum Theme {
  Dark,
  Light,
}

/// One color per role in the progress log and in findings.
#[derive(Debug, Clone, Copy)]
struct Palette {
  timestamp: Color,
  primary: Color,
  label: Color,
  value: Color,
  success: Color,
  major: Color,
  minor: Color,
}

const fn rgb(r: u8, g: u8, b: u8) -> Color {
  Color::Rgb { r, g, b }
}

const DARK: Palette = Palette {
  timestamp: rgb(118, 166, 166),
  primary: rgb(191, 126, 4),
  label: rgb(217, 164, 4),
  value: rgb(242, 211, 56),
  success: rgb(134, 179, 98),
  major: rgb(224, 92, 72),
  minor: rgb(118, 166, 166),
};

const LIGHT: Palette = Palette {
  timestamp: rgb(92, 62, 38),
  primary: rgb(70, 42, 25),
  label: rgb(176, 103, 66),
  value: rgb(199, 146, 76),
  success: rgb(34, 142, 90),
  major: rgb(178, 34, 34),
  minor: rgb(40, 111, 170),
};

#[derive(Debug, Clone, Copy)]
pub struct Colors {
  enabled: bool,
  theme: Theme,
}

impl Colors {
  pub const fn new(enabled: bool, theme: Theme) -> Self {
    Self { enabled, theme }
  }

  /// `Color::Reset` for every role when color is off.
  fn pick(&self, role: fn(&Palette) -> Color) -> Color {
    if !self.enabled {
      return Color::Reset;
    }

    match self.theme {
      Theme::Dark => role(&DARK),
      Theme::Light => role(&LIGHT),
    }
  }

  pub fn timestamp(&self) -> Color {
    self.pick(|palette| palette.timestamp)
  }

  pub fn primary(&self) -> Color {
    self.pick(|palette| palette.primary)
  }

  pub fn label(&self) -> Color {
    self.pick(|palette| palette.label)
  }

  pub fn value(&self) -> Color {
    self.pick(|palette| palette.value)
  }

  pub fn success(&self) -> Color {
    self.pick(|palette| palette.success)
  }

  pub fn major(&self) -> Color {
    self.pick(|palette| palette.major)
  }

  pub fn minor(&self) -> Color {
    self.pick(|palette| palette.minor)
  }

  const fn to_clap(color: Color) -> Option<ClapColor> {
    match color {
      Color::Rgb { r, g, b } => Some(ClapColor::Rgb(RgbColor(r, g, b))),
      _ => None,
    }
  }

  /// Help output always uses the dark palette; clap picks its own fallback
  /// when the terminal has no color.
  pub const fn clap_styles() -> Styles {
    Styles::styled()
      .header(Style::new().bold().underline().fg_color(Self::to_clap(DARK.label)))
      .usage(Style::new().bold().fg_color(Self::to_clap(DARK.label)))
      .literal(Style::new().fg_color(Self::to_clap(DARK.success)))
      .placeholder(Style::new().fg_color(Self::to_clap(DARK.minor)))
      .error(Style::new().bold().fg_color(Self::to_clap(DARK.major)))
      .valid(Style::new().fg_color(Self::to_clap(DARK.success)))
      .invalid(Style::new().bold().fg_color(Self::to_clap(DARK.major)))
  }
}

/// Progress goes to stderr, so that is the stream checked for a terminal.
pub fn colors_enabled(mode: ColorMode) -> bool {
  match mode {
    ColorMode::Always => true,
    ColorMode::Never => false,
    ColorMode::Auto => std::io::stderr().is_terminal(),
  }
}

/// `COLORFGBG` ("fg;bg") is the only hint consulted; background codes 8 and
/// up are light.
pub fn detect_theme(mode: ThemeMode) -> Theme {
  match mode {
    ThemeMode::Dark => Theme::Dark,
    ThemeMode::Light => Theme::Light,
    ThemeMode::Auto => std::env::var("COLORFGBG")
      .ok()
      .and_then(|colorfgbg| colorfgbg.rsplit(';').next()?.parse::<u8>().ok())
      .map_or(Theme::Dark, |background| {
        if background >= 8 { Theme::Light } else { Theme::Dark }
      }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn disabled_colors_reset_every_role() {
    let colors = Colors::new(false, Theme::Light);
    assert_eq!(colors.major(), Color::Reset);
    assert_eq!(colors.timestamp(), Color::Reset);
  }

  #[test]
  fn severity_roles_differ_per_theme() {
    let dark = Colors::new(true, Theme::Dark);
    let light = Colors::new(true, Theme::Light);
    assert_ne!(dark.major(), dark.minor());
    assert_ne!(dark.major(), light.major());
  }
}
