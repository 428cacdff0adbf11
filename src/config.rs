//! Static asset lists and theme constants.
//!
//! Everything the renderer needs is declared here in code; there are no config files or
//! environment variables.

use std::path::PathBuf;

use crate::{
    background::{BackgroundStyle, DeepSea},
    foundation::color::Rgba8,
    frame::{FrameFit, FrameStyle},
};

/// Font tried first for every set; missing on most non-macOS hosts, which triggers the fallback.
pub const FONT_PATH: &str = "/System/Library/Fonts/Supplemental/Arial Bold.ttf";

/// Output canvas size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// One asset to generate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSpec {
    /// Tall store screenshot: background, text block, device frame with a screenshot.
    Screenshot {
        /// File name inside the set's input directory.
        source: String,
        title: String,
        subtitle: Option<String>,
        output: String,
    },
    /// Wide feature graphic: background and vertically centered text, no device.
    FeatureGraphic {
        title: String,
        subtitle: Option<String>,
        output: String,
    },
}

impl AssetSpec {
    pub fn screenshot(
        source: impl Into<String>,
        title: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self::Screenshot {
            source: source.into(),
            title: title.into(),
            subtitle: None,
            output: output.into(),
        }
    }

    pub fn feature_graphic(title: impl Into<String>, output: impl Into<String>) -> Self {
        Self::FeatureGraphic {
            title: title.into(),
            subtitle: None,
            output: output.into(),
        }
    }

    pub fn with_subtitle(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Screenshot { subtitle, .. } | Self::FeatureGraphic { subtitle, .. } => {
                *subtitle = Some(text.into());
            }
        }
        self
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Screenshot { title, .. } | Self::FeatureGraphic { title, .. } => title,
        }
    }

    pub fn subtitle(&self) -> Option<&str> {
        match self {
            Self::Screenshot { subtitle, .. } | Self::FeatureGraphic { subtitle, .. } => {
                subtitle.as_deref()
            }
        }
    }

    pub fn output(&self) -> &str {
        match self {
            Self::Screenshot { output, .. } | Self::FeatureGraphic { output, .. } => output,
        }
    }
}

/// Text sizes and spacing for one asset kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    pub title_px: f32,
    pub subtitle_px: f32,
    /// Distance from the end of the title block to the subtitle.
    pub subtitle_gap: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Typography {
    pub title_color: Rgba8,
    pub subtitle_color: Rgba8,
    /// Vertical gap between lines of one block.
    pub line_gap: u32,
    /// Top of the title on screenshots.
    pub title_top: i32,
    /// Feature graphic titles sit this far above true vertical center.
    pub feature_lift: i32,
    pub screenshot: TextMetrics,
    pub feature: TextMetrics,
}

/// Look of every asset in a set.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub screenshot_size: Size,
    pub feature_size: Size,
    pub background: BackgroundStyle,
    pub typography: Typography,
    pub frame: FrameStyle,
}

impl Theme {
    /// Dark "deep sea" look used for the Google Play listing.
    pub fn deep_sea() -> Self {
        let accent = Rgba8::rgb(38, 198, 218);
        Self {
            screenshot_size: Size::new(1080, 1920),
            feature_size: Size::new(1024, 500),
            background: BackgroundStyle::DeepSea(DeepSea {
                base: Rgba8::rgb(18, 18, 18),
                accent,
                glow_alpha: 40,
                glow_sigma: 100.0,
                bubble_count: 15,
                bubble_sigma: 2.0,
            }),
            typography: default_typography(),
            frame: FrameStyle {
                bezel: 30,
                corner_radius: 50.0,
                shadow_offset: 20,
                shadow: Rgba8::rgba(0, 0, 0, 100),
                body: Rgba8::rgb(30, 30, 30),
                fit: FrameFit::ScreenWidth,
                scale: 0.8,
                gap_below_title: 150,
            },
        }
    }

    /// Blue-grey gradient look sized for the 6.7" iPhone App Store slot.
    pub fn app_store_gradient() -> Self {
        Self {
            screenshot_size: Size::new(1290, 2796),
            feature_size: Size::new(1024, 500),
            background: BackgroundStyle::Gradient {
                top: Rgba8::rgb(20, 24, 35),
                bottom: Rgba8::rgb(30, 40, 60),
            },
            typography: default_typography(),
            frame: FrameStyle {
                bezel: 40,
                corner_radius: 60.0,
                shadow_offset: 30,
                shadow: Rgba8::rgba(0, 0, 0, 100),
                body: Rgba8::rgb(30, 30, 30),
                fit: FrameFit::DeviceWidth,
                scale: 0.8,
                // 20 px trailing line gap plus 100 px of breathing room.
                gap_below_title: 120,
            },
        }
    }
}

fn default_typography() -> Typography {
    Typography {
        title_color: Rgba8::rgb(255, 255, 255),
        subtitle_color: Rgba8::rgb(200, 200, 200),
        line_gap: 20,
        title_top: 150,
        feature_lift: 20,
        screenshot: TextMetrics {
            title_px: 100.0,
            subtitle_px: 50.0,
            subtitle_gap: 30,
        },
        feature: TextMetrics {
            title_px: 80.0,
            subtitle_px: 40.0,
            subtitle_gap: 20,
        },
    }
}

/// A named group of assets sharing directories, font and theme.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetSet {
    pub name: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub font_path: PathBuf,
    pub theme: Theme,
    pub assets: Vec<AssetSpec>,
}

impl AssetSet {
    /// Google Play listing: four phone screenshots and the feature graphic.
    pub fn google_play() -> Self {
        Self {
            name: "google-play".to_string(),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("store_assets/output_google_play"),
            font_path: PathBuf::from(FONT_PATH),
            theme: Theme::deep_sea(),
            assets: vec![
                AssetSpec::screenshot("timer.png", "Dive into\nDeep Focus", "1_timer.png")
                    .with_subtitle("Immersive timer for flow state."),
                AssetSpec::screenshot("heatmap.png", "Visualize\nYour Effort", "2_heatmap.png")
                    .with_subtitle("Track your daily progress."),
                AssetSpec::screenshot("sound.png", "Immersive\nSound", "3_sound.png")
                    .with_subtitle("Ocean ambience to block noise."),
                AssetSpec::screenshot("suggest.png", "Instant\nFocus", "4_suggest.png")
                    .with_subtitle("Smart suggestions. No setup."),
                AssetSpec::feature_graphic("flow", "feature_graphic.png")
                    .with_subtitle("Dive into Deep Focus"),
            ],
        }
    }

    /// App Store listing: three 6.7" screenshots on a gradient.
    pub fn app_store() -> Self {
        Self {
            name: "app-store".to_string(),
            input_dir: PathBuf::from("store_assets/raw"),
            output_dir: PathBuf::from("store_assets/output"),
            font_path: PathBuf::from(FONT_PATH),
            theme: Theme::app_store_gradient(),
            assets: vec![
                AssetSpec::screenshot(
                    "screen_flow.png",
                    "Manage Tasks\nEffectively",
                    "store_screen_flow.png",
                ),
                AssetSpec::screenshot(
                    "screen_reflect.png",
                    "Focus On\nThe Moment",
                    "store_screen_reflect.png",
                ),
                AssetSpec::screenshot(
                    "screen_settings.png",
                    "Customize\nYour Experience",
                    "store_screen_settings.png",
                ),
            ],
        }
    }

    /// Same set, reading from `input_dir` and writing to `output_dir`.
    pub fn with_dirs(
        mut self,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        self.input_dir = input_dir.into();
        self.output_dir = output_dir.into();
        self
    }

    /// Same set, restricted to `assets`.
    pub fn with_assets(mut self, assets: Vec<AssetSpec>) -> Self {
        self.assets = assets;
        self
    }
}

/// Every set the binary renders, in order.
pub fn asset_sets() -> Vec<AssetSet> {
    vec![AssetSet::google_play(), AssetSet::app_store()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_sets_have_unique_outputs() {
        for set in asset_sets() {
            let mut outputs: Vec<_> = set.assets.iter().map(AssetSpec::output).collect();
            let n = outputs.len();
            outputs.sort();
            outputs.dedup();
            assert_eq!(outputs.len(), n, "duplicate output in {}", set.name);
        }
    }

    #[test]
    fn google_play_has_one_feature_graphic() {
        let set = AssetSet::google_play();
        let features = set
            .assets
            .iter()
            .filter(|a| matches!(a, AssetSpec::FeatureGraphic { .. }))
            .count();
        assert_eq!(features, 1);
        assert_eq!(set.theme.screenshot_size, Size::new(1080, 1920));
        assert_eq!(set.theme.feature_size, Size::new(1024, 500));
    }

    #[test]
    fn app_store_targets_iphone_67() {
        let set = AssetSet::app_store();
        assert_eq!(set.theme.screenshot_size, Size::new(1290, 2796));
        assert!(set.assets.iter().all(|a| a.subtitle().is_none()));
    }

    #[test]
    fn subtitle_builder_applies_to_both_variants() {
        let shot = AssetSpec::screenshot("a.png", "A", "a_out.png").with_subtitle("sub");
        let feat = AssetSpec::feature_graphic("B", "b_out.png").with_subtitle("sub");
        assert_eq!(shot.subtitle(), Some("sub"));
        assert_eq!(feat.subtitle(), Some("sub"));
        assert_eq!(feat.title(), "B");
    }
}
