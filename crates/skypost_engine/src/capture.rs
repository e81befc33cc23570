use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use skypost_core::{Padding, ScreenshotConfig};

/// Clip heights above this get a bottom fade overlaid before capture.
pub const FADE_START: f64 = 800.0;

/// Hard cap on the clip height, in logical pixels.
pub const MAX_HEIGHT: f64 = 1000.0;

/// Height of the fade overlay when cropping kicks in.
const FADE_HEIGHT: f64 = 200.0;

/// Bounding box of the target element, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel region passed to the browser's screenshot call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipResult {
    pub clip: Clip,
    pub was_cropped: bool,
}

/// Expand the element box by its padding and round to whole pixels.
///
/// Negative padding extends the clip past the box on that side. The height is
/// capped at `max_height`; `was_cropped` reports whether the uncapped height
/// exceeded `fade_start`.
pub fn compute_clip(
    element: ElementBox,
    padding: Padding,
    fade_start: f64,
    max_height: f64,
) -> ClipResult {
    let full_height = element.height + padding.top + padding.bottom;
    ClipResult {
        clip: Clip {
            x: (element.x - padding.left).round(),
            y: (element.y - padding.top).round(),
            width: (element.width + padding.left + padding.right).round(),
            height: full_height.min(max_height).round(),
        },
        was_cropped: full_height > fade_start,
    }
}

/// CSS for the bottom fade injected over cropped captures.
fn build_fade_overlay_style(top: f64, height: f64) -> String {
    format!(
        "position: absolute; top: {top}px; left: 0; width: 100%; height: {height}px; \
         background: linear-gradient(to bottom, rgba(255, 255, 255, 0), rgba(255, 255, 255, 1)); \
         z-index: 9999; pointer-events: none;"
    )
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to launch browser: {0}")]
    Launch(String),
    #[error("failed to load {url}: {message}")]
    Navigation { url: String, message: String },
    #[error("element {selector} not found on page")]
    ElementNotFound { selector: String },
    #[error("could not determine bounding box for {selector}: {message}")]
    Geometry { selector: String, message: String },
    #[error("failed to capture screenshot: {0}")]
    Screenshot(String),
    #[error("failed to write {path}: {message}")]
    Write { path: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutput {
    pub png_path: String,
    pub was_cropped: bool,
}

/// The narrow capture contract: one config in, one captured image out.
#[async_trait]
pub trait Capturer: Send + Sync {
    async fn capture(&self, config: &ScreenshotConfig) -> Result<CaptureOutput, CaptureError>;
}

#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Logical viewport, phone-shaped to match the published embeds.
    pub window_size: (u32, u32),
    /// Bounded wait for the target element to attach. Expiry means "not
    /// found", not a fatal timeout.
    pub element_timeout: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            window_size: (393, 852),
            element_timeout: Duration::from_secs(10),
        }
    }
}

/// Captures screenshots by driving a headless Chromium instance.
///
/// One browser is launched per call and torn down when the call returns,
/// success or not (the `Browser` handle closes on drop).
#[derive(Debug, Clone, Default)]
pub struct ChromeCapturer {
    settings: CaptureSettings,
}

impl ChromeCapturer {
    pub fn new(settings: CaptureSettings) -> Self {
        Self { settings }
    }

    fn capture_blocking(
        settings: &CaptureSettings,
        config: &ScreenshotConfig,
    ) -> Result<CaptureOutput, CaptureError> {
        let options = LaunchOptions::default_builder()
            .window_size(Some(settings.window_size))
            .build()
            .map_err(|err| CaptureError::Launch(err.to_string()))?;
        let browser = Browser::new(options).map_err(|err| CaptureError::Launch(err.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|err| CaptureError::Launch(err.to_string()))?;

        tab.navigate_to(&config.url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|err| CaptureError::Navigation {
                url: config.url.clone(),
                message: err.to_string(),
            })?;

        let element = tab
            .wait_for_element_with_custom_timeout(&config.selector, settings.element_timeout)
            .map_err(|_| CaptureError::ElementNotFound {
                selector: config.selector.clone(),
            })?;

        // Best-effort: wrap long code lines so they do not run off the clip.
        // A missing code block is expected on most pages.
        if let Err(err) = tab.evaluate(&wrap_code_script(&config.code_selector), false) {
            log::info!(
                "code wrap skipped for {}: {}",
                config.code_selector,
                err
            );
        }

        let viewport = element
            .get_box_model()
            .map_err(|err| CaptureError::Geometry {
                selector: config.selector.clone(),
                message: err.to_string(),
            })?
            .border_viewport();
        let element_box = ElementBox {
            x: viewport.x,
            y: viewport.y,
            width: viewport.width,
            height: viewport.height,
        };

        let ClipResult { clip, was_cropped } =
            compute_clip(element_box, config.padding, FADE_START, MAX_HEIGHT);

        if was_cropped {
            let overlay_top = clip.y + clip.height - FADE_HEIGHT;
            let style = build_fade_overlay_style(overlay_top, FADE_HEIGHT);
            tab.evaluate(&fade_overlay_script(&style), false)
                .map_err(|err| CaptureError::Screenshot(err.to_string()))?;
        }

        let png = tab
            .capture_screenshot(
                Page::CaptureScreenshotFormatOption::Png,
                None,
                Some(Page::Viewport {
                    x: clip.x,
                    y: clip.y,
                    width: clip.width,
                    height: clip.height,
                    scale: 1.0,
                }),
                true,
            )
            .map_err(|err| CaptureError::Screenshot(err.to_string()))?;

        if let Some(parent) = std::path::Path::new(&config.output_path).parent() {
            std::fs::create_dir_all(parent).map_err(|err| CaptureError::Write {
                path: config.output_path.clone(),
                message: err.to_string(),
            })?;
        }
        std::fs::write(&config.output_path, png).map_err(|err| CaptureError::Write {
            path: config.output_path.clone(),
            message: err.to_string(),
        })?;

        log::info!(
            "captured {} ({}x{}, cropped={})",
            config.output_path,
            clip.width,
            clip.height,
            was_cropped
        );

        Ok(CaptureOutput {
            png_path: config.output_path.clone(),
            was_cropped,
        })
    }
}

#[async_trait]
impl Capturer for ChromeCapturer {
    async fn capture(&self, config: &ScreenshotConfig) -> Result<CaptureOutput, CaptureError> {
        let settings = self.settings.clone();
        let config = config.clone();
        tokio::task::spawn_blocking(move || Self::capture_blocking(&settings, &config))
            .await
            .map_err(|err| CaptureError::Screenshot(err.to_string()))?
    }
}

fn wrap_code_script(code_selector: &str) -> String {
    format!(
        "document.querySelectorAll('{}').forEach((el) => {{ \
           el.style.whiteSpace = 'pre-wrap'; \
           el.style.wordBreak = 'break-word'; \
         }});",
        code_selector.replace('\'', "\\'")
    )
}

fn fade_overlay_script(style: &str) -> String {
    format!(
        "const overlay = document.createElement('div'); \
         overlay.style.cssText = '{}'; \
         document.body.appendChild(overlay);",
        style.replace('\'', "\\'")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padding() -> Padding {
        Padding {
            top: 10.0,
            right: 20.0,
            bottom: 30.0,
            left: 15.0,
        }
    }

    #[test]
    fn clip_applies_padding_around_box() {
        let element = ElementBox {
            x: 100.0,
            y: 200.0,
            width: 400.0,
            height: 300.0,
        };
        let ClipResult { clip, was_cropped } =
            compute_clip(element, padding(), FADE_START, MAX_HEIGHT);

        assert_eq!(clip.x, 85.0);
        assert_eq!(clip.y, 190.0);
        assert_eq!(clip.width, 435.0);
        assert_eq!(clip.height, 340.0);
        assert!(!was_cropped);
    }

    #[test]
    fn tall_box_is_cropped_but_not_capped() {
        let element = ElementBox {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 900.0,
        };
        let ClipResult { clip, was_cropped } =
            compute_clip(element, padding(), FADE_START, MAX_HEIGHT);

        // full height 940 exceeds the fade start but not the cap
        assert!(was_cropped);
        assert_eq!(clip.height, 940.0);
    }

    #[test]
    fn very_tall_box_is_capped_at_max_height() {
        let element = ElementBox {
            x: 0.0,
            y: 0.0,
            width: 400.0,
            height: 1200.0,
        };
        let ClipResult { clip, was_cropped } =
            compute_clip(element, padding(), FADE_START, MAX_HEIGHT);

        assert!(was_cropped);
        assert_eq!(clip.height, MAX_HEIGHT);
    }

    #[test]
    fn clip_values_are_rounded() {
        let element = ElementBox {
            x: 10.7,
            y: 20.3,
            width: 100.5,
            height: 200.9,
        };
        let fractional = Padding {
            top: 5.5,
            right: 3.2,
            bottom: 7.8,
            left: 2.1,
        };
        let ClipResult { clip, .. } = compute_clip(element, fractional, FADE_START, MAX_HEIGHT);

        assert_eq!(clip.x, (10.7f64 - 2.1).round());
        assert_eq!(clip.y, (20.3f64 - 5.5).round());
        assert_eq!(clip.width, (100.5f64 + 2.1 + 3.2).round());
        assert_eq!(clip.height, (200.9f64 + 5.5 + 7.8).round());
    }

    #[test]
    fn negative_padding_shrinks_from_the_top() {
        let element = ElementBox {
            x: 100.0,
            y: 200.0,
            width: 400.0,
            height: 300.0,
        };
        let negative_top = Padding {
            top: -10.0,
            right: 30.0,
            bottom: 40.0,
            left: 30.0,
        };
        let ClipResult { clip, .. } = compute_clip(element, negative_top, FADE_START, MAX_HEIGHT);

        // subtracting a negative top moves the clip down into the box
        assert_eq!(clip.y, 210.0);
        assert_eq!(clip.height, 330.0);
    }

    #[test]
    fn fade_style_is_an_absolute_gradient_overlay() {
        let style = build_fade_overlay_style(500.0, 200.0);
        assert!(style.contains("top: 500px"));
        assert!(style.contains("height: 200px"));
        assert!(style.contains("linear-gradient"));
        assert!(style.contains("position: absolute"));
        assert!(style.contains("z-index: 9999"));
    }
}
