//! Multi-strategy scan orchestration.
//!
//! Each strategy is a (crop, preprocess, max dimension) tuple tried in
//! order against the same source image. The first fully-valid parse wins
//! immediately; otherwise the best partial parse seen is returned after the
//! list is exhausted. A failing strategy is logged and skipped, never
//! propagated.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;
use image::DynamicImage;

use crate::models::{
    ParsedIdentity, ScanCode, ScanResult, ValidationReport, ValidationStatus,
};
use crate::processing::image as preprocess;
use crate::processing::{detect, extract, normalize_line, TextRecognizer};
use crate::utils::ScanError;
use crate::validation::{build_identity, failure_messages};

/// One preprocessing recipe: crop this fraction off the bottom (0 = no
/// crop), binarize or stay grayscale, downscale to this dimension first.
#[derive(Debug, Clone)]
pub struct ScanStrategy {
    pub name: &'static str,
    pub crop_fraction: f32,
    pub binarize: bool,
    pub max_dim: u32,
}

/// The production strategy list, ordered cheapest-first. The MRZ prints
/// along the card's bottom edge, so the tight bottom crop usually wins.
pub fn default_strategies() -> Vec<ScanStrategy> {
    vec![
        ScanStrategy {
            name: "bottom-crop",
            crop_fraction: 0.22,
            binarize: true,
            max_dim: 1600,
        },
        ScanStrategy {
            name: "larger-bottom",
            crop_fraction: 0.34,
            binarize: true,
            max_dim: 1600,
        },
        ScanStrategy {
            name: "full-resize-pre",
            crop_fraction: 0.0,
            binarize: true,
            max_dim: 1200,
        },
        ScanStrategy {
            name: "grayscale-bottom",
            crop_fraction: 0.22,
            binarize: false,
            max_dim: 1600,
        },
    ]
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// TD3 (passport) detection is experimental and off by default.
    pub allow_td3: bool,
    /// Wall-clock budget across the whole strategy list. On expiry the
    /// scan returns the best result so far instead of starting another
    /// strategy.
    pub budget: Option<Duration>,
    pub strategies: Vec<ScanStrategy>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            allow_td3: false,
            budget: None,
            strategies: default_strategies(),
        }
    }
}

/// Drives preprocessing, OCR, detection, extraction and validation for one
/// image. Holds the long-lived OCR engine behind a mutex so concurrent
/// scans serialize their recognize calls.
pub struct MrzScanner {
    recognizer: Mutex<Box<dyn TextRecognizer>>,
    options: ScanOptions,
}

impl MrzScanner {
    pub fn new(recognizer: Box<dyn TextRecognizer>) -> Self {
        Self::with_options(recognizer, ScanOptions::default())
    }

    pub fn with_options(recognizer: Box<dyn TextRecognizer>, options: ScanOptions) -> Self {
        MrzScanner {
            recognizer: Mutex::new(recognizer),
            options,
        }
    }

    /// Scan an encoded image (JPEG/PNG bytes). Empty or undecodable input
    /// is a terminal `no_image`; no strategies are attempted.
    pub fn scan_bytes(&self, image_data: &[u8]) -> ScanResult {
        if image_data.is_empty() {
            return ScanResult::no_image("input image is empty");
        }
        match image::load_from_memory(image_data) {
            Ok(img) => self.scan_image(&img),
            Err(e) => {
                log::warn!("could not decode input image: {}", e);
                ScanResult::no_image(&format!("could not decode input image: {}", e))
            }
        }
    }

    /// Scan a decoded image through the strategy list.
    pub fn scan_image(&self, img: &DynamicImage) -> ScanResult {
        let started = Instant::now();
        let mut best: Option<ScanResult> = None;

        for strategy in &self.options.strategies {
            if let Some(budget) = self.options.budget {
                if started.elapsed() >= budget {
                    log::warn!(
                        "scan budget exhausted before strategy {}, returning best so far",
                        strategy.name
                    );
                    break;
                }
            }

            match self.run_strategy(img, strategy) {
                Ok(Some(identity)) => {
                    log::info!(
                        "strategy {} parsed a {} result ({}/{} checks)",
                        strategy.name,
                        identity_status_label(&identity),
                        identity.checks.passed(),
                        identity.checks.total()
                    );
                    let result = result_for(identity, strategy.name);
                    if result.validation.status == ValidationStatus::Ok {
                        return result;
                    }
                    if rank(&best) < rank(&Some(result.clone())) {
                        best = Some(result);
                    }
                }
                Ok(None) => {
                    log::debug!("strategy {} found no MRZ block", strategy.name);
                }
                Err(e) => {
                    // Isolated per-strategy failure: log and move on.
                    log::warn!("strategy {} failed: {}", strategy.name, e);
                }
            }
        }

        best.unwrap_or_else(ScanResult::no_mrz_detected)
    }

    fn run_strategy(
        &self,
        img: &DynamicImage,
        strategy: &ScanStrategy,
    ) -> Result<Option<ParsedIdentity>, ScanError> {
        log::debug!("trying strategy {}", strategy.name);

        let resized = preprocess::resize_if_needed(img, strategy.max_dim);
        let working = if strategy.crop_fraction > 0.0 {
            preprocess::crop_bottom_strip(&resized, strategy.crop_fraction)
        } else {
            resized
        };
        let processed = if strategy.binarize {
            preprocess::binarize(&working)
        } else {
            preprocess::grayscale(&working)
        };
        let png = preprocess::encode_png(&processed)?;

        let text = {
            let mut recognizer = self
                .recognizer
                .lock()
                .map_err(|_| ScanError::Ocr("OCR engine mutex poisoned".to_string()))?;
            recognizer.recognize(&png)?
        };
        log::debug!("strategy {} OCR output:\n{}", strategy.name, text);

        let lines: Vec<String> = text
            .lines()
            .map(normalize_line)
            .filter(|line| !line.is_empty())
            .collect();

        let block = match detect(&lines, self.options.allow_td3) {
            Some(block) => block,
            None => return Ok(None),
        };
        let fields = extract(&block);
        Ok(Some(build_identity(&block, &fields)))
    }
}

fn identity_status_label(identity: &ParsedIdentity) -> &'static str {
    match identity.status {
        ValidationStatus::Ok => "valid",
        ValidationStatus::Partial => "partial",
        ValidationStatus::Error => "unverified",
    }
}

fn result_for(identity: ParsedIdentity, strategy: &str) -> ScanResult {
    let status = identity.status;
    let messages = failure_messages(&identity.checks);
    let code = match status {
        ValidationStatus::Ok => ScanCode::Ok,
        _ => ScanCode::Partial,
    };
    ScanResult {
        code,
        data: Some(identity),
        validation: ValidationReport { status, messages },
        strategy: strategy.to_string(),
        timestamp: Utc::now(),
    }
}

// Retention order across strategies: a partial parse beats an unverified
// one, which beats nothing.
fn rank(result: &Option<ScanResult>) -> u8 {
    match result {
        None => 0,
        Some(r) => match r.validation.status {
            ValidationStatus::Error => 1,
            ValidationStatus::Partial => 2,
            ValidationStatus::Ok => 3,
        },
    }
}
