use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, warn};

use super::{AsyncOp, ScreenScope};
use crate::device::{acquire_photo, BarcodeScanner, CaptureOptions, MediaPicker, PhotoSource};
use crate::error::{ApiError, ApiResult};
use crate::gateway::FitnessApi;
use crate::models::{FoodEntry, NutritionTotals};
use crate::state::AppState;
use crate::ui::Notice;

const LOGGED: &str = "Food logged successfully!";
const PHOTO_FAILED: &str = "Failed to analyze food image. Please try again.";
const BARCODE_FAILED: &str = "Product not found. Please try manual entry.";

/// Today's food log. Entries are appended once their content is known (after
/// analysis or lookup) and before the backend save; a failed save keeps them.
pub struct FoodLogScreen {
    api: Arc<dyn FitnessApi>,
    picker: Arc<dyn MediaPicker>,
    scanner: Arc<dyn BarcodeScanner>,
    scope: ScreenScope,
    verify_threshold: f64,
    entries: Vec<FoodEntry>,
    show_scanner: bool,
    op: AsyncOp<FoodEntry>,
    notice: Option<Notice>,
}

impl FoodLogScreen {
    pub fn new(
        state: &AppState,
        picker: Arc<dyn MediaPicker>,
        scanner: Arc<dyn BarcodeScanner>,
    ) -> Self {
        Self {
            api: state.api.clone(),
            picker,
            scanner,
            scope: ScreenScope::new(),
            verify_threshold: state.config.food_verify_threshold,
            entries: Vec::new(),
            show_scanner: false,
            op: AsyncOp::Idle,
            notice: None,
        }
    }

    pub fn with_entries(mut self, entries: Vec<FoodEntry>) -> Self {
        self.entries = entries;
        self
    }

    pub fn scope(&self) -> &ScreenScope {
        &self.scope
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    pub fn totals(&self) -> NutritionTotals {
        NutritionTotals::from_entries(&self.entries)
    }

    pub fn is_loading(&self) -> bool {
        self.op.is_pending()
    }

    pub fn is_scanner_open(&self) -> bool {
        self.show_scanner
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub async fn log_photo(&mut self, source: PhotoSource) {
        if self.is_loading() {
            return;
        }
        match acquire_photo(self.picker.as_ref(), source, CaptureOptions::SQUARE).await {
            Ok(Some(uri)) => self.analyze_photo(uri).await,
            Ok(None) => {}
            Err(_) => {
                let msg = match source {
                    PhotoSource::Camera => {
                        "Camera permission is required to capture food photos"
                    }
                    PhotoSource::Library => "Photo library permission is required",
                };
                self.notice = Some(Notice::permission_required(msg));
            }
        }
    }

    async fn analyze_photo(&mut self, uri: String) {
        if !self.op.begin() {
            return;
        }
        let analyzed = self.scope.run(self.api.analyze_food_image(&uri)).await;
        let entry = match analyzed {
            Ok(analysis) => FoodEntry::from_analysis(
                &analysis,
                &uri,
                self.verify_threshold,
                OffsetDateTime::now_utc(),
            ),
            Err(e) => return self.fail(e, PHOTO_FAILED),
        };
        self.record(entry, PHOTO_FAILED).await;
    }

    pub async fn open_scanner(&mut self) {
        if self.scanner.request_permission().await {
            self.show_scanner = true;
        } else {
            self.notice = Some(Notice::permission_required(
                "Camera permission is required to scan barcodes",
            ));
        }
    }

    pub fn close_scanner(&mut self) {
        self.show_scanner = false;
    }

    pub async fn on_barcode_scanned(&mut self, code: &str) {
        self.show_scanner = false;
        if !self.op.begin() {
            return;
        }
        let found = self.scope.run(self.api.lookup_barcode(code)).await;
        let entry = match found {
            Ok(product) => FoodEntry::from_barcode(&product, OffsetDateTime::now_utc()),
            Err(e) => return self.fail(e, BARCODE_FAILED),
        };
        self.record(entry, BARCODE_FAILED).await;
    }

    async fn record(&mut self, entry: FoodEntry, failure: &str) {
        debug!(name = %entry.name, verified = entry.verified, "food entry appended");
        self.entries.push(entry.clone());
        let saved: ApiResult<FoodEntry> = self.scope.run(self.api.save_food_entry(&entry)).await;
        match saved {
            Ok(_) => {
                self.notice = Some(Notice::success(LOGGED));
                self.op.settle(Ok(entry));
            }
            Err(e) => self.fail(e, failure),
        }
    }

    fn fail(&mut self, err: ApiError, message: &str) {
        if !err.is_cancelled() {
            warn!(error = %err, "food logging failed");
            self.notice = Some(Notice::error(message));
        }
        self.op.settle(Err(err));
    }
}
