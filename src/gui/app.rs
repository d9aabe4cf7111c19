//! Main application window.

use crate::categorize::{TogetherClient, UnconfiguredCategorizer};
use crate::model::{Category, ExpenseRecord};
use crate::ocr::VisionClient;
use crate::pipeline;
use crate::report;
use crate::store::{EmptyTotal, ExpenseStore};
use anyhow::Result;
use eframe::egui;
use egui::{CentralPanel, RichText, Vec2};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tokio::runtime::Runtime;

use super::theme::{dark_theme, Colors};

/// Outcome of one background scan.
struct ScanOutcome {
    file_name: String,
    result: Result<ExpenseRecord, String>,
}

/// Editable copy of a scanned record, shown in the review window. The user
/// may change any field before saving; closing the window discards it.
#[derive(Clone)]
struct ReviewDraft {
    vendor: String,
    date: String,
    total: String,
    category: Category,
    warning: Option<String>,
}

impl ReviewDraft {
    fn from_record(record: ExpenseRecord) -> Self {
        Self {
            vendor: record.vendor,
            date: record.date,
            total: record.total,
            category: record.category,
            warning: None,
        }
    }

    fn into_record(self) -> ExpenseRecord {
        ExpenseRecord {
            vendor: self.vendor,
            date: self.date,
            total: self.total,
            category: self.category,
        }
    }
}

/// Application state.
pub struct ExpenseTrackerApp {
    /// OCR client, None when credentials are missing
    ocr_client: Option<Arc<VisionClient>>,
    /// Categorization client, None when the API key is missing
    categorizer: Option<Arc<TogetherClient>>,
    /// Tokio runtime for background scans
    runtime: Runtime,
    /// Accepted expenses for this session
    store: ExpenseStore,
    /// Record awaiting review, if any
    review: Option<ReviewDraft>,
    /// Whether a scan is in flight (at most one at a time)
    is_processing: bool,
    /// File currently being scanned
    current_file: Option<String>,
    /// Status message
    status: String,
    /// Scan result channel
    result_rx: Receiver<ScanOutcome>,
    result_tx: Sender<ScanOutcome>,
}

impl Default for ExpenseTrackerApp {
    fn default() -> Self {
        let (result_tx, result_rx) = channel();

        let ocr_client = match VisionClient::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(error) => {
                tracing::error!("OCR client initialization failed: {error:#}");
                None
            }
        };
        let categorizer = match TogetherClient::from_env() {
            Ok(client) => Some(Arc::new(client)),
            Err(error) => {
                tracing::error!("categorization client initialization failed: {error:#}");
                None
            }
        };

        Self {
            ocr_client,
            categorizer,
            runtime: Runtime::new().expect("failed to create Tokio runtime"),
            store: ExpenseStore::new(),
            review: None,
            is_processing: false,
            current_file: None,
            status: "Select a receipt to start.".to_string(),
            result_rx,
            result_tx,
        }
    }
}

impl ExpenseTrackerApp {
    /// Whether a new scan may start: one at a time, and never while a
    /// record is still under review.
    fn can_start_scan(&self) -> bool {
        !self.is_processing && self.review.is_none()
    }

    /// Kick off a background scan of one receipt file. Only the OCR client
    /// is required; without a categorizer every record falls back to Other.
    fn process_file(&mut self, path: PathBuf) {
        let Some(ocr) = self.ocr_client.clone() else {
            self.status = "OCR is not configured; check the environment.".to_string();
            return;
        };
        let categorizer = self.categorizer.clone();

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("receipt")
            .to_string();

        self.is_processing = true;
        self.current_file = Some(file_name.clone());
        self.status = format!("Processing {file_name}...");

        let result_tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            let result = match categorizer {
                Some(categorizer) => {
                    pipeline::process_receipt(&path, ocr.as_ref(), categorizer.as_ref()).await
                }
                None => {
                    pipeline::process_receipt(&path, ocr.as_ref(), &UnconfiguredCategorizer).await
                }
            }
            .map_err(|e| e.to_string());
            let _ = result_tx.send(ScanOutcome { file_name, result });
        });
    }

    /// Drain finished scans from the background task.
    fn receive_results(&mut self) {
        while let Ok(outcome) = self.result_rx.try_recv() {
            self.is_processing = false;
            match outcome.result {
                Ok(record) => {
                    self.status = format!("Review the fields extracted from {}.", outcome.file_name);
                    self.review = Some(ReviewDraft::from_record(record));
                }
                Err(error) => {
                    tracing::error!("failed to process {}: {error}", outcome.file_name);
                    self.status = format!("Failed to process {}: {error}", outcome.file_name);
                }
            }
        }
    }

    fn pick_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Receipts", &["pdf", "png", "jpg", "jpeg"])
            .pick_file()
        {
            self.process_file(path);
        }
    }

    fn export_report(&mut self) {
        match report::write_report(self.store.records(), Path::new(report::REPORT_FILE)) {
            Ok(()) => {
                self.status = format!("Report saved to {}.", report::REPORT_FILE);
                let _ = open::that(report::REPORT_FILE);
            }
            Err(error) => {
                tracing::error!("report export failed: {error:#}");
                self.status = format!("Report export failed: {error}");
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.raw.dropped_files.is_empty()) {
            return;
        }
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.into_iter().next() {
            if self.can_start_scan() {
                self.process_file(path);
            }
        }
    }

    /// Review window: edit the extracted fields, then save or discard.
    fn show_review_window(&mut self, ctx: &egui::Context) {
        let mut save_requested = false;
        let mut window_open = true;

        if let Some(draft) = &mut self.review {
            egui::Window::new("Review and Save")
                .open(&mut window_open)
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    egui::Grid::new("review_fields")
                        .num_columns(2)
                        .spacing([12.0, 8.0])
                        .show(ui, |ui| {
                            ui.label("Vendor");
                            ui.text_edit_singleline(&mut draft.vendor);
                            ui.end_row();

                            ui.label("Date");
                            ui.text_edit_singleline(&mut draft.date);
                            ui.end_row();

                            ui.label("Total");
                            ui.text_edit_singleline(&mut draft.total);
                            ui.end_row();

                            ui.label("Category");
                            egui::ComboBox::from_id_salt("review_category")
                                .selected_text(draft.category.label())
                                .show_ui(ui, |ui| {
                                    for category in Category::ALL {
                                        ui.selectable_value(
                                            &mut draft.category,
                                            category,
                                            category.label(),
                                        );
                                    }
                                });
                            ui.end_row();
                        });

                    if let Some(warning) = &draft.warning {
                        ui.colored_label(Colors::ERROR, warning);
                    }

                    if ui.button("Save").clicked() {
                        save_requested = true;
                    }
                });
        }

        if save_requested {
            if let Some(draft) = self.review.take() {
                match self.store.accept(draft.clone().into_record()) {
                    Ok(()) => {
                        self.status = format!("Expense saved ({} total).", self.store.len());
                    }
                    Err(EmptyTotal) => {
                        let mut draft = draft;
                        draft.warning =
                            Some("Total amount is empty. Please fill it in.".to_string());
                        self.review = Some(draft);
                    }
                }
            }
        } else if self.review.is_some() && !window_open {
            self.review = None;
            self.status = "Receipt discarded.".to_string();
        }
    }

    fn draw_main(&mut self, ui: &mut egui::Ui) {
        ui.spacing_mut().item_spacing = Vec2::new(8.0, 12.0);

        // Header
        ui.horizontal(|ui| {
            ui.heading(
                RichText::new("Expense Tracker")
                    .size(28.0)
                    .color(Colors::TEXT_PRIMARY),
            );
        });

        ui.label(
            RichText::new("Drop a receipt (PDF/PNG/JPEG) or pick one, review the fields, save.")
                .size(14.0)
                .color(Colors::TEXT_SECONDARY),
        );

        // Configuration warnings
        if self.ocr_client.is_none() || self.categorizer.is_none() {
            ui.group(|ui| {
                if self.ocr_client.is_none() {
                    ui.label(
                        RichText::new(
                            "⚠ OCR unavailable - set GOOGLE_APPLICATION_CREDENTIALS",
                        )
                        .color(Colors::ERROR),
                    );
                }
                if self.categorizer.is_none() {
                    ui.label(
                        RichText::new(
                            "⚠ TOGETHER_API_KEY not set - categories will default to Other",
                        )
                        .color(Colors::ERROR),
                    );
                }
            });
        }

        // Drop zone
        let is_hovering = !ui.ctx().input(|i| i.raw.hovered_files.is_empty());
        let frame_color = if is_hovering { Colors::ACCENT } else { Colors::BORDER };
        let bg_color = if is_hovering { Colors::BG_HOVER } else { Colors::BG_CARD };

        let drop_zone = egui::Frame::new()
            .fill(bg_color)
            .stroke(egui::Stroke::new(2.0, frame_color))
            .corner_radius(16.0)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_min_size(Vec2::new(ui.available_width(), 110.0));
                ui.vertical_centered(|ui| {
                    let icon = if is_hovering { "📥" } else { "🧾" };
                    ui.label(RichText::new(icon).size(40.0));
                    ui.label(
                        RichText::new("Drop a receipt here, or click to select")
                            .size(16.0)
                            .color(Colors::TEXT_PRIMARY),
                    );
                });
            });

        if drop_zone.response.clicked() && self.can_start_scan() {
            self.pick_file();
        }

        // Controls
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.can_start_scan(), egui::Button::new("Select Receipt"))
                .clicked()
            {
                self.pick_file();
            }

            if ui
                .add_enabled(
                    !self.store.is_empty() && !self.is_processing,
                    egui::Button::new("Export PDF Report"),
                )
                .clicked()
            {
                self.export_report();
            }

            // Remote OCR and categorization block the scan; show it
            if self.is_processing {
                ui.spinner();
                if let Some(file) = &self.current_file {
                    ui.label(RichText::new(format!("Scanning {file}...")).color(Colors::ACCENT));
                }
            }
        });

        // Dashboard
        ui.label(
            RichText::new(format!("Expenses ({})", self.store.len()))
                .size(16.0)
                .color(Colors::TEXT_PRIMARY),
        );

        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .max_height(240.0)
            .show(ui, |ui| {
                egui::Grid::new("expense_table")
                    .num_columns(4)
                    .striped(true)
                    .spacing([24.0, 6.0])
                    .show(ui, |ui| {
                        for header in ["Vendor", "Date", "Total", "Category"] {
                            ui.label(RichText::new(header).color(Colors::TEXT_SECONDARY));
                        }
                        ui.end_row();

                        for record in self.store.records() {
                            ui.label(record.vendor.as_str());
                            ui.label(record.date.as_str());
                            ui.label(record.total.as_str());
                            ui.label(record.category.label());
                            ui.end_row();
                        }
                    });
            });

        // Totals line
        let totals = self.store.totals();
        let parts: Vec<String> = totals
            .iter()
            .map(|(category, sum)| format!("{}: ${sum:.2}", category.label()))
            .collect();
        ui.label(
            RichText::new(format!(
                "Totals - {} | Overall: ${:.2}",
                parts.join(" | "),
                totals.overall
            ))
            .size(13.0)
            .color(Colors::TEXT_SECONDARY),
        );

        // Status bar
        ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
            egui::Frame::new()
                .fill(Colors::BG_CARD)
                .inner_margin(egui::Margin::symmetric(16, 10))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(&self.status)
                            .size(13.0)
                            .color(Colors::TEXT_SECONDARY),
                    );
                });
        });
    }
}

impl eframe::App for ExpenseTrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_results();
        self.handle_dropped_files(ctx);

        // Repaint while the background scan runs
        if self.is_processing {
            ctx.request_repaint();
        }

        self.show_review_window(ctx);

        CentralPanel::default().show(ctx, |ui| self.draw_main(ui));
    }
}

/// Launch the application.
pub fn run() -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 640.0])
            .with_min_inner_size([620.0, 520.0])
            .with_title("Expense Tracker")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Expense Tracker",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_style(dark_theme());
            Ok(Box::new(ExpenseTrackerApp::default()))
        }),
    )
    .map_err(|e| anyhow::anyhow!("application error: {e}"))
}
