use std::path::PathBuf;
use std::time::Instant;

use crate::export::{export, ExportFormat};
use crate::pipeline::{Analysis, RankedVendor};
use crate::report::{criterion_charts, ChartSeries};
use crate::scoring::ScoreBreakdown;
use crate::tui::theme::ThemeColors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Ranking,
    Charts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
    ScoreBreakdown,
}

pub struct App {
    pub analysis: Analysis,
    pub charts: Vec<ChartSeries>,
    pub table_state: ratatui::widgets::TableState,
    pub current_tab: Tab,
    /// Index into `charts`
    pub chart_index: usize,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub export_path: Option<PathBuf>,
    pub delimiter: u8,
    pub theme: ThemeColors,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        analysis: Analysis,
        top_n: usize,
        export_path: Option<PathBuf>,
        delimiter: u8,
        theme: ThemeColors,
    ) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !analysis.ranking.is_empty() {
            table_state.select(Some(0));
        }
        let charts = criterion_charts(&analysis.dataset.records, top_n);

        Self {
            analysis,
            charts,
            table_state,
            current_tab: Tab::Ranking,
            chart_index: 0,
            input_mode: InputMode::Normal,
            flash_message: None,
            export_path,
            delimiter,
            theme,
            should_quit: false,
        }
    }

    pub fn next_row(&mut self) {
        let len = self.analysis.ranking.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.analysis.ranking.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_vendor(&self) -> Option<RankedVendor<'_>> {
        let pos = self.table_state.selected()?;
        self.analysis.ranked().nth(pos)
    }

    pub fn selected_breakdown(&self) -> Option<(String, ScoreBreakdown)> {
        let ranked = self.selected_vendor()?;
        let breakdown = self.analysis.breakdown(ranked.vendor.row)?;
        Some((ranked.name.to_string(), breakdown))
    }

    pub fn current_chart(&self) -> Option<&ChartSeries> {
        self.charts.get(self.chart_index)
    }

    pub fn next_chart(&mut self) {
        if !self.charts.is_empty() {
            self.chart_index = (self.chart_index + 1) % self.charts.len();
        }
    }

    pub fn previous_chart(&mut self) {
        if !self.charts.is_empty() {
            self.chart_index = (self.chart_index + self.charts.len() - 1) % self.charts.len();
        }
    }

    pub fn toggle_tab(&mut self) {
        self.current_tab = match self.current_tab {
            Tab::Ranking => Tab::Charts,
            Tab::Charts => Tab::Ranking,
        };
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    /// Show help overlay
    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    /// Dismiss any overlay
    pub fn dismiss_popup(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Show score breakdown overlay (ranking tab with a selection only)
    pub fn show_score_breakdown(&mut self) {
        if self.current_tab == Tab::Ranking && self.selected_vendor().is_some() {
            self.input_mode = InputMode::ScoreBreakdown;
        }
    }

    /// Export to the configured path, reporting the result in the status bar
    pub fn export_current(&mut self) {
        let Some(path) = self.export_path.clone() else {
            self.show_flash("Error: no export path (start with -o FILE)".to_string());
            return;
        };
        let format = ExportFormat::from_path(&path);
        match export(&self.analysis, &path, format, self.delimiter) {
            Ok(()) => self.show_flash(format!("Exported: {}", path.display())),
            Err(e) => self.show_flash(format!("Failed to export: {:#}", e)),
        }
    }
}
