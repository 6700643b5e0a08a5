use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use agentkey_platform::screen::CaptureRegion;

use crate::content::{InputContent, InputKind};
use crate::strategies::{
    ClipboardImageStrategy, EditorActiveFileStrategy, FileUploadStrategy, ScreenshotStrategy,
    SelectedTextStrategy, TextSelectionStrategy,
};
use crate::strategy::CaptureStrategy;

/// Auto-detection order. Screenshot and the editor file are excluded:
/// both require an explicit user action or are intrusive to probe.
const AUTO_DETECT_ORDER: [InputKind; 4] = [
    InputKind::TextSelection,
    InputKind::SelectedText,
    InputKind::FileUpload,
    InputKind::ClipboardImage,
];

/// Owns the capture strategy set and picks between them.
pub struct InputCoordinator {
    strategies: Vec<Box<dyn CaptureStrategy>>,
    active: Option<InputKind>,
}

impl InputCoordinator {
    /// All six real strategies in their standard order.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(TextSelectionStrategy::new()),
            Box::new(SelectedTextStrategy::new()),
            Box::new(FileUploadStrategy::new()),
            Box::new(ClipboardImageStrategy::new()),
            Box::new(ScreenshotStrategy::new()),
            Box::new(EditorActiveFileStrategy::new()),
        ])
    }

    /// Injection point for tests and alternative strategy sets.
    pub fn with_strategies(strategies: Vec<Box<dyn CaptureStrategy>>) -> Self {
        Self {
            strategies,
            active: None,
        }
    }

    /// Capture input, honoring a preferred kind and the agent's allow-list.
    ///
    /// A preferred kind outside the allow-list is a configuration
    /// violation: returns `None` without attempting any capture. With
    /// `fallback`, a failed preferred capture falls through to
    /// auto-detection over [`AUTO_DETECT_ORDER`] filtered by the
    /// allow-list. `None` from this method means "no input, do nothing";
    /// it is never an error to propagate.
    pub fn capture(
        &mut self,
        preferred: Option<InputKind>,
        fallback: bool,
        allowed: Option<&[String]>,
    ) -> Option<InputContent> {
        if let Some(kind) = preferred {
            if let Some(allowed) = allowed {
                if !allowed.iter().any(|k| k == kind.as_str()) {
                    tracing::warn!("preferred input {} not in allow-list", kind.as_str());
                    return None;
                }
            }
            if let Some(content) = self.try_kind(kind) {
                self.active = Some(kind);
                tracing::info!("captured preferred input: {}", kind.as_str());
                return Some(content);
            }
            if !fallback {
                tracing::warn!("preferred input {} unavailable", kind.as_str());
                return None;
            }
        }

        for kind in AUTO_DETECT_ORDER {
            if let Some(allowed) = allowed {
                if !allowed.iter().any(|k| k == kind.as_str()) {
                    continue;
                }
            }
            if let Some(content) = self.try_kind(kind) {
                self.active = Some(kind);
                tracing::info!("auto-detected input: {}", kind.as_str());
                return Some(content);
            }
        }

        tracing::warn!("no input available from any source");
        None
    }

    fn try_kind(&mut self, kind: InputKind) -> Option<InputContent> {
        let strategy = self.strategies.iter_mut().find(|s| s.kind() == kind)?;
        if !strategy.is_available() {
            return None;
        }
        strategy.capture().filter(InputContent::has_payload)
    }

    /// Configure the file-upload strategy from a drop event.
    pub fn set_file_upload(&mut self, path: PathBuf) {
        for strategy in &mut self.strategies {
            if strategy.set_source_file(Some(path.clone())) {
                return;
            }
        }
    }

    pub fn clear_file_upload(&mut self) {
        for strategy in &mut self.strategies {
            if strategy.set_source_file(None) {
                return;
            }
        }
    }

    /// Invoke the screenshot strategy directly, bypassing priority order.
    pub fn take_screenshot(&mut self, region: Option<CaptureRegion>) -> Option<InputContent> {
        let strategy = self
            .strategies
            .iter_mut()
            .find(|s| s.kind() == InputKind::Screenshot)?;
        let content = match region {
            Some(r) => strategy.capture_with_region(r),
            None => strategy.capture(),
        };
        if content.is_some() {
            self.active = Some(InputKind::Screenshot);
        }
        content
    }

    /// The kind that produced the most recent successful capture.
    pub fn active_kind(&self) -> Option<InputKind> {
        self.active
    }

    /// Sweep every strategy's temp artifacts, returning per-kind counts.
    pub fn cleanup_temp_files(&mut self, max_age_hours: u64) -> HashMap<InputKind, usize> {
        let max_age = Duration::from_secs(max_age_hours * 3600);
        self.strategies
            .iter_mut()
            .map(|s| (s.kind(), s.sweep_temp(max_age)))
            .collect()
    }

    /// Availability of every strategy, for diagnostics.
    pub fn availability(&mut self) -> Vec<(InputKind, bool)> {
        self.strategies
            .iter_mut()
            .map(|s| (s.kind(), s.is_available()))
            .collect()
    }

    /// Human-readable status block for the shell's log pane.
    pub fn status_summary(&mut self) -> String {
        let mut lines = vec!["Input status:".to_string()];
        for (kind, available) in self.availability() {
            let mark = if available { "ok" } else { "--" };
            lines.push(format!("  [{mark}] {}", kind.display_name()));
        }
        if let Some(active) = self.active {
            lines.push(format!("  active: {}", active.as_str()));
        }
        lines.join("\n")
    }
}

impl Default for InputCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeStrategy {
        kind: InputKind,
        available: bool,
        text: Option<&'static str>,
        capture_calls: Arc<AtomicUsize>,
        sweep_counts: Vec<usize>,
    }

    impl FakeStrategy {
        fn new(kind: InputKind, available: bool, text: Option<&'static str>) -> Self {
            Self {
                kind,
                available,
                text,
                capture_calls: Arc::new(AtomicUsize::new(0)),
                sweep_counts: vec![],
            }
        }

        fn with_sweeps(mut self, counts: Vec<usize>) -> Self {
            self.sweep_counts = counts;
            self
        }

        fn call_counter(&self) -> Arc<AtomicUsize> {
            self.capture_calls.clone()
        }
    }

    impl CaptureStrategy for FakeStrategy {
        fn kind(&self) -> InputKind {
            self.kind
        }

        fn is_available(&mut self) -> bool {
            self.available
        }

        fn capture(&mut self) -> Option<InputContent> {
            self.capture_calls.fetch_add(1, Ordering::SeqCst);
            self.text
                .map(|t| InputContent::new(self.kind).with_text(t))
        }

        fn sweep_temp(&mut self, _max_age: Duration) -> usize {
            if self.sweep_counts.is_empty() {
                0
            } else {
                self.sweep_counts.remove(0)
            }
        }
    }

    fn allowed(kinds: &[&str]) -> Vec<String> {
        kinds.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn auto_detect_follows_priority_order() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(FakeStrategy::new(InputKind::TextSelection, false, None)),
            Box::new(FakeStrategy::new(InputKind::SelectedText, false, None)),
            Box::new(FakeStrategy::new(InputKind::FileUpload, true, Some("from file"))),
            Box::new(FakeStrategy::new(InputKind::ClipboardImage, true, Some("img"))),
        ]);

        let content = coordinator.capture(None, true, None).unwrap();
        assert_eq!(content.kind, InputKind::FileUpload);
        assert_eq!(coordinator.active_kind(), Some(InputKind::FileUpload));
    }

    #[test]
    fn screenshot_is_excluded_from_auto_detect() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(FakeStrategy::new(InputKind::TextSelection, false, None)),
            Box::new(FakeStrategy::new(InputKind::Screenshot, true, Some("grab"))),
            Box::new(FakeStrategy::new(InputKind::EditorActiveFile, true, Some("src"))),
        ]);

        assert!(coordinator.capture(None, true, None).is_none());
    }

    #[test]
    fn preferred_kind_outside_allow_list_is_rejected_before_capture() {
        let screenshot = FakeStrategy::new(InputKind::Screenshot, true, Some("grab"));
        let calls = screenshot.call_counter();
        let mut coordinator = InputCoordinator::with_strategies(vec![Box::new(screenshot)]);

        let result = coordinator.capture(
            Some(InputKind::Screenshot),
            true,
            Some(&allowed(&["text_selection"])),
        );
        assert!(result.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn allow_list_filters_auto_detect() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(FakeStrategy::new(InputKind::TextSelection, true, Some("clip"))),
            Box::new(FakeStrategy::new(InputKind::FileUpload, true, Some("file"))),
        ]);

        let content = coordinator
            .capture(None, true, Some(&allowed(&["file_upload"])))
            .unwrap();
        assert_eq!(content.kind, InputKind::FileUpload);
    }

    #[test]
    fn preferred_failure_without_fallback_returns_none() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(FakeStrategy::new(InputKind::FileUpload, false, None)),
            Box::new(FakeStrategy::new(InputKind::TextSelection, true, Some("clip"))),
        ]);

        let result = coordinator.capture(Some(InputKind::FileUpload), false, None);
        assert!(result.is_none());
    }

    #[test]
    fn preferred_failure_with_fallback_auto_detects() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(FakeStrategy::new(InputKind::FileUpload, false, None)),
            Box::new(FakeStrategy::new(InputKind::TextSelection, true, Some("clip"))),
        ]);

        let content = coordinator
            .capture(Some(InputKind::FileUpload), true, None)
            .unwrap();
        assert_eq!(content.kind, InputKind::TextSelection);
    }

    #[test]
    fn empty_capture_counts_as_unavailable() {
        // Available but yields an empty envelope: must not surface.
        let mut coordinator = InputCoordinator::with_strategies(vec![Box::new(
            FakeStrategy::new(InputKind::TextSelection, true, None),
        )]);
        assert!(coordinator.capture(None, true, None).is_none());
    }

    struct SourceFileStrategy {
        path: Option<PathBuf>,
    }

    impl CaptureStrategy for SourceFileStrategy {
        fn kind(&self) -> InputKind {
            InputKind::FileUpload
        }

        fn is_available(&mut self) -> bool {
            self.path.is_some()
        }

        fn capture(&mut self) -> Option<InputContent> {
            let path = self.path.clone()?;
            Some(InputContent::new(InputKind::FileUpload).with_file_path(path).with_text("body"))
        }

        fn set_source_file(&mut self, path: Option<PathBuf>) -> bool {
            self.path = path;
            true
        }
    }

    #[test]
    fn file_upload_round_trip_through_the_coordinator() {
        let mut coordinator =
            InputCoordinator::with_strategies(vec![Box::new(SourceFileStrategy { path: None })]);
        assert!(coordinator.capture(Some(InputKind::FileUpload), false, None).is_none());

        coordinator.set_file_upload(PathBuf::from("/tmp/notes.txt"));
        let content = coordinator
            .capture(Some(InputKind::FileUpload), false, None)
            .unwrap();
        assert_eq!(content.file_path.as_deref(), Some(std::path::Path::new("/tmp/notes.txt")));

        coordinator.clear_file_upload();
        assert!(coordinator.capture(Some(InputKind::FileUpload), false, None).is_none());
    }

    #[test]
    fn cleanup_reports_per_strategy_counts() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(
                FakeStrategy::new(InputKind::ClipboardImage, false, None).with_sweeps(vec![3, 0]),
            ),
            Box::new(FakeStrategy::new(InputKind::Screenshot, true, None).with_sweeps(vec![2, 0])),
        ]);

        let first = coordinator.cleanup_temp_files(24);
        assert_eq!(first[&InputKind::ClipboardImage], 3);
        assert_eq!(first[&InputKind::Screenshot], 2);

        let second = coordinator.cleanup_temp_files(24);
        assert_eq!(second[&InputKind::ClipboardImage], 0);
        assert_eq!(second[&InputKind::Screenshot], 0);
    }

    #[test]
    fn concrete_scenario_clipboard_text_with_allow_list() {
        let mut coordinator = InputCoordinator::with_strategies(vec![
            Box::new(FakeStrategy::new(
                InputKind::TextSelection,
                true,
                Some("Refactor this function for clarity"),
            )),
            Box::new(FakeStrategy::new(InputKind::FileUpload, false, None)),
        ]);

        let content = coordinator
            .capture(None, true, Some(&allowed(&["text_selection", "file_upload"])))
            .unwrap();
        assert_eq!(content.kind, InputKind::TextSelection);
        assert_eq!(
            content.text.as_deref(),
            Some("Refactor this function for clarity")
        );
    }
}
