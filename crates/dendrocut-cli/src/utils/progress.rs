use dendrocut::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Bar state shared by every reader thread: the indicatif bar plus the running count of
/// distance pairs parsed during ingestion.
struct IngestDisplay {
    pb: ProgressBar,
    pairs: usize,
}

impl IngestDisplay {
    fn pairs_message(&self) -> String {
        format!("{} pairs", self.pairs)
    }

    fn start_phase(&mut self, name: &'static str) {
        self.pb.reset();
        self.pb.set_length(0);
        self.pb.set_style(spinner_style());
        self.pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.pb.set_message(name);
    }

    fn start_ingest(&mut self, files: u64) {
        self.pairs = 0;
        self.pb.disable_steady_tick();
        self.pb.reset();
        self.pb.set_length(files);
        self.pb.set_position(0);
        self.pb.set_style(ingest_style());
        self.pb.set_message(self.pairs_message());
    }

    fn file_read(&mut self, pairs: usize) {
        self.pairs += pairs;
        self.pb.set_message(self.pairs_message());
        self.pb.inc(1);
    }

    fn finish_ingest(&mut self) {
        if let Some(files) = self.pb.length() {
            self.pb.set_position(files);
        }
        self.pb.finish_with_message(format!("{} pairs read", self.pairs));
    }

    fn apply(&mut self, event: Progress) {
        match event {
            Progress::PhaseStart { name } => self.start_phase(name),
            Progress::PhaseFinish => {
                self.pb.disable_steady_tick();
                self.pb.finish_with_message("✓ Done");
            }
            Progress::FilesDiscovered { total } => self.start_ingest(total),
            Progress::FileRead { pairs } => self.file_read(pairs),
            Progress::FilesFinished => self.finish_ingest(),
            Progress::Message(msg) if self.pb.is_finished() => self.pb.set_message(msg),
            Progress::Message(msg) => self.pb.println(format!("  {}", msg)),
        }
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .expect("Failed to create spinner style template")
}

fn ingest_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "Reading alignments [{bar:40.cyan/blue}] {pos}/{len} files, {msg} ({eta})",
    )
    .expect("Failed to create ingest bar template")
    .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
        let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
    })
    .progress_chars("##-")
}

/// Renders engine progress on stderr: a spinner per phase, and during ingestion a file
/// counter bar that also shows how many distance pairs have been parsed so far.
#[derive(Clone)]
pub struct CliProgressHandler {
    display: Arc<Mutex<IngestDisplay>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    /// A handler that tracks state without drawing anything, e.g. when logging is quiet.
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    fn with_draw_target(target: ProgressDrawTarget) -> Self {
        let pb = ProgressBar::with_draw_target(Some(0), target)
            .with_style(spinner_style())
            .with_message("Initializing...");
        pb.finish_and_clear();

        Self {
            display: Arc::new(Mutex::new(IngestDisplay { pb, pairs: 0 })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let display = Arc::clone(&self.display);

        Box::new(move |event: Progress| match display.lock() {
            Ok(mut display) => display.apply(event),
            Err(_) => warn!("Progress display mutex was poisoned. Cannot update progress."),
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
